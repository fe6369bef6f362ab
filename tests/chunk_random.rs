//! Chunk round-trip over randomized fixtures (spec scenario 5): random byte
//! chunks should survive `encodechunks` -> `decodechunks` unchanged.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rscodec::StringCodec;

#[test]
fn random_chunk_round_trip() {
    let codec = StringCodec::new(10, 6, None, None, None, None, "char").unwrap();
    let mut rng = StdRng::seed_from_u64(0xc0ffee);

    let chunks: Vec<Vec<u8>> = (0..6)
        .map(|_| (0..100).map(|_| rng.gen::<u8>()).collect())
        .collect();

    let encoded = codec.encodechunks(&chunks).unwrap();
    assert_eq!(encoded.len(), 10);
    assert!(encoded.iter().all(|c| c.len() == 100));

    let (decoded, corrections) = codec.decodechunks(&encoded, &[]).unwrap();
    assert_eq!(decoded, chunks);
    assert!(corrections.is_empty());
}

#[test]
fn random_chunk_round_trip_with_per_row_errors() {
    let codec = StringCodec::new(10, 6, None, None, None, None, "char").unwrap();
    let mut rng = StdRng::seed_from_u64(0xdeadbeef);

    let chunks: Vec<Vec<u8>> = (0..6)
        .map(|_| (0..50).map(|_| rng.gen::<u8>()).collect())
        .collect();

    let mut encoded = codec.encodechunks(&chunks).unwrap();
    // nroots = 4, so up to 2 errors per row are correctable; corrupt one
    // symbol per row at a random chunk index.
    for row in 0..50 {
        let chunk_idx = rng.gen_range(0..10);
        encoded[chunk_idx][row] ^= rng.gen_range(1..=255u8);
    }

    let (decoded, _corrections) = codec.decodechunks(&encoded, &[]).unwrap();
    assert_eq!(decoded, chunks);
}
