//! Property-based tests of the universal round-trip and correction-capacity
//! invariants, run across randomly generated data and error patterns.

use proptest::prelude::*;
use rscodec::StringCodec;

fn codec() -> StringCodec {
    StringCodec::new(20, 12, None, None, None, None, "char").unwrap()
}

proptest! {
    #[test]
    fn round_trip_holds_for_any_in_range_data(data in prop::collection::vec(0u8..=255, 12)) {
        let codec = codec();
        let codeword = codec.encode(&data).unwrap();
        let (decoded, corrections) = codec.decode(&codeword, &[]).unwrap();
        prop_assert_eq!(decoded, data);
        prop_assert!(corrections.is_empty());
    }

    #[test]
    fn correction_capability_up_to_half_nroots(
        data in prop::collection::vec(0u8..=255, 12),
        error_positions in prop::collection::hash_set(0usize..20, 0..=4),
        deltas in prop::collection::vec(1u8..=255, 4),
    ) {
        let codec = codec();
        let mut codeword = codec.encode(&data).unwrap();
        let mut modified: Vec<usize> = error_positions.into_iter().collect();
        modified.sort_unstable();
        for (pos, &delta) in modified.iter().zip(deltas.iter()) {
            codeword[*pos] ^= delta;
        }
        let (decoded, corrections) = codec.decode(&codeword, &[]).unwrap();
        prop_assert_eq!(decoded, data);
        let mut corrections_sorted = corrections;
        corrections_sorted.sort_unstable();
        prop_assert_eq!(corrections_sorted, modified);
    }

    #[test]
    fn symbol_range_always_rejected_before_field_ops(v in 16u32..=255) {
        // symsize=4 caps n at 2^4-1=15; use n=12,k=6 to stay in range.
        let codec = StringCodec::new(12, 6, Some(4), None, None, None, "char").unwrap();
        let mut data = vec![0u8; 6];
        data[0] = v as u8;
        prop_assert!(codec.encode(&data).is_err());
    }
}
