//! The 8-bit string codec façade: parameter defaulting, variant selection,
//! symbol-range and length validation, and the chunk / incremental-update
//! batch operations layered on top of [`crate::generic::GenericCoder`] and
//! the fixed [`crate::ccsds`] tables.

use tracing::{debug, trace};

use crate::ccsds;
use crate::error::RsError;
use crate::generic::GenericCoder;

/// Default `(gfpoly, fcr, prim)` keyed by `symsize`, per the CCSDS/Karn
/// `init_rs` parameter table. Symsize 0 and 1 have no default.
const DEFAULT_PARAMS: &[(u32, u32, u32, u32)] = &[
    (2, 0x7, 1, 1),
    (3, 0xb, 1, 1),
    (4, 0x13, 1, 1),
    (5, 0x25, 1, 1),
    (6, 0x43, 1, 1),
    (7, 0x89, 1, 1),
    (8, 0x187, 112, 11),
    (9, 0x211, 1, 1),
    (10, 0x409, 1, 1),
    (11, 0x805, 1, 1),
    (12, 0x1053, 1, 1),
    (13, 0x201b, 1, 1),
    (14, 0x4443, 1, 1),
    (15, 0x8003, 1, 1),
    (16, 0x1100b, 1, 1),
];

fn default_params(symsize: u32) -> Result<(u32, u32, u32), RsError> {
    DEFAULT_PARAMS
        .iter()
        .find(|&&(s, _, _, _)| s == symsize)
        .map(|&(_, gfpoly, fcr, prim)| (gfpoly, fcr, prim))
        .ok_or_else(|| RsError::config(format!("no default parameters for symsize {symsize}")))
}

/// Which concrete implementation backs a [`StringCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// The precompiled (255,223) CCSDS tables, conventional basis.
    Char8Fixed,
    /// The precompiled (255,223) CCSDS tables, dual-basis serial interface.
    Ccsds,
    /// Per-instance tables for any other 8-bit parameter set.
    GeneralChar,
}

impl Variant {
    fn parse(s: &str) -> Result<RequestedVariant, RsError> {
        match s {
            "char" => Ok(RequestedVariant::Char),
            "ccsds" => Ok(RequestedVariant::Ccsds),
            other => Err(RsError::config(format!("unrecognized variant {other:?}"))),
        }
    }
}

enum RequestedVariant {
    Char,
    Ccsds,
}

fn is_ccsds_tuple(symsize: u32, gfpoly: u32, fcr: u32, prim: u32, nroots: usize) -> bool {
    (symsize, gfpoly, fcr, prim, nroots) == (ccsds::SYMSIZE, ccsds::GFPOLY, ccsds::FCR, ccsds::PRIM, ccsds::NROOTS)
}

enum CoderImpl {
    Fixed,
    Ccsds,
    General(GenericCoder),
}

/// The 8-bit string codec. Immutable after construction; `encode`/`decode`
/// borrow `&self` and may be called concurrently from multiple threads.
pub struct StringCodec {
    pub n: usize,
    pub k: usize,
    pub symsize: u32,
    pub gfpoly: u32,
    pub fcr: u32,
    pub prim: u32,
    pub nroots: usize,
    pub pad: usize,
    pub mask: u32,
    pub variant: Variant,
    coder: CoderImpl,
}

impl StringCodec {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        n: usize,
        k: usize,
        symsize: Option<u32>,
        gfpoly: Option<u32>,
        fcr: Option<u32>,
        prim: Option<u32>,
        variant: &str,
    ) -> Result<Self, RsError> {
        let symsize = symsize.unwrap_or(8);
        if symsize == 0 || symsize > 8 {
            return Err(RsError::config(format!(
                "string codec requires 1 <= symsize <= 8, got {symsize}"
            )));
        }
        // Defaults are only consulted when at least one of (gfpoly, fcr,
        // prim) is unset, matching `codec_fill_params`'s guard in the
        // reference implementation: a fully explicit parameter set for an
        // otherwise default-less symsize (e.g. 1) is accepted without
        // touching the table.
        let (gfpoly, fcr, prim) = if gfpoly.is_none() || fcr.is_none() || prim.is_none() {
            let (def_gfpoly, def_fcr, def_prim) = default_params(symsize)?;
            (
                gfpoly.unwrap_or(def_gfpoly),
                fcr.unwrap_or(def_fcr),
                prim.unwrap_or(def_prim),
            )
        } else {
            (gfpoly.unwrap(), fcr.unwrap(), prim.unwrap())
        };

        if n < 2 || n > (1usize << symsize) - 1 || n > 255 {
            return Err(RsError::config(format!(
                "n={n} out of range for symsize {symsize}"
            )));
        }
        if k >= n {
            return Err(RsError::config(format!("k={k} must be < n={n}")));
        }
        let nroots = n - k;
        let nn = (1usize << symsize) - 1;
        let pad = nn - n;
        // Bits *not* allowed in a symbol, truncated to the 8-bit byte
        // container (`(0xff << symsize) & 0xff` in the reference codec);
        // e.g. 0 at symsize=8, since a full byte has no forbidden bits.
        let mask = (0xffu32 << symsize) & 0xff;

        let requested = Variant::parse(variant)?;
        let ccsds_tuple = is_ccsds_tuple(symsize, gfpoly, fcr, prim, nroots);

        let (resolved_variant, coder) = match requested {
            RequestedVariant::Ccsds => {
                if !ccsds_tuple {
                    return Err(RsError::config(
                        "ccsds variant requires the default CCSDS parameter tuple",
                    ));
                }
                (Variant::Ccsds, CoderImpl::Ccsds)
            }
            RequestedVariant::Char => {
                if ccsds_tuple {
                    (Variant::Char8Fixed, CoderImpl::Fixed)
                } else {
                    let coder = GenericCoder::new(symsize, gfpoly, fcr, prim, nroots)?;
                    (Variant::GeneralChar, CoderImpl::General(coder))
                }
            }
        };

        debug!(n, k, symsize, fcr, prim, nroots, pad, ?resolved_variant, "constructed string codec");

        Ok(Self {
            n,
            k,
            symsize,
            gfpoly,
            fcr,
            prim,
            nroots,
            pad,
            mask,
            variant: resolved_variant,
            coder,
        })
    }

    fn check_symbols(&self, data: &[u8]) -> Result<(), RsError> {
        if self.mask == 0 {
            return Ok(());
        }
        let max = (1u32 << self.symsize) - 1;
        for &b in data {
            if (b as u32) & self.mask != 0 {
                return Err(RsError::SymbolRange {
                    value: b as u32,
                    bits: self.symsize,
                    max,
                });
            }
        }
        Ok(())
    }

    /// `encode(data[0..k)) -> codeword[0..n)`.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>, RsError> {
        if data.len() != self.k {
            return Err(RsError::length_mismatch(self.k, data.len()));
        }
        self.check_symbols(data)?;

        let mut parity = vec![0u8; self.nroots];
        match &self.coder {
            CoderImpl::Fixed => ccsds::encode_rs_8(data, &mut parity),
            CoderImpl::Ccsds => ccsds::encode_rs_ccsds(data, &mut parity),
            CoderImpl::General(coder) => {
                let data_u32: Vec<u32> = data.iter().map(|&b| b as u32).collect();
                let mut parity_u32 = vec![0u32; self.nroots];
                coder.encode(&data_u32, &mut parity_u32);
                for (p, v) in parity.iter_mut().zip(parity_u32) {
                    *p = v as u8;
                }
            }
        }

        let mut out = Vec::with_capacity(self.n);
        out.extend_from_slice(data);
        out.extend_from_slice(&parity);
        Ok(out)
    }

    /// `decode(codeword[0..n), erasures) -> (data[0..k), corrections)`.
    pub fn decode(
        &self,
        codeword: &[u8],
        erasures: &[usize],
    ) -> Result<(Vec<u8>, Vec<usize>), RsError> {
        if codeword.len() != self.n {
            return Err(RsError::length_mismatch(self.n, codeword.len()));
        }
        self.check_symbols(codeword)?;
        for &e in erasures {
            if e >= self.n {
                return Err(RsError::config(format!(
                    "erasure position {e} out of range for n={}",
                    self.n
                )));
            }
        }

        let mut buf = codeword.to_vec();
        let padded_eras: Vec<usize> = erasures.iter().map(|&e| e + self.pad).collect();

        let corrections_padded = match &self.coder {
            CoderImpl::Fixed => {
                let mut eras = padded_eras.clone();
                ccsds::decode_rs_8(&mut buf, &mut eras, self.pad)?;
                eras
            }
            CoderImpl::Ccsds => {
                let mut eras = padded_eras.clone();
                ccsds::decode_rs_ccsds(&mut buf, &mut eras, self.pad)?;
                eras
            }
            CoderImpl::General(coder) => {
                let mut word: Vec<u32> = buf.iter().map(|&b| b as u32).collect();
                let mut eras: Vec<u32> = padded_eras.iter().map(|&e| e as u32).collect();
                coder.decode(&mut word, &mut eras, self.pad)?;
                for (b, v) in buf.iter_mut().zip(word) {
                    *b = v as u8;
                }
                eras.into_iter().map(|v| v as usize).collect()
            }
        };

        let mut corrections = Vec::with_capacity(corrections_padded.len());
        for pos in corrections_padded {
            if pos < self.pad {
                return Err(RsError::uncorrectable(
                    "corrected position de-pads to a negative index",
                ));
            }
            let depadded = pos - self.pad;
            if depadded >= self.n {
                return Err(RsError::uncorrectable(
                    "corrected position de-pads outside the codeword",
                ));
            }
            corrections.push(depadded);
        }
        corrections.sort_unstable();

        Ok((buf[..self.k].to_vec(), corrections))
    }

    /// Column-major batch encode: `chunks.len() == k`, all equal length.
    /// Output has `n` chunks of the same length; the first `k` are the
    /// (cloned) inputs, the last `nroots` carry the computed parity.
    ///
    /// The per-row sweep is the performance-critical path; with the
    /// `parallel` feature it runs across a rayon thread pool, otherwise
    /// sequentially. Row order is preserved either way, since each row's
    /// codeword is scattered back by its own index after the sweep
    /// completes.
    pub fn encodechunks(&self, chunks: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, RsError> {
        if chunks.len() != self.k {
            return Err(RsError::length_mismatch(self.k, chunks.len()));
        }
        let len = chunks.first().map(|c| c.len()).unwrap_or(0);
        for c in chunks {
            if c.len() != len {
                return Err(RsError::config("all chunks must have equal length"));
            }
        }

        let mut out: Vec<Vec<u8>> = chunks.to_vec();
        out.resize_with(self.n, || vec![0u8; len]);

        let rows = self.encode_rows(chunks, len)?;
        for (row, codeword) in rows.into_iter().enumerate() {
            for (i, sym) in codeword.into_iter().enumerate() {
                out[i][row] = sym;
            }
        }
        Ok(out)
    }

    #[cfg(feature = "parallel")]
    fn encode_rows(&self, chunks: &[Vec<u8>], len: usize) -> Result<Vec<Vec<u8>>, RsError> {
        use rayon::prelude::*;
        (0..len)
            .into_par_iter()
            .map(|row| {
                let data_row: Vec<u8> = chunks.iter().map(|c| c[row]).collect();
                self.encode(&data_row)
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn encode_rows(&self, chunks: &[Vec<u8>], len: usize) -> Result<Vec<Vec<u8>>, RsError> {
        trace!(rows = len, k = self.k, "sequential row-sweep encode starting");
        (0..len)
            .map(|row| {
                let data_row: Vec<u8> = chunks.iter().map(|c| c[row]).collect();
                self.encode(&data_row)
            })
            .collect()
    }

    /// Column-major batch decode: `chunks.len() == n`, all equal length.
    /// `erasures` apply identically to every row. Per-row corrections are
    /// unioned, deduplicated, and sorted. The whole batch fails if any row
    /// fails.
    pub fn decodechunks(
        &self,
        chunks: &[Vec<u8>],
        erasures: &[usize],
    ) -> Result<(Vec<Vec<u8>>, Vec<usize>), RsError> {
        if chunks.len() != self.n {
            return Err(RsError::length_mismatch(self.n, chunks.len()));
        }
        let len = chunks.first().map(|c| c.len()).unwrap_or(0);
        for c in chunks {
            if c.len() != len {
                return Err(RsError::config("all chunks must have equal length"));
            }
        }

        let mut out: Vec<Vec<u8>> = (0..self.k).map(|_| vec![0u8; len]).collect();
        let mut all_corrections = std::collections::BTreeSet::new();

        let rows = self.decode_rows(chunks, len, erasures)?;
        for (row, (data, corrections)) in rows.into_iter().enumerate() {
            for (i, sym) in data.into_iter().enumerate() {
                out[i][row] = sym;
            }
            all_corrections.extend(corrections);
        }

        Ok((out, all_corrections.into_iter().collect()))
    }

    #[cfg(feature = "parallel")]
    fn decode_rows(
        &self,
        chunks: &[Vec<u8>],
        len: usize,
        erasures: &[usize],
    ) -> Result<Vec<(Vec<u8>, Vec<usize>)>, RsError> {
        use rayon::prelude::*;
        (0..len)
            .into_par_iter()
            .map(|row| {
                let codeword: Vec<u8> = chunks.iter().map(|c| c[row]).collect();
                self.decode(&codeword, erasures)
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn decode_rows(
        &self,
        chunks: &[Vec<u8>],
        len: usize,
        erasures: &[usize],
    ) -> Result<Vec<(Vec<u8>, Vec<usize>)>, RsError> {
        trace!(rows = len, n = self.n, "sequential row-sweep decode starting");
        (0..len)
            .map(|row| {
                let codeword: Vec<u8> = chunks.iter().map(|c| c[row]).collect();
                self.decode(&codeword, erasures)
            })
            .collect()
    }

    /// Incremental parity update: exploits RS linearity by encoding a data
    /// vector that is zero everywhere except `dataindex`, and XORing the
    /// resulting delta at `parityindex - k` into `oldparity`.
    ///
    /// Only defined for [`Variant::Char8Fixed`] and [`Variant::GeneralChar`];
    /// the CCSDS dual-basis remapping is non-linear in the byte
    /// representation.
    pub fn updatechunk(
        &self,
        dataindex: usize,
        datadelta: &[u8],
        parityindex: usize,
        oldparity: &[u8],
    ) -> Result<Vec<u8>, RsError> {
        if matches!(self.variant, Variant::Ccsds) {
            return Err(RsError::config(
                "updatechunk is not defined for the ccsds (dual-basis) variant",
            ));
        }
        if dataindex >= self.k {
            return Err(RsError::config(format!(
                "dataindex {dataindex} out of range for k={}",
                self.k
            )));
        }
        if parityindex < self.k || parityindex >= self.n {
            return Err(RsError::config(format!(
                "parityindex {parityindex} out of range [{}, {})",
                self.k, self.n
            )));
        }
        if datadelta.len() != oldparity.len() {
            return Err(RsError::length_mismatch(datadelta.len(), oldparity.len()));
        }
        self.check_symbols(datadelta)?;
        self.check_symbols(oldparity)?;

        let parity_offset = parityindex - self.k;
        let mut newparity = vec![0u8; datadelta.len()];
        let mut data_row = vec![0u8; self.k];
        for row in 0..datadelta.len() {
            data_row[dataindex] = datadelta[row];
            let codeword = self.encode(&data_row)?;
            newparity[row] = codeword[self.k + parity_offset] ^ oldparity[row];
            data_row[dataindex] = 0;
        }
        Ok(newparity)
    }
}

/// Bytewise XOR; `a.len()` must equal `b.len()`.
pub fn xor(a: &[u8], b: &[u8]) -> Result<Vec<u8>, RsError> {
    if a.len() != b.len() {
        return Err(RsError::length_mismatch(a.len(), b.len()));
    }
    Ok(a.iter().zip(b).map(|(&x, &y)| x ^ y).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ccsds_all_zero_message() {
        let codec = StringCodec::new(255, 223, None, None, None, None, "ccsds").unwrap();
        let data = vec![0u8; 223];
        let codeword = codec.encode(&data).unwrap();
        let expected_byte = crate::dual_basis::to_dual(&[0u8])[0];
        assert!(codeword[223..].iter().all(|&b| b == expected_byte));
    }

    #[test]
    fn ccsds_variant_supports_shortening() {
        // nroots=32 but n < 255: a shortened dual-basis CCSDS config, which
        // `reedsolomon.c`'s `using_defaults` gate accepts (it never checks
        // n==255) and `encode_rs_ccsds.c`/`fixed.h` support via `pad`.
        // k=12, nroots=32 (CCSDS tuple) => n=44, well short of the full 255.
        let codec = StringCodec::new(44, 12, None, None, None, None, "ccsds").unwrap();
        let data = b"Hello, world".to_vec();
        let mut codeword = codec.encode(&data).unwrap();
        codeword[5] ^= 0x40;
        let (decoded, corrections) = codec.decode(&codeword, &[]).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(corrections, vec![5]);
    }

    #[test]
    fn default_8bit_single_error() {
        let codec = StringCodec::new(20, 12, None, None, None, None, "char").unwrap();
        let data = b"Hello, world".to_vec();
        let mut codeword = codec.encode(&data).unwrap();
        codeword[5] ^= 0x40;
        let (decoded, corrections) = codec.decode(&codeword, &[]).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(corrections, vec![5]);
    }

    #[test]
    fn two_erasures() {
        let codec = StringCodec::new(20, 12, None, None, None, None, "char").unwrap();
        let data = b"Hello, world".to_vec();
        let mut codeword = codec.encode(&data).unwrap();
        codeword[3] = 0;
        codeword[17] = 0;
        let (decoded, corrections) = codec.decode(&codeword, &[3, 17]).unwrap();
        assert_eq!(decoded, data);
        assert!(corrections.contains(&3));
        assert!(corrections.contains(&17));
    }

    #[test]
    fn uncorrectable_on_too_many_errors() {
        let codec = StringCodec::new(20, 12, None, None, None, None, "char").unwrap();
        let data = b"Hello, world".to_vec();
        let mut codeword = codec.encode(&data).unwrap();
        for i in 0..5 {
            codeword[i] ^= 0xff;
        }
        assert!(codec.decode(&codeword, &[]).is_err());
    }

    #[test]
    fn chunk_round_trip() {
        let codec = StringCodec::new(10, 6, None, None, None, None, "char").unwrap();
        let chunks: Vec<Vec<u8>> = (0..6)
            .map(|i| (0..100u32).map(|j| ((i * 37 + j * 3) & 0xff) as u8).collect())
            .collect();
        let encoded = codec.encodechunks(&chunks).unwrap();
        assert_eq!(encoded.len(), 10);
        let (decoded, corrections) = codec.decodechunks(&encoded, &[]).unwrap();
        assert_eq!(decoded, chunks);
        assert!(corrections.is_empty());
    }

    #[test]
    fn updater_matches_full_reencode() {
        let codec = StringCodec::new(10, 6, None, None, None, None, "char").unwrap();
        let olddata: Vec<u8> = (0..6u32).map(|i| (i * 11) as u8).collect();
        let old_codeword = codec.encode(&olddata).unwrap();

        let mut newdata = olddata.clone();
        newdata[2] ^= 0x55;
        let new_codeword = codec.encode(&newdata).unwrap();

        for parityindex in 6..10 {
            let newparity = codec
                .updatechunk(2, &[0x55], parityindex, &[old_codeword[parityindex]])
                .unwrap();
            assert_eq!(newparity[0], new_codeword[parityindex]);
        }
    }

    #[test]
    fn symbol_range_rejected() {
        // symsize=4 caps n at 2^4-1=15; use n=12,k=6 to stay in range.
        let codec = StringCodec::new(12, 6, Some(4), None, None, None, "char").unwrap();
        let mut data = vec![0u8; 6];
        data[0] = 0x10; // out of range for symsize=4 (forbidden-bits mask=0xf0)
        assert!(codec.encode(&data).is_err());
    }

    #[test]
    fn attribute_exposure_matches_defaults() {
        let codec = StringCodec::new(20, 12, None, None, None, None, "char").unwrap();
        assert_eq!(codec.symsize, 8);
        assert_eq!(codec.gfpoly, 0x187);
        assert_eq!(codec.fcr, 112);
        assert_eq!(codec.prim, 11);
        assert_eq!(codec.nroots, 8);
        assert_eq!(codec.pad, 255 - 20);
        // A full byte has no forbidden bits at symsize=8.
        assert_eq!(codec.mask, 0);
    }

    #[test]
    fn mask_holds_forbidden_bits_not_allowed_bits() {
        // symsize=4 over a byte container: bits 4..8 are forbidden.
        let codec = StringCodec::new(12, 6, Some(4), None, None, None, "char").unwrap();
        assert_eq!(codec.mask, 0xf0);
    }

    #[test]
    fn xor_requires_equal_length() {
        assert!(xor(&[1, 2, 3], &[1, 2]).is_err());
        assert_eq!(xor(&[1, 2, 3], &[4, 5, 6]).unwrap(), vec![5, 7, 5]);
    }
}
