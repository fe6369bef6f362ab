//! The integer codec façade: the `INT` variant, supporting symbol sizes up
//! to 16 bits (64K-entry tables) rather than the string codec's 8-bit cap.

use tracing::debug;

use crate::error::RsError;
use crate::generic::GenericCoder;

/// Default `(gfpoly, fcr, prim)` keyed by `symsize`, shared with the string
/// codec's table (symsize 8 still resolves to the CCSDS tuple here, though
/// the integer codec has no fixed-table fast path for it).
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

/// The integer codec: symbols are `u32`-wide but constrained to the low
/// `symsize` bits. No variant selection (there is only one implementation);
/// unlike [`crate::codec::StringCodec`] there is no fixed-table fast path.
pub struct IntegerCodec {
    pub n: usize,
    pub k: usize,
    pub symsize: u32,
    pub gfpoly: u32,
    pub fcr: u32,
    pub prim: u32,
    pub nroots: usize,
    pub pad: usize,
    pub mask: u32,
    coder: GenericCoder,
}

impl IntegerCodec {
    pub fn new(
        n: usize,
        k: usize,
        symsize: Option<u32>,
        gfpoly: Option<u32>,
        fcr: Option<u32>,
        prim: Option<u32>,
    ) -> Result<Self, RsError> {
        let symsize = symsize.unwrap_or(8);
        if symsize == 0 || symsize > 16 {
            return Err(RsError::config(format!(
                "integer codec requires 1 <= symsize <= 16, got {symsize}"
            )));
        }
        // Defaults are only consulted when at least one of (gfpoly, fcr,
        // prim) is unset, matching `codec_fill_params`'s guard in the
        // reference implementation: a fully explicit parameter set for an
        // otherwise default-less symsize is accepted without touching the
        // table.
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

        let nn = (1usize << symsize) - 1;
        if n < 2 || n > nn {
            return Err(RsError::config(format!(
                "n={n} out of range for symsize {symsize}"
            )));
        }
        if k >= n {
            return Err(RsError::config(format!("k={k} must be < n={n}")));
        }
        let nroots = n - k;
        let pad = nn - n;
        // Bits *not* allowed in a symbol, across the full 32-bit container
        // (`(-1) << symsize` in the reference int codec).
        let mask = !((1u32 << symsize) - 1);

        let coder = GenericCoder::new(symsize, gfpoly, fcr, prim, nroots)?;

        debug!(n, k, symsize, fcr, prim, nroots, pad, "constructed integer codec");

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
            coder,
        })
    }

    fn check_symbols(&self, data: &[u32]) -> Result<(), RsError> {
        let max = (1u32 << self.symsize) - 1;
        for &v in data {
            if v & self.mask != 0 {
                return Err(RsError::SymbolRange {
                    value: v,
                    bits: self.symsize,
                    max,
                });
            }
        }
        Ok(())
    }

    pub fn encode(&self, data: &[u32]) -> Result<Vec<u32>, RsError> {
        if data.len() != self.k {
            return Err(RsError::length_mismatch(self.k, data.len()));
        }
        self.check_symbols(data)?;

        let mut parity = vec![0u32; self.nroots];
        self.coder.encode(data, &mut parity);

        let mut out = Vec::with_capacity(self.n);
        out.extend_from_slice(data);
        out.extend_from_slice(&parity);
        Ok(out)
    }

    pub fn decode(
        &self,
        codeword: &[u32],
        erasures: &[usize],
    ) -> Result<(Vec<u32>, Vec<usize>), RsError> {
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

        let mut word = codeword.to_vec();
        let mut eras: Vec<u32> = erasures.iter().map(|&e| (e + self.pad) as u32).collect();
        self.coder.decode(&mut word, &mut eras, self.pad)?;

        let mut corrections = Vec::with_capacity(eras.len());
        for pos in eras {
            let pos = pos as usize;
            if pos < self.pad || pos - self.pad >= self.n {
                return Err(RsError::uncorrectable(
                    "corrected position de-pads outside the codeword",
                ));
            }
            corrections.push(pos - self.pad);
        }
        corrections.sort_unstable();

        Ok((word[..self.k].to_vec(), corrections))
    }
}
