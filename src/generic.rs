//! The generic Reed-Solomon coder: systematic LFSR encode, and
//! Berlekamp-Massey + Chien search + Forney decode with erasure support.
//!
//! This is a direct generalization of the classic Karn `rs.c` `encode_rs`/
//! `decode_rs` template (the same family the CCSDS fixed tables in
//! [`crate::ccsds`] specialize), parameterized over symbol size, `fcr`,
//! `prim`, `nroots`, and `pad` rather than hard-coded as C preprocessor
//! macros.

use crate::error::RsError;
use crate::generator::generator_poly;
use crate::gf::GaloisField;

/// A fully-parameterized Reed-Solomon coder over GF(2^symsize).
///
/// A single instance's field and generator tables are independent of
/// shortening: the classic `rs.c` template keeps `pad` as a per-call
/// argument rather than baking it into the tables, so one coder (e.g. the
/// static CCSDS instance in [`crate::ccsds`]) serves every shortened length
/// sharing its `(symsize, gfpoly, fcr, prim, nroots)`. `encode` doesn't
/// reference `pad` at all; `decode` takes it explicitly.
///
/// All arithmetic operates in "NN-space": erasure positions passed to
/// [`GenericCoder::decode`] are expected in the padded convention described
/// in the crate-level docs (`user_index + pad`).
#[derive(Debug, Clone)]
pub struct GenericCoder {
    pub field: GaloisField,
    pub gen: Vec<u32>,
    pub fcr: u32,
    pub prim: u32,
    pub iprim: u32,
    pub nroots: usize,
}

impl GenericCoder {
    pub fn new(symsize: u32, gfpoly: u32, fcr: u32, prim: u32, nroots: usize) -> Result<Self, RsError> {
        let field = GaloisField::new(symsize, gfpoly)?;
        if nroots == 0 || nroots > field.nn as usize {
            return Err(RsError::config(format!(
                "nroots {nroots} out of range for symsize {symsize}"
            )));
        }
        let gen = generator_poly(&field, fcr, prim, nroots);
        let iprim = Self::mod_inverse(field.nn, prim);
        Ok(Self {
            field,
            gen,
            fcr,
            prim,
            iprim,
            nroots,
        })
    }

    /// Find `iprim` such that `iprim * prim === 1 (mod nn)`, via the classic
    /// `rs.c` search (valid because `prim` is always chosen coprime to `nn`).
    fn mod_inverse(nn: u32, prim: u32) -> u32 {
        let mut x = 1u32;
        while x % prim != 0 {
            x += nn;
        }
        x / prim
    }

    /// Systematic encode: `data` has `n - pad - nroots` symbols, `parity` is
    /// filled with `nroots` symbols.
    pub fn encode(&self, data: &[u32], parity: &mut [u32]) {
        debug_assert_eq!(parity.len(), self.nroots);
        parity.iter_mut().for_each(|p| *p = 0);
        let f = &self.field;
        for &d in data {
            let feedback = f.index_of[(d ^ parity[0]) as usize];
            if feedback != f.nn {
                for j in 1..self.nroots {
                    parity[j] ^= f.alpha_to[f.modnn(feedback + self.gen[self.nroots - j]) as usize];
                }
            }
            parity.copy_within(1.., 0);
            *parity.last_mut().unwrap() = if feedback != f.nn {
                f.alpha_to[f.modnn(feedback + self.gen[0]) as usize]
            } else {
                0
            };
        }
    }

    /// Decode in place. `codeword` is `n - pad` symbols (data followed by
    /// parity). `eras_pos` holds erasure positions in padded (NN-space)
    /// convention on entry; on success it is overwritten with the padded
    /// positions of every symbol the decoder touched (errors and erasures),
    /// truncated to the returned count.
    ///
    /// Returns `Ok(count)` with `count` corrected positions, or
    /// [`RsError::Uncorrectable`].
    pub fn decode(
        &self,
        codeword: &mut [u32],
        eras_pos: &mut Vec<u32>,
        pad: usize,
    ) -> Result<usize, RsError> {
        let f = &self.field;
        let nn = f.nn;
        let nroots = self.nroots;
        let no_eras = eras_pos.len();
        if no_eras > nroots {
            return Err(RsError::config(format!(
                "too many erasures: {no_eras} > nroots {nroots}"
            )));
        }
        for &pos in eras_pos.iter() {
            if pos as usize >= pad + codeword.len() || (pos as usize) < pad {
                return Err(RsError::config(format!(
                    "erasure position {pos} out of range"
                )));
            }
        }

        // 1. Syndromes: evaluate the received polynomial at each root, via
        // incremental Horner over the unshortened (pad-aware) length.
        let mut s = vec![0u32; nroots];
        for i in 0..nroots {
            s[i] = codeword[0];
        }
        for j in 1..codeword.len() {
            for i in 0..nroots {
                s[i] = if s[i] == 0 {
                    codeword[j]
                } else {
                    codeword[j]
                        ^ f.alpha_to[f.modnn(f.index_of[s[i] as usize] + (self.fcr + i as u32) * self.prim)
                            as usize]
                };
            }
        }

        let mut syn_error = 0u32;
        for i in 0..nroots {
            syn_error |= s[i];
            s[i] = f.index_of[s[i] as usize];
        }
        if syn_error == 0 {
            eras_pos.clear();
            return Ok(0);
        }

        // 2. Seed lambda with the erasure locator polynomial.
        let mut lambda = vec![0u32; nroots + 1];
        lambda[0] = 1;
        if no_eras > 0 {
            lambda[1] = f.alpha_to[f.modnn(self.prim * (nn - 1 - eras_pos[0])) as usize];
            for i in 1..no_eras {
                let u = f.modnn(self.prim * (nn - 1 - eras_pos[i]));
                for j in (1..=i + 1).rev() {
                    let tmp = f.index_of[lambda[j - 1] as usize];
                    if tmp != nn {
                        lambda[j] ^= f.alpha_to[f.modnn(u + tmp) as usize];
                    }
                }
            }
        }
        let mut b = vec![0u32; nroots + 1];
        for i in 0..=nroots {
            b[i] = f.index_of[lambda[i] as usize];
        }

        // 3. Berlekamp-Massey, continuing from the erasure-seeded locator.
        let mut r = no_eras;
        let mut el = no_eras;
        let mut t = vec![0u32; nroots + 1];
        loop {
            r += 1;
            if r > nroots {
                break;
            }
            let mut discr_r = 0u32;
            for i in 0..r {
                if lambda[i] != 0 && s[r - i - 1] != nn {
                    discr_r ^= f.alpha_to[f.modnn(f.index_of[lambda[i] as usize] + s[r - i - 1]) as usize];
                }
            }
            let discr_r = f.index_of[discr_r as usize];
            if discr_r == nn {
                b.copy_within(0..nroots, 1);
                b[0] = nn;
            } else {
                t[0] = lambda[0];
                for i in 0..nroots {
                    t[i + 1] = if b[i] != nn {
                        lambda[i + 1] ^ f.alpha_to[f.modnn(discr_r + b[i]) as usize]
                    } else {
                        lambda[i + 1]
                    };
                }
                if 2 * el <= r + no_eras - 1 {
                    el = r + no_eras - el;
                    for i in 0..=nroots {
                        b[i] = if lambda[i] == 0 {
                            nn
                        } else {
                            f.modnn_signed(f.index_of[lambda[i] as usize] as i64 - discr_r as i64 + nn as i64)
                        };
                    }
                } else {
                    b.copy_within(0..nroots, 1);
                    b[0] = nn;
                }
                lambda.copy_from_slice(&t);
            }
        }

        // 4. Degree of lambda, converted to index form.
        let mut deg_lambda = 0usize;
        for i in 0..=nroots {
            lambda[i] = f.index_of[lambda[i] as usize];
            if lambda[i] != nn {
                deg_lambda = i;
            }
        }

        // 5. Chien search.
        let mut reg = vec![nn; nroots + 1];
        reg[1..=nroots].copy_from_slice(&lambda[1..=nroots]);
        let mut root = vec![0u32; nroots];
        let mut loc = vec![0u32; nroots];
        let mut count = 0usize;
        let mut k = self.iprim.wrapping_sub(1);
        // iprim >= 1 always, so iprim - 1 is safe as u32 unless iprim == 0
        // (never true: iprim is a multiplicative inverse, always >= 1).
        let mut i = 1u32;
        while i <= nn {
            let mut q = 1u32;
            for j in (1..=deg_lambda).rev() {
                if reg[j] != nn {
                    reg[j] = f.modnn(reg[j] + j as u32);
                    q ^= f.alpha_to[reg[j] as usize];
                }
            }
            if q == 0 {
                root[count] = i;
                loc[count] = k;
                count += 1;
                if count == deg_lambda {
                    break;
                }
            }
            i += 1;
            k = f.modnn(k + self.iprim);
        }
        if deg_lambda != count {
            return Err(RsError::uncorrectable(
                "chien search found fewer roots than deg(lambda)",
            ));
        }

        // 6. Forney: error/erasure evaluator Omega = S*Lambda mod x^nroots.
        let mut omega = vec![0u32; nroots + 1];
        let mut deg_omega = 0usize;
        for i in 0..nroots {
            let mut tmp = 0u32;
            let jmax = deg_lambda.min(i);
            for j in 0..=jmax {
                if s[i - j] != nn && lambda[j] != nn {
                    tmp ^= f.alpha_to[f.modnn(s[i - j] + lambda[j]) as usize];
                }
            }
            if tmp != 0 {
                deg_omega = i;
            }
            omega[i] = f.index_of[tmp as usize];
        }
        omega[nroots] = nn;

        for j in (0..count).rev() {
            let mut num1 = 0u32;
            for i in (0..=deg_omega).rev() {
                if omega[i] != nn {
                    num1 ^= f.alpha_to[f.modnn(omega[i] + i as u32 * root[j]) as usize];
                }
            }
            let num2 = f.alpha_to[f.modnn_signed(root[j] as i64 * (self.fcr as i64 - 1) + nn as i64)
                as usize];
            let mut den = 0u32;
            let top = deg_lambda.min(nroots - 1) & !1usize;
            let mut i = top as i64;
            while i >= 0 {
                let idx = (i + 1) as usize;
                if lambda[idx] != nn {
                    den ^= f.alpha_to[f.modnn(lambda[idx] + i as u32 * root[j]) as usize];
                }
                i -= 2;
            }
            if den == 0 {
                return Err(RsError::uncorrectable("zero denominator in Forney step"));
            }
            if num1 != 0 {
                let pos = loc[j] as usize;
                if pos < pad || pos - pad >= codeword.len() {
                    return Err(RsError::uncorrectable(
                        "corrected position outside the codeword",
                    ));
                }
                codeword[pos - pad] ^= f.alpha_to[f.modnn(
                    f.index_of[num1 as usize] + f.index_of[num2 as usize] + nn - f.index_of[den as usize],
                ) as usize];
            }
        }

        eras_pos.clear();
        eras_pos.extend_from_slice(&loc[..count]);
        Ok(count)
    }
}

impl GaloisField {
    /// `modnn` for a possibly-negative accumulator, used by the decoder's
    /// index arithmetic.
    fn modnn_signed(&self, x: i64) -> u32 {
        let nn = self.nn as i64;
        let mut x = x % nn;
        while x < 0 {
            x += nn;
        }
        // large positive values also need the field's shift-add reduction
        // to stay consistent with `modnn`, though `% nn` already reduces
        // fully for i64 so this is just a final narrow.
        x as u32
    }
}
