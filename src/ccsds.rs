//! The fixed CCSDS (255,223) Reed-Solomon coder: precompiled field and
//! generator tables for `symsize=8, gfpoly=0x187, fcr=112, prim=11,
//! nroots=32`, plus the dual-basis adapter CCSDS 131.0-B3 layers on top of
//! the conventional-basis coder.
//!
//! Splitting `CHAR8_FIXED` (conventional basis, any shortened `n`) from
//! `CCSDS` (dual basis, same math) mirrors how the original `librs` kept a
//! single fixed coder under two Python-visible names.

use std::sync::OnceLock;

use crate::dual_basis::{to_conv, to_dual};
use crate::error::RsError;
use crate::generic::GenericCoder;

/// `symsize`, `gfpoly`, `fcr`, `prim`, `nroots` for the CCSDS fixed coder.
/// A non-default tuple falls back to [`crate::codec::Variant::GeneralChar`].
pub const SYMSIZE: u32 = 8;
pub const GFPOLY: u32 = 0x187;
pub const FCR: u32 = 112;
pub const PRIM: u32 = 11;
pub const NROOTS: usize = 32;
pub const NN: usize = 255;

fn fixed_coder() -> &'static GenericCoder {
    // The field and generator tables depend only on (symsize, gfpoly, fcr,
    // prim, nroots), never on shortening: one static instance serves every
    // shortened CCSDS-parameter length, with `pad` threaded through each
    // call (mirroring librs, where the fixed tables are build-time
    // constants but `pad` is a per-codec-instance field).
    static CODER: OnceLock<GenericCoder> = OnceLock::new();
    CODER.get_or_init(|| {
        GenericCoder::new(SYMSIZE, GFPOLY, FCR, PRIM, NROOTS)
            .expect("CCSDS default parameters are always valid")
    })
}

/// Systematic encode over the fixed-table coder. `data` is `255 - pad - 32`
/// bytes, `parity` is filled with 32 bytes. `encode` never references
/// `pad`: shortening only affects the length of `data`.
pub fn encode_rs_8(data: &[u8], parity: &mut [u8]) {
    let coder = fixed_coder();
    let data_u32: Vec<u32> = data.iter().map(|&b| b as u32).collect();
    let mut parity_u32 = vec![0u32; NROOTS];
    coder.encode(&data_u32, &mut parity_u32);
    for (p, v) in parity.iter_mut().zip(parity_u32) {
        *p = v as u8;
    }
}

/// Decode in place over the fixed-table coder. `codeword` is `255 - pad`
/// bytes (data followed by parity); `eras_pos` holds padded (NN-space)
/// positions and is rewritten with corrected padded positions on success.
pub fn decode_rs_8(
    codeword: &mut [u8],
    eras_pos: &mut Vec<usize>,
    pad: usize,
) -> Result<usize, RsError> {
    let coder = fixed_coder();
    let mut word: Vec<u32> = codeword.iter().map(|&b| b as u32).collect();
    let mut eras: Vec<u32> = eras_pos.iter().map(|&p| p as u32).collect();
    let count = coder.decode(&mut word, &mut eras, pad)?;
    for (c, v) in codeword.iter_mut().zip(word) {
        *c = v as u8;
    }
    eras_pos.clear();
    eras_pos.extend(eras.into_iter().map(|p| p as usize));
    Ok(count)
}

/// Encode a dual-basis CCSDS message: convert to conventional basis, run
/// the fixed coder, convert parity back to dual basis.
pub fn encode_rs_ccsds(data: &[u8], parity: &mut [u8]) {
    let conv_data = to_conv(data);
    let mut conv_parity = vec![0u8; NROOTS];
    encode_rs_8(&conv_data, &mut conv_parity);
    let dual_parity = to_dual(&conv_parity);
    parity.copy_from_slice(&dual_parity);
}

/// Decode a dual-basis CCSDS codeword in place. `codeword` is `255 - pad`
/// bytes; a shortened CCSDS code converts only the un-padded bytes through
/// the dual-basis tables, matching `decode_rs_ccsds(data, eras_pos, no_eras,
/// pad)` in the reference `fixed.h`/`encode_rs_ccsds.c`.
pub fn decode_rs_ccsds(
    codeword: &mut [u8],
    eras_pos: &mut Vec<usize>,
    pad: usize,
) -> Result<usize, RsError> {
    let mut conv = to_conv(codeword);
    let count = decode_rs_8(&mut conv, eras_pos, pad)?;
    let dual = to_dual(&conv);
    codeword.copy_from_slice(&dual);
    Ok(count)
}
