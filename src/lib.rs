//! Configurable Reed-Solomon error-and-erasure correction over GF(2^m).
//!
//! Four public coders share the same field/generator/decoder machinery in
//! [`generic`]:
//!
//! - [`codec::StringCodec`] — the 8-bit façade, with a precompiled fast
//!   path for the CCSDS (255,223) parameters ([`Variant::Char8Fixed`],
//!   [`codec::Variant::Ccsds`]) and per-instance tables for any other 8-bit
//!   parameter set ([`codec::Variant::GeneralChar`]).
//! - [`intcodec::IntegerCodec`] — the same façade generalized to symbol
//!   sizes up to 16 bits.
//!
//! [`ccsds`] carries the dual-basis adapter CCSDS 131.0-B3 layers on top of
//! the conventional-basis (255,223) code, ported from the reference
//! Python/C `reedsolomon` extension this crate's decoder structure is
//! grounded on.
//!
//! Internally, positions are tracked in two coordinate systems: the
//! "padded" or NN-space convention the decoder in [`generic`] works in
//! (`user_index + pad`, where `pad = (2^symsize - 1) - n`), and the
//! "unpadded" convention exposed at the façade. Keeping the two explicitly
//! named avoids off-by-`pad` bugs at the boundary.
//!
//! [`Variant::Char8Fixed`]: codec::Variant::Char8Fixed

pub mod ccsds;
pub mod codec;
pub mod dual_basis;
pub mod error;
pub mod generator;
pub mod generic;
pub mod gf;
pub mod intcodec;

pub use codec::{xor, StringCodec, Variant};
pub use error::RsError;
pub use intcodec::IntegerCodec;
