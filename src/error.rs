//! Unified error type for field construction, codec configuration, and
//! encode/decode operations.

use thiserror::Error;

/// Everything that can go wrong building or operating a Reed-Solomon codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RsError {
    /// Invalid constructor parameters: missing defaults, a CCSDS parameter
    /// mismatch, an unrecognized variant, or an erasure index out of range.
    #[error("invalid codec configuration: {0}")]
    ConfigError(String),

    /// An input symbol has bits set outside the low `symsize` bits.
    #[error("symbol {value:#x} is out of range for a {bits}-bit codec (max {max:#x})")]
    SymbolRange { value: u32, bits: u32, max: u32 },

    /// A buffer did not have the length the operation requires.
    #[error("expected length {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The decoder could not correct the received word.
    #[error("uncorrectable: {0}")]
    Uncorrectable(String),

    /// A requested table or scratch allocation would be unreasonably large.
    #[error("allocation of {requested} symbols exceeds the {limit} symbol cap")]
    OutOfMemory { requested: usize, limit: usize },
}

impl RsError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub(crate) fn uncorrectable(msg: impl Into<String>) -> Self {
        Self::Uncorrectable(msg.into())
    }

    pub(crate) fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }
}
