//! Data-model error types

use thiserror::Error;

/// Conversion error for the shared data model
#[derive(Debug, Error)]
pub enum TypeError {
    /// Invalid hex string
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Hex string decoding to the wrong byte length
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        got: usize,
    },

    /// Invalid hex quantity (block numbers, gas values)
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Value that cannot be used as a directive argument
    #[error("invalid argument value: {0}")]
    InvalidArgument(String),
}
