//! Preprocessing Error Types

use thiserror::Error;

/// Errors during preprocessing
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// No rows or samples to work on
    #[error("Empty input")]
    EmptyInput,

    /// Column count differs from the fitted one
    #[error("Dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Window size unusable for the signal
    #[error("Invalid window size {window} for {len} samples")]
    InvalidWindow { window: usize, len: usize },

    /// Signal shorter than the operation needs
    #[error("Signal too short: need at least {needed} samples, got {actual}")]
    TooShort { needed: usize, actual: usize },

    /// Scaler file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Scaler file could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}
