//! Synthesis Error Types

use thiserror::Error;

/// Errors raised while building synthetic signals
#[derive(Debug, Error)]
pub enum SynthError {
    /// Malformed synthesis parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Timestamps empty, non-finite or not strictly increasing
    #[error("Invalid timestamps: {0}")]
    InvalidTimestamps(String),

    /// Channel does not match the series time grid
    #[error("Channel '{channel}' has {actual} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: String,
        expected: usize,
        actual: usize,
    },

    /// Channel name already present in the series
    #[error("Duplicate channel: {0}")]
    DuplicateChannel(String),

    /// Waveform name not recognized
    #[error("Unknown waveform: {0}")]
    UnknownWaveform(String),

    /// Failure writing an exported series
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
