//! Feature Engineering Engine
//!
//! Reduces multi-axis sensor windows to fixed-size statistical feature
//! vectors, plus frequency domain and SNR helpers for single signals.

mod features;
mod fft;
mod statistics;

pub use features::{
    extract, extract_rows, feature_names, window_from_rows, FeatureExtractor, FeatureVector,
    FEATURES_PER_AXIS, STAT_NAMES,
};
pub use fft::{FftAnalyzer, Spectrum};
pub use statistics::{signal_power, snr_db, AxisStatistics};

use thiserror::Error;

/// Errors during feature extraction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Empty window: {time_steps} time steps x {num_axes} axes")]
    EmptyWindow { time_steps: usize, num_axes: usize },
    #[error("Ragged window: row {row} has {actual} values, expected {expected}")]
    RaggedWindow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Non-finite sample at time step {index} of axis {axis}")]
    NonFiniteSample { axis: usize, index: usize },
    #[error("Axis count mismatch: expected {expected}, got {actual}")]
    AxisCountMismatch { expected: usize, actual: usize },
    #[error("Invalid feature vector length {0}")]
    InvalidLength(usize),
}
