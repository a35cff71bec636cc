//! Dataset Error Types

use feature_engine::FeatureError;
use signal_synth::SynthError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or generating a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Dataset root does not exist
    #[error("Dataset directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// Dataset root has no class subdirectories at all
    #[error("No class directories under {0}")]
    NoClassDirectories(PathBuf),

    /// Class subdirectories exist but none names a known condition
    #[error("No recognized condition directories under {0}")]
    NoRecognizedClasses(PathBuf),

    /// A recognized class directory holds no sample files
    #[error("No samples found in {0}")]
    NoSamplesFound(PathBuf),

    /// Sample file lacks a required axis column
    #[error("{path}: missing column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    /// Malformed cell or row
    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Sample file has a different number of rows than the dataset
    #[error("{path}: expected {expected} rows, found {actual}")]
    RowCountMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// Feature extraction failed for a sample
    #[error("Feature extraction failed: {0}")]
    Feature(#[from] FeatureError),

    /// Signal synthesis failed while generating samples
    #[error("Synthesis failed: {0}")]
    Synth(#[from] SynthError),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
