//! Fault Classifier
//!
//! Seeded train/test splitting, a multinomial logistic regression trained by
//! mini-batch gradient descent, and the evaluation metrics reported after
//! training and evaluation.

mod metrics;
mod model;
mod split;
mod train;

pub use metrics::{
    accuracy, per_class_accuracy, precision_recall_by_class, ClassStats, ClassificationReport,
    ConfusionMatrix,
};
pub use model::SoftmaxClassifier;
pub use split::{train_test_split, Split};
pub use train::{train, EpochMetrics, TrainOptions, TrainingHistory};

use thiserror::Error;

/// Errors during training, prediction or evaluation
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Empty training set")]
    EmptyTrainingSet,
    #[error("Label count mismatch: {samples} samples, {labels} labels")]
    LabelCountMismatch { samples: usize, labels: usize },
    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Unknown label {label} for {classes} classes")]
    UnknownLabel { label: usize, classes: usize },
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
}
