//! Dataset Loader
//!
//! Walks a `root/<condition>/<sample>.csv` tree in sorted order, reduces each
//! sample window to a feature vector and labels it from its folder name.
//! Also writes synthetic trees in the same layout.

mod condition;
mod csv;
mod error;
mod generator;
mod loader;

pub use condition::FaultCondition;
pub use csv::{read_window, CsvWindow};
pub use error::DatasetError;
pub use generator::{AxisProfile, DatasetGenerator, GeneratorConfig, GeneratorSummary};
pub use loader::{Dataset, DatasetLoader, LabeledSample, LoaderConfig};
