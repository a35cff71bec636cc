//! `generate-dataset`: synthetic train/test accelerometer trees

use crate::LabConfig;
use anyhow::{Context, Result};
use clap::Args;
use dataset_loader::{DatasetGenerator, GeneratorConfig, GeneratorSummary};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Root directory; `train/` and `test/` are created inside
    #[arg(short, long)]
    pub output: PathBuf,
    /// Training files per condition
    #[arg(long)]
    pub samples_per_class: Option<usize>,
    /// Test files per condition (a quarter of the training count by default)
    #[arg(long)]
    pub test_samples_per_class: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Files written by `generate-dataset`
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub train_dir: PathBuf,
    pub test_dir: PathBuf,
    pub train: GeneratorSummary,
    pub test: GeneratorSummary,
}

/// Write `train/` and `test/` under the output root.
///
/// The test tree uses the next base seed so no sample is shared with training.
pub fn run(args: &GenerateArgs, config: &LabConfig) -> Result<GenerateReport> {
    let seed = args.seed.unwrap_or(config.seed);
    let train_count = args
        .samples_per_class
        .unwrap_or(config.generator.samples_per_class);
    let test_count = args
        .test_samples_per_class
        .unwrap_or_else(|| (train_count / 4).max(1));

    let train_dir = args.output.join("train");
    let test_dir = args.output.join("test");

    let train = DatasetGenerator::new(GeneratorConfig {
        samples_per_class: train_count,
        ..config.generator.clone()
    })
    .generate(&train_dir, seed)
    .with_context(|| format!("failed to write {}", train_dir.display()))?;

    let test = DatasetGenerator::new(GeneratorConfig {
        samples_per_class: test_count,
        ..config.generator.clone()
    })
    .generate(&test_dir, seed.wrapping_add(1))
    .with_context(|| format!("failed to write {}", test_dir.display()))?;

    Ok(GenerateReport {
        train_dir,
        test_dir,
        train,
        test,
    })
}

impl fmt::Display for GenerateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Wrote {} training files to {}",
            self.train.files.len(),
            self.train_dir.display()
        )?;
        writeln!(
            f,
            "Wrote {} test files to {}",
            self.test.files.len(),
            self.test_dir.display()
        )?;
        writeln!(f, "Rows per file: {}", self.train.rows_per_sample)
    }
}
