//! `train`: fit scaler and classifier on a labeled tree

use super::Evaluation;
use crate::LabConfig;
use anyhow::{Context, Result};
use clap::Args;
use dataset_loader::{DatasetLoader, FaultCondition, LoaderConfig};
use fault_classifier::{train, train_test_split, TrainingHistory};
use ndarray::Axis;
use signal_preprocess::StandardScaler;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Args)]
pub struct TrainArgs {
    /// Dataset root holding one folder per condition
    #[arg(short, long)]
    pub data: PathBuf,
    /// Where to write the scaler and model
    #[arg(long)]
    pub models_dir: Option<PathBuf>,
    #[arg(long)]
    pub epochs: Option<usize>,
    /// Read sample files in parallel
    #[arg(long)]
    pub parallel: bool,
}

/// Outcome of `train`
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub samples: usize,
    pub train_samples: usize,
    pub feature_names: Vec<String>,
    pub history: TrainingHistory,
    /// Scores on the held-out split
    pub evaluation: Evaluation,
    pub scaler_path: PathBuf,
    pub model_path: PathBuf,
}

/// Load, split, standardize, train and persist
pub fn run(args: &TrainArgs, config: &LabConfig) -> Result<TrainReport> {
    let mut config = config.clone();
    if let Some(dir) = &args.models_dir {
        config.models_dir = dir.clone();
    }
    if let Some(epochs) = args.epochs {
        config.training.epochs = epochs;
    }

    let loader = DatasetLoader::new(LoaderConfig {
        parallel: args.parallel || config.loader.parallel,
        ..config.loader.clone()
    });
    let dataset = loader
        .load(&args.data)
        .with_context(|| format!("failed to load dataset from {}", args.data.display()))?;
    for (condition, count) in dataset.class_counts() {
        info!("{}: {} samples (label {})", condition, count, condition.label());
    }

    let x = dataset.feature_matrix();
    let y = dataset.labels();
    let split = train_test_split(&y, config.test_split, config.seed, config.stratify)?;

    let x_train = x.select(Axis(0), &split.train);
    let x_test = x.select(Axis(0), &split.test);
    let y_train: Vec<usize> = split.train.iter().map(|&i| y[i]).collect();
    let y_test: Vec<usize> = split.test.iter().map(|&i| y[i]).collect();

    // Scaling parameters come from the training rows only
    let (scaler, x_train) = StandardScaler::fit_transform(x_train.view())?;
    let x_test = scaler.transform(x_test.view())?;

    let class_names = FaultCondition::class_names();
    let (model, history) = train(x_train.view(), &y_train, &class_names, &config.training)?;

    let predicted = model.predict(x_test.view())?;
    let evaluation = Evaluation::new(&y_test, &predicted)?;

    fs::create_dir_all(&config.models_dir)
        .with_context(|| format!("failed to create {}", config.models_dir.display()))?;
    let scaler_path = config.scaler_path();
    let model_path = config.model_path();
    scaler.save(&scaler_path)?;
    model.save(&model_path)?;

    Ok(TrainReport {
        samples: dataset.len(),
        train_samples: split.train.len(),
        feature_names: dataset.feature_names().to_vec(),
        history,
        evaluation,
        scaler_path,
        model_path,
    })
}

impl fmt::Display for TrainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Loaded {} samples with {} features; trained on {}, tested on {}",
            self.samples,
            self.feature_names.len(),
            self.train_samples,
            self.samples - self.train_samples
        )?;
        if let Some(last) = self.history.last() {
            write!(
                f,
                "Final epoch {}: loss {:.4}, accuracy {:.4}",
                last.epoch, last.loss, last.accuracy
            )?;
            if let (Some(val_loss), Some(val_acc)) = (last.val_loss, last.val_accuracy) {
                write!(f, ", val loss {:.4}, val accuracy {:.4}", val_loss, val_acc)?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.evaluation)?;
        writeln!(f)?;
        writeln!(f, "Scaler saved to {}", self.scaler_path.display())?;
        writeln!(f, "Model saved to {}", self.model_path.display())
    }
}
