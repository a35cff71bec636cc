//! `evaluate`: score a saved model on a labeled tree

use super::Evaluation;
use crate::LabConfig;
use anyhow::{bail, Context, Result};
use clap::Args;
use dataset_loader::{DatasetLoader, LoaderConfig};
use fault_classifier::SoftmaxClassifier;
use signal_preprocess::StandardScaler;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Args)]
pub struct EvaluateArgs {
    /// Dataset root holding one folder per condition
    #[arg(short, long)]
    pub data: PathBuf,
    /// Directory holding the saved scaler and model
    #[arg(long)]
    pub models_dir: Option<PathBuf>,
    /// Read sample files in parallel
    #[arg(long)]
    pub parallel: bool,
}

/// Outcome of `evaluate`
#[derive(Debug, Clone)]
pub struct EvaluateReport {
    pub samples: usize,
    /// Scaler as loaded from disk and applied unchanged
    pub scaler: StandardScaler,
    pub evaluation: Evaluation,
}

/// Apply the persisted scaler and model to every sample under `--data`
pub fn run(args: &EvaluateArgs, config: &LabConfig) -> Result<EvaluateReport> {
    let mut config = config.clone();
    if let Some(dir) = &args.models_dir {
        config.models_dir = dir.clone();
    }

    let scaler_path = config.scaler_path();
    let model_path = config.model_path();
    let scaler = StandardScaler::load(&scaler_path).with_context(|| {
        format!(
            "failed to load scaler from {} (run `train` first)",
            scaler_path.display()
        )
    })?;
    let model = SoftmaxClassifier::load(&model_path)
        .with_context(|| format!("failed to load model from {}", model_path.display()))?;
    if scaler.n_features() != model.n_features() {
        bail!(
            "scaler expects {} features but model expects {}",
            scaler.n_features(),
            model.n_features()
        );
    }

    let loader = DatasetLoader::new(LoaderConfig {
        parallel: args.parallel || config.loader.parallel,
        ..config.loader.clone()
    });
    let dataset = loader
        .load(&args.data)
        .with_context(|| format!("failed to load dataset from {}", args.data.display()))?;
    info!("Evaluating on {} samples", dataset.len());

    // Never refit: evaluation data is scaled with the training parameters
    let x = scaler.transform(dataset.feature_matrix().view())?;
    let predicted = model.predict(x.view())?;
    let evaluation = Evaluation::new(&dataset.labels(), &predicted)?;

    Ok(EvaluateReport {
        samples: dataset.len(),
        scaler,
        evaluation,
    })
}

impl fmt::Display for EvaluateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Evaluated {} samples", self.samples)?;
        writeln!(f)?;
        write!(f, "{}", self.evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_trained_model() {
        let dir = tempfile::tempdir().unwrap();
        let args = EvaluateArgs {
            data: dir.path().to_path_buf(),
            models_dir: Some(dir.path().join("models")),
            parallel: false,
        };
        let err = run(&args, &LabConfig::default()).unwrap_err();
        assert!(err.to_string().contains("run `train` first"));
    }
}
