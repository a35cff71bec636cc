//! Lab configuration
//!
//! Built-in defaults, overlaid by `sensor-lab.toml` (or the file given with
//! `--config`), overlaid by `SENSOR_LAB__*` environment variables such as
//! `SENSOR_LAB__TRAINING__EPOCHS=20`.

use anyhow::{bail, Context, Result};
use dataset_loader::{GeneratorConfig, LoaderConfig};
use fault_classifier::TrainOptions;
use serde::{Deserialize, Serialize};
use signal_synth::Waveform;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sensor-lab";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SENSOR_LAB";

/// Test-signal workshop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub waveform: Waveform,
    /// Hz
    pub frequency: f64,
    pub amplitude: f64,
    /// Seconds
    pub duration: f64,
    /// Hz
    pub sample_rate: f64,
    pub noise_std: f64,
    /// Moving-average window in samples
    pub filter_window: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            frequency: 2.0,
            amplitude: 1.0,
            duration: 2.0,
            sample_rate: 1000.0,
            noise_std: 0.3,
            filter_window: signal_preprocess::FILTER_WINDOW,
        }
    }
}

/// Plant sensor recording settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorsConfig {
    /// Seconds
    pub duration: f64,
    /// Seconds between samples
    pub step: f64,
    /// Give every channel the same noise seed
    pub shared_seed: bool,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            duration: 100.0,
            step: 0.1,
            shared_seed: false,
        }
    }
}

/// Complete lab configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Base seed for synthesis, splitting and training
    pub seed: u64,
    /// Where the fitted scaler and model are kept
    pub models_dir: PathBuf,
    /// Fraction of the loaded samples held out for testing after training
    pub test_split: f64,
    /// Keep class proportions in the held-out split
    pub stratify: bool,
    pub loader: LoaderConfig,
    pub generator: GeneratorConfig,
    pub training: TrainOptions,
    pub signal: SignalConfig,
    pub sensors: SensorsConfig,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            models_dir: PathBuf::from("models"),
            test_split: 0.2,
            stratify: true,
            loader: LoaderConfig::default(),
            generator: GeneratorConfig::default(),
            training: TrainOptions::default(),
            signal: SignalConfig::default(),
            sensors: SensorsConfig::default(),
        }
    }
}

impl LabConfig {
    /// Load defaults, then the config file, then the environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: LabConfig = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("loader.axis_columns"),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings no command can run with
    pub fn validate(&self) -> Result<()> {
        if !(self.test_split > 0.0 && self.test_split < 1.0) {
            bail!("test_split must be in (0, 1), got {}", self.test_split);
        }
        if self.loader.axis_columns.is_empty() {
            bail!("loader.axis_columns must name at least one column");
        }
        if self.generator.rows_per_sample == 0 || self.generator.samples_per_class == 0 {
            bail!("generator needs at least one sample of one row per class");
        }
        if !(self.sensors.step > 0.0 && self.sensors.duration > 0.0) {
            bail!("sensors.step and sensors.duration must be positive");
        }
        Ok(())
    }

    /// Fitted scaler location
    pub fn scaler_path(&self) -> PathBuf {
        self.models_dir.join("features_scaler.json")
    }

    /// Trained model location
    pub fn model_path(&self) -> PathBuf {
        self.models_dir.join("fault_classifier.json")
    }
}
