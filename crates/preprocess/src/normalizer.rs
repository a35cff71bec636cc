//! Feature Scaling
//!
//! Scalers are fitted once on training data and reapplied unchanged to
//! evaluation and inference data. A fitted scaler has no way to refit in
//! place; persist it with [`StandardScaler::save`] and reload it instead.

use crate::PreprocessError;
use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Column scale used when a feature has no spread
const UNIT_SCALE: f64 = 1.0;

fn check_columns(expected: usize, actual: usize) -> Result<(), PreprocessError> {
    if expected != actual {
        return Err(PreprocessError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Z-score scaler: `(x - mean) / std` per column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-column training mean
    mean: Vec<f64>,
    /// Per-column training standard deviation (population)
    scale: Vec<f64>,
    /// Number of training rows
    samples_seen: usize,
}

impl StandardScaler {
    /// Fit column means and standard deviations
    pub fn fit(data: ArrayView2<f64>) -> Result<Self, PreprocessError> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(PreprocessError::EmptyInput);
        }
        let mean = data.mean_axis(Axis(0)).ok_or(PreprocessError::EmptyInput)?;
        let scale = data
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > 0.0 { s } else { UNIT_SCALE });

        debug!(
            "Fitted standard scaler on {} rows x {} columns",
            data.nrows(),
            data.ncols()
        );
        Ok(Self {
            mean: mean.to_vec(),
            scale: scale.to_vec(),
            samples_seen: data.nrows(),
        })
    }

    /// Fit on `data` and return the scaled copy as well
    pub fn fit_transform(data: ArrayView2<f64>) -> Result<(Self, Array2<f64>), PreprocessError> {
        let scaler = Self::fit(data)?;
        let scaled = scaler.transform(data)?;
        Ok((scaler, scaled))
    }

    /// Scale rows with the fitted parameters
    pub fn transform(&self, data: ArrayView2<f64>) -> Result<Array2<f64>, PreprocessError> {
        check_columns(self.mean.len(), data.ncols())?;
        let mut out = data.to_owned();
        for mut row in out.rows_mut() {
            for ((v, m), s) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
                *v = (*v - m) / s;
            }
        }
        Ok(out)
    }

    /// Scale a single row
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, PreprocessError> {
        check_columns(self.mean.len(), row.len())?;
        Ok(row
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((v, m), s)| (v - m) / s)
            .collect())
    }

    /// Undo the scaling
    pub fn inverse_transform(&self, data: ArrayView2<f64>) -> Result<Array2<f64>, PreprocessError> {
        check_columns(self.mean.len(), data.ncols())?;
        let mut out = data.to_owned();
        for mut row in out.rows_mut() {
            for ((v, m), s) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
                *v = *v * s + m;
            }
        }
        Ok(out)
    }

    /// Per-column training mean
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Per-column training standard deviation (1.0 for constant columns)
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Number of columns the scaler expects
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Number of rows the scaler was fitted on
    pub fn samples_seen(&self) -> usize {
        self.samples_seen
    }

    /// Persist the fitted parameters as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PreprocessError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PreprocessError::Serialization(e.to_string()))?;
        fs::write(path, json)?;
        info!("Scaler saved to {}", path.display());
        Ok(())
    }

    /// Load parameters written by [`StandardScaler::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreprocessError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let scaler: Self = serde_json::from_str(&json)
            .map_err(|e| PreprocessError::Serialization(e.to_string()))?;
        if scaler.mean.len() != scaler.scale.len() {
            return Err(PreprocessError::DimensionMismatch {
                expected: scaler.mean.len(),
                actual: scaler.scale.len(),
            });
        }
        info!("Scaler loaded from {}", path.display());
        Ok(scaler)
    }
}

/// Min-max scaler mapping each column's training range to `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: Vec<f64>,
    range: Vec<f64>,
}

impl MinMaxScaler {
    /// Fit column minima and ranges
    pub fn fit(data: ArrayView2<f64>) -> Result<Self, PreprocessError> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(PreprocessError::EmptyInput);
        }
        let (min, range) = data
            .columns()
            .into_iter()
            .map(|col| {
                let lo = col.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let range = if hi > lo { hi - lo } else { UNIT_SCALE };
                (lo, range)
            })
            .unzip();
        Ok(Self { min, range })
    }

    /// Fit on `data` and return the scaled copy as well
    pub fn fit_transform(data: ArrayView2<f64>) -> Result<(Self, Array2<f64>), PreprocessError> {
        let scaler = Self::fit(data)?;
        let scaled = scaler.transform(data)?;
        Ok((scaler, scaled))
    }

    /// Scale rows with the fitted parameters
    pub fn transform(&self, data: ArrayView2<f64>) -> Result<Array2<f64>, PreprocessError> {
        check_columns(self.min.len(), data.ncols())?;
        let mut out = data.to_owned();
        for mut row in out.rows_mut() {
            for ((v, lo), r) in row.iter_mut().zip(&self.min).zip(&self.range) {
                *v = (*v - lo) / r;
            }
        }
        Ok(out)
    }
}
