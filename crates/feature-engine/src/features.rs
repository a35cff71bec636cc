//! Feature Vector Assembly

use crate::statistics::AxisStatistics;
use crate::FeatureError;
use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of statistics computed per axis
pub const FEATURES_PER_AXIS: usize = 6;

/// Statistic names in feature order
pub const STAT_NAMES: [&str; FEATURES_PER_AXIS] = ["mean", "std", "min", "max", "rms", "ptp"];

/// Flat feature descriptor of one window.
///
/// Holds `6 * num_axes` values, axis-major: the six statistics of axis 0,
/// then the six of axis 1, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Assemble a vector from per-axis statistics
    pub fn from_axes(axes: &[AxisStatistics]) -> Self {
        let values = axes.iter().flat_map(|s| s.to_array()).collect();
        Self { values }
    }

    /// Wrap raw values; the length must be a non-zero multiple of six
    pub fn from_values(values: Vec<f64>) -> Result<Self, FeatureError> {
        if values.is_empty() || values.len() % FEATURES_PER_AXIS != 0 {
            return Err(FeatureError::InvalidLength(values.len()));
        }
        Ok(Self { values })
    }

    /// Raw feature values
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Number of features (`6 * num_axes`)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed vector
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of axes the window had
    pub fn num_axes(&self) -> usize {
        self.values.len() / FEATURES_PER_AXIS
    }

    /// Statistics of one axis
    pub fn axis(&self, axis: usize) -> Option<AxisStatistics> {
        let start = axis.checked_mul(FEATURES_PER_AXIS)?;
        let chunk = self.values.get(start..start + FEATURES_PER_AXIS)?;
        let mut stats = [0.0; FEATURES_PER_AXIS];
        stats.copy_from_slice(chunk);
        Some(AxisStatistics::from_array(stats))
    }

    /// Consume into the raw values
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

/// Reduce a `(time_steps, num_axes)` window to its feature vector.
///
/// Pure function of the input; fails with `EmptyWindow` when either
/// dimension is zero.
pub fn extract(window: ArrayView2<f64>) -> Result<FeatureVector, FeatureError> {
    let (time_steps, num_axes) = window.dim();
    if time_steps == 0 || num_axes == 0 {
        return Err(FeatureError::EmptyWindow {
            time_steps,
            num_axes,
        });
    }

    let axes = window
        .axis_iter(Axis(1))
        .enumerate()
        .map(|(axis, column)| AxisStatistics::compute_axis(column, axis))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureVector::from_axes(&axes))
}

/// Extract from a window given as rows of per-axis samples
pub fn extract_rows(rows: &[Vec<f64>]) -> Result<FeatureVector, FeatureError> {
    let window = window_from_rows(rows)?;
    extract(window.view())
}

/// Build a rectangular window from rows; every row must have the same width
pub fn window_from_rows(rows: &[Vec<f64>]) -> Result<Array2<f64>, FeatureError> {
    let num_axes = rows.first().map_or(0, Vec::len);
    if rows.is_empty() || num_axes == 0 {
        return Err(FeatureError::EmptyWindow {
            time_steps: rows.len(),
            num_axes,
        });
    }
    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != num_axes) {
        return Err(FeatureError::RaggedWindow {
            row,
            expected: num_axes,
            actual: r.len(),
        });
    }

    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), num_axes), flat).map_err(|_| FeatureError::RaggedWindow {
        row: 0,
        expected: num_axes,
        actual: 0,
    })
}

/// Labels `"<axis>_<stat>"` in feature order
pub fn feature_names<S: AsRef<str>>(axis_names: &[S]) -> Vec<String> {
    axis_names
        .iter()
        .flat_map(|axis| {
            STAT_NAMES
                .iter()
                .map(move |stat| format!("{}_{}", axis.as_ref(), stat))
        })
        .collect()
}

/// Feature extractor bound to a fixed set of named axes
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    axis_names: Vec<String>,
}

impl FeatureExtractor {
    /// Create an extractor expecting windows with these axes
    pub fn new<S: Into<String>>(axis_names: impl IntoIterator<Item = S>) -> Self {
        Self {
            axis_names: axis_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Three-axis accelerometer extractor (`ax`, `ay`, `az`)
    pub fn accelerometer() -> Self {
        Self::new(["ax", "ay", "az"])
    }

    /// Axis names in column order
    pub fn axis_names(&self) -> &[String] {
        &self.axis_names
    }

    /// Length of the produced vectors
    pub fn dimension(&self) -> usize {
        self.axis_names.len() * FEATURES_PER_AXIS
    }

    /// Feature labels in output order
    pub fn feature_names(&self) -> Vec<String> {
        feature_names(&self.axis_names)
    }

    /// Extract features; the window must have one column per configured axis
    pub fn extract(&self, window: ArrayView2<f64>) -> Result<FeatureVector, FeatureError> {
        if window.ncols() != self.axis_names.len() {
            return Err(FeatureError::AxisCountMismatch {
                expected: self.axis_names.len(),
                actual: window.ncols(),
            });
        }
        debug!(
            "Extracting features: {} time steps x {} axes",
            window.nrows(),
            window.ncols()
        );
        extract(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn test_constant_window() {
        let window = Array2::from_elem((10, 1), 2.0);
        let features = extract(window.view()).unwrap();
        assert_eq!(features.as_slice(), &[2.0, 0.0, 2.0, 2.0, 2.0, 0.0]);
    }

    #[test]
    fn test_one_to_four_window() {
        let features = extract_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]).unwrap();
        let v = features.as_slice();
        assert_eq!(v[0], 2.5);
        assert!((v[1] - 1.118).abs() < 1e-3);
        assert_eq!(v[2], 1.0);
        assert_eq!(v[3], 4.0);
        assert!((v[4] - 2.7386).abs() < 1e-4);
        assert_eq!(v[5], 3.0);
    }

    #[test]
    fn test_axis_major_order() {
        let window = array![[1.0, 10.0], [3.0, 30.0]];
        let features = extract(window.view()).unwrap();
        assert_eq!(features.len(), 12);
        assert_eq!(features.num_axes(), 2);
        assert_eq!(features.axis(0).unwrap().mean, 2.0);
        assert_eq!(features.axis(1).unwrap().mean, 20.0);
        assert_eq!(features.as_slice()[6], 20.0);
        assert!(features.axis(2).is_none());
    }

    #[test]
    fn test_empty_window() {
        let window = Array2::<f64>::zeros((0, 3));
        assert_eq!(
            extract(window.view()),
            Err(FeatureError::EmptyWindow {
                time_steps: 0,
                num_axes: 3
            })
        );
        assert!(matches!(
            extract_rows(&[]),
            Err(FeatureError::EmptyWindow { .. })
        ));
    }

    #[test]
    fn test_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(
            window_from_rows(&rows),
            Err(FeatureError::RaggedWindow {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_non_finite_reports_axis() {
        let window = array![[1.0, 2.0], [3.0, f64::INFINITY]];
        assert_eq!(
            extract(window.view()),
            Err(FeatureError::NonFiniteSample { axis: 1, index: 1 })
        );
    }

    #[test]
    fn test_extractor_names_and_axes() {
        let extractor = FeatureExtractor::accelerometer();
        assert_eq!(extractor.dimension(), 18);
        let names = extractor.feature_names();
        assert_eq!(names[0], "ax_mean");
        assert_eq!(names[5], "ax_ptp");
        assert_eq!(names[17], "az_ptp");

        let window = Array2::<f64>::zeros((5, 2));
        assert!(matches!(
            extractor.extract(window.view()),
            Err(FeatureError::AxisCountMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_from_values_validates_length() {
        assert!(FeatureVector::from_values(vec![0.0; 12]).is_ok());
        assert_eq!(
            FeatureVector::from_values(vec![0.0; 7]),
            Err(FeatureError::InvalidLength(7))
        );
    }

    proptest! {
        #[test]
        fn prop_window_invariants(
            rows in 1usize..64,
            cols in 1usize..5,
            seed in prop::collection::vec(-1e4f64..1e4, 320),
        ) {
            let window = Array2::from_shape_fn((rows, cols), |(r, c)| seed[(r * cols + c) % seed.len()]);
            let features = extract(window.view()).unwrap();
            prop_assert_eq!(features.len(), FEATURES_PER_AXIS * cols);
            for axis in 0..cols {
                let s = features.axis(axis).unwrap();
                prop_assert_eq!(s.max - s.min, s.peak_to_peak);
                prop_assert!(s.rms >= 0.0);
                prop_assert!(s.std_dev >= 0.0);
                prop_assert!(s.min <= s.mean && s.mean <= s.max);
            }
        }
    }
}
