//! Z-score Outlier Removal

use crate::PreprocessError;
use ndarray::{Array2, ArrayView2, Axis};
use tracing::debug;

/// Rows with any `|z|` at or above this value are dropped
pub const Z_SCORE_THRESHOLD: f64 = 3.0;

/// Which rows survived the filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlierReport {
    /// Indices of rows kept, ascending
    pub kept: Vec<usize>,
    /// Indices of rows removed, ascending
    pub removed: Vec<usize>,
}

/// Per-cell z-scores using population standard deviation.
///
/// Columns with zero spread score 0 everywhere.
pub fn zscores(data: ArrayView2<f64>) -> Result<Array2<f64>, PreprocessError> {
    if data.nrows() == 0 || data.ncols() == 0 {
        return Err(PreprocessError::EmptyInput);
    }
    let mean = data.mean_axis(Axis(0)).ok_or(PreprocessError::EmptyInput)?;
    let std = data.std_axis(Axis(0), 0.0);

    let mut out = data.to_owned();
    for mut row in out.rows_mut() {
        for ((v, m), s) in row.iter_mut().zip(mean.iter()).zip(std.iter()) {
            *v = if *s > 0.0 { (*v - m) / s } else { 0.0 };
        }
    }
    Ok(out)
}

/// Split row indices into kept and removed by `|z| < threshold` on every column
pub fn zscore_filter(
    data: ArrayView2<f64>,
    threshold: f64,
) -> Result<OutlierReport, PreprocessError> {
    let scores = zscores(data)?;
    let mut report = OutlierReport::default();
    for (i, row) in scores.rows().into_iter().enumerate() {
        if row.iter().all(|z| z.abs() < threshold) {
            report.kept.push(i);
        } else {
            report.removed.push(i);
        }
    }
    debug!(
        "Z-score filter kept {} of {} rows",
        report.kept.len(),
        data.nrows()
    );
    Ok(report)
}

/// Drop outlier rows, returning the filtered copy and the report
pub fn remove_outliers(
    data: ArrayView2<f64>,
    threshold: f64,
) -> Result<(Array2<f64>, OutlierReport), PreprocessError> {
    let report = zscore_filter(data, threshold)?;
    let kept = data.select(Axis(0), &report.kept);
    Ok((kept, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn with_spike() -> Array2<f64> {
        let mut values: Vec<f64> = (0..50).map(|i| (i % 5) as f64).collect();
        values[17] = 100.0;
        Array2::from_shape_vec((50, 1), values).unwrap()
    }

    #[test]
    fn test_spike_removed() {
        let data = with_spike();
        let (filtered, report) = remove_outliers(data.view(), Z_SCORE_THRESHOLD).unwrap();
        assert_eq!(report.removed, vec![17]);
        assert_eq!(report.kept.len(), 49);
        assert_eq!(filtered.nrows(), 49);
        assert!(filtered.iter().all(|&v| v < 5.0));
    }

    #[test]
    fn test_constant_column_keeps_everything() {
        let data = Array2::from_elem((10, 2), 7.0);
        let report = zscore_filter(data.view(), Z_SCORE_THRESHOLD).unwrap();
        assert_eq!(report.kept, (0..10).collect::<Vec<_>>());
        assert!(report.removed.is_empty());
    }

    #[test]
    fn test_zscores_population_std() {
        let data = Array2::from_shape_vec((2, 1), vec![1.0, 3.0]).unwrap();
        let z = zscores(data.view()).unwrap();
        assert_eq!(z.column(0).to_vec(), vec![-1.0, 1.0]);
    }

    #[test]
    fn test_empty() {
        let data = Array2::<f64>::zeros((0, 2));
        assert!(matches!(
            zscores(data.view()),
            Err(PreprocessError::EmptyInput)
        ));
    }
}
