//! Pearson Correlation

use crate::PreprocessError;
use ndarray::{Array2, ArrayView2, Axis};

/// Pairwise Pearson correlation of the columns of `data`.
///
/// The diagonal is 1. Pairs involving a zero-variance column are 0.
pub fn correlation_matrix(data: ArrayView2<f64>) -> Result<Array2<f64>, PreprocessError> {
    let (rows, cols) = data.dim();
    if cols == 0 {
        return Err(PreprocessError::EmptyInput);
    }
    if rows < 2 {
        return Err(PreprocessError::TooShort {
            needed: 2,
            actual: rows,
        });
    }

    let mean = data.mean_axis(Axis(0)).ok_or(PreprocessError::EmptyInput)?;
    let centered = &data - &mean;
    let cov = centered.t().dot(&centered);

    let mut corr = Array2::zeros((cols, cols));
    for i in 0..cols {
        for j in 0..cols {
            corr[[i, j]] = if i == j {
                1.0
            } else {
                let denom = (cov[[i, i]] * cov[[j, j]]).sqrt();
                if denom > 0.0 {
                    (cov[[i, j]] / denom).clamp(-1.0, 1.0)
                } else {
                    0.0
                }
            };
        }
    }
    Ok(corr)
}
