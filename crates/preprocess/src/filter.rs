//! Smoothing and Differentiation Filters

use crate::PreprocessError;

/// Moving-average filter with zero-padded edges.
///
/// Equivalent to convolving with `ones(window) / window` and keeping the
/// centered part of the same length as the input, so edge samples are
/// averaged with implicit zeros.
pub fn moving_average(signal: &[f64], window: usize) -> Result<Vec<f64>, PreprocessError> {
    let n = signal.len();
    if n == 0 {
        return Err(PreprocessError::EmptyInput);
    }
    if window == 0 || window > n {
        return Err(PreprocessError::InvalidWindow { window, len: n });
    }

    // prefix[i] = sum of signal[..i]
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for &v in signal {
        acc += v;
        prefix.push(acc);
    }

    let offset = (window - 1) / 2;
    let width = window as f64;
    Ok((0..n)
        .map(|i| {
            let hi = (i + offset).min(n - 1);
            let lo = (i + offset).saturating_sub(window - 1);
            (prefix[hi + 1] - prefix[lo]) / width
        })
        .collect())
}

/// Rate of change per sample: central differences inside, one-sided at the ends
pub fn gradient(signal: &[f64]) -> Result<Vec<f64>, PreprocessError> {
    let n = signal.len();
    if n < 2 {
        return Err(PreprocessError::TooShort {
            needed: 2,
            actual: n,
        });
    }
    let mut out = Vec::with_capacity(n);
    out.push(signal[1] - signal[0]);
    for i in 1..n - 1 {
        out.push((signal[i + 1] - signal[i - 1]) / 2.0);
    }
    out.push(signal[n - 1] - signal[n - 2]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average_odd_window() {
        let out = moving_average(&[3.0, 6.0, 9.0, 12.0], 3).unwrap();
        assert_eq!(out, vec![3.0, 6.0, 9.0, 7.0]);
    }

    #[test]
    fn test_moving_average_even_window() {
        // Even windows lean towards earlier samples
        let out = moving_average(&[1.0, 2.0, 3.0], 2).unwrap();
        assert_eq!(out, vec![0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_moving_average_smooths_noise() {
        let noisy: Vec<f64> = (0..200)
            .map(|i| 5.0 + if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let smooth = moving_average(&noisy, 20).unwrap();
        for v in &smooth[20..180] {
            assert!((v - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_moving_average_rejects_bad_window() {
        assert!(matches!(
            moving_average(&[1.0, 2.0], 0),
            Err(PreprocessError::InvalidWindow { .. })
        ));
        assert!(matches!(
            moving_average(&[1.0, 2.0], 3),
            Err(PreprocessError::InvalidWindow { window: 3, len: 2 })
        ));
    }

    #[test]
    fn test_gradient() {
        let out = gradient(&[1.0, 2.0, 4.0, 7.0, 11.0]).unwrap();
        assert_eq!(out, vec![1.0, 1.5, 2.5, 3.5, 4.0]);
        assert!(gradient(&[1.0]).is_err());
    }
}
