//! Statistical Features Computation

use crate::FeatureError;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Summary statistics of one axis of a window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisStatistics {
    /// Mean value
    pub mean: f64,
    /// Population standard deviation (denominator = sample count)
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Root mean square, `sqrt(mean(x^2))`
    pub rms: f64,
    /// Peak-to-peak, `max - min`
    pub peak_to_peak: f64,
}

impl AxisStatistics {
    /// Compute statistics from a slice of values
    pub fn compute(values: &[f64]) -> Result<Self, FeatureError> {
        Self::compute_axis(ArrayView1::from(values), 0)
    }

    /// Compute statistics for column `axis` of a window
    pub(crate) fn compute_axis(values: ArrayView1<f64>, axis: usize) -> Result<Self, FeatureError> {
        if values.is_empty() {
            return Err(FeatureError::EmptyWindow {
                time_steps: 0,
                num_axes: 1,
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(FeatureError::NonFiniteSample { axis, index });
        }

        let n = values.len() as f64;

        // Min/Max
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Sums run on values divided by a power of two near the peak, which is
        // exact and keeps the sums and squares finite for any finite input
        let peak = min.abs().max(max.abs());
        let scale = if peak > 1.0 {
            2f64.powi(peak.log2().floor() as i32)
        } else {
            1.0
        };

        let scaled_sum: f64 = values.iter().map(|&v| v / scale).sum();
        let scaled_mean = scaled_sum / n;

        let mut m2 = 0.0;
        let mut sum_sq = 0.0;
        for &v in values.iter() {
            let s = v / scale;
            let d = s - scaled_mean;
            m2 += d * d;
            sum_sq += s * s;
        }

        // Rounding in the sum can leave the mean one ulp outside [min, max]
        let mean = (scaled_mean * scale).clamp(min, max);

        Ok(Self {
            mean,
            std_dev: (m2 / n).sqrt() * scale,
            min,
            max,
            rms: (sum_sq / n).sqrt() * scale,
            peak_to_peak: max - min,
        })
    }

    /// Values in feature order: mean, std, min, max, rms, peak-to-peak
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.mean,
            self.std_dev,
            self.min,
            self.max,
            self.rms,
            self.peak_to_peak,
        ]
    }

    /// Rebuild from values in feature order
    pub fn from_array(values: [f64; 6]) -> Self {
        let [mean, std_dev, min, max, rms, peak_to_peak] = values;
        Self {
            mean,
            std_dev,
            min,
            max,
            rms,
            peak_to_peak,
        }
    }
}

/// Mean power, `mean(x^2)`; zero for an empty signal
pub fn signal_power(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64
}

/// Signal-to-noise ratio in dB; `+inf` when the noise carries no power
pub fn snr_db(signal: &[f64], noise: &[f64]) -> f64 {
    let noise_power = signal_power(noise);
    if noise_power > 0.0 {
        10.0 * (signal_power(signal) / noise_power).log10()
    } else {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean_computation() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = AxisStatistics::compute(&values).unwrap();
        assert!((stats.mean - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_std_dev_is_population() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = AxisStatistics::compute(&values).unwrap();
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_one_to_four() {
        let stats = AxisStatistics::compute(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.mean, 2.5);
        assert!((stats.std_dev - 1.25f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert!((stats.rms - 7.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.peak_to_peak, 3.0);
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let stats = AxisStatistics::compute(&[1e308, 1e308, -1e308]).unwrap();
        let close = |a: f64, b: f64| ((a - b) / b).abs() < 1e-12;
        assert!(close(stats.mean, 1e308 / 3.0));
        assert!(close(stats.std_dev, 1e308 / 3.0 * 8f64.sqrt()));
        assert!(close(stats.rms, 1e308));
        assert_eq!(stats.min, -1e308);
        assert_eq!(stats.max, 1e308);
        // The true range exceeds f64::MAX
        assert!(stats.peak_to_peak.is_infinite());
    }

    #[test]
    fn test_empty_values() {
        assert!(matches!(
            AxisStatistics::compute(&[]),
            Err(FeatureError::EmptyWindow { .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(
            AxisStatistics::compute(&[1.0, f64::NAN]),
            Err(FeatureError::NonFiniteSample { axis: 0, index: 1 })
        );
    }

    #[test]
    fn test_snr() {
        let signal = vec![1.0, -1.0, 1.0, -1.0];
        let noise = vec![0.1, -0.1, 0.1, -0.1];
        assert!((snr_db(&signal, &noise) - 20.0).abs() < 1e-9);
        assert!(snr_db(&signal, &[0.0; 4]).is_infinite());
    }

    proptest! {
        #[test]
        fn prop_statistics_invariants(values in prop::collection::vec(-1e6f64..1e6, 1..300)) {
            let stats = AxisStatistics::compute(&values).unwrap();
            prop_assert_eq!(stats.max - stats.min, stats.peak_to_peak);
            prop_assert!(stats.rms >= 0.0);
            prop_assert!(stats.std_dev >= 0.0);
            prop_assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        }

        #[test]
        fn prop_wide_range_stays_finite(values in prop::collection::vec(-1e308f64..1e308, 1..100)) {
            let stats = AxisStatistics::compute(&values).unwrap();
            prop_assert!(stats.mean.is_finite() && stats.std_dev.is_finite() && stats.rms.is_finite());
            prop_assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        }
    }
}
