//! Rolling Window Statistics

use crate::PreprocessError;

/// Rolling mean window used for smoothing
pub const SMOOTHING_WINDOW: usize = 10;

/// Moving-average filter window for noisy test signals
pub const FILTER_WINDOW: usize = 15;

/// Rolling std/min/max window
pub const ROLLING_STATS_WINDOW: usize = 20;

/// Sliding window over the most recent samples
pub struct RollingWindow {
    window: Vec<f64>,
    size: usize,
    position: usize,
    filled: bool,
}

impl RollingWindow {
    /// Create a window holding `size` samples
    pub fn new(size: usize) -> Result<Self, PreprocessError> {
        if size == 0 {
            return Err(PreprocessError::InvalidWindow { window: 0, len: 0 });
        }
        Ok(Self {
            window: vec![0.0; size],
            size,
            position: 0,
            filled: false,
        })
    }

    /// Add a sample, evicting the oldest once full
    pub fn push(&mut self, value: f64) {
        self.window[self.position] = value;
        self.position = (self.position + 1) % self.size;

        if self.position == 0 {
            self.filled = true;
        }
    }

    /// Whether `size` samples have been seen
    pub fn is_full(&self) -> bool {
        self.filled
    }

    /// Mean of a full window
    pub fn mean(&self) -> Option<f64> {
        self.filled
            .then(|| self.window.iter().sum::<f64>() / self.size as f64)
    }

    /// Sample standard deviation (denominator `size - 1`) of a full window
    pub fn std(&self) -> Option<f64> {
        if self.size < 2 {
            return None;
        }
        let mean = self.mean()?;
        let m2: f64 = self.window.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some((m2 / (self.size - 1) as f64).sqrt())
    }

    /// Minimum of a full window
    pub fn min(&self) -> Option<f64> {
        self.filled
            .then(|| self.window.iter().copied().fold(f64::INFINITY, f64::min))
    }

    /// Maximum of a full window
    pub fn max(&self) -> Option<f64> {
        self.filled
            .then(|| self.window.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Reset the window
    pub fn reset(&mut self) {
        self.window.fill(0.0);
        self.position = 0;
        self.filled = false;
    }
}

fn rolling_with(
    signal: &[f64],
    window: usize,
    stat: impl Fn(&RollingWindow) -> Option<f64>,
) -> Result<Vec<Option<f64>>, PreprocessError> {
    let mut rolling = RollingWindow::new(window).map_err(|_| PreprocessError::InvalidWindow {
        window,
        len: signal.len(),
    })?;
    Ok(signal
        .iter()
        .map(|&v| {
            rolling.push(v);
            stat(&rolling)
        })
        .collect())
}

/// Trailing mean; `None` until `window` samples are available
pub fn rolling_mean(signal: &[f64], window: usize) -> Result<Vec<Option<f64>>, PreprocessError> {
    rolling_with(signal, window, RollingWindow::mean)
}

/// Trailing sample standard deviation; needs `window >= 2`
pub fn rolling_std(signal: &[f64], window: usize) -> Result<Vec<Option<f64>>, PreprocessError> {
    if window < 2 {
        return Err(PreprocessError::InvalidWindow {
            window,
            len: signal.len(),
        });
    }
    rolling_with(signal, window, RollingWindow::std)
}

/// Trailing minimum
pub fn rolling_min(signal: &[f64], window: usize) -> Result<Vec<Option<f64>>, PreprocessError> {
    rolling_with(signal, window, RollingWindow::min)
}

/// Trailing maximum
pub fn rolling_max(signal: &[f64], window: usize) -> Result<Vec<Option<f64>>, PreprocessError> {
    rolling_with(signal, window, RollingWindow::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_mean_fills_after_window() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(out, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn test_rolling_std_is_sample_std() {
        let out = rolling_std(&[2.0, 4.0, 6.0, 6.0], 3).unwrap();
        assert_eq!(out[..2], [None, None]);
        assert!((out[2].unwrap() - 2.0).abs() < 1e-12);
        assert!(rolling_std(&[1.0, 2.0], 1).is_err());
    }

    #[test]
    fn test_rolling_min_max() {
        let signal = [5.0, 1.0, 4.0, 2.0, 8.0];
        let min = rolling_min(&signal, 3).unwrap();
        let max = rolling_max(&signal, 3).unwrap();
        assert_eq!(min, vec![None, None, Some(1.0), Some(1.0), Some(2.0)]);
        assert_eq!(max, vec![None, None, Some(5.0), Some(4.0), Some(8.0)]);
    }

    #[test]
    fn test_window_longer_than_signal() {
        let out = rolling_mean(&[1.0, 2.0], ROLLING_STATS_WINDOW).unwrap();
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn test_reset() {
        let mut window = RollingWindow::new(2).unwrap();
        window.push(1.0);
        window.push(3.0);
        assert_eq!(window.mean(), Some(2.0));
        window.reset();
        assert!(!window.is_full());
        assert_eq!(window.mean(), None);
        assert!(RollingWindow::new(0).is_err());
    }
}
