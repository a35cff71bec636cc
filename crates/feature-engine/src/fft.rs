//! FFT-based Frequency Analysis

use rustfft::{num_complex::Complex, FftPlanner};

/// One-sided magnitude spectrum
#[derive(Debug, Clone, Default)]
pub struct Spectrum {
    /// Non-negative bin frequencies (Hz)
    pub frequencies: Vec<f64>,
    /// `|FFT|` at each bin
    pub magnitudes: Vec<f64>,
}

impl Spectrum {
    /// Frequency of the strongest bin, ignoring DC
    pub fn dominant_frequency(&self) -> Option<f64> {
        self.magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| self.frequencies[i])
    }
}

/// FFT analyzer producing magnitude spectra
pub struct FftAnalyzer {
    /// FFT planner for efficient computation
    planner: FftPlanner<f64>,
    /// Sampling frequency (Hz)
    sample_rate: f64,
}

impl FftAnalyzer {
    /// Create a new FFT analyzer
    pub fn new(sample_rate: f64) -> Self {
        Self {
            planner: FftPlanner::new(),
            sample_rate,
        }
    }

    /// Sampling frequency (Hz)
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn transform(&mut self, signal: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> =
            signal.iter().map(|&v| Complex::new(v, 0.0)).collect();
        let fft = self.planner.plan_fft_forward(buffer.len());
        fft.process(&mut buffer);
        buffer
    }

    /// Unwindowed magnitude spectrum over the non-negative frequency bins.
    ///
    /// Keeps bins `0..=(n-1)/2`, the ones with non-negative frequency in the
    /// standard FFT bin ordering.
    pub fn spectrum(&mut self, signal: &[f64]) -> Spectrum {
        if signal.is_empty() {
            return Spectrum::default();
        }
        let n = signal.len();
        let buffer = self.transform(signal);
        let bins = (n - 1) / 2 + 1;
        let resolution = self.sample_rate / n as f64;

        Spectrum {
            frequencies: (0..bins).map(|k| k as f64 * resolution).collect(),
            magnitudes: buffer.iter().take(bins).map(|c| c.norm()).collect(),
        }
    }
}
