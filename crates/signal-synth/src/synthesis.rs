//! Single-channel Signal Synthesis

use crate::noise::NoiseSource;
use crate::time_axis::validate_timestamps;
use crate::SynthError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters that fully determine one synthetic channel.
///
/// `value[i] = base + amplitude * sin(angular_rate * t[i]) + noise[i]`
/// with `noise ~ Normal(0, noise_std)` seeded by `seed`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesisSpec {
    /// Baseline level
    pub base: f64,
    /// Sinusoid amplitude
    pub amplitude: f64,
    /// Sinusoid angular rate (rad/s)
    pub angular_rate: f64,
    /// Standard deviation of the additive Gaussian noise
    pub noise_std: f64,
    /// Noise generator seed
    pub seed: u64,
}

impl Default for SynthesisSpec {
    fn default() -> Self {
        Self {
            base: 0.0,
            amplitude: 1.0,
            angular_rate: 1.0,
            noise_std: 0.0,
            seed: 42,
        }
    }
}

impl SynthesisSpec {
    /// Create a spec from its five parameters
    pub fn new(base: f64, amplitude: f64, angular_rate: f64, noise_std: f64, seed: u64) -> Self {
        Self {
            base,
            amplitude,
            angular_rate,
            noise_std,
            seed,
        }
    }

    /// Same spec with a different seed
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<(), SynthError> {
        let finite = [
            ("base", self.base),
            ("amplitude", self.amplitude),
            ("angular_rate", self.angular_rate),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SynthError::InvalidConfiguration(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(SynthError::InvalidConfiguration(format!(
                "noise_std must be finite and >= 0, got {}",
                self.noise_std
            )));
        }
        Ok(())
    }

    /// Noise-free value at time `t`
    pub fn deterministic_at(&self, t: f64) -> f64 {
        self.base + self.amplitude * (self.angular_rate * t).sin()
    }
}

/// Synthesize one channel over `timestamps` using a generator seeded by `spec.seed`.
///
/// Output is bit-for-bit reproducible for identical inputs.
pub fn synthesize(timestamps: &[f64], spec: &SynthesisSpec) -> Result<Vec<f64>, SynthError> {
    let mut noise = NoiseSource::seeded(spec.seed);
    synthesize_with(timestamps, spec, &mut noise)
}

/// Synthesize one channel drawing noise from a caller-owned generator.
///
/// `spec.seed` is ignored; the generator's current state decides the noise.
/// Use this to chain several channels on one sequence of draws.
pub fn synthesize_with(
    timestamps: &[f64],
    spec: &SynthesisSpec,
    noise: &mut NoiseSource,
) -> Result<Vec<f64>, SynthError> {
    spec.validate()?;
    validate_timestamps(timestamps)?;

    let draws = noise.gaussian(spec.noise_std, timestamps.len())?;
    debug!(
        "Synthesized {} samples (base={}, amplitude={}, rate={}, noise_std={})",
        timestamps.len(),
        spec.base,
        spec.amplitude,
        spec.angular_rate,
        spec.noise_std
    );

    Ok(timestamps
        .iter()
        .zip(draws)
        .map(|(&t, n)| spec.deterministic_at(t) + n)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_axis::arange;
    use proptest::prelude::*;

    fn hundred_points() -> Vec<f64> {
        (0..100).map(|i| i as f64 * 0.1).collect()
    }

    /// First draws of seed 42; a change of generator or sampler breaks these
    const SEED_42_STANDARD_NORMAL: [f64; 5] = [
        0.47798123835102174,
        1.3340706102318078,
        -0.21086668327103028,
        0.4763469238088213,
        -0.5120906220561634,
    ];

    #[test]
    fn test_seed_42_noise_is_pinned() {
        let t: Vec<f64> = (0..5).map(|i| i as f64).collect();
        let spec = SynthesisSpec::new(0.0, 0.0, 0.0, 1.0, 42);
        assert_eq!(synthesize(&t, &spec).unwrap(), SEED_42_STANDARD_NORMAL);
    }

    #[test]
    fn test_seed_42_temperature_values_are_pinned() {
        let t: Vec<f64> = (0..5).map(|i| i as f64 * 0.1).collect();
        let spec = SynthesisSpec::new(50.0, 0.5, 1.0, 0.2, 42);
        let expected = [
            50.0955962476702,
            50.31673083036978,
            50.05716132874332,
            50.24302948809243,
            50.09229104674309,
        ];
        for (v, e) in synthesize(&t, &spec).unwrap().iter().zip(expected) {
            assert!((v - e).abs() < 1e-12, "{v} != {e}");
        }
    }

    #[test]
    fn test_zero_noise_is_pure_sinusoid() {
        let t = hundred_points();
        let spec = SynthesisSpec::new(50.0, 0.5, 1.0, 0.0, 42);
        let values = synthesize(&t, &spec).unwrap();

        assert_eq!(values.len(), 100);
        for (v, &ti) in values.iter().zip(&t) {
            assert_eq!(*v, 50.0 + 0.5 * ti.sin());
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let t = arange(0.0, 100.0, 0.1).unwrap();
        let spec = SynthesisSpec::new(50.0, 0.5, 1.0, 0.2, 42);
        let a = synthesize(&t, &spec).unwrap();
        let b = synthesize(&t, &spec).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_share_sinusoid() {
        let t = hundred_points();
        let spec = SynthesisSpec::new(1.0, 0.1, 2.0, 0.05, 1);
        let a = synthesize(&t, &spec).unwrap();
        let b = synthesize(&t, &spec.with_seed(2)).unwrap();
        assert_ne!(a, b);

        // Residuals around the deterministic term stay within a few sigma
        for ((x, y), &ti) in a.iter().zip(&b).zip(&t) {
            let clean = spec.deterministic_at(ti);
            assert!((x - clean).abs() < 0.05 * 6.0);
            assert!((y - clean).abs() < 0.05 * 6.0);
        }
    }

    #[test]
    fn test_negative_noise_std_rejected() {
        let spec = SynthesisSpec::new(0.0, 1.0, 1.0, -1.0, 0);
        assert!(matches!(
            synthesize(&[0.0, 1.0], &spec),
            Err(SynthError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_non_finite_parameters_rejected() {
        let spec = SynthesisSpec::new(f64::NAN, 1.0, 1.0, 0.1, 0);
        assert!(spec.validate().is_err());
        let spec = SynthesisSpec::new(0.0, 1.0, f64::INFINITY, 0.1, 0);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_invalid_timestamps_rejected() {
        let spec = SynthesisSpec::default();
        assert!(matches!(
            synthesize(&[], &spec),
            Err(SynthError::InvalidTimestamps(_))
        ));
        assert!(matches!(
            synthesize(&[0.0, 0.2, 0.1], &spec),
            Err(SynthError::InvalidTimestamps(_))
        ));
    }

    #[test]
    fn test_chained_channels_on_shared_source() {
        let t = hundred_points();
        let spec = SynthesisSpec::new(0.0, 0.0, 1.0, 1.0, 9);

        let mut shared = NoiseSource::seeded(9);
        let first = synthesize_with(&t, &spec, &mut shared).unwrap();
        let second = synthesize_with(&t, &spec, &mut shared).unwrap();

        // The first chained channel equals a fresh synthesis with the same seed,
        // the second continues the sequence instead of repeating it.
        assert_eq!(first, synthesize(&t, &spec).unwrap());
        assert_ne!(first, second);
        assert_eq!(shared.draws(), 200);
    }

    proptest! {
        #[test]
        fn prop_synthesis_is_idempotent(
            base in -1000.0f64..1000.0,
            amplitude in -50.0f64..50.0,
            rate in 0.0f64..20.0,
            noise_std in 0.0f64..10.0,
            seed in any::<u64>(),
            len in 1usize..200,
        ) {
            let t: Vec<f64> = (0..len).map(|i| i as f64 * 0.05).collect();
            let spec = SynthesisSpec::new(base, amplitude, rate, noise_std, seed);
            let a = synthesize(&t, &spec).unwrap();
            let b = synthesize(&t, &spec).unwrap();
            prop_assert_eq!(a.len(), len);
            prop_assert_eq!(a, b);
        }
    }
}
