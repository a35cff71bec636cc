//! Periodic Test Waveforms

use crate::noise::NoiseSource;
use crate::SynthError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Periodic test waveform shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    /// `A sin(2πft)`
    Sine,
    /// `A sign(sin(2πft))`
    Square,
    /// `A ((2πft mod 2π) / π - 1)`
    Sawtooth,
}

impl Waveform {
    /// All supported shapes
    pub const ALL: [Waveform; 3] = [Waveform::Sine, Waveform::Square, Waveform::Sawtooth];

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
        }
    }

    /// Value at time `t` for a waveform of `frequency` Hz and `amplitude`
    pub fn sample(&self, t: f64, frequency: f64, amplitude: f64) -> f64 {
        let phase = 2.0 * PI * frequency * t;
        match self {
            Waveform::Sine => amplitude * phase.sin(),
            Waveform::Square => {
                let s = phase.sin();
                // sign(0) is 0, unlike f64::signum
                let sign = if s > 0.0 {
                    1.0
                } else if s < 0.0 {
                    -1.0
                } else {
                    0.0
                };
                amplitude * sign
            }
            Waveform::Sawtooth => amplitude * (phase.rem_euclid(2.0 * PI) / PI - 1.0),
        }
    }

    /// Sample the waveform at every timestamp
    pub fn generate(&self, timestamps: &[f64], frequency: f64, amplitude: f64) -> Vec<f64> {
        timestamps
            .iter()
            .map(|&t| self.sample(t, frequency, amplitude))
            .collect()
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Waveform {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Waveform::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SynthError::UnknownWaveform(s.to_string()))
    }
}

/// Add `Normal(0, noise_std)` noise drawn from `noise` to every sample.
pub fn add_noise(
    signal: &[f64],
    noise_std: f64,
    noise: &mut NoiseSource,
) -> Result<Vec<f64>, SynthError> {
    let draws = noise.gaussian(noise_std, signal.len())?;
    Ok(signal.iter().zip(draws).map(|(s, n)| s + n).collect())
}
