//! Industrial Sensor Presets

use crate::series::TimeSeries;
use crate::synthesis::SynthesisSpec;
use crate::SynthError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Simulated plant sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    /// Temperature around 50 °C
    Temperature,
    /// Vibration around 1 g
    Vibration,
    /// Pressure around 100 PSI
    Pressure,
    /// Motor current around 10 A
    Current,
}

impl SensorKind {
    /// All sensors in channel order
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Temperature,
        SensorKind::Vibration,
        SensorKind::Pressure,
        SensorKind::Current,
    ];

    /// Channel name
    pub fn name(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Vibration => "vibration",
            SensorKind::Pressure => "pressure",
            SensorKind::Current => "current",
        }
    }

    /// Engineering unit
    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "°C",
            SensorKind::Vibration => "g",
            SensorKind::Pressure => "PSI",
            SensorKind::Current => "A",
        }
    }

    /// Synthesis parameters for this sensor with the given seed
    pub fn profile(&self, seed: u64) -> SynthesisSpec {
        match self {
            SensorKind::Temperature => SynthesisSpec::new(50.0, 0.5, 1.0, 0.2, seed),
            SensorKind::Vibration => SynthesisSpec::new(1.0, 0.1, 2.0, 0.05, seed),
            SensorKind::Pressure => SynthesisSpec::new(100.0, 5.0, 0.5, 1.0, seed),
            SensorKind::Current => SynthesisSpec::new(10.0, 0.3, 1.0, 0.1, seed),
        }
    }
}

/// Noise seed for each sensor channel.
///
/// Channels sharing a seed get identical standard-normal draws, so their
/// noise is perfectly correlated. Use [`ChannelSeeds::independent`] unless
/// that coupling is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSeeds {
    pub temperature: u64,
    pub vibration: u64,
    pub pressure: u64,
    pub current: u64,
}

impl ChannelSeeds {
    /// Every channel uses `seed`
    pub fn shared(seed: u64) -> Self {
        Self {
            temperature: seed,
            vibration: seed,
            pressure: seed,
            current: seed,
        }
    }

    /// Consecutive seeds starting at `base`
    pub fn independent(base: u64) -> Self {
        Self {
            temperature: base,
            vibration: base.wrapping_add(1),
            pressure: base.wrapping_add(2),
            current: base.wrapping_add(3),
        }
    }

    /// Seed assigned to `kind`
    pub fn for_kind(&self, kind: SensorKind) -> u64 {
        match kind {
            SensorKind::Temperature => self.temperature,
            SensorKind::Vibration => self.vibration,
            SensorKind::Pressure => self.pressure,
            SensorKind::Current => self.current,
        }
    }
}

/// Build the four-sensor plant recording over `timestamps`.
pub fn industrial_sensors(
    timestamps: &[f64],
    seeds: &ChannelSeeds,
) -> Result<TimeSeries, SynthError> {
    let mut series = TimeSeries::new(timestamps.to_vec())?;
    for kind in SensorKind::ALL {
        let spec = kind.profile(seeds.for_kind(kind));
        series.add_synthesized(kind.name(), &spec)?;
    }
    debug!(
        "Generated {} sensor channels with {} samples each",
        series.channels().len(),
        series.len()
    );
    Ok(series)
}
