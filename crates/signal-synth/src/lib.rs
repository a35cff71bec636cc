//! Signal Synthesizer
//!
//! Generates reproducible multi-channel sensor signals as a baseline plus a
//! sinusoid plus seeded Gaussian noise.

mod error;
mod noise;
mod sensors;
mod series;
mod synthesis;
pub mod time_axis;
mod waveform;

pub use error::SynthError;
pub use noise::NoiseSource;
pub use sensors::{industrial_sensors, ChannelSeeds, SensorKind};
pub use series::{Channel, TimeSeries};
pub use synthesis::{synthesize, synthesize_with, SynthesisSpec};
pub use waveform::{add_noise, Waveform};
