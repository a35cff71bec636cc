//! Multi-channel Time Series

use crate::synthesis::{synthesize, SynthesisSpec};
use crate::time_axis::validate_timestamps;
use crate::SynthError;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One named channel of samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel name (e.g. "temperature")
    pub name: String,
    /// Samples aligned with the series timestamps
    pub values: Vec<f64>,
}

/// Named channels sharing one sampling grid.
///
/// Every channel holds exactly one sample per timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    timestamps: Vec<f64>,
    channels: Vec<Channel>,
}

impl TimeSeries {
    /// Create an empty series over `timestamps`
    pub fn new(timestamps: Vec<f64>) -> Result<Self, SynthError> {
        validate_timestamps(&timestamps)?;
        Ok(Self {
            timestamps,
            channels: Vec::new(),
        })
    }

    /// Append a channel; its length must match the time grid
    pub fn add_channel(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), SynthError> {
        let name = name.into();
        if self.channel(&name).is_some() {
            return Err(SynthError::DuplicateChannel(name));
        }
        if values.len() != self.timestamps.len() {
            return Err(SynthError::ChannelLengthMismatch {
                channel: name,
                expected: self.timestamps.len(),
                actual: values.len(),
            });
        }
        self.channels.push(Channel { name, values });
        Ok(())
    }

    /// Synthesize a channel from `spec` on this series' time grid
    pub fn add_synthesized(
        &mut self,
        name: impl Into<String>,
        spec: &SynthesisSpec,
    ) -> Result<(), SynthError> {
        let values = synthesize(&self.timestamps, spec)?;
        self.add_channel(name, values)
    }

    /// Sample timestamps
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Samples of the named channel
    pub fn channel(&self, name: &str) -> Option<&[f64]> {
        self.channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// All channels in insertion order
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Number of samples per channel
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Always false for a constructed series
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Write `time,<channel...>` CSV rows
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), SynthError> {
        let header: Vec<&str> = std::iter::once("time")
            .chain(self.channels.iter().map(|c| c.name.as_str()))
            .collect();
        writeln!(writer, "{}", header.join(","))?;

        for (i, t) in self.timestamps.iter().enumerate() {
            write!(writer, "{t}")?;
            for channel in &self.channels {
                write!(writer, ",{}", channel.values[i])?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_length_enforced() {
        let mut series = TimeSeries::new(vec![0.0, 0.1, 0.2]).unwrap();
        series.add_channel("a", vec![1.0, 2.0, 3.0]).unwrap();
        let err = series.add_channel("b", vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            SynthError::ChannelLengthMismatch { expected: 3, actual: 1, .. }
        ));
        assert!(matches!(
            series.add_channel("a", vec![0.0; 3]),
            Err(SynthError::DuplicateChannel(_))
        ));
    }

    #[test]
    fn test_add_synthesized() {
        let mut series = TimeSeries::new(vec![0.0, 0.5, 1.0]).unwrap();
        let spec = SynthesisSpec::new(10.0, 0.0, 1.0, 0.0, 1);
        series.add_synthesized("flat", &spec).unwrap();
        assert_eq!(series.channel("flat").unwrap(), &[10.0, 10.0, 10.0]);
        assert!(series.channel("missing").is_none());
    }

    #[test]
    fn test_write_csv() {
        let mut series = TimeSeries::new(vec![0.0, 1.0]).unwrap();
        series.add_channel("x", vec![1.5, 2.5]).unwrap();
        series.add_channel("y", vec![-1.0, 0.0]).unwrap();

        let mut out = Vec::new();
        series.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "time,x,y\n0,1.5,-1\n1,2.5,0\n");
    }
}
