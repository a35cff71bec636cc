//! Time Axis Construction

use crate::SynthError;

/// Half-open range `[start, stop)` sampled every `step` seconds.
///
/// Yields `ceil((stop - start) / step)` points with `t[i] = start + i * step`.
pub fn arange(start: f64, stop: f64, step: f64) -> Result<Vec<f64>, SynthError> {
    if !start.is_finite() || !stop.is_finite() {
        return Err(SynthError::InvalidTimestamps(format!(
            "range bounds must be finite, got [{start}, {stop})"
        )));
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(SynthError::InvalidTimestamps(format!(
            "step must be finite and > 0, got {step}"
        )));
    }
    let count = ((stop - start) / step).ceil();
    if count < 1.0 {
        return Err(SynthError::InvalidTimestamps(format!(
            "range [{start}, {stop}) with step {step} is empty"
        )));
    }
    Ok((0..count as usize).map(|i| start + i as f64 * step).collect())
}

/// `count` evenly spaced points from `start` to `stop`, both inclusive.
pub fn linspace(start: f64, stop: f64, count: usize) -> Result<Vec<f64>, SynthError> {
    if count == 0 {
        return Err(SynthError::InvalidTimestamps(
            "linspace needs at least one point".to_string(),
        ));
    }
    if !start.is_finite() || !stop.is_finite() || stop < start {
        return Err(SynthError::InvalidTimestamps(format!(
            "invalid linspace bounds [{start}, {stop}]"
        )));
    }
    if count == 1 {
        return Ok(vec![start]);
    }
    let step = (stop - start) / (count - 1) as f64;
    let mut points: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
    points[count - 1] = stop;
    Ok(points)
}

/// Check that timestamps are non-empty, finite and strictly increasing.
pub fn validate_timestamps(timestamps: &[f64]) -> Result<(), SynthError> {
    if timestamps.is_empty() {
        return Err(SynthError::InvalidTimestamps(
            "timestamp sequence is empty".to_string(),
        ));
    }
    if let Some(bad) = timestamps.iter().position(|t| !t.is_finite()) {
        return Err(SynthError::InvalidTimestamps(format!(
            "timestamp {bad} is not finite"
        )));
    }
    if let Some(i) = timestamps.windows(2).position(|w| w[1] <= w[0]) {
        return Err(SynthError::InvalidTimestamps(format!(
            "timestamps not strictly increasing at index {}",
            i + 1
        )));
    }
    Ok(())
}
