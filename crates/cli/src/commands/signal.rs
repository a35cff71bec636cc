//! `signal`: test waveform, noise and moving-average filtering

use crate::LabConfig;
use anyhow::{bail, Context, Result};
use clap::Args;
use feature_engine::{snr_db, AxisStatistics, FftAnalyzer};
use signal_preprocess::moving_average;
use signal_synth::{add_noise, time_axis, NoiseSource, TimeSeries, Waveform};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Default, Args)]
pub struct SignalArgs {
    /// sine, square or sawtooth
    #[arg(short, long)]
    pub waveform: Option<Waveform>,
    /// Frequency in Hz
    #[arg(short, long)]
    pub frequency: Option<f64>,
    #[arg(short, long)]
    pub amplitude: Option<f64>,
    /// Seconds
    #[arg(short, long)]
    pub duration: Option<f64>,
    /// Hz
    #[arg(long)]
    pub sample_rate: Option<f64>,
    #[arg(short, long)]
    pub noise: Option<f64>,
    /// Moving-average window in samples
    #[arg(long)]
    pub window: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write time, clean, noisy and filtered columns as CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// What `signal` measured
#[derive(Debug, Clone)]
pub struct SignalReport {
    pub waveform: Waveform,
    pub frequency: f64,
    pub samples: usize,
    pub window: usize,
    pub clean: AxisStatistics,
    pub noisy: AxisStatistics,
    pub filtered: AxisStatistics,
    pub snr_noisy_db: f64,
    pub snr_filtered_db: f64,
    pub dominant_frequency: Option<f64>,
}

fn residual(signal: &[f64], reference: &[f64]) -> Vec<f64> {
    signal.iter().zip(reference).map(|(s, r)| s - r).collect()
}

/// Generate, corrupt and filter one test signal
pub fn run(args: &SignalArgs, config: &LabConfig) -> Result<SignalReport> {
    let defaults = &config.signal;
    let waveform = args.waveform.unwrap_or(defaults.waveform);
    let frequency = args.frequency.unwrap_or(defaults.frequency);
    let amplitude = args.amplitude.unwrap_or(defaults.amplitude);
    let duration = args.duration.unwrap_or(defaults.duration);
    let sample_rate = args.sample_rate.unwrap_or(defaults.sample_rate);
    let noise_std = args.noise.unwrap_or(defaults.noise_std);
    let window = args.window.unwrap_or(defaults.filter_window);

    let samples = (sample_rate * duration) as usize;
    if samples < 2 {
        bail!("signal needs at least 2 samples, got {samples} ({duration} s at {sample_rate} Hz)");
    }

    let t = time_axis::linspace(0.0, duration, samples)?;
    let clean = waveform.generate(&t, frequency, amplitude);
    let mut noise = NoiseSource::seeded(args.seed.unwrap_or(config.seed));
    let noisy = add_noise(&clean, noise_std, &mut noise)?;
    let filtered = moving_average(&noisy, window)?;

    let snr_noisy_db = snr_db(&clean, &residual(&noisy, &clean));
    let snr_filtered_db = snr_db(&clean, &residual(&filtered, &clean));
    let dominant_frequency = FftAnalyzer::new(sample_rate)
        .spectrum(&noisy)
        .dominant_frequency();
    info!(
        "{} wave at {} Hz: SNR {:.2} dB -> {:.2} dB after filtering",
        waveform, frequency, snr_noisy_db, snr_filtered_db
    );

    if let Some(path) = &args.output {
        let mut series = TimeSeries::new(t)?;
        series.add_channel("clean", clean.clone())?;
        series.add_channel("noisy", noisy.clone())?;
        series.add_channel("filtered", filtered.clone())?;
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        series.write_csv(BufWriter::new(file))?;
    }

    Ok(SignalReport {
        waveform,
        frequency,
        samples,
        window,
        clean: AxisStatistics::compute(&clean)?,
        noisy: AxisStatistics::compute(&noisy)?,
        filtered: AxisStatistics::compute(&filtered)?,
        snr_noisy_db,
        snr_filtered_db,
        dominant_frequency,
    })
}

impl fmt::Display for SignalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} wave, {} Hz, {} samples, filter window {}",
            self.waveform, self.frequency, self.samples, self.window
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<10} {:>9} {:>9} {:>9} {:>9} {:>9}",
            "signal", "mean", "std", "min", "max", "rms"
        )?;
        for (name, s) in [
            ("clean", &self.clean),
            ("noisy", &self.noisy),
            ("filtered", &self.filtered),
        ] {
            writeln!(
                f,
                "{:<10} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4}",
                name, s.mean, s.std_dev, s.min, s.max, s.rms
            )?;
        }
        writeln!(f)?;
        writeln!(f, "SNR noisy:    {:.2} dB", self.snr_noisy_db)?;
        writeln!(f, "SNR filtered: {:.2} dB", self.snr_filtered_db)?;
        match self.dominant_frequency {
            Some(freq) => writeln!(f, "Dominant frequency: {:.2} Hz", freq),
            None => writeln!(f, "Dominant frequency: n/a"),
        }
    }
}
