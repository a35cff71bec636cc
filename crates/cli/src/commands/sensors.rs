//! `sensors`: simulated plant recording and preprocessing summary

use crate::LabConfig;
use anyhow::{Context, Result};
use clap::Args;
use feature_engine::AxisStatistics;
use ndarray::Array2;
use signal_preprocess::{
    correlation_matrix, gradient, rolling_max, rolling_mean, rolling_min, rolling_std,
    zscore_filter, MinMaxScaler, OutlierReport, ROLLING_STATS_WINDOW, SMOOTHING_WINDOW,
    Z_SCORE_THRESHOLD,
};
use signal_synth::{industrial_sensors, time_axis, ChannelSeeds, SensorKind, TimeSeries};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Default, Args)]
pub struct SensorsArgs {
    /// Write the recording as CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Scale every channel to [0, 1] before writing
    #[arg(long)]
    pub normalize: bool,
    /// Recording length in seconds
    #[arg(long)]
    pub duration: Option<f64>,
    /// Use one noise seed for every channel
    #[arg(long)]
    pub shared_seed: bool,
    /// Base noise seed
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Per-channel statistics
#[derive(Debug, Clone)]
pub struct ChannelSummary {
    pub name: String,
    pub unit: &'static str,
    pub stats: AxisStatistics,
    /// Last value of the rolling mean
    pub smoothed_last: Option<f64>,
    /// Largest absolute rate of change per sample
    pub max_rate: f64,
    /// Average rolling standard deviation over full windows
    pub mean_rolling_std: Option<f64>,
    /// Widest rolling max - min spread
    pub max_rolling_range: Option<f64>,
}

/// What `sensors` produced
#[derive(Debug, Clone)]
pub struct SensorsReport {
    pub series: TimeSeries,
    pub channels: Vec<ChannelSummary>,
    pub correlation: Array2<f64>,
    pub outliers: OutlierReport,
}

fn mean_of_some(values: &[Option<f64>]) -> Option<f64> {
    let full: Vec<f64> = values.iter().flatten().copied().collect();
    (!full.is_empty()).then(|| full.iter().sum::<f64>() / full.len() as f64)
}

fn summarize(name: &str, unit: &'static str, values: &[f64]) -> Result<ChannelSummary> {
    let stats = AxisStatistics::compute(values)?;
    let smoothed = rolling_mean(values, SMOOTHING_WINDOW)?;
    let rate = gradient(values)?;
    let std = rolling_std(values, ROLLING_STATS_WINDOW)?;
    let highs = rolling_max(values, ROLLING_STATS_WINDOW)?;
    let lows = rolling_min(values, ROLLING_STATS_WINDOW)?;

    let max_rolling_range = highs
        .iter()
        .zip(&lows)
        .filter_map(|(h, l)| Some((*h)? - (*l)?))
        .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |a| a.max(r))));

    Ok(ChannelSummary {
        name: name.to_string(),
        unit,
        stats,
        smoothed_last: smoothed.last().copied().flatten(),
        max_rate: rate.iter().fold(0.0, |m: f64, r| m.max(r.abs())),
        mean_rolling_std: mean_of_some(&std),
        max_rolling_range,
    })
}

/// Channels as a `(samples, channels)` matrix
pub fn series_matrix(series: &TimeSeries) -> Array2<f64> {
    let channels = series.channels();
    Array2::from_shape_fn((series.len(), channels.len()), |(i, j)| {
        channels[j].values[i]
    })
}

/// Generate the four plant channels and summarize them
pub fn run(args: &SensorsArgs, config: &LabConfig) -> Result<SensorsReport> {
    let seed = args.seed.unwrap_or(config.seed);
    let duration = args.duration.unwrap_or(config.sensors.duration);
    let seeds = if args.shared_seed || config.sensors.shared_seed {
        ChannelSeeds::shared(seed)
    } else {
        ChannelSeeds::independent(seed)
    };

    let timestamps = time_axis::arange(0.0, duration, config.sensors.step)?;
    let series = industrial_sensors(&timestamps, &seeds)?;
    info!(
        "Generated {} samples for {} sensors",
        series.len(),
        series.channels().len()
    );

    let channels = SensorKind::ALL
        .iter()
        .map(|kind| {
            let values = series
                .channel(kind.name())
                .with_context(|| format!("missing channel {}", kind.name()))?;
            summarize(kind.name(), kind.unit(), values)
        })
        .collect::<Result<Vec<_>>>()?;

    let data = series_matrix(&series);
    let correlation = correlation_matrix(data.view())?;
    let outliers = zscore_filter(data.view(), Z_SCORE_THRESHOLD)?;

    if let Some(path) = &args.output {
        let out = if args.normalize {
            let (_, scaled) = MinMaxScaler::fit_transform(data.view())?;
            let mut normalized = TimeSeries::new(series.timestamps().to_vec())?;
            for (j, channel) in series.channels().iter().enumerate() {
                normalized.add_channel(channel.name.clone(), scaled.column(j).to_vec())?;
            }
            normalized
        } else {
            series.clone()
        };
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        out.write_csv(BufWriter::new(file))?;
        info!("Recording written to {}", path.display());
    }

    Ok(SensorsReport {
        series,
        channels,
        correlation,
        outliers,
    })
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.3}", v))
}

impl fmt::Display for SensorsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:>5} {:>10} {:>8} {:>10} {:>10} {:>10} {:>9} {:>9} {:>9}",
            "sensor", "unit", "mean", "std", "min", "max", "smoothed", "max rate", "roll std", "roll ptp"
        )?;
        for c in &self.channels {
            writeln!(
                f,
                "{:<12} {:>5} {:>10.3} {:>8.3} {:>10.3} {:>10.3} {:>10} {:>9.3} {:>9} {:>9}",
                c.name,
                c.unit,
                c.stats.mean,
                c.stats.std_dev,
                c.stats.min,
                c.stats.max,
                opt(c.smoothed_last),
                c.max_rate,
                opt(c.mean_rolling_std),
                opt(c.max_rolling_range),
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Correlation matrix:")?;
        write!(f, "{:<12}", "")?;
        for c in &self.channels {
            write!(f, " {:>11}", c.name)?;
        }
        writeln!(f)?;
        for (i, c) in self.channels.iter().enumerate() {
            write!(f, "{:<12}", c.name)?;
            for j in 0..self.channels.len() {
                write!(f, " {:>11.3}", self.correlation[[i, j]])?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Z-score filter (|z| < {}): kept {} of {} rows",
            Z_SCORE_THRESHOLD,
            self.outliers.kept.len(),
            self.series.len()
        )
    }
}
