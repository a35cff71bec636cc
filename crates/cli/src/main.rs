//! Sensor Lab - Main Entry Point

use anyhow::Result;
use clap::{Parser, Subcommand};
use sensor_lab::commands::{evaluate, generate, sensors, signal, train};
use sensor_lab::{init_logging, LabConfig};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "sensor-lab")]
#[command(about = "Synthetic industrial sensor signals, features and fault classification")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./sensor-lab.toml when present)
    #[arg(long, global = true, env = "SENSOR_LAB_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate temperature, vibration, pressure and current channels
    Sensors(sensors::SensorsArgs),
    /// Generate a noisy test waveform and filter it
    Signal(signal::SignalArgs),
    /// Write a synthetic accelerometer dataset
    GenerateDataset(generate::GenerateArgs),
    /// Train the fault classifier and save it with its scaler
    Train(train::TrainArgs),
    /// Evaluate a saved classifier on a dataset
    Evaluate(evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json)?;

    info!("=== Sensor Lab v{} ===", env!("CARGO_PKG_VERSION"));
    let config = LabConfig::load(cli.config.as_deref())?;
    debug!("Configuration: {:?}", config);

    match &cli.command {
        Command::Sensors(args) => print!("{}", sensors::run(args, &config)?),
        Command::Signal(args) => print!("{}", signal::run(args, &config)?),
        Command::GenerateDataset(args) => print!("{}", generate::run(args, &config)?),
        Command::Train(args) => print!("{}", train::run(args, &config)?),
        Command::Evaluate(args) => print!("{}", evaluate::run(args, &config)?),
    }
    Ok(())
}
