//! Command-line driver for the annular hard-rod Monte Carlo simulation.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rods_engine::{ConfigError, SimulationConfig, SimulationEngine};
use rods_io::{load_snapshot, save_analysis_output, save_snapshot};

/// A 2D hard-rod Monte Carlo simulation of a confined annular liquid crystal.
#[derive(Parser)]
#[command(name = "rods", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build an empty cell from a configuration and fill it, writing a snapshot.
    Fill {
        /// TOML configuration file.
        #[arg(long)]
        config: PathBuf,
        /// Snapshot output path.
        #[arg(long)]
        out: PathBuf,
    },
    /// Load a snapshot and run thermalization sweeps, writing the result.
    Thermalize {
        /// TOML configuration file.
        #[arg(long)]
        config: PathBuf,
        /// Snapshot to load.
        #[arg(long)]
        input: PathBuf,
        /// Snapshot output path.
        #[arg(long)]
        out: PathBuf,
    },
    /// Load a snapshot and run the configured simulation iterations,
    /// writing an extended analysis output per iteration.
    Simulate {
        /// TOML configuration file.
        #[arg(long)]
        config: PathBuf,
        /// Snapshot to load.
        #[arg(long)]
        input: PathBuf,
        /// Directory to write per-iteration analysis output into.
        #[arg(long)]
        out_dir: PathBuf,
        /// Snapshot output path for the final configuration.
        #[arg(long)]
        final_snapshot: PathBuf,
    },
    /// Load a snapshot and write its order parameters as an extended
    /// analysis output, reporting cluster and defect counts.
    Analyze {
        /// TOML configuration file.
        #[arg(long)]
        config: PathBuf,
        /// Snapshot to load.
        #[arg(long)]
        input: PathBuf,
        /// Extended analysis output path.
        #[arg(long)]
        out: PathBuf,
    },
}

fn engine_from_config(config: &PathBuf) -> Result<SimulationEngine, ConfigError> {
    let params = SimulationConfig::from_file(config)?.into_parameters()?;
    Ok(SimulationEngine::new(params))
}

fn run(command: Command) -> Result<(), ConfigError> {
    match command {
        Command::Fill { config, out } => {
            let mut engine = engine_from_config(&config)?;
            engine.fill();
            save_snapshot(engine.cell(), &out)?;
        }
        Command::Thermalize { config, input, out } => {
            let mut engine = engine_from_config(&config)?;
            load_snapshot(engine.cell_mut(), &input)?;
            engine.note_loaded();
            engine.thermalize()?;
            save_snapshot(engine.cell(), &out)?;
        }
        Command::Simulate {
            config,
            input,
            out_dir,
            final_snapshot,
        } => {
            let mut engine = engine_from_config(&config)?;
            load_snapshot(engine.cell_mut(), &input)?;
            engine.note_loaded();

            std::fs::create_dir_all(&out_dir)?;
            let reports = engine.simulate()?;
            for report in &reports {
                let path = out_dir.join(format!("iteration_{:04}.csv", report.iteration));
                save_analysis_output(engine.cell().rods(), &report.orders, &path)?;
            }
            save_snapshot(engine.cell(), &final_snapshot)?;
        }
        Command::Analyze { config, input, out } => {
            let mut engine = engine_from_config(&config)?;
            load_snapshot(engine.cell_mut(), &input)?;
            engine.note_loaded();

            let orders = engine.order_parameters();
            save_analysis_output(engine.cell().rods(), &orders, &out)?;

            let clusters = engine.clusters();
            let defects = engine.defects(&orders)?;
            tracing::info!(clusters = clusters.len(), defects = defects.len(), "analysis complete");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_command() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
