#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line driver that runs, replays and verifies Rampart simulations.

mod run_file;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rampart_core::{InputEvent, SimConfig};
use rampart_engine::{
    verify_run, InputSchedule, RunRecord, RunSummary, Simulation, VerificationLimits,
};
use rampart_world::CanonicalHash;
use tracing_subscriber::EnvFilter;

/// Ten minutes of simulated time at thirty ticks per second.
const DEFAULT_MAX_TICKS: u64 = 18_000;

#[derive(Debug, Parser)]
#[command(name = "rampart", about = "Deterministic fortress-defense combat engine")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Runs the reference configuration without inputs.
    Demo {
        /// Ticks to simulate.
        #[arg(long, default_value_t = 600)]
        ticks: u64,
        /// Seed of the random stream.
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Writes the run as a replayable record.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Replays a recorded run and prints its summary.
    Replay {
        /// Run record in JSON or TOML.
        run: PathBuf,
        /// Ticks to simulate.
        #[arg(long)]
        ticks: u64,
    },
    /// Replays a recorded run and checks its final hash.
    Verify {
        /// Run record in JSON or TOML.
        run: PathBuf,
        /// Ticks the run claims to have simulated.
        #[arg(long)]
        ticks: u64,
        /// Expected canonical hash in hexadecimal.
        #[arg(long)]
        expected: CanonicalHash,
        /// Largest number of ticks the verifier simulates.
        #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
        max_ticks: u64,
    },
}

/// Entry point for the Rampart command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let summary = match Cli::parse().command {
        CliCommand::Demo { ticks, seed, save } => {
            if let Some(path) = save {
                let record = RunRecord {
                    seed,
                    config: SimConfig::demo(),
                    events: Vec::new(),
                };
                run_file::save(&path, &record)?;
                tracing::info!(path = %path.display(), "run record written");
            }
            simulate(seed, SimConfig::demo(), &[], ticks)?
        }
        CliCommand::Replay { run, ticks } => {
            let record = run_file::load(&run)?;
            simulate(record.seed, record.config, &record.events, ticks)?
        }
        CliCommand::Verify {
            run,
            ticks,
            expected,
            max_ticks,
        } => {
            let record = run_file::load(&run)?;
            let limits = VerificationLimits { ticks, max_ticks };
            verify_run(record.seed, record.config, &record.events, limits, expected)
                .with_context(|| format!("run {} failed verification", run.display()))?
        }
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn simulate(
    seed: u64,
    config: SimConfig,
    events: &[InputEvent],
    ticks: u64,
) -> Result<RunSummary> {
    let mut simulation =
        Simulation::start(seed, config).context("configuration cannot start a run")?;
    let mut schedule = InputSchedule::new(events);
    for tick in 0..ticks {
        let _ = simulation.step(schedule.due(tick));
    }
    Ok(simulation.finalize())
}
