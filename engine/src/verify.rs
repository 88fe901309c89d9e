//! Server-side replay of submitted runs.

use rampart_core::{ConfigError, InputEvent, SimConfig};
use rampart_world::CanonicalHash;
use thiserror::Error;

use crate::{InputSchedule, RunSummary, Simulation};

/// Bounds applied when replaying a submitted run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerificationLimits {
    /// Ticks the submitted run claims to have simulated.
    pub ticks: u64,
    /// Largest number of ticks the verifier agrees to simulate.
    pub max_ticks: u64,
}

/// Reasons a submitted run is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    /// The replayed state differs from the submitted one.
    #[error("canonical hash mismatch: expected {expected}, replay produced {actual}")]
    HashMismatch {
        /// Hash supplied with the run.
        expected: CanonicalHash,
        /// Hash produced by the replay.
        actual: CanonicalHash,
    },
    /// The run asks for more ticks than the verifier allows.
    #[error("run requests {requested} ticks but at most {max} are allowed")]
    TickBudgetExceeded {
        /// Ticks requested by the run.
        requested: u64,
        /// Configured limit.
        max: u64,
    },
    /// The configuration cannot start a run.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Replays a run from scratch and compares its final hash.
pub fn verify_run(
    seed: u64,
    config: SimConfig,
    events: &[InputEvent],
    limits: VerificationLimits,
    expected: CanonicalHash,
) -> Result<RunSummary, VerificationError> {
    if limits.ticks > limits.max_ticks {
        return Err(VerificationError::TickBudgetExceeded {
            requested: limits.ticks,
            max: limits.max_ticks,
        });
    }

    let mut simulation = Simulation::start(seed, config)?;
    let mut schedule = InputSchedule::new(events);
    for tick in 0..limits.ticks {
        let _ = simulation.step(schedule.due(tick));
    }

    let summary = simulation.finalize();
    if summary.canonical_hash != expected {
        tracing::warn!(
            expected = %expected,
            actual = %summary.canonical_hash,
            "verification failed"
        );
        return Err(VerificationError::HashMismatch {
            expected,
            actual: summary.canonical_hash,
        });
    }
    Ok(summary)
}
