#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick loop that drives the Rampart world through its systems.
//!
//! A [`Simulation`] owns one [`World`] and one instance of every system. Each
//! call to [`Simulation::step`] applies the inputs due on the current tick and
//! then runs the phases in a fixed order: wave director, targeting, movement,
//! combat, projectiles, status effects and cleanup. Every phase collects its
//! commands before the world executes them, so a system never observes a
//! partially applied phase.

mod schedule;
mod verify;

use rampart_core::{Command, ConfigError, Event, InputEvent, Outcome, SimConfig};
use rampart_system_combat::{Combat, CombatView};
use rampart_system_movement::Movement;
use rampart_system_projectiles::Projectiles;
use rampart_system_spawning::Spawning;
use rampart_system_status_effects::StatusEffectsSystem;
use rampart_system_targeting::Targeting;
use rampart_world::{self as world, canonical_hash, query, CanonicalHash, RunStats, World};
use serde::{Deserialize, Serialize};

pub use schedule::InputSchedule;
pub use verify::{verify_run, VerificationError, VerificationLimits};

/// Events produced while advancing a single tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// Tick that was simulated.
    pub tick: u64,
    /// Events in the order the world emitted them.
    pub events: Vec<Event>,
}

/// Final account of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Number of ticks simulated.
    pub tick: u64,
    /// Digest of the final state.
    pub canonical_hash: CanonicalHash,
    /// Aggregate counters.
    pub stats: RunStats,
    /// How the run ended, if it did.
    pub outcome: Option<Outcome>,
}

/// Everything needed to reproduce a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Seed of the random stream.
    pub seed: u64,
    /// Static configuration.
    pub config: SimConfig,
    /// Ordered input events.
    #[serde(default)]
    pub events: Vec<InputEvent>,
}

/// Deterministic simulation of one run.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    spawning: Spawning,
    targeting: Targeting,
    movement: Movement,
    combat: Combat,
    projectiles: Projectiles,
    status_effects: StatusEffectsSystem,
    commands: Vec<Command>,
}

impl Simulation {
    /// Validates the configuration and builds the initial state.
    pub fn start(seed: u64, config: SimConfig) -> Result<Self, ConfigError> {
        let world = World::new(seed, config)?;
        tracing::info!(
            seed,
            heroes = query::heroes(&world).len(),
            turrets = query::turrets(&world).len(),
            "simulation started"
        );
        Ok(Self {
            world,
            spawning: Spawning::new(),
            targeting: Targeting::new(),
            movement: Movement::new(),
            combat: Combat::new(),
            projectiles: Projectiles::new(),
            status_effects: StatusEffectsSystem::new(),
            commands: Vec::new(),
        })
    }

    /// Advances exactly one tick.
    ///
    /// Inputs whose tick differs from the current one are rejected by the
    /// world. Once the run is lost only inputs and cleanup still run.
    pub fn step(&mut self, due: &[InputEvent]) -> StepReport {
        let tick = query::tick(&self.world);
        let mut events = Vec::new();

        for event in due {
            world::apply(
                &mut self.world,
                Command::ApplyInput { event: *event },
                &mut events,
            );
        }

        self.run_phases(&mut events);
        world::apply(&mut self.world, Command::Cleanup, &mut events);

        log_events(&events);
        tracing::debug!(
            tick,
            enemies = query::enemies(&self.world).len(),
            projectiles = query::projectiles(&self.world).len(),
            events = events.len(),
            "tick simulated"
        );
        StepReport { tick, events }
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub fn state(&self) -> &World {
        &self.world
    }

    /// Summarises the run as it stands.
    #[must_use]
    pub fn finalize(&self) -> RunSummary {
        let summary = RunSummary {
            tick: query::tick(&self.world),
            canonical_hash: canonical_hash(&self.world),
            stats: query::stats(&self.world),
            outcome: query::outcome(&self.world),
        };
        tracing::info!(
            tick = summary.tick,
            hash = %summary.canonical_hash,
            outcome = ?summary.outcome,
            "simulation finalized"
        );
        summary
    }

    fn run_phases(&mut self, events: &mut Vec<Event>) {
        let phases = [
            Phase::Spawning,
            Phase::Targeting,
            Phase::Movement,
            Phase::Combat,
            Phase::Projectiles,
            Phase::StatusEffects,
        ];
        for phase in phases {
            if query::outcome(&self.world).is_some() {
                return;
            }
            self.collect(phase);
            for command in self.commands.drain(..) {
                world::apply(&mut self.world, command, events);
            }
        }
    }

    fn collect(&mut self, phase: Phase) {
        let out = &mut self.commands;
        match phase {
            Phase::Spawning => {
                let spawning = &mut self.spawning;
                self.world.with_rng(|world, rng| {
                    let config = query::config(world);
                    spawning.handle(
                        query::tick(world),
                        query::waves(world),
                        &config.waves,
                        config.field,
                        config.content.enemies(),
                        rng,
                        out,
                    );
                });
            }
            Phase::Targeting => {
                let targeting = &mut self.targeting;
                self.world.with_rng(|world, rng| {
                    targeting.handle(
                        query::heroes(world),
                        query::turrets(world),
                        query::enemies(world),
                        query::content(world),
                        rng,
                        out,
                    );
                });
            }
            Phase::Movement => {
                let world = &self.world;
                let config = query::config(world);
                self.movement.handle(
                    query::heroes(world),
                    query::enemies(world),
                    &config.content,
                    &config.physics,
                    config.field,
                    query::fortress(world).line_x,
                    out,
                );
            }
            Phase::Combat => {
                let world = &self.world;
                let config = query::config(world);
                let view = CombatView {
                    tick: query::tick(world),
                    heroes: query::heroes(world),
                    turrets: query::turrets(world),
                    enemies: query::enemies(world),
                    content: &config.content,
                    rules: &config.combat,
                    physics: &config.physics,
                    modifiers: query::modifiers(world),
                    line_x: query::fortress(world).line_x,
                };
                self.combat.handle(&view, out);
            }
            Phase::Projectiles => {
                let world = &self.world;
                self.projectiles.handle(
                    query::tick(world),
                    query::projectiles(world),
                    query::enemies(world),
                    out,
                );
            }
            Phase::StatusEffects => {
                let world = &self.world;
                self.status_effects
                    .handle(query::tick(world), query::enemies(world), out);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Spawning,
    Targeting,
    Movement,
    Combat,
    Projectiles,
    StatusEffects,
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::InputRejected { tick, reason } => {
                tracing::warn!(tick, %reason, "input event rejected");
            }
            Event::WaveStarted { wave, enemies } => {
                tracing::info!(wave, enemies, "wave started");
            }
            Event::RunEnded { outcome } => {
                tracing::info!(?outcome, "run ended");
            }
            _ => {}
        }
    }
}
