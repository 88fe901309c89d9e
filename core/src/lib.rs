#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart combat engine.
//!
//! This crate defines the message surface that connects the driver, the
//! authoritative world and the pure systems. The driver submits
//! [`InputEvent`] values, systems read the world and respond with [`Command`]
//! batches, and the world executes those commands through its `apply` entry
//! point and broadcasts [`Event`] values describing the outcome.
//!
//! Every number that participates in the simulation is a [`Fixed`] value and
//! every random decision is drawn from a single [`SimRng`] stream, so a run is
//! fully defined by its seed, its [`SimConfig`] and its ordered input events.

pub mod command;
pub mod config;
pub mod content;
pub mod effect;
pub mod entity;
pub mod fixed;
pub mod ids;
pub mod rng;
pub mod status;

pub use command::{
    AbilityActivation, Command, DamageSource, DiscardReason, EnemyTarget, Event, InputAction,
    InputEvent, InputRejection, Mover, Outcome, Relic,
};
pub use config::{
    CombatRules, ConfigError, FieldConfig, FortressConfig, PhysicsRules, SimConfig, WaveConfig,
    MAX_FIELD_EXTENT, MAX_TIER,
};
pub use content::{
    AttackStyle, ContentTables, EnemyDefinition, EnemyKind, HeroDefinition, HeroDeployment,
    HeroRole, PassiveTrait, SkillActivation, SkillDefinition, SkillTargeting, TargetingMode,
    TurretDefinition, TurretPlacement, TurretStatTable, Weakness,
};
pub use effect::EffectSpec;
pub use entity::{
    buff_multiplier, buff_sum, ActiveBuff, Attacker, Body, BuffStat, Enemy, Fortress,
    FortressClass, GlobalModifiers, Health, Hero, HeroState, Hit, Loadout, Projectile,
    SkillCooldown, Turret, TurretState, WaveProgress,
};
pub use fixed::{Fixed, FixedVec2, Q14_ONE};
pub use ids::{
    EnemyDefinitionId, EnemyId, HeroDefinitionId, HeroId, IdCounter, ProjectileId, SkillId,
    TurretDefinitionId, TurretId,
};
pub use rng::SimRng;
pub use status::{StatusEffect, StatusEffects, StatusKind};

/// Number of ticks in one logical second.
pub const TICKS_PER_SECOND: u32 = 30;

/// Ticks between two damage-over-time applications.
pub const DOT_INTERVAL_TICKS: u64 = 30;

/// Age at which a projectile is removed without impacting.
pub const PROJECTILE_MAX_LIFETIME_TICKS: u64 = 300;
