//! Closed set of ability and on-hit effects.

use serde::{Deserialize, Serialize};

use crate::{
    entity::BuffStat,
    fixed::Fixed,
    status::{StatusEffect, StatusKind},
};

/// Effect carried by a skill, a projectile or a basic attack.
///
/// Handlers match on this type exhaustively; adding a variant forces every
/// resolution site to decide how to treat it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectSpec {
    /// Direct damage, fed through the attacker's damage pipeline.
    Damage {
        /// Base amount before multipliers.
        amount: Fixed,
    },
    /// Movement slow.
    Slow {
        /// Fraction of speed removed.
        strength: Fixed,
        /// Duration in ticks.
        duration_ticks: u32,
    },
    /// Burning damage over time.
    Burn {
        /// Damage dealt on every damage-over-time interval.
        damage_per_interval: Fixed,
        /// Duration in ticks.
        duration_ticks: u32,
    },
    /// Poison damage over time.
    Poison {
        /// Damage dealt on every damage-over-time interval.
        damage_per_interval: Fixed,
        /// Duration in ticks.
        duration_ticks: u32,
    },
    /// Hard crowd control.
    Freeze {
        /// Duration in ticks.
        duration_ticks: u32,
    },
    /// Hard crowd control.
    Stun {
        /// Duration in ticks.
        duration_ticks: u32,
    },
    /// Secondary hits that jump to nearby enemies with decaying magnitude.
    Chain {
        /// Maximum number of additional enemies struck.
        jumps: u32,
        /// Maximum jump distance.
        range: Fixed,
        /// Multiplier applied to the damage of each successive jump.
        decay: Fixed,
    },
    /// Area damage around the struck enemy.
    Splash {
        /// Radius around the primary target.
        radius: Fixed,
        /// Fraction of the primary damage dealt to each secondary enemy.
        fraction: Fixed,
    },
    /// Restores health to friendly targets.
    Heal {
        /// Amount restored.
        amount: Fixed,
    },
    /// Temporary stat modifier on friendly targets.
    Buff {
        /// Stat adjusted by the buff.
        stat: BuffStat,
        /// Additive bonus applied as `1 + magnitude`.
        magnitude: Fixed,
        /// Duration in ticks.
        duration_ticks: u32,
    },
}

impl EffectSpec {
    /// Converts status-applying effects into a status record.
    #[must_use]
    pub const fn status(&self, tick: u64) -> Option<StatusEffect> {
        match *self {
            Self::Slow {
                strength,
                duration_ticks,
            } => Some(StatusEffect::new(StatusKind::Slow, duration_ticks, strength, tick)),
            Self::Burn {
                damage_per_interval,
                duration_ticks,
            } => Some(StatusEffect::new(
                StatusKind::Burn,
                duration_ticks,
                damage_per_interval,
                tick,
            )),
            Self::Poison {
                damage_per_interval,
                duration_ticks,
            } => Some(StatusEffect::new(
                StatusKind::Poison,
                duration_ticks,
                damage_per_interval,
                tick,
            )),
            Self::Freeze { duration_ticks } => Some(StatusEffect::new(
                StatusKind::Freeze,
                duration_ticks,
                Fixed::ONE,
                tick,
            )),
            Self::Stun { duration_ticks } => Some(StatusEffect::new(
                StatusKind::Stun,
                duration_ticks,
                Fixed::ONE,
                tick,
            )),
            Self::Damage { .. }
            | Self::Chain { .. }
            | Self::Splash { .. }
            | Self::Heal { .. }
            | Self::Buff { .. } => None,
        }
    }

    /// Reports whether the effect targets enemies rather than allies.
    #[must_use]
    pub const fn is_hostile(&self) -> bool {
        match self {
            Self::Damage { .. }
            | Self::Slow { .. }
            | Self::Burn { .. }
            | Self::Poison { .. }
            | Self::Freeze { .. }
            | Self::Stun { .. }
            | Self::Chain { .. }
            | Self::Splash { .. } => true,
            Self::Heal { .. } | Self::Buff { .. } => false,
        }
    }
}
