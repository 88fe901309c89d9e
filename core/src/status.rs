//! Status effects attached to enemies.

use serde::{Deserialize, Serialize};

use crate::fixed::Fixed;

/// Closed set of status effect kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusKind {
    /// Reduces movement speed by its strength.
    Slow,
    /// Damage over time.
    Burn,
    /// Damage over time.
    Poison,
    /// Hard crowd control that zeroes movement speed.
    Freeze,
    /// Hard crowd control that zeroes movement speed.
    Stun,
}

impl StatusKind {
    /// Reports whether the effect deals periodic damage.
    #[must_use]
    pub const fn is_damage_over_time(self) -> bool {
        matches!(self, Self::Burn | Self::Poison)
    }

    /// Reports whether the effect fully halts movement.
    #[must_use]
    pub const fn is_hard_control(self) -> bool {
        matches!(self, Self::Freeze | Self::Stun)
    }

    /// Stable discriminant used by canonical hashing.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Slow => 0,
            Self::Burn => 1,
            Self::Poison => 2,
            Self::Freeze => 3,
            Self::Stun => 4,
        }
    }
}

/// Single active status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Kind of the effect.
    pub kind: StatusKind,
    /// Ticks left before the effect expires.
    pub remaining_ticks: u32,
    /// Slow fraction, or damage per interval for damage over time.
    pub strength: Fixed,
    /// Tick at which the effect was first applied.
    pub applied_tick: u64,
}

impl StatusEffect {
    /// Creates a new effect record.
    #[must_use]
    pub const fn new(
        kind: StatusKind,
        remaining_ticks: u32,
        strength: Fixed,
        applied_tick: u64,
    ) -> Self {
        Self {
            kind,
            remaining_ticks,
            strength,
            applied_tick,
        }
    }
}

/// Active status effects of a single enemy, at most one per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusEffects {
    active: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Creates an empty effect list.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: Vec::new() }
    }

    /// Applies an effect, refreshing an existing one of the same kind.
    ///
    /// A refresh replaces the remaining duration, keeps the larger of the two
    /// strengths and preserves the original `applied_tick`. Effects with a
    /// zero duration are ignored.
    pub fn apply(&mut self, effect: StatusEffect) {
        if effect.remaining_ticks == 0 {
            return;
        }

        if let Some(existing) = self.active.iter_mut().find(|active| active.kind == effect.kind) {
            existing.remaining_ticks = effect.remaining_ticks;
            existing.strength = existing.strength.max(effect.strength);
            return;
        }

        self.active.push(effect);
    }

    /// Returns the active effect of the provided kind.
    #[must_use]
    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.active.iter().find(|active| active.kind == kind)
    }

    /// Reports whether an effect of the provided kind is active.
    #[must_use]
    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    /// Reports whether freeze or stun is active.
    #[must_use]
    pub fn has_hard_control(&self) -> bool {
        self.active.iter().any(|active| active.kind.is_hard_control())
    }

    /// Reports whether no effect is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Number of active effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Iterator over the active effects in application order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.active.iter()
    }

    /// Mutable iterator over the active effects in application order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StatusEffect> {
        self.active.iter_mut()
    }

    /// Rebuilds the list keeping only effects with ticks remaining.
    ///
    /// Returns the number of effects that expired.
    pub fn prune_expired(&mut self) -> usize {
        let before = self.active.len();
        self.active = self
            .active
            .iter()
            .copied()
            .filter(|active| active.remaining_ticks > 0)
            .collect();
        before - self.active.len()
    }

    /// Multiplier applied to an enemy's base speed.
    ///
    /// Hard control zeroes speed outright. Otherwise every active slow
    /// multiplies in `1 - strength`, floored at zero.
    #[must_use]
    pub fn speed_multiplier(&self) -> Fixed {
        if self.has_hard_control() {
            return Fixed::ZERO;
        }

        self.active
            .iter()
            .filter(|active| active.kind == StatusKind::Slow)
            .fold(Fixed::ONE, |multiplier, slow| {
                multiplier * slow.strength.one_minus().max(Fixed::ZERO)
            })
    }
}
