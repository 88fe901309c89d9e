//! Content definitions consumed generically by the engine.
//!
//! Stat tables are supplied by the driver through the run configuration. The
//! engine never hard-codes balance numbers for a specific hero or turret.

use serde::{Deserialize, Serialize};

use crate::{
    effect::EffectSpec,
    fixed::{Fixed, FixedVec2},
    ids::{EnemyDefinitionId, HeroDefinitionId, SkillId, TurretDefinitionId},
};

/// Tactical role steering a hero's target heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroRole {
    /// Holds the line: prefers the enemy closest to the fortress.
    Guardian,
    /// Secures kills: prefers the enemy with the least current health.
    Striker,
    /// Spreads control: prefers enemies that are not yet hard-controlled.
    Controller,
}

/// How a hero delivers basic attacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum AttackStyle {
    /// Damage resolves immediately on the target.
    Melee,
    /// Damage travels in a homing projectile.
    Ranged {
        /// Distance travelled per tick.
        projectile_speed: Fixed,
    },
}

/// Passive conditional feeding the damage pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "trait", rename_all = "snake_case")]
pub enum PassiveTrait {
    /// Bonus damage while the attacker is at or below a health ratio.
    LastStand {
        /// Health ratio at or below which the bonus applies.
        health_ratio: Fixed,
        /// Additive bonus applied as `1 + bonus`.
        bonus: Fixed,
    },
    /// Bonus damage against targets carrying any status effect.
    Opportunist {
        /// Additive bonus applied as `1 + bonus`.
        bonus: Fixed,
    },
    /// Hits against weakened targets deal their full remaining health.
    Executioner {
        /// Health ratio threshold against normal enemies.
        normal: Fixed,
        /// Health ratio threshold against elite enemies.
        elite: Fixed,
        /// Health ratio threshold against bosses.
        boss: Fixed,
    },
    /// Heals the attacker by a fraction of the damage dealt.
    Lifesteal {
        /// Fraction of dealt damage restored.
        fraction: Fixed,
    },
}

/// Intrinsic weakness of a hero definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "weakness", rename_all = "snake_case")]
pub enum Weakness {
    /// Reduced damage against a specific enemy kind.
    Frail {
        /// Enemy kind the penalty applies to.
        against: EnemyKind,
        /// Fraction removed, applied as `1 - penalty`.
        penalty: Fixed,
    },
    /// Occasionally ignores the role heuristic and picks a random eligible target.
    Erratic {
        /// Probability in basis points per selection.
        chance_bps: u32,
    },
}

/// Activation rule of a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "activation", rename_all = "snake_case")]
pub enum SkillActivation {
    /// Always active; the effects ride on every basic attack.
    Passive,
    /// Cast on demand and then locked for a cooldown.
    Active {
        /// Base cooldown in ticks.
        cooldown_ticks: u32,
    },
}

/// Recipients of an active skill's effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillTargeting {
    /// The caster's current target.
    CurrentTarget,
    /// Every enemy within the caster's attack range.
    EnemiesInRange,
    /// The caster itself.
    Caster,
    /// Every deployed hero.
    Allies,
}

/// Entry of a hero's skill catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillDefinition {
    /// Key of the skill within the catalog.
    pub id: SkillId,
    /// Minimum hero level required to use the skill.
    pub unlock_level: u32,
    /// Activation rule.
    pub activation: SkillActivation,
    /// Recipients of the effects.
    pub targeting: SkillTargeting,
    /// Effects applied in order.
    pub effects: Vec<EffectSpec>,
}

impl SkillDefinition {
    /// Reports whether a hero of `level` may use the skill.
    #[must_use]
    pub const fn is_unlocked(&self, level: u32) -> bool {
        level >= self.unlock_level
    }

    /// Reports whether the skill is passive.
    #[must_use]
    pub const fn is_passive(&self) -> bool {
        matches!(self.activation, SkillActivation::Passive)
    }
}

/// Stats and behaviour of a hero archetype.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeroDefinition {
    /// Key of the definition.
    pub id: HeroDefinitionId,
    /// Tactical role.
    pub role: HeroRole,
    /// Health at tier 1, level 1.
    pub max_health: Fixed,
    /// Basic attack damage at tier 1, level 1.
    pub damage: Fixed,
    /// Attack speed multiplier at tier 1, level 1.
    pub attack_speed: Fixed,
    /// Ticks between basic attacks at an attack speed of one.
    pub attack_interval_ticks: u32,
    /// Basic attack range.
    pub attack_range: Fixed,
    /// Maximum movement speed per tick.
    pub move_speed: Fixed,
    /// Collision radius.
    pub radius: Fixed,
    /// Ticks after deployment before the hero may engage.
    pub deploy_cooldown_ticks: u32,
    /// Basic attack delivery.
    pub style: AttackStyle,
    /// Passive damage conditionals.
    #[serde(default)]
    pub passives: Vec<PassiveTrait>,
    /// Intrinsic weaknesses.
    #[serde(default)]
    pub weaknesses: Vec<Weakness>,
    /// Skill catalog.
    #[serde(default)]
    pub skills: Vec<SkillDefinition>,
}

impl HeroDefinition {
    /// Looks up a skill from the catalog.
    #[must_use]
    pub fn skill(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.skills.iter().find(|skill| skill.id == id)
    }
}

/// Turret balance table authored in the Q14 scale (`16_384 == 1.0`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurretStatTable {
    /// Damage per shot.
    pub damage_q14: i32,
    /// Attack speed multiplier.
    pub attack_speed_q14: i32,
    /// Targeting range.
    pub range_q14: i32,
    /// Projectile distance per tick.
    pub projectile_speed_q14: i32,
}

impl TurretStatTable {
    /// Damage per shot in the canonical scale.
    #[must_use]
    pub const fn damage(&self) -> Fixed {
        Fixed::from_q14(self.damage_q14)
    }

    /// Attack speed multiplier in the canonical scale.
    #[must_use]
    pub const fn attack_speed(&self) -> Fixed {
        Fixed::from_q14(self.attack_speed_q14)
    }

    /// Targeting range in the canonical scale.
    #[must_use]
    pub const fn range(&self) -> Fixed {
        Fixed::from_q14(self.range_q14)
    }

    /// Projectile speed in the canonical scale.
    #[must_use]
    pub const fn projectile_speed(&self) -> Fixed {
        Fixed::from_q14(self.projectile_speed_q14)
    }
}

/// Policy a turret uses when acquiring a new target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetingMode {
    /// Enemy nearest to the fortress line.
    ClosestToObjective,
    /// Enemy with the least current health.
    Weakest,
    /// Enemy with the most current health.
    Strongest,
    /// Enemy nearest to the turret.
    NearestToSelf,
    /// Enemy with the highest current speed.
    Fastest,
}

/// Stats of a turret archetype.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurretDefinition {
    /// Key of the definition.
    pub id: TurretDefinitionId,
    /// Balance table in the Q14 scale.
    pub stats: TurretStatTable,
    /// Ticks between shots at an attack speed of one.
    pub attack_interval_ticks: u32,
    /// Targeting mode assigned on construction.
    pub default_mode: TargetingMode,
    /// Effects applied by every projectile.
    #[serde(default)]
    pub on_hit: Vec<EffectSpec>,
}

/// Threat class of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Regular enemy.
    Normal,
    /// Sturdier enemy.
    Elite,
    /// Wave leader.
    Boss,
}

/// Stats of an enemy archetype.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyDefinition {
    /// Key of the definition.
    pub id: EnemyDefinitionId,
    /// Threat class.
    pub kind: EnemyKind,
    /// Health before wave scaling.
    pub max_health: Fixed,
    /// Movement speed per tick.
    pub speed: Fixed,
    /// Collision radius.
    pub radius: Fixed,
    /// Damage dealt to the fortress per attack.
    pub contact_damage: Fixed,
    /// Ticks between attacks on the fortress.
    pub attack_interval_ticks: u32,
    /// Material drop probability in basis points.
    pub drop_chance_bps: u32,
    /// Relative weight when the wave director picks a definition.
    pub spawn_weight: u32,
}

/// Sorted lookup tables for every definition referenced by a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TablesDocument")]
pub struct ContentTables {
    heroes: Vec<HeroDefinition>,
    turrets: Vec<TurretDefinition>,
    enemies: Vec<EnemyDefinition>,
}

impl ContentTables {
    /// Builds the tables, sorting each one by identifier.
    #[must_use]
    pub fn new(
        mut heroes: Vec<HeroDefinition>,
        mut turrets: Vec<TurretDefinition>,
        mut enemies: Vec<EnemyDefinition>,
    ) -> Self {
        heroes.sort_by_key(|definition| definition.id);
        turrets.sort_by_key(|definition| definition.id);
        enemies.sort_by_key(|definition| definition.id);
        Self {
            heroes,
            turrets,
            enemies,
        }
    }

    /// Looks up a hero definition.
    #[must_use]
    pub fn hero(&self, id: HeroDefinitionId) -> Option<&HeroDefinition> {
        self.heroes
            .binary_search_by_key(&id, |definition| definition.id)
            .ok()
            .map(|index| &self.heroes[index])
    }

    /// Looks up a turret definition.
    #[must_use]
    pub fn turret(&self, id: TurretDefinitionId) -> Option<&TurretDefinition> {
        self.turrets
            .binary_search_by_key(&id, |definition| definition.id)
            .ok()
            .map(|index| &self.turrets[index])
    }

    /// Looks up an enemy definition.
    #[must_use]
    pub fn enemy(&self, id: EnemyDefinitionId) -> Option<&EnemyDefinition> {
        self.enemies
            .binary_search_by_key(&id, |definition| definition.id)
            .ok()
            .map(|index| &self.enemies[index])
    }

    /// Enemy definitions in identifier order.
    #[must_use]
    pub fn enemies(&self) -> &[EnemyDefinition] {
        &self.enemies
    }

    /// Hero definitions in identifier order.
    #[must_use]
    pub fn heroes(&self) -> &[HeroDefinition] {
        &self.heroes
    }

    /// Turret definitions in identifier order.
    #[must_use]
    pub fn turrets(&self) -> &[TurretDefinition] {
        &self.turrets
    }
}

#[derive(Deserialize)]
struct TablesDocument {
    #[serde(default)]
    heroes: Vec<HeroDefinition>,
    #[serde(default)]
    turrets: Vec<TurretDefinition>,
    #[serde(default)]
    enemies: Vec<EnemyDefinition>,
}

impl From<TablesDocument> for ContentTables {
    fn from(document: TablesDocument) -> Self {
        Self::new(document.heroes, document.turrets, document.enemies)
    }
}

/// Placement of a hero in the starting roster or a deploy command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeroDeployment {
    /// Definition to instantiate.
    pub definition: HeroDefinitionId,
    /// Power tier, `1..=MAX_TIER`.
    pub tier: u8,
    /// Experience level, at least one.
    pub level: u32,
    /// Deployment position, also the hero's anchor.
    pub position: FixedVec2,
    /// Equipment bonuses.
    #[serde(default)]
    pub loadout: crate::entity::Loadout,
}

/// Placement of a turret in the starting roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurretPlacement {
    /// Definition to instantiate.
    pub definition: TurretDefinitionId,
    /// Power tier, `1..=MAX_TIER`.
    pub tier: u8,
    /// Upgrade level, at least one.
    pub level: u32,
    /// Mounting position.
    pub position: FixedVec2,
    /// Targeting mode override; the definition default applies when absent.
    #[serde(default)]
    pub mode: Option<TargetingMode>,
}
