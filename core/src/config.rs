//! Static run configuration and its validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    content::{
        AttackStyle, ContentTables, EnemyDefinition, EnemyKind, HeroDefinition, HeroDeployment,
        HeroRole, PassiveTrait, SkillActivation, SkillDefinition, SkillTargeting, TargetingMode,
        TurretDefinition, TurretPlacement, TurretStatTable, Weakness,
    },
    effect::EffectSpec,
    entity::{BuffStat, FortressClass, Loadout},
    fixed::{Fixed, FixedVec2, Q14_ONE},
    ids::{EnemyDefinitionId, HeroDefinitionId, SkillId, TurretDefinitionId},
};

/// Largest accepted field extent along either axis.
///
/// Squared distances across the whole field must stay representable in
/// Q16.16, which caps the extent well below `sqrt(i16::MAX)`.
pub const MAX_FIELD_EXTENT: i32 = 120;

/// Highest power tier an entity may have.
pub const MAX_TIER: u8 = 3;

/// Complete static description of a run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimConfig {
    /// Field dimensions.
    pub field: FieldConfig,
    /// Fortress setup.
    pub fortress: FortressConfig,
    /// Definitions referenced by the roster and the wave director.
    pub content: ContentTables,
    /// Heroes deployed before the first tick.
    #[serde(default)]
    pub heroes: Vec<HeroDeployment>,
    /// Turrets mounted before the first tick.
    #[serde(default)]
    pub turrets: Vec<TurretPlacement>,
    /// Combat tuning.
    #[serde(default)]
    pub combat: CombatRules,
    /// Movement tuning.
    #[serde(default)]
    pub physics: PhysicsRules,
    /// Wave director tuning.
    #[serde(default)]
    pub waves: WaveConfig,
}

/// Rectangular playing field anchored at the origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Horizontal extent.
    pub width: Fixed,
    /// Vertical extent.
    pub height: Fixed,
}

impl FieldConfig {
    /// Reports whether the point lies inside the field, borders included.
    #[must_use]
    pub fn contains(&self, point: FixedVec2) -> bool {
        point.x >= Fixed::ZERO
            && point.y >= Fixed::ZERO
            && point.x <= self.width
            && point.y <= self.height
    }

    /// Clamps a point into the field.
    #[must_use]
    pub fn clamp(&self, point: FixedVec2) -> FixedVec2 {
        FixedVec2::new(
            point.x.clamp(Fixed::ZERO, self.width),
            point.y.clamp(Fixed::ZERO, self.height),
        )
    }
}

/// Fortress setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FortressConfig {
    /// Archetype.
    pub class: FortressClass,
    /// Starting and maximum health.
    pub max_health: Fixed,
    /// Horizontal coordinate of the defended line.
    pub line_x: Fixed,
}

/// Combat tuning shared by every attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// Upper clamp for effective attack speed.
    pub max_attack_speed: Fixed,
    /// Lower bound for the interval between attacks.
    pub min_attack_interval_ticks: u32,
    /// Bonus per tier above the first, applied as `1 + step * (tier - 1)`.
    pub tier_step: Fixed,
    /// Bonus per level above the first, applied as `1 + step * (level - 1)`.
    pub level_step: Fixed,
    /// Attack speed bonus for heroes sharing a role with another hero.
    pub synergy_attack_speed: Fixed,
    /// Attack speed multiplier while a turret is overcharged.
    pub overcharge_attack_speed: Fixed,
    /// Damage multiplier while a turret is overcharged.
    pub overcharge_damage: Fixed,
    /// Duration of a turret overcharge.
    pub overcharge_duration_ticks: u32,
    /// Ticks between overcharge activations.
    pub overcharge_cooldown_ticks: u32,
    /// Upper clamp for the total cooldown reduction.
    pub max_cooldown_reduction: Fixed,
    /// Number of relics a run may select.
    pub max_relics: u32,
    /// Distance beyond touching at which enemies land attacks.
    pub enemy_reach: Fixed,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            max_attack_speed: Fixed::from_int(4),
            min_attack_interval_ticks: 3,
            tier_step: Fixed::from_ratio(1, 4),
            level_step: Fixed::from_ratio(1, 16),
            synergy_attack_speed: Fixed::from_ratio(1, 10),
            overcharge_attack_speed: Fixed::from_ratio(3, 2),
            overcharge_damage: Fixed::from_int(2),
            overcharge_duration_ticks: 150,
            overcharge_cooldown_ticks: 900,
            max_cooldown_reduction: Fixed::from_ratio(3, 5),
            max_relics: 3,
            enemy_reach: Fixed::HALF,
        }
    }
}

impl CombatRules {
    /// Scales a base stat by tier and level.
    #[must_use]
    pub fn scale(&self, base: Fixed, tier: u8, level: u32) -> Fixed {
        let tier_steps = i32::from(tier.saturating_sub(1));
        let level_steps = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
        base * self.tier_step.mul_int(tier_steps).one_plus()
            * self.level_step.mul_int(level_steps).one_plus()
    }

    /// Converts an attack speed multiplier into whole ticks between attacks.
    ///
    /// The speed is clamped to `max_attack_speed` and the interval never
    /// drops below `min_attack_interval_ticks`.
    #[must_use]
    pub fn attack_interval(&self, base_interval_ticks: u32, attack_speed: Fixed) -> u32 {
        let speed = attack_speed.min(self.max_attack_speed);
        let base = Fixed::from_int(i32::try_from(base_interval_ticks).unwrap_or(i32::MAX));
        let interval = if speed.is_positive() {
            (base / speed).to_ticks()
        } else {
            u32::MAX
        };
        interval.max(self.min_attack_interval_ticks).max(1)
    }
}

/// Movement tuning shared by every body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsRules {
    /// Velocity multiplier applied every tick.
    pub friction: Fixed,
    /// Largest steering change applied to a velocity in one tick.
    pub max_acceleration: Fixed,
    /// Distance inside which arrival steering slows down linearly.
    pub slowing_radius: Fixed,
    /// Distance at which a goal counts as reached.
    pub arrival_tolerance: Fixed,
    /// Gap beyond touching inside which bodies push each other apart.
    pub separation_margin: Fixed,
    /// Distance crowded bodies are pushed apart per tick.
    pub separation_strength: Fixed,
}

impl Default for PhysicsRules {
    fn default() -> Self {
        Self {
            friction: Fixed::from_ratio(9, 10),
            max_acceleration: Fixed::from_ratio(1, 20),
            slowing_radius: Fixed::from_int(2),
            arrival_tolerance: Fixed::from_ratio(1, 4),
            separation_margin: Fixed::from_ratio(1, 2),
            separation_strength: Fixed::from_ratio(1, 50),
        }
    }
}

/// Wave director tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Whether the director spawns enemies at all.
    pub enabled: bool,
    /// Tick on which the first wave starts.
    pub first_wave_tick: u64,
    /// Ticks between wave starts.
    pub wave_interval_ticks: u64,
    /// Ticks between spawns inside a wave.
    pub spawn_interval_ticks: u32,
    /// Enemies in the first wave.
    pub base_enemies: u32,
    /// Additional enemies per subsequent wave.
    pub enemies_per_wave: u32,
    /// Health bonus per wave after the first, applied as `1 + growth * (wave - 1)`.
    pub health_growth: Fixed,
    /// Number of evenly spaced lanes.
    pub lanes: u32,
    /// Every n-th wave ends with a boss; zero disables bosses.
    pub boss_every: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            first_wave_tick: 30,
            wave_interval_ticks: 450,
            spawn_interval_ticks: 20,
            base_enemies: 4,
            enemies_per_wave: 2,
            health_growth: Fixed::from_ratio(3, 20),
            lanes: 3,
            boss_every: 5,
        }
    }
}

impl WaveConfig {
    /// Number of enemies in the provided wave, counting from one.
    #[must_use]
    pub const fn enemies_in_wave(&self, wave: u32) -> u32 {
        self.base_enemies
            .saturating_add(self.enemies_per_wave.saturating_mul(wave.saturating_sub(1)))
    }

    /// Reports whether the provided wave ends with a boss.
    #[must_use]
    pub const fn is_boss_wave(&self, wave: u32) -> bool {
        self.boss_every != 0 && wave != 0 && wave % self.boss_every == 0
    }

    /// Health multiplier applied to enemies of the provided wave.
    #[must_use]
    pub fn health_multiplier(&self, wave: u32) -> Fixed {
        let steps = i32::try_from(wave.saturating_sub(1)).unwrap_or(i32::MAX);
        self.health_growth.mul_int(steps).one_plus()
    }
}

/// Reasons a configuration cannot start a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Field extents must be positive and at most [`MAX_FIELD_EXTENT`].
    #[error("field of {width} x {height} is outside the supported extent")]
    InvalidField {
        /// Configured width.
        width: Fixed,
        /// Configured height.
        height: Fixed,
    },
    /// Fortress health must be positive.
    #[error("fortress health must be positive")]
    FortressHealth,
    /// The defended line must lie inside the field.
    #[error("fortress line at x = {line_x} lies outside the field")]
    FortressLine {
        /// Configured line.
        line_x: Fixed,
    },
    /// A definition identifier appears twice in one table.
    #[error("duplicate {table} definition {id}")]
    DuplicateDefinition {
        /// Table containing the duplicate.
        table: &'static str,
        /// Duplicated identifier.
        id: u32,
    },
    /// A definition carries a value the engine cannot run with.
    #[error("{table} definition {id} has an invalid {field}")]
    InvalidDefinition {
        /// Table containing the definition.
        table: &'static str,
        /// Offending identifier.
        id: u32,
        /// Offending field.
        field: &'static str,
    },
    /// A hero placement references a missing definition.
    #[error("unknown hero definition {0:?}")]
    UnknownHeroDefinition(HeroDefinitionId),
    /// A turret placement references a missing definition.
    #[error("unknown turret definition {0:?}")]
    UnknownTurretDefinition(TurretDefinitionId),
    /// Tiers range over `1..=MAX_TIER`.
    #[error("tier {0} is outside the supported range")]
    InvalidTier(u8),
    /// Levels start at one.
    #[error("level must be at least one")]
    InvalidLevel,
    /// A placement lies outside the field.
    #[error("placement at ({x}, {y}) lies outside the field")]
    PlacementOutsideField {
        /// Horizontal coordinate.
        x: Fixed,
        /// Vertical coordinate.
        y: Fixed,
    },
    /// The wave director needs at least one spawnable enemy definition.
    #[error("waves are enabled but no enemy definition has a spawn weight")]
    NoSpawnableEnemies,
    /// A tuning rule carries a value the engine cannot run with.
    #[error("rule {0} is out of range")]
    InvalidRule(&'static str),
}

impl SimConfig {
    /// Checks every invariant the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_field()?;
        self.validate_content()?;
        self.validate_rules()?;

        for deployment in &self.heroes {
            self.validate_hero_deployment(deployment)?;
        }
        for placement in &self.turrets {
            if self.content.turret(placement.definition).is_none() {
                return Err(ConfigError::UnknownTurretDefinition(placement.definition));
            }
            validate_rank(placement.tier, placement.level)?;
            self.validate_point(placement.position)?;
        }

        if self.waves.enabled
            && !self
                .content
                .enemies()
                .iter()
                .any(|definition| definition.kind != EnemyKind::Boss && definition.spawn_weight > 0)
        {
            return Err(ConfigError::NoSpawnableEnemies);
        }

        Ok(())
    }

    /// Checks a hero deployment from the roster or an input event.
    pub fn validate_hero_deployment(&self, deployment: &HeroDeployment) -> Result<(), ConfigError> {
        if self.content.hero(deployment.definition).is_none() {
            return Err(ConfigError::UnknownHeroDefinition(deployment.definition));
        }
        validate_rank(deployment.tier, deployment.level)?;
        self.validate_point(deployment.position)
    }

    fn validate_point(&self, point: FixedVec2) -> Result<(), ConfigError> {
        if self.field.contains(point) {
            Ok(())
        } else {
            Err(ConfigError::PlacementOutsideField {
                x: point.x,
                y: point.y,
            })
        }
    }

    fn validate_field(&self) -> Result<(), ConfigError> {
        let limit = Fixed::from_int(MAX_FIELD_EXTENT);
        let FieldConfig { width, height } = self.field;
        if !width.is_positive() || !height.is_positive() || width > limit || height > limit {
            return Err(ConfigError::InvalidField { width, height });
        }
        if !self.fortress.max_health.is_positive() {
            return Err(ConfigError::FortressHealth);
        }
        let line_x = self.fortress.line_x;
        if line_x.is_negative() || line_x >= width {
            return Err(ConfigError::FortressLine { line_x });
        }
        Ok(())
    }

    fn validate_content(&self) -> Result<(), ConfigError> {
        let heroes = self.content.heroes();
        ensure_unique("hero", heroes.iter().map(|definition| definition.id.get()))?;
        for definition in heroes {
            let invalid = |field| ConfigError::InvalidDefinition {
                table: "hero",
                id: definition.id.get(),
                field,
            };
            if !definition.max_health.is_positive() {
                return Err(invalid("max_health"));
            }
            if !definition.radius.is_positive() {
                return Err(invalid("radius"));
            }
            if definition.attack_interval_ticks == 0 {
                return Err(invalid("attack_interval_ticks"));
            }
            if definition.move_speed.is_negative() || definition.attack_range.is_negative() {
                return Err(invalid("movement"));
            }
        }

        let turrets = self.content.turrets();
        ensure_unique("turret", turrets.iter().map(|definition| definition.id.get()))?;
        for definition in turrets {
            if definition.attack_interval_ticks == 0 || definition.stats.projectile_speed_q14 <= 0 {
                return Err(ConfigError::InvalidDefinition {
                    table: "turret",
                    id: definition.id.get(),
                    field: "cadence",
                });
            }
        }

        let enemies = self.content.enemies();
        ensure_unique("enemy", enemies.iter().map(|definition| definition.id.get()))?;
        for definition in enemies {
            let invalid = |field| ConfigError::InvalidDefinition {
                table: "enemy",
                id: definition.id.get(),
                field,
            };
            if !definition.max_health.is_positive() {
                return Err(invalid("max_health"));
            }
            if !definition.radius.is_positive() {
                return Err(invalid("radius"));
            }
            if definition.attack_interval_ticks == 0 {
                return Err(invalid("attack_interval_ticks"));
            }
        }

        Ok(())
    }

    fn validate_rules(&self) -> Result<(), ConfigError> {
        if !self.combat.max_attack_speed.is_positive() {
            return Err(ConfigError::InvalidRule("combat.max_attack_speed"));
        }
        if self.combat.min_attack_interval_ticks == 0 {
            return Err(ConfigError::InvalidRule("combat.min_attack_interval_ticks"));
        }
        if self.combat.max_cooldown_reduction.is_negative()
            || self.combat.max_cooldown_reduction >= Fixed::ONE
        {
            return Err(ConfigError::InvalidRule("combat.max_cooldown_reduction"));
        }
        if self.physics.friction.is_negative() || self.physics.friction > Fixed::ONE {
            return Err(ConfigError::InvalidRule("physics.friction"));
        }
        if !self.physics.max_acceleration.is_positive() {
            return Err(ConfigError::InvalidRule("physics.max_acceleration"));
        }
        if self.waves.enabled && (self.waves.lanes == 0 || self.waves.spawn_interval_ticks == 0) {
            return Err(ConfigError::InvalidRule("waves"));
        }
        Ok(())
    }

    /// Reference configuration used by the command-line demo and tests.
    #[must_use]
    pub fn demo() -> Self {
        let content = ContentTables::new(
            vec![demo_warden(), demo_ranger(), demo_mystic()],
            vec![demo_ballista()],
            demo_enemies(),
        );

        Self {
            field: FieldConfig {
                width: Fixed::from_int(48),
                height: Fixed::from_int(24),
            },
            fortress: FortressConfig {
                class: FortressClass::Bulwark,
                max_health: Fixed::from_int(500),
                line_x: Fixed::from_int(4),
            },
            content,
            heroes: vec![HeroDeployment {
                definition: HeroDefinitionId::new(2),
                tier: 1,
                level: 1,
                position: FixedVec2::from_ints(12, 12),
                loadout: Loadout::default(),
            }],
            turrets: vec![TurretPlacement {
                definition: TurretDefinitionId::new(1),
                tier: 1,
                level: 1,
                position: FixedVec2::from_ints(3, 12),
                mode: None,
            }],
            combat: CombatRules::default(),
            physics: PhysicsRules::default(),
            waves: WaveConfig::default(),
        }
    }
}

fn validate_rank(tier: u8, level: u32) -> Result<(), ConfigError> {
    if tier == 0 || tier > MAX_TIER {
        return Err(ConfigError::InvalidTier(tier));
    }
    if level == 0 {
        return Err(ConfigError::InvalidLevel);
    }
    Ok(())
}

fn ensure_unique(table: &'static str, ids: impl Iterator<Item = u32>) -> Result<(), ConfigError> {
    let mut previous = None;
    for id in ids {
        if previous == Some(id) {
            return Err(ConfigError::DuplicateDefinition { table, id });
        }
        previous = Some(id);
    }
    Ok(())
}

fn demo_warden() -> HeroDefinition {
    HeroDefinition {
        id: HeroDefinitionId::new(1),
        role: HeroRole::Guardian,
        max_health: Fixed::from_int(220),
        damage: Fixed::from_int(14),
        attack_speed: Fixed::ONE,
        attack_interval_ticks: 30,
        attack_range: Fixed::from_ratio(3, 2),
        move_speed: Fixed::from_ratio(1, 6),
        radius: Fixed::from_ratio(3, 5),
        deploy_cooldown_ticks: 15,
        style: AttackStyle::Melee,
        passives: vec![PassiveTrait::LastStand {
            health_ratio: Fixed::from_ratio(3, 10),
            bonus: Fixed::HALF,
        }],
        weaknesses: vec![Weakness::Frail {
            against: EnemyKind::Boss,
            penalty: Fixed::from_ratio(1, 4),
        }],
        skills: vec![SkillDefinition {
            id: SkillId::new(1),
            unlock_level: 1,
            activation: SkillActivation::Active {
                cooldown_ticks: 240,
            },
            targeting: SkillTargeting::EnemiesInRange,
            effects: vec![
                EffectSpec::Damage {
                    amount: Fixed::from_int(10),
                },
                EffectSpec::Stun { duration_ticks: 30 },
            ],
        }],
    }
}

fn demo_ranger() -> HeroDefinition {
    HeroDefinition {
        id: HeroDefinitionId::new(2),
        role: HeroRole::Striker,
        max_health: Fixed::from_int(140),
        damage: Fixed::from_int(11),
        attack_speed: Fixed::from_ratio(6, 5),
        attack_interval_ticks: 30,
        attack_range: Fixed::from_int(8),
        move_speed: Fixed::from_ratio(1, 5),
        radius: Fixed::HALF,
        deploy_cooldown_ticks: 15,
        style: AttackStyle::Ranged {
            projectile_speed: Fixed::from_ratio(3, 4),
        },
        passives: vec![
            PassiveTrait::Executioner {
                normal: Fixed::from_ratio(1, 10),
                elite: Fixed::from_ratio(1, 20),
                boss: Fixed::ZERO,
            },
            PassiveTrait::Lifesteal {
                fraction: Fixed::from_ratio(1, 10),
            },
        ],
        weaknesses: vec![Weakness::Erratic { chance_bps: 1_000 }],
        skills: vec![
            SkillDefinition {
                id: SkillId::new(1),
                unlock_level: 1,
                activation: SkillActivation::Passive,
                targeting: SkillTargeting::CurrentTarget,
                effects: vec![EffectSpec::Poison {
                    damage_per_interval: Fixed::from_int(3),
                    duration_ticks: 90,
                }],
            },
            SkillDefinition {
                id: SkillId::new(2),
                unlock_level: 3,
                activation: SkillActivation::Active {
                    cooldown_ticks: 300,
                },
                targeting: SkillTargeting::CurrentTarget,
                effects: vec![
                    EffectSpec::Damage {
                        amount: Fixed::from_int(20),
                    },
                    EffectSpec::Chain {
                        jumps: 3,
                        range: Fixed::from_int(4),
                        decay: Fixed::from_ratio(7, 10),
                    },
                ],
            },
        ],
    }
}

fn demo_mystic() -> HeroDefinition {
    HeroDefinition {
        id: HeroDefinitionId::new(3),
        role: HeroRole::Controller,
        max_health: Fixed::from_int(120),
        damage: Fixed::from_int(7),
        attack_speed: Fixed::ONE,
        attack_interval_ticks: 36,
        attack_range: Fixed::from_int(6),
        move_speed: Fixed::from_ratio(1, 6),
        radius: Fixed::HALF,
        deploy_cooldown_ticks: 15,
        style: AttackStyle::Ranged {
            projectile_speed: Fixed::from_ratio(3, 5),
        },
        passives: vec![PassiveTrait::Opportunist {
            bonus: Fixed::from_ratio(1, 4),
        }],
        weaknesses: Vec::new(),
        skills: vec![
            SkillDefinition {
                id: SkillId::new(1),
                unlock_level: 1,
                activation: SkillActivation::Passive,
                targeting: SkillTargeting::CurrentTarget,
                effects: vec![EffectSpec::Slow {
                    strength: Fixed::from_ratio(3, 10),
                    duration_ticks: 60,
                }],
            },
            SkillDefinition {
                id: SkillId::new(2),
                unlock_level: 1,
                activation: SkillActivation::Active {
                    cooldown_ticks: 360,
                },
                targeting: SkillTargeting::Allies,
                effects: vec![
                    EffectSpec::Heal {
                        amount: Fixed::from_int(25),
                    },
                    EffectSpec::Buff {
                        stat: BuffStat::AttackSpeed,
                        magnitude: Fixed::from_ratio(1, 5),
                        duration_ticks: 150,
                    },
                ],
            },
        ],
    }
}

fn demo_ballista() -> TurretDefinition {
    TurretDefinition {
        id: TurretDefinitionId::new(1),
        stats: TurretStatTable {
            damage_q14: 9 * Q14_ONE,
            attack_speed_q14: Q14_ONE,
            range_q14: 14 * Q14_ONE,
            projectile_speed_q14: Q14_ONE,
        },
        attack_interval_ticks: 45,
        default_mode: TargetingMode::ClosestToObjective,
        on_hit: vec![EffectSpec::Splash {
            radius: Fixed::from_int(2),
            fraction: Fixed::HALF,
        }],
    }
}

fn demo_enemies() -> Vec<EnemyDefinition> {
    vec![
        EnemyDefinition {
            id: EnemyDefinitionId::new(1),
            kind: EnemyKind::Normal,
            max_health: Fixed::from_int(40),
            speed: Fixed::from_ratio(1, 10),
            radius: Fixed::HALF,
            contact_damage: Fixed::from_int(4),
            attack_interval_ticks: 30,
            drop_chance_bps: 2_500,
            spawn_weight: 6,
        },
        EnemyDefinition {
            id: EnemyDefinitionId::new(2),
            kind: EnemyKind::Elite,
            max_health: Fixed::from_int(110),
            speed: Fixed::from_ratio(1, 14),
            radius: Fixed::from_ratio(7, 10),
            contact_damage: Fixed::from_int(9),
            attack_interval_ticks: 40,
            drop_chance_bps: 6_000,
            spawn_weight: 2,
        },
        EnemyDefinition {
            id: EnemyDefinitionId::new(3),
            kind: EnemyKind::Boss,
            max_health: Fixed::from_int(600),
            speed: Fixed::from_ratio(1, 20),
            radius: Fixed::ONE,
            contact_damage: Fixed::from_int(25),
            attack_interval_ticks: 45,
            drop_chance_bps: 10_000,
            spawn_weight: 0,
        },
    ]
}
