//! Entity records stored by the world.
//!
//! Records are plain data. Systems read them through the world's query
//! module and change them through commands or the phase accessors the world
//! exposes to the tick loop.

use serde::{Deserialize, Serialize};

use crate::{
    content::{EnemyKind, HeroRole, TargetingMode},
    effect::EffectSpec,
    fixed::{Fixed, FixedVec2},
    ids::{
        EnemyDefinitionId, EnemyId, HeroDefinitionId, HeroId, ProjectileId, SkillId,
        TurretDefinitionId, TurretId,
    },
    status::StatusEffects,
};

/// Physical body of a moving entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Body {
    /// Centre of the body.
    pub position: FixedVec2,
    /// Displacement applied per tick.
    pub velocity: FixedVec2,
    /// Collision radius.
    pub radius: Fixed,
}

impl Body {
    /// Creates a body at rest.
    #[must_use]
    pub const fn at_rest(position: FixedVec2, radius: Fixed) -> Self {
        Self {
            position,
            velocity: FixedVec2::ZERO,
            radius,
        }
    }
}

/// Current and maximum health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Health {
    current: Fixed,
    max: Fixed,
}

impl Health {
    /// Creates a full health pool. Negative maxima are raised to zero.
    #[must_use]
    pub fn full(max: Fixed) -> Self {
        let max = max.max(Fixed::ZERO);
        Self { current: max, max }
    }

    /// Current health.
    #[must_use]
    pub const fn current(&self) -> Fixed {
        self.current
    }

    /// Maximum health.
    #[must_use]
    pub const fn max(&self) -> Fixed {
        self.max
    }

    /// Removes up to `amount` health and returns the amount actually removed.
    ///
    /// Health never drops below zero and negative amounts are ignored.
    pub fn apply_damage(&mut self, amount: Fixed) -> Fixed {
        let dealt = amount.max(Fixed::ZERO).min(self.current);
        self.current -= dealt;
        dealt
    }

    /// Restores up to `amount` health and returns the amount actually restored.
    pub fn heal(&mut self, amount: Fixed) -> Fixed {
        let restored = amount.max(Fixed::ZERO).min(self.max - self.current);
        self.current += restored;
        restored
    }

    /// Ratio of current to maximum health; zero for an empty pool.
    #[must_use]
    pub fn ratio(&self) -> Fixed {
        if !self.max.is_positive() {
            return Fixed::ZERO;
        }
        self.current / self.max
    }

    /// Reports whether the pool is exhausted.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current.raw() <= 0
    }
}

/// Stat adjusted by a temporary buff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuffStat {
    /// Outgoing damage.
    Damage,
    /// Attack speed.
    AttackSpeed,
    /// Movement speed.
    MoveSpeed,
    /// Skill cooldown reduction.
    CooldownReduction,
}

/// Temporary stat modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveBuff {
    /// Stat adjusted by the buff.
    pub stat: BuffStat,
    /// Additive bonus.
    pub magnitude: Fixed,
    /// First tick at which the buff no longer applies.
    pub expires_at: u64,
}

/// Multiplies `1 + magnitude` over every buff of the provided stat.
#[must_use]
pub fn buff_multiplier(buffs: &[ActiveBuff], stat: BuffStat) -> Fixed {
    buffs
        .iter()
        .filter(|buff| buff.stat == stat)
        .fold(Fixed::ONE, |product, buff| product * buff.magnitude.one_plus())
}

/// Sums the magnitudes of every buff of the provided stat.
#[must_use]
pub fn buff_sum(buffs: &[ActiveBuff], stat: BuffStat) -> Fixed {
    buffs
        .iter()
        .filter(|buff| buff.stat == stat)
        .fold(Fixed::ZERO, |sum, buff| sum + buff.magnitude)
}

/// Behavioural state of a hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroState {
    /// No target; the hero holds its anchor.
    Idle,
    /// Engaging a target.
    Combat,
    /// Walking to a commanded point.
    Commanded,
}

impl HeroState {
    /// Stable discriminant used by canonical hashing.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Combat => 1,
            Self::Commanded => 2,
        }
    }
}

/// Tick at which an active skill becomes usable again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillCooldown {
    /// Skill on cooldown.
    pub skill: SkillId,
    /// First tick at which the skill may be used again.
    pub ready_at: u64,
}

/// Equipment carried into a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Loadout {
    /// Bonus granted by an equipped special resource, applied as `1 + bonus`.
    pub resource_bonus: Option<Fixed>,
    /// Bonus granted by equipment, applied as `1 + bonus`.
    pub equipment_bonus: Fixed,
}

/// Deployed hero.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hero {
    /// Identity.
    pub id: HeroId,
    /// Definition the hero was instantiated from.
    pub definition: HeroDefinitionId,
    /// Tactical role copied from the definition.
    pub role: HeroRole,
    /// Power tier.
    pub tier: u8,
    /// Experience level.
    pub level: u32,
    /// Physical body.
    pub body: Body,
    /// Health pool.
    pub health: Health,
    /// Behavioural state.
    pub state: HeroState,
    /// Deployment point the hero returns to when idle.
    pub anchor: FixedVec2,
    /// Point the hero walks to while commanded.
    pub commanded_to: Option<FixedVec2>,
    /// Team-wide focus target.
    pub focus: Option<EnemyId>,
    /// Current attack target.
    pub target: Option<EnemyId>,
    /// First tick at which the hero may engage after deployment.
    pub engage_at: u64,
    /// First tick at which the next basic attack may fire.
    pub next_attack_tick: u64,
    /// Active skill cooldowns, sorted by skill.
    pub cooldowns: Vec<SkillCooldown>,
    /// Skills requested through input and not yet cast.
    pub pending_casts: Vec<SkillId>,
    /// Temporary stat modifiers.
    pub buffs: Vec<ActiveBuff>,
    /// Equipment bonuses.
    pub loadout: Loadout,
}

impl Hero {
    /// Tick at which the provided skill becomes ready; zero when never used.
    #[must_use]
    pub fn skill_ready_at(&self, skill: SkillId) -> u64 {
        self.cooldowns
            .binary_search_by_key(&skill, |cooldown| cooldown.skill)
            .map(|index| self.cooldowns[index].ready_at)
            .unwrap_or(0)
    }

    /// Records a cooldown, keeping the list sorted by skill.
    pub fn start_cooldown(&mut self, skill: SkillId, ready_at: u64) {
        match self
            .cooldowns
            .binary_search_by_key(&skill, |cooldown| cooldown.skill)
        {
            Ok(index) => self.cooldowns[index].ready_at = ready_at,
            Err(index) => self
                .cooldowns
                .insert(index, SkillCooldown { skill, ready_at }),
        }
    }

    /// Reports whether deployment lockout has elapsed.
    #[must_use]
    pub const fn can_engage(&self, tick: u64) -> bool {
        tick >= self.engage_at
    }
}

/// Turret targeting state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurretState {
    /// No remembered target.
    Searching,
    /// Remembered target kept while alive and in range.
    Locked(EnemyId),
}

impl TurretState {
    /// Remembered target, if any.
    #[must_use]
    pub const fn target(self) -> Option<EnemyId> {
        match self {
            Self::Searching => None,
            Self::Locked(enemy) => Some(enemy),
        }
    }
}

/// Fortress-mounted turret.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turret {
    /// Identity.
    pub id: TurretId,
    /// Definition the turret was built from.
    pub definition: TurretDefinitionId,
    /// Power tier.
    pub tier: u8,
    /// Upgrade level.
    pub level: u32,
    /// Mounting position.
    pub position: FixedVec2,
    /// Target acquisition policy.
    pub mode: TargetingMode,
    /// Targeting state.
    pub state: TurretState,
    /// First tick at which the next shot may fire.
    pub next_attack_tick: u64,
    /// First tick at which overcharge no longer applies.
    pub overcharge_until: u64,
    /// First tick at which overcharge may be activated again.
    pub overcharge_ready_at: u64,
}

impl Turret {
    /// Reports whether overcharge is active on the provided tick.
    #[must_use]
    pub const fn is_overcharged(&self, tick: u64) -> bool {
        tick < self.overcharge_until
    }
}

/// Hostile unit advancing on the fortress.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enemy {
    /// Identity.
    pub id: EnemyId,
    /// Definition the enemy was spawned from.
    pub definition: EnemyDefinitionId,
    /// Threat class.
    pub kind: EnemyKind,
    /// Wave that spawned the enemy.
    pub wave: u32,
    /// Physical body.
    pub body: Body,
    /// Health pool.
    pub health: Health,
    /// Movement speed before status effects.
    pub base_speed: Fixed,
    /// Movement speed after status effects.
    pub speed: Fixed,
    /// Vertical coordinate of the lane the enemy advances along.
    pub lane_y: Fixed,
    /// Active status effects.
    pub statuses: StatusEffects,
    /// Damage dealt per attack.
    pub contact_damage: Fixed,
    /// Ticks between attacks.
    pub attack_interval_ticks: u32,
    /// First tick at which the next attack may land.
    pub next_attack_tick: u64,
    /// Material drop probability in basis points.
    pub drop_chance_bps: u32,
}

/// Entity that produced an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attacker {
    /// A deployed hero.
    Hero(HeroId),
    /// A fortress turret.
    Turret(TurretId),
}

/// Resolved attack payload applied to an enemy.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hit {
    /// Final damage after the full damage pipeline.
    pub damage: Fixed,
    /// Effects applied on impact.
    pub effects: Vec<EffectSpec>,
    /// Fraction of dealt damage returned to a hero attacker as health.
    pub lifesteal: Fixed,
    /// Whether the hit is a secondary hit spawned by a chain.
    pub chained: bool,
}

impl Hit {
    /// Creates a primary hit without side effects.
    #[must_use]
    pub const fn plain(damage: Fixed) -> Self {
        Self {
            damage,
            effects: Vec::new(),
            lifesteal: Fixed::ZERO,
            chained: false,
        }
    }
}

/// Homing projectile in flight.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Projectile {
    /// Identity.
    pub id: ProjectileId,
    /// Entity that fired the projectile.
    pub source: Attacker,
    /// Enemy the projectile homes on.
    pub target: EnemyId,
    /// Current position.
    pub position: FixedVec2,
    /// Last known position of the target.
    pub target_position: FixedVec2,
    /// Distance travelled per tick.
    pub speed: Fixed,
    /// Payload applied on impact.
    pub hit: Hit,
    /// Tick the projectile was launched.
    pub spawn_tick: u64,
}

impl Projectile {
    /// Whether the payload is a chained secondary hit.
    #[must_use]
    pub const fn is_chained(&self) -> bool {
        self.hit.chained
    }
}

/// Fortress archetype selected for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FortressClass {
    /// Hardened walls that absorb part of incoming damage.
    Bulwark,
    /// Weapon racks that raise outgoing damage.
    Arsenal,
    /// Shrines that shorten skill cooldowns.
    Sanctum,
}

impl FortressClass {
    /// Global modifiers a run starts with for this class.
    #[must_use]
    pub const fn base_modifiers(self) -> GlobalModifiers {
        let mut modifiers = GlobalModifiers::NONE;
        match self {
            Self::Bulwark => modifiers.fortress_armor = Fixed::from_raw(Fixed::ONE.raw() / 5),
            Self::Arsenal => modifiers.damage_bonus = Fixed::from_raw(Fixed::ONE.raw() / 10),
            Self::Sanctum => {
                modifiers.cooldown_reduction = Fixed::from_raw(Fixed::ONE.raw() / 10);
            }
        }
        modifiers
    }

    /// Stable discriminant used by canonical hashing.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Bulwark => 0,
            Self::Arsenal => 1,
            Self::Sanctum => 2,
        }
    }
}

/// Defended structure whose destruction ends the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fortress {
    /// Archetype.
    pub class: FortressClass,
    /// Health pool.
    pub health: Health,
    /// Horizontal coordinate of the defended line.
    pub line_x: Fixed,
}

/// Run-wide modifiers accumulated from the fortress class and relics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalModifiers {
    /// Outgoing damage bonus, applied as `1 + bonus`.
    pub damage_bonus: Fixed,
    /// Attack speed bonus, applied as `1 + bonus`.
    pub attack_speed_bonus: Fixed,
    /// Skill cooldown reduction fraction.
    pub cooldown_reduction: Fixed,
    /// Fraction of incoming damage the fortress ignores.
    pub fortress_armor: Fixed,
}

impl GlobalModifiers {
    /// Modifiers that change nothing.
    pub const NONE: Self = Self {
        damage_bonus: Fixed::ZERO,
        attack_speed_bonus: Fixed::ZERO,
        cooldown_reduction: Fixed::ZERO,
        fortress_armor: Fixed::ZERO,
    };
}

/// Progress of the wave director.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaveProgress {
    /// Current wave, zero before the first wave starts.
    pub wave: u32,
    /// Enemies of the current wave not yet spawned.
    pub remaining: u32,
    /// Tick of the next spawn inside the current wave.
    pub next_spawn_tick: u64,
    /// Earliest tick at which the next wave may start.
    pub next_wave_tick: u64,
}
