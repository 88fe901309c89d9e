//! Message surface between the driver, the systems and the world.
//!
//! Drivers submit [`InputEvent`] values tagged with the tick they take effect
//! on. Systems read the world and answer with [`Command`] batches, the world
//! executes those commands through its `apply` entry point and broadcasts
//! [`Event`] values describing what changed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    content::HeroDeployment,
    effect::EffectSpec,
    entity::{Attacker, Body, HeroState, Hit, TurretState},
    fixed::{Fixed, FixedVec2},
    ids::{EnemyDefinitionId, EnemyId, HeroDefinitionId, HeroId, ProjectileId, SkillId, TurretId},
    status::{StatusEffects, StatusKind},
};

/// Player input tagged with the tick on which it takes effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputEvent {
    /// Tick on which the action applies.
    pub tick: u64,
    /// Requested action.
    pub action: InputAction,
}

/// Actions a player may take during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAction {
    /// Deploys an additional hero.
    DeployHero {
        /// Placement of the hero.
        deployment: HeroDeployment,
    },
    /// Orders a hero to walk to a point.
    MoveHero {
        /// Hero receiving the order.
        hero: HeroId,
        /// Destination inside the field.
        to: FixedVec2,
    },
    /// Sets or clears the team-wide focus target.
    FocusTarget {
        /// Enemy to focus; `None` clears the focus.
        enemy: Option<EnemyId>,
    },
    /// Adds a relic to the run.
    SelectRelic {
        /// Relic granted.
        relic: Relic,
    },
    /// Triggers an ability on demand.
    ActivateAbility {
        /// Ability to trigger.
        ability: AbilityActivation,
    },
}

/// Ability triggered by an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityActivation {
    /// Queues an active hero skill.
    HeroSkill {
        /// Caster.
        hero: HeroId,
        /// Skill from the caster's catalog.
        skill: SkillId,
    },
    /// Overcharges a turret for a limited time.
    TurretOvercharge {
        /// Turret to overcharge.
        turret: TurretId,
    },
}

/// Run-wide bonus chosen during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relic {
    /// Raises the global damage bonus.
    Whetstone {
        /// Added to the global damage bonus.
        damage_bonus: Fixed,
    },
    /// Raises the global attack speed bonus.
    WarDrums {
        /// Added to the global attack speed bonus.
        attack_speed_bonus: Fixed,
    },
    /// Raises the global cooldown reduction.
    Hourglass {
        /// Added to the global cooldown reduction.
        cooldown_reduction: Fixed,
    },
    /// Repairs the fortress once.
    Masonry {
        /// Health restored to the fortress.
        fortress_repair: Fixed,
    },
}

impl Relic {
    /// Magnitude carried by the relic.
    #[must_use]
    pub const fn magnitude(&self) -> Fixed {
        match *self {
            Self::Whetstone { damage_bonus } => damage_bonus,
            Self::WarDrums { attack_speed_bonus } => attack_speed_bonus,
            Self::Hourglass { cooldown_reduction } => cooldown_reduction,
            Self::Masonry { fortress_repair } => fortress_repair,
        }
    }
}

/// Reasons an input event is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum InputRejection {
    /// The event is tagged with a tick other than the one being simulated.
    #[error("event for tick {event_tick} delivered on tick {tick}")]
    NotDue {
        /// Tick the event was tagged with.
        event_tick: u64,
        /// Tick being simulated.
        tick: u64,
    },
    /// The run has already ended.
    #[error("the run has ended")]
    RunEnded,
    /// The deployment references a missing definition.
    #[error("unknown hero definition {0:?}")]
    UnknownDefinition(HeroDefinitionId),
    /// The deployment carries an invalid tier or level.
    #[error("invalid tier or level")]
    InvalidRank,
    /// The requested point lies outside the field.
    #[error("point lies outside the field")]
    OutsideField,
    /// No live hero carries the identifier.
    #[error("unknown hero {0:?}")]
    UnknownHero(HeroId),
    /// No live enemy carries the identifier.
    #[error("unknown enemy {0:?}")]
    UnknownEnemy(EnemyId),
    /// No turret carries the identifier.
    #[error("unknown turret {0:?}")]
    UnknownTurret(TurretId),
    /// The skill is missing, passive or still locked by level.
    #[error("skill {skill:?} is unavailable to hero {hero:?}")]
    SkillUnavailable {
        /// Caster.
        hero: HeroId,
        /// Requested skill.
        skill: SkillId,
    },
    /// The ability has not finished its cooldown.
    #[error("ability is on cooldown until tick {ready_at}")]
    OnCooldown {
        /// First tick at which the ability is usable.
        ready_at: u64,
    },
    /// Every relic slot is taken.
    #[error("relic limit reached")]
    RelicLimitReached,
    /// The relic carries a negative magnitude.
    #[error("relic magnitude must not be negative")]
    InvalidRelic,
}

/// Target of an enemy attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyTarget {
    /// A hero in reach.
    Hero(HeroId),
    /// The defended line.
    Fortress,
}

/// Entity whose body a movement command updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mover {
    /// A hero.
    Hero(HeroId),
    /// An enemy.
    Enemy(EnemyId),
}

/// Mutations the world accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Applies a player input due on the current tick.
    ApplyInput {
        /// Input to apply.
        event: InputEvent,
    },
    /// Starts the next wave.
    StartWave {
        /// Wave number, counting from one.
        wave: u32,
        /// Enemies the wave spawns.
        enemies: u32,
    },
    /// Spawns an enemy on a lane.
    SpawnEnemy {
        /// Definition to instantiate.
        definition: EnemyDefinitionId,
        /// Vertical coordinate of the lane.
        lane_y: Fixed,
        /// Wave the enemy belongs to.
        wave: u32,
        /// Tick of the next spawn inside the wave.
        next_spawn_tick: u64,
    },
    /// Replaces a hero's current target.
    SetHeroTarget {
        /// Hero to update.
        hero: HeroId,
        /// New target.
        target: Option<EnemyId>,
    },
    /// Clears a hero's focus target.
    ClearFocus {
        /// Hero to update.
        hero: HeroId,
    },
    /// Replaces a turret's targeting state.
    SetTurretState {
        /// Turret to update.
        turret: TurretId,
        /// New state.
        state: TurretState,
    },
    /// Moves a body to its integrated position.
    MoveBody {
        /// Owner of the body.
        mover: Mover,
        /// Integrated body.
        body: Body,
    },
    /// Transitions a hero's behavioural state.
    SetHeroState {
        /// Hero to update.
        hero: HeroId,
        /// New state.
        state: HeroState,
    },
    /// Records when an attacker may fire again.
    ScheduleAttack {
        /// Attacker to update.
        attacker: Attacker,
        /// First tick of the next attack.
        next_tick: u64,
    },
    /// Applies a hit to an enemy immediately.
    Strike {
        /// Entity delivering the hit.
        attacker: Attacker,
        /// Enemy struck.
        target: EnemyId,
        /// Payload.
        hit: Hit,
    },
    /// Launches a homing projectile.
    LaunchProjectile {
        /// Entity firing the projectile.
        attacker: Attacker,
        /// Enemy the projectile homes on.
        target: EnemyId,
        /// Distance travelled per tick.
        speed: Fixed,
        /// Payload applied on impact.
        hit: Hit,
    },
    /// Puts a hero skill on cooldown and consumes any pending request for it.
    StartCooldown {
        /// Caster.
        hero: HeroId,
        /// Skill used.
        skill: SkillId,
        /// First tick at which the skill may be used again.
        ready_at: u64,
    },
    /// Applies a friendly effect to a hero.
    Support {
        /// Hero receiving the effect.
        target: HeroId,
        /// Heal or buff to apply.
        effect: EffectSpec,
    },
    /// Moves a projectile along its flight path.
    AdvanceProjectile {
        /// Projectile to move.
        projectile: ProjectileId,
        /// New position.
        position: FixedVec2,
        /// Last known target position.
        target_position: FixedVec2,
    },
    /// Applies a projectile's payload and removes it.
    ImpactProjectile {
        /// Projectile that arrived.
        projectile: ProjectileId,
    },
    /// Removes a projectile without applying its payload.
    DiscardProjectile {
        /// Projectile to remove.
        projectile: ProjectileId,
        /// Why the projectile was removed.
        reason: DiscardReason,
    },
    /// Replaces an enemy's status effects and recomputed speed.
    UpdateStatuses {
        /// Enemy to update.
        enemy: EnemyId,
        /// Remaining effects.
        statuses: StatusEffects,
        /// Speed after effects.
        speed: Fixed,
    },
    /// Deals damage-over-time damage to an enemy.
    DamageOverTime {
        /// Enemy hurt.
        enemy: EnemyId,
        /// Effect dealing the damage.
        kind: StatusKind,
        /// Damage dealt.
        amount: Fixed,
    },
    /// Lands an enemy attack.
    EnemyAttack {
        /// Attacking enemy.
        enemy: EnemyId,
        /// Recipient.
        target: EnemyTarget,
        /// Damage dealt before fortress armour.
        damage: Fixed,
        /// First tick of the enemy's next attack.
        next_tick: u64,
    },
    /// Removes the dead, expires buffs and advances the tick counter.
    Cleanup,
}

/// Why a projectile left the field without impacting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscardReason {
    /// The target no longer exists.
    TargetLost,
    /// The projectile reached its maximum lifetime.
    Expired,
}

/// Source of damage dealt to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// A hero or turret attack.
    Attack(Attacker),
    /// A damage-over-time effect.
    Status(StatusKind),
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The fortress fell.
    Defeat,
}

/// Notifications broadcast by the world after executing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// An input event was dropped.
    InputRejected {
        /// Tick being simulated.
        tick: u64,
        /// Why the event was dropped.
        reason: InputRejection,
    },
    /// A hero joined the field.
    HeroDeployed {
        /// New hero.
        hero: HeroId,
        /// Definition the hero was instantiated from.
        definition: HeroDefinitionId,
    },
    /// A hero changed behavioural state.
    HeroStateChanged {
        /// Hero that transitioned.
        hero: HeroId,
        /// Previous state.
        from: HeroState,
        /// New state.
        to: HeroState,
    },
    /// A hero lost all health.
    HeroDied {
        /// Fallen hero.
        hero: HeroId,
    },
    /// A wave started.
    WaveStarted {
        /// Wave number, counting from one.
        wave: u32,
        /// Enemies the wave spawns.
        enemies: u32,
    },
    /// An enemy entered the field.
    EnemySpawned {
        /// New enemy.
        enemy: EnemyId,
        /// Definition the enemy was spawned from.
        definition: EnemyDefinitionId,
    },
    /// An enemy lost health.
    EnemyDamaged {
        /// Enemy hurt.
        enemy: EnemyId,
        /// Health actually removed.
        amount: Fixed,
        /// Origin of the damage.
        source: DamageSource,
    },
    /// A status effect was applied or refreshed.
    StatusApplied {
        /// Enemy affected.
        enemy: EnemyId,
        /// Kind of the effect.
        kind: StatusKind,
    },
    /// An enemy was removed after losing all health.
    EnemyDied {
        /// Fallen enemy.
        enemy: EnemyId,
        /// Whether the enemy dropped a material.
        dropped_material: bool,
    },
    /// A projectile was launched.
    ProjectileLaunched {
        /// New projectile.
        projectile: ProjectileId,
        /// Enemy it homes on.
        target: EnemyId,
    },
    /// A projectile reached its target.
    ProjectileImpacted {
        /// Projectile that arrived.
        projectile: ProjectileId,
        /// Enemy struck.
        target: EnemyId,
    },
    /// A projectile was removed without impacting.
    ProjectileDiscarded {
        /// Removed projectile.
        projectile: ProjectileId,
        /// Why it was removed.
        reason: DiscardReason,
    },
    /// A hero used an active skill.
    SkillCast {
        /// Caster.
        hero: HeroId,
        /// Skill used.
        skill: SkillId,
    },
    /// A hero regained health.
    HeroHealed {
        /// Hero healed.
        hero: HeroId,
        /// Health actually restored.
        amount: Fixed,
    },
    /// A hero lost health to an enemy.
    HeroDamaged {
        /// Hero hurt.
        hero: HeroId,
        /// Health actually removed.
        amount: Fixed,
    },
    /// A turret entered overcharge.
    TurretOvercharged {
        /// Turret overcharged.
        turret: TurretId,
        /// First tick at which the overcharge no longer applies.
        until: u64,
    },
    /// A relic was added to the run.
    RelicSelected {
        /// Relic added.
        relic: Relic,
    },
    /// The fortress lost health.
    FortressDamaged {
        /// Health actually removed.
        amount: Fixed,
        /// Health left.
        remaining: Fixed,
    },
    /// The run ended.
    RunEnded {
        /// Final outcome.
        outcome: Outcome,
    },
}
