#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Rampart combat engine.
//!
//! The world owns every entity, the id counters and the run's random stream.
//! It changes only through [`apply`], which executes one [`Command`] and
//! reports what happened as [`Event`] values. Systems observe it through the
//! read-only [`query`] module.

mod cleanup;
pub mod hash;
mod hits;
mod inputs;

use rampart_core::{
    ActiveBuff, Attacker, Body, Command, ConfigError, ContentTables, DamageSource, EffectSpec,
    Enemy, EnemyDefinitionId, EnemyId, EnemyTarget, Event, Fixed, FixedVec2, Fortress,
    GlobalModifiers, Health, Hero, HeroDeployment, HeroId, HeroState, IdCounter, Mover, Outcome,
    Projectile, ProjectileId, Relic, SimConfig, SimRng, StatusEffects, Turret, TurretId,
    TurretState, WaveProgress,
};
use serde::{Deserialize, Serialize};

pub use hash::{canonical_hash, CanonicalHash, ParseHashError};

/// Aggregate counters reported at the end of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunStats {
    /// Waves started.
    pub waves_started: u32,
    /// Enemies spawned.
    pub enemies_spawned: u32,
    /// Enemies killed.
    pub enemies_killed: u32,
    /// Heroes deployed, roster included.
    pub heroes_deployed: u32,
    /// Heroes lost.
    pub heroes_lost: u32,
    /// Total damage dealt to enemies.
    pub damage_dealt: Fixed,
    /// Total damage taken by the fortress.
    pub fortress_damage_taken: Fixed,
    /// Materials dropped by fallen enemies.
    pub materials_dropped: u32,
    /// Projectiles launched.
    pub projectiles_fired: u32,
    /// Active skills cast.
    pub skills_cast: u32,
    /// Input events dropped.
    pub inputs_rejected: u32,
}

/// Represents the authoritative simulation state.
#[derive(Clone, Debug)]
pub struct World {
    config: SimConfig,
    tick: u64,
    rng: SimRng,
    fortress: Fortress,
    modifiers: GlobalModifiers,
    relics: Vec<Relic>,
    heroes: Vec<Hero>,
    turrets: Vec<Turret>,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    hero_ids: IdCounter,
    enemy_ids: IdCounter,
    projectile_ids: IdCounter,
    waves: WaveProgress,
    stats: RunStats,
    outcome: Option<Outcome>,
}

impl World {
    /// Builds the initial state of a run after validating its configuration.
    pub fn new(seed: u64, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let fortress = Fortress {
            class: config.fortress.class,
            health: Health::full(config.fortress.max_health),
            line_x: config.fortress.line_x,
        };
        let mut world = Self {
            tick: 0,
            rng: SimRng::new(seed),
            fortress,
            modifiers: fortress.class.base_modifiers(),
            relics: Vec::new(),
            heroes: Vec::new(),
            turrets: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            hero_ids: IdCounter::default(),
            enemy_ids: IdCounter::default(),
            projectile_ids: IdCounter::default(),
            waves: WaveProgress {
                next_wave_tick: config.waves.first_wave_tick,
                ..WaveProgress::default()
            },
            stats: RunStats::default(),
            outcome: None,
            config,
        };

        let roster = world.config.heroes.clone();
        for deployment in &roster {
            let _ = world.deploy_hero(deployment);
        }

        let mut turret_ids = IdCounter::default();
        let placements = world.config.turrets.clone();
        for placement in placements {
            let Some(definition) = world.config.content.turret(placement.definition) else {
                continue;
            };
            world.turrets.push(Turret {
                id: TurretId::new(turret_ids.allocate()),
                definition: placement.definition,
                tier: placement.tier,
                level: placement.level,
                position: placement.position,
                mode: placement.mode.unwrap_or(definition.default_mode),
                state: TurretState::Searching,
                next_attack_tick: 0,
                overcharge_until: 0,
                overcharge_ready_at: 0,
            });
        }

        Ok(world)
    }

    /// Runs `f` with shared access to the world and exclusive access to its
    /// random stream.
    ///
    /// Systems that draw random numbers receive the stream this way, so every
    /// draw advances the cursor stored in the world.
    pub fn with_rng<R>(&mut self, f: impl FnOnce(&Self, &mut SimRng) -> R) -> R {
        let mut rng = std::mem::replace(&mut self.rng, SimRng::from_state(0));
        let result = f(self, &mut rng);
        self.rng = rng;
        result
    }

    fn content(&self) -> &ContentTables {
        &self.config.content
    }

    fn hero_index(&self, hero: HeroId) -> Option<usize> {
        self.heroes.binary_search_by_key(&hero, |entry| entry.id).ok()
    }

    fn turret_index(&self, turret: TurretId) -> Option<usize> {
        self.turrets
            .binary_search_by_key(&turret, |entry| entry.id)
            .ok()
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies.binary_search_by_key(&enemy, |entry| entry.id).ok()
    }

    fn projectile_index(&self, projectile: ProjectileId) -> Option<usize> {
        self.projectiles
            .binary_search_by_key(&projectile, |entry| entry.id)
            .ok()
    }

    fn live_enemy(&self, enemy: EnemyId) -> Option<&Enemy> {
        self.enemy_index(enemy)
            .map(|index| &self.enemies[index])
            .filter(|entry| !entry.health.is_dead())
    }

    /// Instantiates a validated deployment.
    fn deploy_hero(&mut self, deployment: &HeroDeployment) -> Option<HeroId> {
        let definition = self.content().hero(deployment.definition)?;
        let role = definition.role;
        let radius = definition.radius;
        let max_health =
            self.config
                .combat
                .scale(definition.max_health, deployment.tier, deployment.level);
        let engage_at = self
            .tick
            .saturating_add(u64::from(definition.deploy_cooldown_ticks));
        let id = HeroId::new(self.hero_ids.allocate());
        let hero = Hero {
            id,
            definition: deployment.definition,
            role,
            tier: deployment.tier,
            level: deployment.level,
            body: Body::at_rest(deployment.position, radius),
            health: Health::full(max_health),
            state: HeroState::Idle,
            anchor: deployment.position,
            commanded_to: None,
            focus: None,
            target: None,
            engage_at,
            next_attack_tick: engage_at,
            cooldowns: Vec::new(),
            pending_casts: Vec::new(),
            buffs: Vec::new(),
            loadout: deployment.loadout,
        };
        self.heroes.push(hero);
        self.stats.heroes_deployed = self.stats.heroes_deployed.saturating_add(1);
        Some(id)
    }

    fn spawn_enemy(
        &mut self,
        definition: EnemyDefinitionId,
        lane_y: Fixed,
        wave: u32,
    ) -> Option<EnemyId> {
        let definition = self.content().enemy(definition)?.clone();
        let max_health = definition.max_health * self.config.waves.health_multiplier(wave);
        let field = self.config.field;
        let position = field.clamp(FixedVec2::new(field.width, lane_y));
        let id = EnemyId::new(self.enemy_ids.allocate());
        let enemy = Enemy {
            id,
            definition: definition.id,
            kind: definition.kind,
            wave,
            body: Body::at_rest(position, definition.radius),
            health: Health::full(max_health),
            base_speed: definition.speed,
            speed: definition.speed,
            lane_y: position.y,
            statuses: StatusEffects::new(),
            contact_damage: definition.contact_damage,
            attack_interval_ticks: definition.attack_interval_ticks,
            next_attack_tick: self.tick,
            drop_chance_bps: definition.drop_chance_bps,
        };
        self.enemies.push(enemy);
        self.stats.enemies_spawned = self.stats.enemies_spawned.saturating_add(1);
        Some(id)
    }

    fn set_hero_state(&mut self, hero: HeroId, state: HeroState, out_events: &mut Vec<Event>) {
        let Some(index) = self.hero_index(hero) else {
            return;
        };
        let entry = &mut self.heroes[index];
        if state != HeroState::Commanded {
            entry.commanded_to = None;
        }
        if entry.state == state {
            return;
        }
        let from = entry.state;
        entry.state = state;
        out_events.push(Event::HeroStateChanged {
            hero,
            from,
            to: state,
        });
    }

    fn attacker_position(&self, attacker: Attacker) -> Option<FixedVec2> {
        match attacker {
            Attacker::Hero(hero) => self
                .hero_index(hero)
                .map(|index| self.heroes[index].body.position),
            Attacker::Turret(turret) => self
                .turret_index(turret)
                .map(|index| self.turrets[index].position),
        }
    }

    fn damage_fortress(&mut self, damage: Fixed, out_events: &mut Vec<Event>) {
        let mitigated = damage * self.modifiers.fortress_armor.one_minus().max(Fixed::ZERO);
        let dealt = self.fortress.health.apply_damage(mitigated);
        self.stats.fortress_damage_taken += dealt;
        out_events.push(Event::FortressDamaged {
            amount: dealt,
            remaining: self.fortress.health.current(),
        });
        if self.fortress.health.is_dead() && self.outcome.is_none() {
            self.outcome = Some(Outcome::Defeat);
            out_events.push(Event::RunEnded {
                outcome: Outcome::Defeat,
            });
        }
    }

    fn support(&mut self, target: HeroId, effect: EffectSpec, out_events: &mut Vec<Event>) {
        let tick = self.tick;
        let Some(index) = self.hero_index(target) else {
            return;
        };
        let hero = &mut self.heroes[index];
        if hero.health.is_dead() {
            return;
        }
        match effect {
            EffectSpec::Heal { amount } => {
                let restored = hero.health.heal(amount);
                if restored.is_positive() {
                    out_events.push(Event::HeroHealed {
                        hero: target,
                        amount: restored,
                    });
                }
            }
            EffectSpec::Buff {
                stat,
                magnitude,
                duration_ticks,
            } => {
                let expires_at = tick.saturating_add(u64::from(duration_ticks));
                if let Some(existing) = hero.buffs.iter_mut().find(|buff| buff.stat == stat) {
                    existing.magnitude = existing.magnitude.max(magnitude);
                    existing.expires_at = expires_at;
                } else {
                    hero.buffs.push(ActiveBuff {
                        stat,
                        magnitude,
                        expires_at,
                    });
                }
            }
            EffectSpec::Damage { .. }
            | EffectSpec::Slow { .. }
            | EffectSpec::Burn { .. }
            | EffectSpec::Poison { .. }
            | EffectSpec::Freeze { .. }
            | EffectSpec::Stun { .. }
            | EffectSpec::Chain { .. }
            | EffectSpec::Splash { .. } => {}
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ApplyInput { event } => inputs::apply_input(world, event, out_events),
        Command::StartWave { wave, enemies } => {
            world.waves.wave = wave;
            world.waves.remaining = enemies;
            world.waves.next_spawn_tick = world.tick;
            world.waves.next_wave_tick = world
                .tick
                .saturating_add(world.config.waves.wave_interval_ticks);
            world.stats.waves_started = world.stats.waves_started.saturating_add(1);
            out_events.push(Event::WaveStarted { wave, enemies });
        }
        Command::SpawnEnemy {
            definition,
            lane_y,
            wave,
            next_spawn_tick,
        } => {
            world.waves.remaining = world.waves.remaining.saturating_sub(1);
            world.waves.next_spawn_tick = next_spawn_tick;
            if let Some(enemy) = world.spawn_enemy(definition, lane_y, wave) {
                out_events.push(Event::EnemySpawned { enemy, definition });
            }
        }
        Command::SetHeroTarget { hero, target } => {
            if let Some(index) = world.hero_index(hero) {
                world.heroes[index].target = target;
            }
        }
        Command::ClearFocus { hero } => {
            if let Some(index) = world.hero_index(hero) {
                world.heroes[index].focus = None;
            }
        }
        Command::SetTurretState { turret, state } => {
            if let Some(index) = world.turret_index(turret) {
                world.turrets[index].state = state;
            }
        }
        Command::MoveBody { mover, body } => {
            let field = world.config.field;
            let body = Body {
                position: field.clamp(body.position),
                ..body
            };
            match mover {
                Mover::Hero(hero) => {
                    if let Some(index) = world.hero_index(hero) {
                        world.heroes[index].body = body;
                    }
                }
                Mover::Enemy(enemy) => {
                    if let Some(index) = world.enemy_index(enemy) {
                        world.enemies[index].body = body;
                    }
                }
            }
        }
        Command::SetHeroState { hero, state } => world.set_hero_state(hero, state, out_events),
        Command::ScheduleAttack {
            attacker,
            next_tick,
        } => match attacker {
            Attacker::Hero(hero) => {
                if let Some(index) = world.hero_index(hero) {
                    world.heroes[index].next_attack_tick = next_tick;
                }
            }
            Attacker::Turret(turret) => {
                if let Some(index) = world.turret_index(turret) {
                    world.turrets[index].next_attack_tick = next_tick;
                }
            }
        },
        Command::Strike {
            attacker,
            target,
            hit,
        } => hits::strike(world, attacker, target, &hit, out_events),
        Command::LaunchProjectile {
            attacker,
            target,
            speed,
            hit,
        } => {
            let Some(origin) = world.attacker_position(attacker) else {
                return;
            };
            let Some(target_position) = world.live_enemy(target).map(|enemy| enemy.body.position)
            else {
                return;
            };
            let projectile = ProjectileId::new(world.projectile_ids.allocate());
            world.projectiles.push(Projectile {
                id: projectile,
                source: attacker,
                target,
                position: origin,
                target_position,
                speed,
                hit,
                spawn_tick: world.tick,
            });
            world.stats.projectiles_fired = world.stats.projectiles_fired.saturating_add(1);
            out_events.push(Event::ProjectileLaunched { projectile, target });
        }
        Command::StartCooldown {
            hero,
            skill,
            ready_at,
        } => {
            if let Some(index) = world.hero_index(hero) {
                let entry = &mut world.heroes[index];
                entry.start_cooldown(skill, ready_at);
                entry.pending_casts.retain(|pending| *pending != skill);
                world.stats.skills_cast = world.stats.skills_cast.saturating_add(1);
                out_events.push(Event::SkillCast { hero, skill });
            }
        }
        Command::Support { target, effect } => world.support(target, effect, out_events),
        Command::AdvanceProjectile {
            projectile,
            position,
            target_position,
        } => {
            if let Some(index) = world.projectile_index(projectile) {
                let entry = &mut world.projectiles[index];
                entry.position = position;
                entry.target_position = target_position;
            }
        }
        Command::ImpactProjectile { projectile } => hits::impact(world, projectile, out_events),
        Command::DiscardProjectile { projectile, reason } => {
            let before = world.projectiles.len();
            world.projectiles.retain(|entry| entry.id != projectile);
            if world.projectiles.len() != before {
                out_events.push(Event::ProjectileDiscarded { projectile, reason });
            }
        }
        Command::UpdateStatuses {
            enemy,
            statuses,
            speed,
        } => {
            if let Some(index) = world.enemy_index(enemy) {
                let entry = &mut world.enemies[index];
                entry.statuses = statuses;
                entry.speed = speed;
            }
        }
        Command::DamageOverTime {
            enemy,
            kind,
            amount,
        } => {
            if let Some(index) = world.enemy_index(enemy) {
                let _ = hits::damage_enemy(
                    world,
                    index,
                    amount,
                    DamageSource::Status(kind),
                    out_events,
                );
            }
        }
        Command::EnemyAttack {
            enemy,
            target,
            damage,
            next_tick,
        } => {
            let Some(index) = world.enemy_index(enemy) else {
                return;
            };
            if world.enemies[index].health.is_dead() {
                return;
            }
            world.enemies[index].next_attack_tick = next_tick;
            match target {
                EnemyTarget::Hero(hero) => {
                    if let Some(index) = world.hero_index(hero) {
                        let dealt = world.heroes[index].health.apply_damage(damage);
                        out_events.push(Event::HeroDamaged {
                            hero,
                            amount: dealt,
                        });
                    }
                }
                EnemyTarget::Fortress => world.damage_fortress(damage, out_events),
            }
        }
        Command::Cleanup => cleanup::run(world, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use rampart_core::{
        ContentTables, Enemy, EnemyId, FieldConfig, Fortress, GlobalModifiers, Hero, HeroId,
        Outcome, Projectile, Relic, SimConfig, Turret, WaveProgress,
    };
    use serde::Serialize;

    use super::{RunStats, World};

    /// Tick currently being simulated.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Cursor of the run's random stream.
    #[must_use]
    pub fn rng_state(world: &World) -> u32 {
        world.rng.state()
    }

    /// Configuration the run was started with.
    #[must_use]
    pub fn config(world: &World) -> &SimConfig {
        &world.config
    }

    /// Content definitions referenced by the run.
    #[must_use]
    pub fn content(world: &World) -> &ContentTables {
        &world.config.content
    }

    /// Field dimensions.
    #[must_use]
    pub fn field(world: &World) -> FieldConfig {
        world.config.field
    }

    /// Fortress state.
    #[must_use]
    pub fn fortress(world: &World) -> &Fortress {
        &world.fortress
    }

    /// Run-wide modifiers.
    #[must_use]
    pub fn modifiers(world: &World) -> GlobalModifiers {
        world.modifiers
    }

    /// Relics selected so far.
    #[must_use]
    pub fn relics(world: &World) -> &[Relic] {
        &world.relics
    }

    /// Wave director progress.
    #[must_use]
    pub fn waves(world: &World) -> WaveProgress {
        world.waves
    }

    /// Heroes in identifier order.
    #[must_use]
    pub fn heroes(world: &World) -> &[Hero] {
        &world.heroes
    }

    /// Looks up a hero.
    #[must_use]
    pub fn hero(world: &World, hero: HeroId) -> Option<&Hero> {
        world.hero_index(hero).map(|index| &world.heroes[index])
    }

    /// Turrets in identifier order.
    #[must_use]
    pub fn turrets(world: &World) -> &[Turret] {
        &world.turrets
    }

    /// Enemies in identifier order, including those killed this tick.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        &world.enemies
    }

    /// Looks up an enemy that still has health.
    #[must_use]
    pub fn live_enemy(world: &World, enemy: EnemyId) -> Option<&Enemy> {
        world.live_enemy(enemy)
    }

    /// Projectiles in identifier order.
    #[must_use]
    pub fn projectiles(world: &World) -> &[Projectile] {
        &world.projectiles
    }

    /// Aggregate counters.
    #[must_use]
    pub fn stats(world: &World) -> RunStats {
        world.stats
    }

    /// Outcome of the run, once decided.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.outcome
    }

    /// Captures a serializable copy of the dynamic simulation state.
    #[must_use]
    pub fn snapshot(world: &World) -> SimulationSnapshot {
        SimulationSnapshot {
            tick: world.tick,
            rng_state: world.rng.state(),
            fortress: world.fortress,
            modifiers: world.modifiers,
            relics: world.relics.clone(),
            waves: world.waves,
            heroes: world.heroes.clone(),
            turrets: world.turrets.clone(),
            enemies: world.enemies.clone(),
            projectiles: world.projectiles.clone(),
            stats: world.stats,
            outcome: world.outcome,
        }
    }

    /// Serializable copy of the dynamic simulation state.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize)]
    pub struct SimulationSnapshot {
        /// Tick currently being simulated.
        pub tick: u64,
        /// Cursor of the random stream.
        pub rng_state: u32,
        /// Fortress state.
        pub fortress: Fortress,
        /// Run-wide modifiers.
        pub modifiers: GlobalModifiers,
        /// Relics selected so far.
        pub relics: Vec<Relic>,
        /// Wave director progress.
        pub waves: WaveProgress,
        /// Heroes in identifier order.
        pub heroes: Vec<Hero>,
        /// Turrets in identifier order.
        pub turrets: Vec<Turret>,
        /// Enemies in identifier order.
        pub enemies: Vec<Enemy>,
        /// Projectiles in identifier order.
        pub projectiles: Vec<Projectile>,
        /// Aggregate counters.
        pub stats: RunStats,
        /// Outcome of the run, once decided.
        pub outcome: Option<Outcome>,
    }
}
