#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that drives hero state transitions, attacks, skills, turret
//! fire and enemy attacks.

mod damage;

use rampart_core::{
    Attacker, AttackStyle, CombatRules, Command, ContentTables, EffectSpec, Enemy, EnemyId,
    EnemyTarget, Fixed, GlobalModifiers, Hero, HeroDefinition, HeroState, Hit, PhysicsRules,
    SkillActivation, SkillDefinition, SkillTargeting, Turret, TurretState,
};

use damage::{
    hero_attack_interval, hero_damage, is_on_hit, lifesteal, passive_effects, skill_cooldown,
    turret_attack_interval, turret_damage,
};

/// Read-only slice of the world consumed by [`Combat::handle`].
#[derive(Clone, Copy, Debug)]
pub struct CombatView<'a> {
    /// Tick being simulated.
    pub tick: u64,
    /// Heroes in identifier order.
    pub heroes: &'a [Hero],
    /// Turrets in identifier order.
    pub turrets: &'a [Turret],
    /// Enemies in identifier order.
    pub enemies: &'a [Enemy],
    /// Content definitions.
    pub content: &'a ContentTables,
    /// Combat tuning.
    pub rules: &'a CombatRules,
    /// Movement tuning; its arrival tolerance ends commanded walks.
    pub physics: &'a PhysicsRules,
    /// Run-wide modifiers.
    pub modifiers: GlobalModifiers,
    /// Horizontal coordinate of the defended line.
    pub line_x: Fixed,
}

impl CombatView<'_> {
    fn live_enemy(&self, enemy: EnemyId) -> Option<&Enemy> {
        self.enemies
            .binary_search_by_key(&enemy, |entry| entry.id)
            .ok()
            .map(|index| &self.enemies[index])
            .filter(|entry| !entry.health.is_dead())
    }
}

/// Combat system that reuses a scratch buffer of skill recipients.
#[derive(Debug, Default)]
pub struct Combat {
    recipients: Vec<EnemyId>,
}

impl Combat {
    /// Creates a new combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits every combat command for the tick.
    ///
    /// Heroes resolve in identifier order: state transition, basic attack and
    /// then skills. Turrets fire next, and enemies attack last.
    pub fn handle(&mut self, view: &CombatView<'_>, out: &mut Vec<Command>) {
        for hero in view.heroes.iter().filter(|hero| !hero.health.is_dead()) {
            let Some(definition) = view.content.hero(hero.definition) else {
                continue;
            };
            let state = next_state(hero, view);
            if state != hero.state {
                tracing::trace!(
                    hero = hero.id.get(),
                    from = ?hero.state,
                    to = ?state,
                    "hero state changed"
                );
                out.push(Command::SetHeroState {
                    hero: hero.id,
                    state,
                });
            }
            if state == HeroState::Combat {
                basic_attack(hero, definition, view, out);
            }
            self.cast_skills(hero, definition, state, view, out);
        }

        for turret in view.turrets {
            fire_turret(turret, view, out);
        }

        enemy_attacks(view, out);
    }

    fn cast_skills(
        &mut self,
        hero: &Hero,
        definition: &HeroDefinition,
        state: HeroState,
        view: &CombatView<'_>,
        out: &mut Vec<Command>,
    ) {
        for skill in &definition.skills {
            let SkillActivation::Active { cooldown_ticks } = skill.activation else {
                continue;
            };
            if !skill.is_unlocked(hero.level) || hero.skill_ready_at(skill.id) > view.tick {
                continue;
            }
            let requested = hero.pending_casts.contains(&skill.id);
            if !requested && state != HeroState::Combat {
                continue;
            }

            self.collect_recipients(hero, definition, skill, view);
            let needs_enemy = matches!(
                skill.targeting,
                SkillTargeting::CurrentTarget | SkillTargeting::EnemiesInRange
            );
            if needs_enemy && self.recipients.is_empty() {
                continue;
            }

            let cooldown = skill_cooldown(cooldown_ticks, hero, view.rules, view.modifiers);
            out.push(Command::StartCooldown {
                hero: hero.id,
                skill: skill.id,
                ready_at: view.tick.saturating_add(cooldown),
            });
            tracing::trace!(hero = hero.id.get(), skill = skill.id.get(), "skill cast");

            self.strike_recipients(hero, definition, skill, view, out);
            support(hero, skill, view, out);
        }
    }

    fn collect_recipients(
        &mut self,
        hero: &Hero,
        definition: &HeroDefinition,
        skill: &SkillDefinition,
        view: &CombatView<'_>,
    ) {
        self.recipients.clear();
        match skill.targeting {
            SkillTargeting::CurrentTarget => {
                if let Some(target) = hero.target.and_then(|id| view.live_enemy(id)) {
                    self.recipients.push(target.id);
                }
            }
            SkillTargeting::EnemiesInRange => self.recipients.extend(
                view.enemies
                    .iter()
                    .filter(|enemy| {
                        !enemy.health.is_dead()
                            && in_reach(hero, definition.attack_range, enemy)
                    })
                    .map(|enemy| enemy.id),
            ),
            SkillTargeting::Caster | SkillTargeting::Allies => {}
        }
    }

    fn strike_recipients(
        &self,
        hero: &Hero,
        definition: &HeroDefinition,
        skill: &SkillDefinition,
        view: &CombatView<'_>,
        out: &mut Vec<Command>,
    ) {
        let base = skill
            .effects
            .iter()
            .fold(Fixed::ZERO, |total, effect| match *effect {
                EffectSpec::Damage { amount } => total + amount,
                _ => total,
            });
        let on_hit: Vec<EffectSpec> = skill.effects.iter().copied().filter(is_on_hit).collect();
        if !base.is_positive() && on_hit.is_empty() {
            return;
        }

        for &enemy in &self.recipients {
            let Some(target) = view.live_enemy(enemy) else {
                continue;
            };
            let damage = if base.is_positive() {
                hero_damage(base, hero, definition, target, view.rules, view.modifiers)
            } else {
                Fixed::ZERO
            };
            out.push(Command::Strike {
                attacker: Attacker::Hero(hero.id),
                target: enemy,
                hit: Hit {
                    damage,
                    effects: on_hit.clone(),
                    lifesteal: lifesteal(definition),
                    chained: false,
                },
            });
        }
    }
}

/// State after this tick's transition; at most one transition per tick.
fn next_state(hero: &Hero, view: &CombatView<'_>) -> HeroState {
    let target_live = hero
        .target
        .and_then(|target| view.live_enemy(target))
        .is_some();
    match hero.state {
        HeroState::Commanded => match hero.commanded_to {
            Some(point) => {
                let tolerance = view.physics.arrival_tolerance;
                if hero.body.position.distance_sq(point) <= tolerance * tolerance {
                    HeroState::Idle
                } else {
                    HeroState::Commanded
                }
            }
            None => HeroState::Idle,
        },
        HeroState::Idle => {
            if target_live && hero.can_engage(view.tick) {
                HeroState::Combat
            } else {
                HeroState::Idle
            }
        }
        HeroState::Combat => {
            if target_live {
                HeroState::Combat
            } else {
                HeroState::Idle
            }
        }
    }
}

fn in_reach(hero: &Hero, range: Fixed, enemy: &Enemy) -> bool {
    let reach = range + enemy.body.radius;
    enemy.body.position.distance_sq(hero.body.position) <= reach * reach
}

fn basic_attack(
    hero: &Hero,
    definition: &HeroDefinition,
    view: &CombatView<'_>,
    out: &mut Vec<Command>,
) {
    if view.tick < hero.next_attack_tick {
        return;
    }
    let Some(target) = hero.target.and_then(|target| view.live_enemy(target)) else {
        return;
    };
    if !in_reach(hero, definition.attack_range, target) {
        return;
    }

    let damage = hero_damage(
        definition.damage,
        hero,
        definition,
        target,
        view.rules,
        view.modifiers,
    );
    let hit = Hit {
        damage,
        effects: passive_effects(hero, definition),
        lifesteal: lifesteal(definition),
        chained: false,
    };
    tracing::trace!(
        hero = hero.id.get(),
        target = target.id.get(),
        damage = damage.raw(),
        "hero attack"
    );

    let attacker = Attacker::Hero(hero.id);
    match definition.style {
        AttackStyle::Melee => out.push(Command::Strike {
            attacker,
            target: target.id,
            hit,
        }),
        AttackStyle::Ranged { projectile_speed } => out.push(Command::LaunchProjectile {
            attacker,
            target: target.id,
            speed: projectile_speed,
            hit,
        }),
    }

    let synergy = view.heroes.iter().any(|other| {
        other.id != hero.id && other.role == hero.role && !other.health.is_dead()
    });
    let interval = hero_attack_interval(hero, definition, synergy, view.rules, view.modifiers);
    out.push(Command::ScheduleAttack {
        attacker,
        next_tick: view.tick.saturating_add(u64::from(interval)),
    });
}

fn support(hero: &Hero, skill: &SkillDefinition, view: &CombatView<'_>, out: &mut Vec<Command>) {
    for effect in skill.effects.iter().filter(|effect| !effect.is_hostile()) {
        match skill.targeting {
            SkillTargeting::Allies => {
                for ally in view.heroes.iter().filter(|ally| !ally.health.is_dead()) {
                    out.push(Command::Support {
                        target: ally.id,
                        effect: *effect,
                    });
                }
            }
            SkillTargeting::CurrentTarget
            | SkillTargeting::EnemiesInRange
            | SkillTargeting::Caster => out.push(Command::Support {
                target: hero.id,
                effect: *effect,
            }),
        }
    }
}

fn fire_turret(turret: &Turret, view: &CombatView<'_>, out: &mut Vec<Command>) {
    let TurretState::Locked(enemy) = turret.state else {
        return;
    };
    if view.tick < turret.next_attack_tick {
        return;
    }
    let Some(definition) = view.content.turret(turret.definition) else {
        return;
    };
    let Some(target) = view.live_enemy(enemy) else {
        return;
    };
    let range = definition.stats.range();
    if target.body.position.distance_sq(turret.position) > range * range {
        return;
    }

    let damage = turret_damage(turret, definition, view.tick, view.rules, view.modifiers);
    let attacker = Attacker::Turret(turret.id);
    tracing::trace!(
        turret = turret.id.get(),
        target = enemy.get(),
        damage = damage.raw(),
        "turret shot"
    );
    out.push(Command::LaunchProjectile {
        attacker,
        target: enemy,
        speed: definition.stats.projectile_speed(),
        hit: Hit {
            damage,
            effects: definition.on_hit.iter().copied().filter(is_on_hit).collect(),
            lifesteal: Fixed::ZERO,
            chained: false,
        },
    });

    let interval =
        turret_attack_interval(turret, definition, view.tick, view.rules, view.modifiers);
    out.push(Command::ScheduleAttack {
        attacker,
        next_tick: view.tick.saturating_add(u64::from(interval)),
    });
}

/// Enemies strike the first hero they touch, otherwise the fortress once
/// they reach the defended line. Hard-controlled enemies hold their attack.
fn enemy_attacks(view: &CombatView<'_>, out: &mut Vec<Command>) {
    let reach = view.rules.enemy_reach;
    for enemy in view.enemies.iter().filter(|enemy| !enemy.health.is_dead()) {
        if enemy.statuses.has_hard_control() || view.tick < enemy.next_attack_tick {
            continue;
        }

        let touching = view
            .heroes
            .iter()
            .filter(|hero| !hero.health.is_dead())
            .find(|hero| {
                let contact = hero.body.radius + enemy.body.radius + reach;
                hero.body.position.distance_sq(enemy.body.position) <= contact * contact
            });
        let target = match touching {
            Some(hero) => EnemyTarget::Hero(hero.id),
            None if enemy.body.position.x <= view.line_x + enemy.body.radius + reach => {
                EnemyTarget::Fortress
            }
            None => continue,
        };

        out.push(Command::EnemyAttack {
            enemy: enemy.id,
            target,
            damage: enemy.contact_damage,
            next_tick: view
                .tick
                .saturating_add(u64::from(enemy.attack_interval_ticks.max(1))),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{
        Body, EnemyDefinitionId, EnemyKind, FixedVec2, Health, HeroDefinitionId, HeroId, Loadout,
        SimConfig, SkillId, StatusEffect, StatusEffects, StatusKind,
    };

    struct Fixture {
        config: SimConfig,
        heroes: Vec<Hero>,
        enemies: Vec<Enemy>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                config: SimConfig::demo(),
                heroes: Vec::new(),
                enemies: Vec::new(),
            }
        }

        fn hero(&mut self, definition: u32, x: i32, y: i32) -> &mut Hero {
            let definition = self
                .config
                .content
                .hero(HeroDefinitionId::new(definition))
                .expect("demo hero exists");
            let id = HeroId::new(u32::try_from(self.heroes.len()).expect("few heroes"));
            self.heroes.push(Hero {
                id,
                definition: definition.id,
                role: definition.role,
                tier: 1,
                level: 1,
                body: Body::at_rest(FixedVec2::from_ints(x, y), definition.radius),
                health: Health::full(definition.max_health),
                state: HeroState::Idle,
                anchor: FixedVec2::from_ints(x, y),
                commanded_to: None,
                focus: None,
                target: None,
                engage_at: 0,
                next_attack_tick: 0,
                cooldowns: Vec::new(),
                pending_casts: Vec::new(),
                buffs: Vec::new(),
                loadout: Loadout::default(),
            });
            self.heroes.last_mut().expect("just pushed")
        }

        fn enemy(&mut self, x: i32, y: i32) -> EnemyId {
            let id = EnemyId::new(u32::try_from(self.enemies.len()).expect("few enemies"));
            self.enemies.push(Enemy {
                id,
                definition: EnemyDefinitionId::new(1),
                kind: EnemyKind::Normal,
                wave: 1,
                body: Body::at_rest(FixedVec2::from_ints(x, y), Fixed::HALF),
                health: Health::full(Fixed::from_int(40)),
                base_speed: Fixed::from_ratio(1, 10),
                speed: Fixed::from_ratio(1, 10),
                lane_y: Fixed::from_int(y),
                statuses: StatusEffects::new(),
                contact_damage: Fixed::from_int(4),
                attack_interval_ticks: 30,
                next_attack_tick: 0,
                drop_chance_bps: 0,
            });
            id
        }

        fn run(&self, tick: u64) -> Vec<Command> {
            let view = CombatView {
                tick,
                heroes: &self.heroes,
                turrets: &[],
                enemies: &self.enemies,
                content: &self.config.content,
                rules: &self.config.combat,
                physics: &self.config.physics,
                modifiers: GlobalModifiers::NONE,
                line_x: self.config.fortress.line_x,
            };
            let mut out = Vec::new();
            Combat::new().handle(&view, &mut out);
            out
        }
    }

    #[test]
    fn idle_hero_with_a_live_target_enters_combat_and_attacks() {
        let mut fixture = Fixture::new();
        let enemy = fixture.enemy(20, 12);
        fixture.hero(1, 19, 12).target = Some(enemy);

        let commands = fixture.run(0);

        assert_eq!(
            commands[0],
            Command::SetHeroState {
                hero: HeroId::new(0),
                state: HeroState::Combat,
            }
        );
        assert_eq!(
            commands[1],
            Command::Strike {
                attacker: Attacker::Hero(HeroId::new(0)),
                target: enemy,
                hit: Hit::plain(Fixed::from_int(14)),
            }
        );
        assert_eq!(
            commands[2],
            Command::ScheduleAttack {
                attacker: Attacker::Hero(HeroId::new(0)),
                next_tick: 30,
            }
        );
    }

    #[test]
    fn deployment_lockout_delays_engagement() {
        let mut fixture = Fixture::new();
        let enemy = fixture.enemy(20, 12);
        let hero = fixture.hero(1, 19, 12);
        hero.target = Some(enemy);
        hero.engage_at = 15;

        let commands = fixture.run(3);

        assert!(!commands
            .iter()
            .any(|command| matches!(command, Command::SetHeroState { .. })));
        assert!(!commands
            .iter()
            .any(|command| matches!(command, Command::Strike { .. })));
    }

    #[test]
    fn combat_ends_when_the_target_dies() {
        let mut fixture = Fixture::new();
        let enemy = fixture.enemy(20, 12);
        let _ = fixture.enemies[0].health.apply_damage(Fixed::from_int(40));
        let hero = fixture.hero(1, 19, 12);
        hero.state = HeroState::Combat;
        hero.target = Some(enemy);

        let commands = fixture.run(5);

        assert_eq!(
            commands,
            vec![Command::SetHeroState {
                hero: HeroId::new(0),
                state: HeroState::Idle,
            }]
        );
    }

    #[test]
    fn commanded_hero_idles_on_arrival() {
        let mut fixture = Fixture::new();
        let hero = fixture.hero(1, 10, 10);
        hero.state = HeroState::Commanded;
        hero.commanded_to = Some(FixedVec2::from_ints(10, 10));

        assert_eq!(
            fixture.run(1),
            vec![Command::SetHeroState {
                hero: HeroId::new(0),
                state: HeroState::Idle,
            }]
        );
    }

    #[test]
    fn ranged_heroes_launch_projectiles_with_passive_effects() {
        let mut fixture = Fixture::new();
        let enemy = fixture.enemy(16, 12);
        let hero = fixture.hero(2, 12, 12);
        hero.state = HeroState::Combat;
        hero.target = Some(enemy);
        hero.cooldowns.push(rampart_core::SkillCooldown {
            skill: SkillId::new(2),
            ready_at: 1_000,
        });

        let commands = fixture.run(0);

        match commands.as_slice() {
            [Command::LaunchProjectile {
                target,
                speed,
                hit,
                ..
            }, Command::ScheduleAttack { next_tick, .. }] => {
                assert_eq!(*target, enemy);
                assert_eq!(*speed, Fixed::from_ratio(3, 4));
                assert_eq!(hit.damage, Fixed::from_int(11));
                assert_eq!(hit.lifesteal, Fixed::from_ratio(1, 10));
                assert!(matches!(hit.effects.as_slice(), [EffectSpec::Poison { .. }]));
                assert_eq!(*next_tick, 25);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn auto_cast_sets_the_cooldown_before_striking_every_enemy_in_range() {
        let mut fixture = Fixture::new();
        let first = fixture.enemy(11, 10);
        let second = fixture.enemy(9, 10);
        let _far = fixture.enemy(30, 10);
        let hero = fixture.hero(1, 10, 10);
        hero.state = HeroState::Combat;
        hero.target = Some(first);
        hero.next_attack_tick = 50;

        let commands = fixture.run(7);

        assert_eq!(
            commands[0],
            Command::StartCooldown {
                hero: HeroId::new(0),
                skill: SkillId::new(1),
                ready_at: 247,
            }
        );
        let struck: Vec<EnemyId> = commands
            .iter()
            .filter_map(|command| match command {
                Command::Strike { target, hit, .. } => {
                    assert_eq!(hit.damage, Fixed::from_int(10));
                    assert!(matches!(hit.effects.as_slice(), [EffectSpec::Stun { .. }]));
                    Some(*target)
                }
                _ => None,
            })
            .collect();
        assert_eq!(struck, vec![first, second]);
    }

    #[test]
    fn requested_ally_skill_casts_outside_combat() {
        let mut fixture = Fixture::new();
        fixture.hero(3, 5, 5).pending_casts.push(SkillId::new(2));
        let _ = fixture.hero(1, 8, 5);

        let commands = fixture.run(2);

        assert!(matches!(
            commands[0],
            Command::StartCooldown {
                skill,
                ready_at: 362,
                ..
            } if skill == SkillId::new(2)
        ));
        let supported: Vec<HeroId> = commands
            .iter()
            .filter_map(|command| match command {
                Command::Support { target, .. } => Some(*target),
                _ => None,
            })
            .collect();
        assert_eq!(
            supported,
            vec![HeroId::new(0), HeroId::new(1), HeroId::new(0), HeroId::new(1)]
        );
    }

    #[test]
    fn skills_needing_a_target_wait_for_one() {
        let mut fixture = Fixture::new();
        fixture.hero(1, 5, 5).pending_casts.push(SkillId::new(1));

        assert!(fixture.run(0).is_empty());
    }

    #[test]
    fn enemies_attack_touching_heroes_before_the_fortress() {
        let mut fixture = Fixture::new();
        let at_line = fixture.enemy(4, 12);
        let brawler = fixture.enemy(20, 6);
        let _ = fixture.hero(1, 21, 6);
        fixture.heroes[0].next_attack_tick = 100;
        fixture.heroes[0].cooldowns.push(rampart_core::SkillCooldown {
            skill: SkillId::new(1),
            ready_at: 100,
        });

        let commands = fixture.run(0);

        assert_eq!(
            commands,
            vec![
                Command::EnemyAttack {
                    enemy: at_line,
                    target: EnemyTarget::Fortress,
                    damage: Fixed::from_int(4),
                    next_tick: 30,
                },
                Command::EnemyAttack {
                    enemy: brawler,
                    target: EnemyTarget::Hero(HeroId::new(0)),
                    damage: Fixed::from_int(4),
                    next_tick: 30,
                },
            ]
        );
    }

    #[test]
    fn stunned_enemies_hold_their_attack() {
        let mut fixture = Fixture::new();
        let _ = fixture.enemy(4, 12);
        fixture.enemies[0]
            .statuses
            .apply(StatusEffect::new(StatusKind::Stun, 30, Fixed::ONE, 0));

        assert!(fixture.run(0).is_empty());
    }
}
