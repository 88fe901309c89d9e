use proptest::prelude::*;
use rampart_core::{
    AbilityActivation, Event, Fixed, FixedVec2, HeroDefinitionId, HeroDeployment, HeroId,
    HeroState, InputAction, InputEvent, Loadout, Outcome, Relic, SimConfig, SkillId, TurretId,
    PROJECTILE_MAX_LIFETIME_TICKS,
};
use rampart_engine::{
    verify_run, InputSchedule, RunRecord, Simulation, VerificationError, VerificationLimits,
};
use rampart_world::{query, CanonicalHash};

fn scripted_events() -> Vec<InputEvent> {
    vec![
        InputEvent {
            tick: 0,
            action: InputAction::SelectRelic {
                relic: Relic::Whetstone {
                    damage_bonus: Fixed::from_ratio(1, 4),
                },
            },
        },
        InputEvent {
            tick: 0,
            action: InputAction::DeployHero {
                deployment: HeroDeployment {
                    definition: HeroDefinitionId::new(1),
                    tier: 2,
                    level: 3,
                    position: FixedVec2::from_ints(10, 6),
                    loadout: Loadout::default(),
                },
            },
        },
        InputEvent {
            tick: 45,
            action: InputAction::MoveHero {
                hero: HeroId::new(1),
                to: FixedVec2::from_ints(14, 8),
            },
        },
        InputEvent {
            tick: 90,
            action: InputAction::ActivateAbility {
                ability: AbilityActivation::TurretOvercharge {
                    turret: TurretId::new(0),
                },
            },
        },
        InputEvent {
            tick: 120,
            action: InputAction::ActivateAbility {
                ability: AbilityActivation::HeroSkill {
                    hero: HeroId::new(1),
                    skill: SkillId::new(1),
                },
            },
        },
        InputEvent {
            tick: 150,
            action: InputAction::FocusTarget { enemy: None },
        },
    ]
}

/// Runs a script and records the canonical hash after every tick.
fn replay(seed: u64, events: &[InputEvent], ticks: u64) -> (Vec<CanonicalHash>, Vec<Event>) {
    let mut simulation = Simulation::start(seed, SimConfig::demo()).expect("valid config");
    let mut schedule = InputSchedule::new(events);
    let mut hashes = Vec::new();
    let mut log = Vec::new();
    for tick in 0..ticks {
        let report = simulation.step(schedule.due(tick));
        log.extend(report.events);
        hashes.push(simulation.finalize().canonical_hash);
    }
    (hashes, log)
}

#[test]
fn deterministic_replay_produces_identical_hashes_every_tick() {
    let events = scripted_events();
    let (first, first_log) = replay(99, &events, 240);
    let (second, second_log) = replay(99, &events, 240);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first_log, second_log);
    assert!(first_log
        .iter()
        .any(|event| matches!(event, Event::HeroDeployed { .. })));
    assert!(first_log
        .iter()
        .any(|event| matches!(event, Event::TurretOvercharged { .. })));

    let (other_seed, _) = replay(100, &events, 240);
    assert_ne!(first.last(), other_seed.last());
}

#[test]
fn lone_hero_meets_the_first_wave() {
    let run = || {
        let mut simulation = Simulation::start(12_345, SimConfig::demo()).expect("valid config");
        let mut engaged = false;
        for _ in 0..200 {
            let report = simulation.step(&[]);
            engaged |= report.events.iter().any(|event| {
                matches!(
                    event,
                    Event::HeroStateChanged {
                        from: HeroState::Idle,
                        to: HeroState::Combat,
                        ..
                    }
                )
            });
        }
        let world = simulation.state();
        let spawned = query::stats(world).enemies_spawned;
        let position = query::hero(world, HeroId::new(0))
            .expect("hero deployed")
            .body
            .position;
        (spawned, position, engaged, simulation.finalize())
    };

    let (spawned, position, engaged, summary) = run();
    assert!(spawned >= 1);
    assert!(engaged, "hero never entered combat");
    assert_eq!(summary.tick, 200);

    let (again_spawned, again_position, _, again_summary) = run();
    assert_eq!(spawned, again_spawned);
    assert_eq!(position, again_position);
    assert_eq!(summary.canonical_hash, again_summary.canonical_hash);
}

#[test]
fn verification_accepts_honest_runs_and_rejects_tampered_ones() {
    let events = scripted_events();
    let (hashes, _) = replay(7, &events, 150);
    let honest = *hashes.last().expect("ticks simulated");
    let limits = VerificationLimits {
        ticks: 150,
        max_ticks: 1_000,
    };

    let summary =
        verify_run(7, SimConfig::demo(), &events, limits, honest).expect("honest run verifies");
    assert_eq!(summary.tick, 150);
    assert_eq!(summary.canonical_hash, honest);

    let forged: CanonicalHash = "00".repeat(32).parse().expect("valid hex");
    assert_eq!(
        verify_run(7, SimConfig::demo(), &events, limits, forged),
        Err(VerificationError::HashMismatch {
            expected: forged,
            actual: honest,
        })
    );

    let greedy = VerificationLimits {
        ticks: 5_000,
        max_ticks: 1_000,
    };
    assert_eq!(
        verify_run(7, SimConfig::demo(), &events, greedy, honest),
        Err(VerificationError::TickBudgetExceeded {
            requested: 5_000,
            max: 1_000,
        })
    );

    let mut broken = SimConfig::demo();
    broken.fortress.max_health = Fixed::ZERO;
    assert!(matches!(
        verify_run(7, broken, &events, limits, honest),
        Err(VerificationError::Config(_))
    ));
}

#[test]
fn recorded_inputs_survive_serialization() {
    let events = scripted_events();
    let bytes = bincode::serialize(&events).expect("encode");
    let decoded: Vec<InputEvent> = bincode::deserialize(&bytes).expect("decode");
    assert_eq!(decoded, events);

    let record = RunRecord {
        seed: 7,
        config: SimConfig::demo(),
        events,
    };
    let json = serde_json::to_string(&record).expect("serialize record");
    let loaded: RunRecord = serde_json::from_str(&json).expect("parse record");
    let (original, _) = replay(record.seed, &record.events, 60);
    let (reloaded, _) = replay(loaded.seed, &loaded.events, 60);
    assert_eq!(original, reloaded);
    assert_eq!(loaded.config, record.config);
}

#[test]
fn projectiles_expire_after_the_fortress_falls() {
    let mut config = SimConfig::demo();
    config.heroes.clear();
    config.fortress.max_health = Fixed::ONE;
    let mut simulation = Simulation::start(21, config).expect("valid config");

    let check_ages = |simulation: &Simulation| {
        let world = simulation.state();
        let tick = query::tick(world);
        for projectile in query::projectiles(world) {
            assert!(
                tick - projectile.spawn_tick <= PROJECTILE_MAX_LIFETIME_TICKS,
                "projectile {:?} outlived its lifetime at tick {tick}",
                projectile.id
            );
        }
    };

    let mut steps = 0;
    while query::outcome(simulation.state()).is_none() {
        assert!(steps < 3_000, "fortress never fell");
        let _ = simulation.step(&[]);
        check_ages(&simulation);
        steps += 1;
    }
    assert_eq!(query::outcome(simulation.state()), Some(Outcome::Defeat));

    for _ in 0..=PROJECTILE_MAX_LIFETIME_TICKS {
        let _ = simulation.step(&[]);
        check_ages(&simulation);
    }
    assert!(query::projectiles(simulation.state()).is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn health_and_positions_stay_bounded(seed in any::<u64>()) {
        let mut simulation = Simulation::start(seed, SimConfig::demo()).expect("valid config");
        let field = SimConfig::demo().field;
        for _ in 0..150 {
            let _ = simulation.step(&[]);
            let world = simulation.state();
            for hero in query::heroes(world) {
                prop_assert!(hero.health.current() >= Fixed::ZERO);
                prop_assert!(hero.health.current() <= hero.health.max());
                prop_assert!(field.contains(hero.body.position));
            }
            for enemy in query::enemies(world) {
                prop_assert!(!enemy.health.is_dead());
                prop_assert!(enemy.health.current() <= enemy.health.max());
                prop_assert!(field.contains(enemy.body.position));
            }
            let fortress = query::fortress(world).health;
            prop_assert!(fortress.current() <= fortress.max());
        }
    }
}
