use rampart_core::{
    Attacker, Command, DamageSource, EffectSpec, EnemyDefinitionId, EnemyId, Event, Fixed, Hit,
    SimConfig, StatusKind, TurretId,
};
use rampart_system_status_effects::StatusEffectsSystem;
use rampart_world::{self as world, query, World};

fn spawn(world: &mut World) -> EnemyId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnEnemy {
            definition: EnemyDefinitionId::new(2),
            lane_y: Fixed::from_int(12),
            wave: 1,
            next_spawn_tick: 0,
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected events {other:?}"),
    }
}

fn tick(world: &mut World, system: &mut StatusEffectsSystem, events: &mut Vec<Event>) {
    let mut commands = Vec::new();
    system.handle(query::tick(world), query::enemies(world), &mut commands);
    for command in commands {
        world::apply(world, command, events);
    }
    world::apply(world, Command::Cleanup, events);
}

#[test]
fn burn_deals_damage_once_per_interval_until_it_expires() {
    let mut world = World::new(1, SimConfig::demo()).expect("valid config");
    let mut system = StatusEffectsSystem::new();
    let enemy = spawn(&mut world);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Strike {
            attacker: Attacker::Turret(TurretId::new(0)),
            target: enemy,
            hit: Hit {
                effects: vec![EffectSpec::Burn {
                    damage_per_interval: Fixed::from_int(5),
                    duration_ticks: 65,
                }],
                ..Hit::plain(Fixed::ZERO)
            },
        },
        &mut events,
    );

    events.clear();
    for _ in 0..120 {
        tick(&mut world, &mut system, &mut events);
    }

    let burns = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::EnemyDamaged {
                    source: DamageSource::Status(StatusKind::Burn),
                    ..
                }
            )
        })
        .count();
    assert_eq!(burns, 2);

    let survivor = query::live_enemy(&world, enemy).expect("enemy survives");
    assert!(survivor.statuses.is_empty());
    assert_eq!(
        survivor.health.current(),
        survivor.health.max() - Fixed::from_int(10)
    );
}
