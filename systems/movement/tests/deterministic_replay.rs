use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use proptest::prelude::*;
use rampart_core::{Body, Command, EnemyDefinitionId, Fixed, SimConfig};
use rampart_system_movement::Movement;
use rampart_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_bodies() {
    let first = replay(&[3, 9, 9, 17, 12]);
    let second = replay(&[3, 9, 9, 17, 12]);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(fingerprint(&first), fingerprint(&second));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn crowded_lanes_stay_inside_the_field(lanes in proptest::collection::vec(0i32..=24, 1..8)) {
        let bodies = replay(&lanes);
        let field = SimConfig::demo().field;
        for body in bodies {
            prop_assert!(field.contains(body.position));
        }
    }
}

fn replay(lanes: &[i32]) -> Vec<Body> {
    let mut world = World::new(77, SimConfig::demo()).expect("valid config");
    let mut movement = Movement::new();
    let mut events = Vec::new();

    for (spawn_tick, lane) in lanes.iter().enumerate() {
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                definition: EnemyDefinitionId::new(1),
                lane_y: Fixed::from_int(*lane),
                wave: 1,
                next_spawn_tick: spawn_tick as u64,
            },
            &mut events,
        );

        for _ in 0..20 {
            let config = query::config(&world);
            let mut commands = Vec::new();
            movement.handle(
                query::heroes(&world),
                query::enemies(&world),
                &config.content,
                &config.physics,
                config.field,
                query::fortress(&world).line_x,
                &mut commands,
            );
            for command in commands {
                world::apply(&mut world, command, &mut events);
            }
            world::apply(&mut world, Command::Cleanup, &mut events);
        }
    }

    query::heroes(&world)
        .iter()
        .map(|hero| hero.body)
        .chain(query::enemies(&world).iter().map(|enemy| enemy.body))
        .collect()
}

fn fingerprint(bodies: &[Body]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bodies.hash(&mut hasher);
    hasher.finish()
}
