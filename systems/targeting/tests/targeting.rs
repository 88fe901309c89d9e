use rampart_core::{
    Attacker, Body, Command, EnemyDefinitionId, EnemyId, Event, Fixed, FixedVec2, HeroId, Hit,
    InputAction, InputEvent, Mover, SimConfig, TurretId, TurretState,
};
use rampart_system_targeting::Targeting;
use rampart_world::{self as world, query, World};

fn demo_world() -> World {
    World::new(21, SimConfig::demo()).expect("valid config")
}

fn spawn_at(world: &mut World, x: i32, y: i32) -> EnemyId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnEnemy {
            definition: EnemyDefinitionId::new(1),
            lane_y: Fixed::from_int(y),
            wave: 1,
            next_spawn_tick: 0,
        },
        &mut events,
    );
    let enemy = match events.as_slice() {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected events {other:?}"),
    };
    relocate(world, enemy, x, y);
    enemy
}

fn relocate(world: &mut World, enemy: EnemyId, x: i32, y: i32) {
    let radius = query::live_enemy(world, enemy)
        .expect("enemy is alive")
        .body
        .radius;
    let mut events = Vec::new();
    world::apply(
        world,
        Command::MoveBody {
            mover: Mover::Enemy(enemy),
            body: Body::at_rest(FixedVec2::from_ints(x, y), radius),
        },
        &mut events,
    );
}

fn run_targeting(world: &mut World, targeting: &mut Targeting) -> Vec<Command> {
    let mut commands = Vec::new();
    world.with_rng(|world, rng| {
        targeting.handle(
            query::heroes(world),
            query::turrets(world),
            query::enemies(world),
            query::content(world),
            rng,
            &mut commands,
        );
    });
    let mut events = Vec::new();
    for command in commands.clone() {
        world::apply(world, command, &mut events);
    }
    commands
}

#[test]
fn hero_and_turret_acquire_an_enemy_in_range() {
    let mut world = demo_world();
    let mut targeting = Targeting::new();
    let enemy = spawn_at(&mut world, 16, 12);

    let commands = run_targeting(&mut world, &mut targeting);

    let hero = HeroId::new(0);
    assert!(commands.contains(&Command::SetHeroTarget {
        hero,
        target: Some(enemy),
    }));
    assert!(commands.contains(&Command::SetTurretState {
        turret: TurretId::new(0),
        state: TurretState::Locked(enemy),
    }));
    assert_eq!(
        query::hero(&world, hero).expect("hero exists").target,
        Some(enemy)
    );

    assert!(run_targeting(&mut world, &mut targeting).is_empty());
}

#[test]
fn heroes_keep_chasing_a_target_that_leaves_range() {
    let mut world = demo_world();
    let mut targeting = Targeting::new();
    let enemy = spawn_at(&mut world, 16, 12);
    let _ = run_targeting(&mut world, &mut targeting);

    relocate(&mut world, enemy, 40, 20);
    let commands = run_targeting(&mut world, &mut targeting);

    assert!(!commands
        .iter()
        .any(|command| matches!(command, Command::SetHeroTarget { .. })));
    assert!(commands.contains(&Command::SetTurretState {
        turret: TurretId::new(0),
        state: TurretState::Searching,
    }));
}

#[test]
fn focus_on_a_fallen_enemy_is_cleared() {
    let mut world = demo_world();
    let mut targeting = Targeting::new();
    let focus = spawn_at(&mut world, 30, 4);
    let other = spawn_at(&mut world, 15, 12);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ApplyInput {
            event: InputEvent {
                tick: 0,
                action: InputAction::FocusTarget { enemy: Some(focus) },
            },
        },
        &mut events,
    );
    let _ = run_targeting(&mut world, &mut targeting);
    let hero = HeroId::new(0);
    assert_eq!(
        query::hero(&world, hero).expect("hero exists").target,
        Some(focus)
    );

    world::apply(
        &mut world,
        Command::Strike {
            attacker: Attacker::Hero(hero),
            target: focus,
            hit: Hit::plain(Fixed::from_int(1_000)),
        },
        &mut events,
    );
    let commands = run_targeting(&mut world, &mut targeting);

    assert!(commands.contains(&Command::ClearFocus { hero }));
    let state = query::hero(&world, hero).expect("hero exists");
    assert_eq!(state.focus, None);
    assert_eq!(state.target, Some(other));
}
