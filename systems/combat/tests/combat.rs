use proptest::prelude::*;
use rampart_core::{
    ActiveBuff, Attacker, Body, BuffStat, Command, EnemyDefinitionId, EnemyId, Event, Fixed,
    FixedVec2, GlobalModifiers, Health, Hero, HeroDefinitionId, HeroId, HeroState, Loadout, Mover,
    SimConfig, StatusEffects, MAX_TIER,
};
use rampart_system_combat::{Combat, CombatView};
use rampart_world::{self as world, query, World};

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
    world::apply(
        world,
        Command::MoveBody {
            mover: Mover::Enemy(enemy),
            body: Body::at_rest(FixedVec2::from_ints(x, y), Fixed::HALF),
        },
        &mut events,
    );
    enemy
}

fn run_combat(world: &mut World, combat: &mut Combat) -> (Vec<Command>, Vec<Event>) {
    let mut commands = Vec::new();
    let config = query::config(world);
    let view = CombatView {
        tick: query::tick(world),
        heroes: query::heroes(world),
        turrets: query::turrets(world),
        enemies: query::enemies(world),
        content: query::content(world),
        rules: &config.combat,
        physics: &config.physics,
        modifiers: query::modifiers(world),
        line_x: query::fortress(world).line_x,
    };
    combat.handle(&view, &mut commands);

    let mut events = Vec::new();
    for command in commands.clone() {
        world::apply(world, command, &mut events);
    }
    (commands, events)
}

fn advance_to(world: &mut World, tick: u64) {
    let mut events = Vec::new();
    while query::tick(world) < tick {
        world::apply(world, Command::Cleanup, &mut events);
    }
}

#[test]
fn ranger_engages_once_the_deployment_lockout_ends() {
    let mut world = World::new(4, SimConfig::demo()).expect("valid config");
    let mut combat = Combat::new();
    let hero = HeroId::new(0);
    let enemy = spawn_at(&mut world, 16, 12);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetHeroTarget {
            hero,
            target: Some(enemy),
        },
        &mut events,
    );

    let (commands, _) = run_combat(&mut world, &mut combat);
    assert!(commands.is_empty());

    advance_to(&mut world, 15);
    let (commands, events) = run_combat(&mut world, &mut combat);

    assert!(commands.contains(&Command::ScheduleAttack {
        attacker: Attacker::Hero(hero),
        next_tick: 40,
    }));
    assert!(events.contains(&Event::HeroStateChanged {
        hero,
        from: HeroState::Idle,
        to: HeroState::Combat,
    }));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::ProjectileLaunched { target, .. } if *target == enemy
    )));
    assert_eq!(query::projectiles(&world).len(), 1);
    assert_eq!(
        query::hero(&world, hero).expect("hero deployed").state,
        HeroState::Combat
    );
}

#[test]
fn enemies_at_the_line_wear_down_the_fortress() {
    let mut world = World::new(4, SimConfig::demo()).expect("valid config");
    let mut combat = Combat::new();
    let _ = spawn_at(&mut world, 4, 20);

    let (_, events) = run_combat(&mut world, &mut combat);

    let dealt = events
        .iter()
        .find_map(|event| match event {
            Event::FortressDamaged { amount, .. } => Some(*amount),
            _ => None,
        })
        .expect("fortress was attacked");
    assert!(dealt.is_positive());
    assert!(dealt < Fixed::from_int(4));
    assert_eq!(
        query::fortress(&world).health.current(),
        Fixed::from_int(500) - dealt
    );

    let (_, events) = run_combat(&mut world, &mut combat);
    assert!(events.is_empty());
}

fn ranger(tier: u8, level: u32, buff: Fixed, config: &SimConfig) -> Hero {
    let definition = config
        .content
        .hero(HeroDefinitionId::new(2))
        .expect("demo ranger exists");
    Hero {
        id: HeroId::new(0),
        definition: definition.id,
        role: definition.role,
        tier,
        level,
        body: Body::at_rest(FixedVec2::from_ints(10, 10), definition.radius),
        health: Health::full(definition.max_health),
        state: HeroState::Combat,
        anchor: FixedVec2::from_ints(10, 10),
        commanded_to: None,
        focus: None,
        target: Some(EnemyId::new(0)),
        engage_at: 0,
        next_attack_tick: 0,
        cooldowns: Vec::new(),
        pending_casts: Vec::new(),
        buffs: vec![ActiveBuff {
            stat: BuffStat::AttackSpeed,
            magnitude: buff,
            expires_at: u64::MAX,
        }],
        loadout: Loadout::default(),
    }
}

fn dummy() -> rampart_core::Enemy {
    rampart_core::Enemy {
        id: EnemyId::new(0),
        definition: EnemyDefinitionId::new(1),
        kind: rampart_core::EnemyKind::Normal,
        wave: 1,
        body: Body::at_rest(FixedVec2::from_ints(13, 10), Fixed::HALF),
        health: Health::full(Fixed::from_int(1_000)),
        base_speed: Fixed::ZERO,
        speed: Fixed::ZERO,
        lane_y: Fixed::from_int(10),
        statuses: StatusEffects::new(),
        contact_damage: Fixed::ONE,
        attack_interval_ticks: 30,
        next_attack_tick: 0,
        drop_chance_bps: 0,
    }
}

proptest! {
    #[test]
    fn attack_cadence_never_drops_below_the_floor(
        tier in 1..=MAX_TIER,
        level in 1u32..200,
        buff in 0i32..10_000,
        global in 0i32..10_000,
        tick in 0u64..100_000,
    ) {
        let config = SimConfig::demo();
        let heroes = [ranger(tier, level, Fixed::from_ratio(buff, 100), &config)];
        let enemies = [dummy()];
        let view = CombatView {
            tick,
            heroes: &heroes,
            turrets: &[],
            enemies: &enemies,
            content: &config.content,
            rules: &config.combat,
            physics: &config.physics,
            modifiers: GlobalModifiers {
                attack_speed_bonus: Fixed::from_ratio(global, 100),
                ..GlobalModifiers::NONE
            },
            line_x: config.fortress.line_x,
        };
        let mut out = Vec::new();
        Combat::new().handle(&view, &mut out);

        let next = out.iter().find_map(|command| match command {
            Command::ScheduleAttack { next_tick, .. } => Some(*next_tick),
            _ => None,
        });
        let next = next.expect("ready hero attacks");
        prop_assert!(next - tick >= u64::from(config.combat.min_attack_interval_ticks));
    }
}
