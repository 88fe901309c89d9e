//! Validation and application of player input events.

use rampart_core::{
    AbilityActivation, ConfigError, Event, HeroDeployment, HeroId, HeroState, InputAction,
    InputEvent, InputRejection, Relic, SkillId, TurretId,
};

use crate::World;

/// Applies an input event or reports why it was dropped.
pub(crate) fn apply_input(world: &mut World, event: InputEvent, out_events: &mut Vec<Event>) {
    let tick = world.tick;
    if let Err(reason) = try_apply(world, event, out_events) {
        world.stats.inputs_rejected = world.stats.inputs_rejected.saturating_add(1);
        out_events.push(Event::InputRejected { tick, reason });
    }
}

fn try_apply(
    world: &mut World,
    event: InputEvent,
    out_events: &mut Vec<Event>,
) -> Result<(), InputRejection> {
    if event.tick != world.tick {
        return Err(InputRejection::NotDue {
            event_tick: event.tick,
            tick: world.tick,
        });
    }
    if world.outcome.is_some() {
        return Err(InputRejection::RunEnded);
    }

    match event.action {
        InputAction::DeployHero { deployment } => deploy(world, &deployment, out_events),
        InputAction::MoveHero { hero, to } => {
            let index = world
                .hero_index(hero)
                .ok_or(InputRejection::UnknownHero(hero))?;
            if !world.config.field.contains(to) {
                return Err(InputRejection::OutsideField);
            }
            world.heroes[index].commanded_to = Some(to);
            world.set_hero_state(hero, HeroState::Commanded, out_events);
            Ok(())
        }
        InputAction::FocusTarget { enemy } => {
            if let Some(enemy) = enemy {
                if world.live_enemy(enemy).is_none() {
                    return Err(InputRejection::UnknownEnemy(enemy));
                }
            }
            for hero in &mut world.heroes {
                hero.focus = enemy;
            }
            Ok(())
        }
        InputAction::SelectRelic { relic } => select_relic(world, relic, out_events),
        InputAction::ActivateAbility { ability } => match ability {
            AbilityActivation::HeroSkill { hero, skill } => queue_skill(world, hero, skill),
            AbilityActivation::TurretOvercharge { turret } => {
                overcharge(world, turret, out_events)
            }
        },
    }
}

fn deploy(
    world: &mut World,
    deployment: &HeroDeployment,
    out_events: &mut Vec<Event>,
) -> Result<(), InputRejection> {
    world
        .config
        .validate_hero_deployment(deployment)
        .map_err(|error| match error {
            ConfigError::UnknownHeroDefinition(definition) => {
                InputRejection::UnknownDefinition(definition)
            }
            ConfigError::PlacementOutsideField { .. } => InputRejection::OutsideField,
            _ => InputRejection::InvalidRank,
        })?;

    let hero = world
        .deploy_hero(deployment)
        .ok_or(InputRejection::UnknownDefinition(deployment.definition))?;
    out_events.push(Event::HeroDeployed {
        hero,
        definition: deployment.definition,
    });
    Ok(())
}

fn select_relic(
    world: &mut World,
    relic: Relic,
    out_events: &mut Vec<Event>,
) -> Result<(), InputRejection> {
    let limit = usize::try_from(world.config.combat.max_relics).unwrap_or(usize::MAX);
    if world.relics.len() >= limit {
        return Err(InputRejection::RelicLimitReached);
    }
    if relic.magnitude().is_negative() {
        return Err(InputRejection::InvalidRelic);
    }

    let modifiers = &mut world.modifiers;
    match relic {
        Relic::Whetstone { damage_bonus } => modifiers.damage_bonus += damage_bonus,
        Relic::WarDrums { attack_speed_bonus } => {
            modifiers.attack_speed_bonus += attack_speed_bonus;
        }
        Relic::Hourglass { cooldown_reduction } => {
            modifiers.cooldown_reduction = (modifiers.cooldown_reduction + cooldown_reduction)
                .min(world.config.combat.max_cooldown_reduction);
        }
        Relic::Masonry { fortress_repair } => {
            let _ = world.fortress.health.heal(fortress_repair);
        }
    }

    world.relics.push(relic);
    out_events.push(Event::RelicSelected { relic });
    Ok(())
}

fn queue_skill(world: &mut World, hero: HeroId, skill: SkillId) -> Result<(), InputRejection> {
    let index = world
        .hero_index(hero)
        .ok_or(InputRejection::UnknownHero(hero))?;
    let entry = &world.heroes[index];
    let usable = world
        .config
        .content
        .hero(entry.definition)
        .and_then(|definition| definition.skill(skill))
        .is_some_and(|definition| !definition.is_passive() && definition.is_unlocked(entry.level));
    if !usable {
        return Err(InputRejection::SkillUnavailable { hero, skill });
    }

    let ready_at = entry.skill_ready_at(skill);
    if ready_at > world.tick {
        return Err(InputRejection::OnCooldown { ready_at });
    }

    let entry = &mut world.heroes[index];
    if !entry.pending_casts.contains(&skill) {
        entry.pending_casts.push(skill);
    }
    Ok(())
}

fn overcharge(
    world: &mut World,
    turret: TurretId,
    out_events: &mut Vec<Event>,
) -> Result<(), InputRejection> {
    let index = world
        .turret_index(turret)
        .ok_or(InputRejection::UnknownTurret(turret))?;
    let tick = world.tick;
    let rules = world.config.combat;
    let entry = &mut world.turrets[index];
    if tick < entry.overcharge_ready_at {
        return Err(InputRejection::OnCooldown {
            ready_at: entry.overcharge_ready_at,
        });
    }

    entry.overcharge_until = tick.saturating_add(u64::from(rules.overcharge_duration_ticks));
    entry.overcharge_ready_at = tick.saturating_add(u64::from(rules.overcharge_cooldown_ticks));
    out_events.push(Event::TurretOvercharged {
        turret,
        until: entry.overcharge_until,
    });
    Ok(())
}
