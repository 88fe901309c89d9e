//! Resolution of hits against enemies.

use rampart_core::{
    Attacker, DamageSource, EffectSpec, EnemyId, Event, Fixed, FixedVec2, Hit, ProjectileId,
};

use crate::World;

/// Removes up to `amount` health from the enemy at `index`.
pub(crate) fn damage_enemy(
    world: &mut World,
    index: usize,
    amount: Fixed,
    source: DamageSource,
    out_events: &mut Vec<Event>,
) -> Fixed {
    let enemy = &mut world.enemies[index];
    if enemy.health.is_dead() {
        return Fixed::ZERO;
    }
    let dealt = enemy.health.apply_damage(amount);
    let id = enemy.id;
    world.stats.damage_dealt += dealt;
    out_events.push(Event::EnemyDamaged {
        enemy: id,
        amount: dealt,
        source,
    });
    dealt
}

/// Applies a hit to a live enemy, including its side effects.
///
/// Chain and splash effects only expand primary hits. The secondary hits
/// they spawn carry the `chained` flag and never expand again.
pub(crate) fn strike(
    world: &mut World,
    attacker: Attacker,
    target: EnemyId,
    hit: &Hit,
    out_events: &mut Vec<Event>,
) {
    let Some(index) = world.enemy_index(target) else {
        return;
    };
    if world.enemies[index].health.is_dead() {
        return;
    }

    let origin = world.enemies[index].body.position;
    let dealt = damage_enemy(
        world,
        index,
        hit.damage,
        DamageSource::Attack(attacker),
        out_events,
    );

    let tick = world.tick;
    for effect in &hit.effects {
        match *effect {
            EffectSpec::Slow { .. }
            | EffectSpec::Burn { .. }
            | EffectSpec::Poison { .. }
            | EffectSpec::Freeze { .. }
            | EffectSpec::Stun { .. } => {
                if let Some(status) = effect.status(tick) {
                    world.enemies[index].statuses.apply(status);
                    out_events.push(Event::StatusApplied {
                        enemy: target,
                        kind: status.kind,
                    });
                }
            }
            EffectSpec::Chain { jumps, range, decay } => {
                if !hit.chained {
                    chain(world, attacker, target, origin, hit, jumps, range, decay, out_events);
                }
            }
            EffectSpec::Splash { radius, fraction } => {
                if !hit.chained {
                    let damage = hit.damage * fraction;
                    splash(world, attacker, target, origin, damage, radius, out_events);
                }
            }
            EffectSpec::Damage { .. } | EffectSpec::Heal { .. } | EffectSpec::Buff { .. } => {}
        }
    }

    if hit.lifesteal.is_positive() && dealt.is_positive() {
        if let Attacker::Hero(hero) = attacker {
            if let Some(hero_index) = world.hero_index(hero) {
                let entry = &mut world.heroes[hero_index];
                if !entry.health.is_dead() {
                    let restored = entry.health.heal(dealt * hit.lifesteal);
                    if restored.is_positive() {
                        out_events.push(Event::HeroHealed {
                            hero,
                            amount: restored,
                        });
                    }
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn chain(
    world: &mut World,
    attacker: Attacker,
    first: EnemyId,
    origin: FixedVec2,
    hit: &Hit,
    jumps: u32,
    range: Fixed,
    decay: Fixed,
    out_events: &mut Vec<Event>,
) {
    let statuses: Vec<EffectSpec> = hit
        .effects
        .iter()
        .copied()
        .filter(|effect| effect.status(0).is_some())
        .collect();
    let range_sq = range * range;
    let mut struck = vec![first];
    let mut from = origin;
    let mut damage = hit.damage;

    for _ in 0..jumps {
        let next = world
            .enemies
            .iter()
            .filter(|enemy| !enemy.health.is_dead() && !struck.contains(&enemy.id))
            .map(|enemy| {
                let position = enemy.body.position;
                (position.distance_sq(from), enemy.id, position)
            })
            .filter(|(distance_sq, _, _)| *distance_sq <= range_sq)
            .min_by_key(|(distance_sq, id, _)| (*distance_sq, *id));
        let Some((_, next, position)) = next else {
            break;
        };

        damage = damage * decay;
        struck.push(next);
        from = position;
        let secondary = Hit {
            damage,
            effects: statuses.clone(),
            lifesteal: Fixed::ZERO,
            chained: true,
        };
        strike(world, attacker, next, &secondary, out_events);
    }
}

fn splash(
    world: &mut World,
    attacker: Attacker,
    primary: EnemyId,
    origin: FixedVec2,
    damage: Fixed,
    radius: Fixed,
    out_events: &mut Vec<Event>,
) {
    let radius_sq = radius * radius;
    let victims: Vec<EnemyId> = world
        .enemies
        .iter()
        .filter(|enemy| enemy.id != primary && !enemy.health.is_dead())
        .filter(|enemy| enemy.body.position.distance_sq(origin) <= radius_sq)
        .map(|enemy| enemy.id)
        .collect();

    let secondary = Hit {
        chained: true,
        ..Hit::plain(damage)
    };
    for victim in victims {
        strike(world, attacker, victim, &secondary, out_events);
    }
}

/// Applies a projectile's payload to its target and removes the projectile.
pub(crate) fn impact(world: &mut World, projectile: ProjectileId, out_events: &mut Vec<Event>) {
    let Some(index) = world.projectile_index(projectile) else {
        return;
    };
    let arrived = world.projectiles[index].clone();
    world.projectiles.retain(|entry| entry.id != projectile);

    out_events.push(Event::ProjectileImpacted {
        projectile,
        target: arrived.target,
    });
    strike(world, arrived.source, arrived.target, &arrived.hit, out_events);
}
