//! End-of-tick bookkeeping.

use rampart_core::{DiscardReason, Event, PROJECTILE_MAX_LIFETIME_TICKS};

use crate::World;

/// Removes fallen entities, expires buffs and stale projectiles, and advances
/// the tick.
///
/// Projectiles past their lifetime are dropped here as well, so they leave the
/// field even on ticks where the projectile phase does not run.
///
/// Each fallen enemy rolls for a material drop in identifier order, so the
/// number of random draws equals the number of enemies removed.
pub(crate) fn run(world: &mut World, out_events: &mut Vec<Event>) {
    let fallen: Vec<(usize, u32)> = world
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| enemy.health.is_dead())
        .map(|(index, enemy)| (index, enemy.drop_chance_bps))
        .collect();

    if !fallen.is_empty() {
        let drops: Vec<bool> = world.with_rng(|_, rng| {
            fallen
                .iter()
                .map(|&(_, chance)| rng.chance_bps(chance))
                .collect()
        });
        for (&(index, _), dropped_material) in fallen.iter().zip(drops) {
            let enemy = world.enemies[index].id;
            world.stats.enemies_killed = world.stats.enemies_killed.saturating_add(1);
            if dropped_material {
                world.stats.materials_dropped = world.stats.materials_dropped.saturating_add(1);
            }
            out_events.push(Event::EnemyDied {
                enemy,
                dropped_material,
            });
        }
        world.enemies.retain(|enemy| !enemy.health.is_dead());
    }

    for hero in world.heroes.iter().filter(|hero| hero.health.is_dead()) {
        world.stats.heroes_lost = world.stats.heroes_lost.saturating_add(1);
        out_events.push(Event::HeroDied { hero: hero.id });
    }
    world.heroes.retain(|hero| !hero.health.is_dead());

    let tick = world.tick;
    for projectile in world
        .projectiles
        .iter()
        .filter(|projectile| is_expired(tick, projectile.spawn_tick))
    {
        out_events.push(Event::ProjectileDiscarded {
            projectile: projectile.id,
            reason: DiscardReason::Expired,
        });
    }
    world
        .projectiles
        .retain(|projectile| !is_expired(tick, projectile.spawn_tick));

    let next_tick = tick.saturating_add(1);
    for hero in &mut world.heroes {
        hero.buffs.retain(|buff| buff.expires_at > next_tick);
    }

    world.tick = next_tick;
}

fn is_expired(tick: u64, spawn_tick: u64) -> bool {
    tick.saturating_sub(spawn_tick) >= PROJECTILE_MAX_LIFETIME_TICKS
}
