#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that flies homing projectiles toward their targets.

use rampart_core::{Command, DiscardReason, Enemy, Projectile, PROJECTILE_MAX_LIFETIME_TICKS};

/// Projectile system.
#[derive(Debug, Default)]
pub struct Projectiles;

impl Projectiles {
    /// Creates a new projectile system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Advances every projectile by one step along the line to its target.
    ///
    /// A projectile impacts once the remaining distance is at most its speed.
    /// Projectiles whose target is gone, or that outlived
    /// [`PROJECTILE_MAX_LIFETIME_TICKS`], are discarded without effect.
    pub fn handle(
        &mut self,
        tick: u64,
        projectiles: &[Projectile],
        enemies: &[Enemy],
        out: &mut Vec<Command>,
    ) {
        for projectile in projectiles {
            if tick.saturating_sub(projectile.spawn_tick) >= PROJECTILE_MAX_LIFETIME_TICKS {
                out.push(Command::DiscardProjectile {
                    projectile: projectile.id,
                    reason: DiscardReason::Expired,
                });
                continue;
            }

            let target = enemies
                .binary_search_by_key(&projectile.target, |enemy| enemy.id)
                .ok()
                .map(|index| &enemies[index])
                .filter(|enemy| !enemy.health.is_dead());
            let Some(target) = target else {
                out.push(Command::DiscardProjectile {
                    projectile: projectile.id,
                    reason: DiscardReason::TargetLost,
                });
                continue;
            };

            let target_position = target.body.position;
            let offset = target_position - projectile.position;
            if offset.length() <= projectile.speed {
                out.push(Command::ImpactProjectile {
                    projectile: projectile.id,
                });
                continue;
            }

            out.push(Command::AdvanceProjectile {
                projectile: projectile.id,
                position: projectile.position + offset.normalize().scale(projectile.speed),
                target_position,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{
        Attacker, Body, EnemyDefinitionId, EnemyId, EnemyKind, Fixed, FixedVec2, Health, Hit,
        ProjectileId, StatusEffects, TurretId,
    };

    fn enemy_at(x: i32) -> Enemy {
        Enemy {
            id: EnemyId::new(4),
            definition: EnemyDefinitionId::new(1),
            kind: EnemyKind::Normal,
            wave: 1,
            body: Body::at_rest(FixedVec2::from_ints(x, 10), Fixed::HALF),
            health: Health::full(Fixed::from_int(40)),
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

    fn projectile_at(x: i32, spawn_tick: u64) -> Projectile {
        Projectile {
            id: ProjectileId::new(0),
            source: Attacker::Turret(TurretId::new(0)),
            target: EnemyId::new(4),
            position: FixedVec2::from_ints(x, 10),
            target_position: FixedVec2::from_ints(x, 10),
            speed: Fixed::ONE,
            hit: Hit::plain(Fixed::from_int(3)),
            spawn_tick,
        }
    }

    fn run(tick: u64, projectile: &Projectile, enemies: &[Enemy]) -> Vec<Command> {
        let mut out = Vec::new();
        Projectiles::new().handle(tick, std::slice::from_ref(projectile), enemies, &mut out);
        out
    }

    #[test]
    fn projectile_steps_toward_its_target() {
        let commands = run(1, &projectile_at(2, 0), &[enemy_at(10)]);
        assert_eq!(
            commands,
            vec![Command::AdvanceProjectile {
                projectile: ProjectileId::new(0),
                position: FixedVec2::from_ints(3, 10),
                target_position: FixedVec2::from_ints(10, 10),
            }]
        );
    }

    #[test]
    fn projectile_within_one_step_impacts() {
        let commands = run(1, &projectile_at(9, 0), &[enemy_at(10)]);
        assert_eq!(
            commands,
            vec![Command::ImpactProjectile {
                projectile: ProjectileId::new(0),
            }]
        );
    }

    #[test]
    fn projectile_without_target_is_discarded() {
        let commands = run(1, &projectile_at(2, 0), &[]);
        assert_eq!(
            commands,
            vec![Command::DiscardProjectile {
                projectile: ProjectileId::new(0),
                reason: DiscardReason::TargetLost,
            }]
        );
    }

    #[test]
    fn old_projectiles_expire() {
        let commands = run(300, &projectile_at(2, 0), &[enemy_at(10)]);
        assert_eq!(
            commands,
            vec![Command::DiscardProjectile {
                projectile: ProjectileId::new(0),
                reason: DiscardReason::Expired,
            }]
        );
    }
}
