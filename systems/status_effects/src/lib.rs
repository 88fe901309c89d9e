#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that ages status effects and triggers damage over time.

use rampart_core::{Command, Enemy, StatusEffects, DOT_INTERVAL_TICKS};

/// Status effect system.
#[derive(Debug, Default)]
pub struct StatusEffectsSystem;

impl StatusEffectsSystem {
    /// Creates a new status effect system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits damage-over-time ticks and the aged effect list of every enemy.
    ///
    /// Burn and poison deal their strength whenever the time since they were
    /// first applied is a positive multiple of [`DOT_INTERVAL_TICKS`]. The
    /// enemy's speed is recomputed from the effects that remain.
    pub fn handle(&mut self, tick: u64, enemies: &[Enemy], out: &mut Vec<Command>) {
        for enemy in enemies.iter().filter(|enemy| !enemy.health.is_dead()) {
            if enemy.statuses.is_empty() && enemy.speed == enemy.base_speed {
                continue;
            }

            let mut statuses: StatusEffects = enemy.statuses.clone();
            for effect in statuses.iter_mut() {
                let elapsed = tick.saturating_sub(effect.applied_tick);
                if effect.kind.is_damage_over_time()
                    && elapsed > 0
                    && elapsed % DOT_INTERVAL_TICKS == 0
                {
                    out.push(Command::DamageOverTime {
                        enemy: enemy.id,
                        kind: effect.kind,
                        amount: effect.strength,
                    });
                }
                effect.remaining_ticks = effect.remaining_ticks.saturating_sub(1);
            }
            let _ = statuses.prune_expired();

            let speed = enemy.base_speed * statuses.speed_multiplier();
            out.push(Command::UpdateStatuses {
                enemy: enemy.id,
                statuses,
                speed,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{
        Body, EnemyDefinitionId, EnemyId, EnemyKind, Fixed, FixedVec2, Health, StatusEffect,
        StatusKind,
    };

    fn enemy(statuses: StatusEffects) -> Enemy {
        Enemy {
            id: EnemyId::new(9),
            definition: EnemyDefinitionId::new(1),
            kind: EnemyKind::Normal,
            wave: 1,
            body: Body::at_rest(FixedVec2::from_ints(20, 6), Fixed::HALF),
            health: Health::full(Fixed::from_int(100)),
            base_speed: Fixed::from_ratio(1, 10),
            speed: Fixed::from_ratio(1, 10),
            lane_y: Fixed::from_int(6),
            statuses,
            contact_damage: Fixed::from_int(4),
            attack_interval_ticks: 30,
            next_attack_tick: 0,
            drop_chance_bps: 0,
        }
    }

    fn run(tick: u64, enemy: &Enemy) -> Vec<Command> {
        let mut out = Vec::new();
        StatusEffectsSystem::new().handle(tick, std::slice::from_ref(enemy), &mut out);
        out
    }

    #[test]
    fn burn_ticks_on_whole_intervals_only() {
        let mut statuses = StatusEffects::new();
        statuses.apply(StatusEffect::new(
            StatusKind::Burn,
            90,
            Fixed::from_int(5),
            10,
        ));
        let burning = enemy(statuses);

        assert_eq!(run(10, &burning).len(), 1);
        assert_eq!(run(39, &burning).len(), 1);
        let due = run(40, &burning);
        assert_eq!(
            due[0],
            Command::DamageOverTime {
                enemy: EnemyId::new(9),
                kind: StatusKind::Burn,
                amount: Fixed::from_int(5),
            }
        );
        assert_eq!(due.len(), 2);
    }

    #[test]
    fn expiring_slow_restores_base_speed() {
        let mut statuses = StatusEffects::new();
        statuses.apply(StatusEffect::new(StatusKind::Slow, 1, Fixed::HALF, 0));
        let mut slowed = enemy(statuses);
        slowed.speed = Fixed::from_ratio(1, 20);

        match run(1, &slowed).as_slice() {
            [Command::UpdateStatuses {
                statuses, speed, ..
            }] => {
                assert!(statuses.is_empty());
                assert_eq!(*speed, slowed.base_speed);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn stun_holds_the_enemy_in_place() {
        let mut statuses = StatusEffects::new();
        statuses.apply(StatusEffect::new(StatusKind::Stun, 30, Fixed::ZERO, 0));
        let stunned = enemy(statuses);

        match run(1, &stunned).as_slice() {
            [Command::UpdateStatuses { speed, .. }] => assert_eq!(*speed, Fixed::ZERO),
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn unaffected_enemies_are_skipped() {
        assert!(run(5, &enemy(StatusEffects::new())).is_empty());
    }
}
