#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that assigns deterministic targets to heroes and turrets.

use std::cmp::Reverse;

use rampart_core::{
    Command, ContentTables, Enemy, EnemyId, Fixed, FixedVec2, Hero, HeroRole, SimRng,
    TargetingMode, Turret, TurretState, Weakness,
};

/// Targeting system that reuses scratch buffers of live enemies.
#[derive(Debug, Default)]
pub struct Targeting {
    candidates: Vec<Candidate>,
    in_range: Vec<Candidate>,
}

impl Targeting {
    /// Creates a new targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits target changes for every hero and turret.
    ///
    /// Heroes honour the team focus first, then pick by role among enemies
    /// whose body lies within attack range, and finally keep chasing their
    /// previous target while it lives. Turrets keep a lock while the enemy
    /// stays alive and in range.
    /// Every tie resolves to the lowest enemy id.
    pub fn handle(
        &mut self,
        heroes: &[Hero],
        turrets: &[Turret],
        enemies: &[Enemy],
        content: &ContentTables,
        rng: &mut SimRng,
        out: &mut Vec<Command>,
    ) {
        self.prepare_candidates(enemies);

        for hero in heroes.iter().filter(|hero| !hero.health.is_dead()) {
            self.target_hero(hero, content, rng, out);
        }

        for turret in turrets {
            let Some(definition) = content.turret(turret.definition) else {
                continue;
            };
            let range = definition.stats.range();
            let state = self.target_turret(turret, range);
            if state != turret.state {
                out.push(Command::SetTurretState {
                    turret: turret.id,
                    state,
                });
            }
        }
    }

    fn prepare_candidates(&mut self, enemies: &[Enemy]) {
        self.candidates.clear();
        self.candidates.extend(
            enemies
                .iter()
                .filter(|enemy| !enemy.health.is_dead())
                .map(|enemy| Candidate {
                    id: enemy.id,
                    position: enemy.body.position,
                    health: enemy.health.current(),
                    speed: enemy.speed,
                    radius: enemy.body.radius,
                    controlled: enemy.statuses.has_hard_control(),
                }),
        );
    }

    fn is_live(&self, enemy: EnemyId) -> bool {
        self.candidates
            .binary_search_by_key(&enemy, |candidate| candidate.id)
            .is_ok()
    }

    /// Refills the in-range buffer with candidates whose body lies within `range`.
    fn collect_in_range(&mut self, origin: FixedVec2, range: Fixed) {
        self.in_range.clear();
        self.in_range
            .extend(self.candidates.iter().copied().filter(|candidate| {
                let reach = range + candidate.radius;
                candidate.position.distance_sq(origin) <= reach * reach
            }));
    }

    fn target_hero(
        &mut self,
        hero: &Hero,
        content: &ContentTables,
        rng: &mut SimRng,
        out: &mut Vec<Command>,
    ) {
        let Some(definition) = content.hero(hero.definition) else {
            return;
        };

        if let Some(focus) = hero.focus {
            if self.is_live(focus) {
                assign(hero, Some(focus), out);
                return;
            }
            out.push(Command::ClearFocus { hero: hero.id });
        }

        let origin = hero.body.position;
        self.collect_in_range(origin, definition.attack_range);
        let in_range = &self.in_range;

        let chosen = if in_range.is_empty() {
            hero.target.filter(|target| self.is_live(*target))
        } else {
            let erratic = definition.weaknesses.iter().find_map(|weakness| match weakness {
                Weakness::Erratic { chance_bps } => Some(*chance_bps),
                Weakness::Frail { .. } => None,
            });
            match erratic {
                Some(chance) if rng.chance_bps(chance) => rng
                    .pick_index(in_range.len())
                    .map(|index| in_range[index].id),
                _ => select_for_role(definition.role, origin, in_range),
            }
        };

        assign(hero, chosen, out);
    }

    fn target_turret(&self, turret: &Turret, range: Fixed) -> TurretState {
        let range_sq = range * range;
        let origin = turret.position;
        let in_range = |candidate: &&Candidate| candidate.position.distance_sq(origin) <= range_sq;

        if let TurretState::Locked(locked) = turret.state {
            let kept = self
                .candidates
                .binary_search_by_key(&locked, |candidate| candidate.id)
                .ok()
                .map(|index| &self.candidates[index])
                .filter(in_range);
            if kept.is_some() {
                return turret.state;
            }
        }

        let eligible = self.candidates.iter().filter(in_range);
        let chosen = match turret.mode {
            TargetingMode::ClosestToObjective => eligible
                .min_by_key(|candidate| (candidate.position.x, candidate.id))
                .map(|candidate| candidate.id),
            TargetingMode::Weakest => eligible
                .min_by_key(|candidate| (candidate.health, candidate.id))
                .map(|candidate| candidate.id),
            TargetingMode::Strongest => eligible
                .min_by_key(|candidate| (Reverse(candidate.health), candidate.id))
                .map(|candidate| candidate.id),
            TargetingMode::NearestToSelf => eligible
                .min_by_key(|candidate| (candidate.position.distance_sq(origin), candidate.id))
                .map(|candidate| candidate.id),
            TargetingMode::Fastest => eligible
                .min_by_key(|candidate| (Reverse(candidate.speed), candidate.id))
                .map(|candidate| candidate.id),
        };

        chosen.map_or(TurretState::Searching, TurretState::Locked)
    }
}

fn assign(hero: &Hero, target: Option<EnemyId>, out: &mut Vec<Command>) {
    if hero.target != target {
        tracing::trace!(hero = hero.id.get(), ?target, "hero target changed");
        out.push(Command::SetHeroTarget {
            hero: hero.id,
            target,
        });
    }
}

/// Picks the preferred enemy for a role among candidates in range.
fn select_for_role(role: HeroRole, origin: FixedVec2, in_range: &[Candidate]) -> Option<EnemyId> {
    let candidates = in_range.iter();
    let chosen = match role {
        HeroRole::Guardian => {
            candidates.min_by_key(|candidate| (candidate.position.x, candidate.id))
        }
        HeroRole::Striker => candidates.min_by_key(|candidate| (candidate.health, candidate.id)),
        HeroRole::Controller => candidates.min_by_key(|candidate| {
            (
                candidate.controlled,
                candidate.position.distance_sq(origin),
                candidate.id,
            )
        }),
    };
    chosen.map(|candidate| candidate.id)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: EnemyId,
    position: FixedVec2,
    health: Fixed,
    speed: Fixed,
    radius: Fixed,
    controlled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u32, x: i32, y: i32, health: i32) -> Candidate {
        Candidate {
            id: EnemyId::new(id),
            position: FixedVec2::from_ints(x, y),
            health: Fixed::from_int(health),
            speed: Fixed::ONE,
            radius: Fixed::HALF,
            controlled: false,
        }
    }

    #[test]
    fn in_range_buffer_is_refilled_in_place() {
        let mut targeting = Targeting::new();
        targeting.candidates = vec![
            candidate(1, 5, 5, 40),
            candidate(2, 7, 5, 40),
            candidate(3, 30, 5, 40),
        ];

        targeting.collect_in_range(FixedVec2::from_ints(6, 5), Fixed::from_int(2));
        let ids: Vec<EnemyId> = targeting.in_range.iter().map(|candidate| candidate.id).collect();
        assert_eq!(ids, vec![EnemyId::new(1), EnemyId::new(2)]);
        let capacity = targeting.in_range.capacity();

        targeting.collect_in_range(FixedVec2::from_ints(29, 5), Fixed::from_int(2));
        let ids: Vec<EnemyId> = targeting.in_range.iter().map(|candidate| candidate.id).collect();
        assert_eq!(ids, vec![EnemyId::new(3)]);
        assert_eq!(targeting.in_range.capacity(), capacity);
    }

    #[test]
    fn guardian_prefers_the_enemy_closest_to_the_fortress() {
        let near_line = candidate(4, 6, 10, 50);
        let far = candidate(2, 9, 12, 10);
        let chosen = select_for_role(
            HeroRole::Guardian,
            FixedVec2::from_ints(8, 12),
            &[far, near_line],
        );
        assert_eq!(chosen, Some(EnemyId::new(4)));
    }

    #[test]
    fn striker_prefers_the_weakest_enemy_and_breaks_ties_by_id() {
        let first = candidate(7, 6, 10, 20);
        let second = candidate(3, 9, 12, 20);
        let healthy = candidate(1, 8, 12, 90);
        let chosen = select_for_role(
            HeroRole::Striker,
            FixedVec2::from_ints(8, 12),
            &[first, second, healthy],
        );
        assert_eq!(chosen, Some(EnemyId::new(3)));
    }

    #[test]
    fn controller_skips_enemies_already_under_hard_control() {
        let mut stunned = candidate(1, 8, 11, 40);
        stunned.controlled = true;
        let free = candidate(2, 14, 12, 40);
        let chosen = select_for_role(
            HeroRole::Controller,
            FixedVec2::from_ints(8, 12),
            &[stunned, free],
        );
        assert_eq!(chosen, Some(EnemyId::new(2)));
    }
}
