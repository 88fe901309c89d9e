#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave director responsible for emitting enemy spawn commands.

use rampart_core::{
    Command, EnemyDefinition, EnemyDefinitionId, EnemyKind, FieldConfig, Fixed, SimRng,
    WaveConfig, WaveProgress,
};

/// Pure system that starts waves and releases their enemies one at a time.
#[derive(Debug, Default)]
pub struct Spawning;

impl Spawning {
    /// Creates a new spawning system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes the wave progress and emits wave and spawn commands.
    ///
    /// A new wave starts once the previous one has released every enemy and
    /// its interval elapsed. At most one enemy spawns per tick. Each spawn
    /// draws its lane first and then its definition.
    #[allow(clippy::too_many_arguments)]
    pub fn handle(
        &mut self,
        tick: u64,
        progress: WaveProgress,
        waves: &WaveConfig,
        field: FieldConfig,
        enemies: &[EnemyDefinition],
        rng: &mut SimRng,
        out: &mut Vec<Command>,
    ) {
        if !waves.enabled {
            return;
        }

        let mut progress = progress;
        if progress.remaining == 0 && tick >= progress.next_wave_tick {
            let wave = progress.wave.saturating_add(1);
            let count = waves.enemies_in_wave(wave);
            tracing::debug!(tick, wave, count, "wave director starts wave");
            out.push(Command::StartWave {
                wave,
                enemies: count,
            });
            progress.wave = wave;
            progress.remaining = count;
            progress.next_spawn_tick = tick;
        }

        if progress.remaining == 0 || tick < progress.next_spawn_tick {
            return;
        }

        let lane = rng.below(waves.lanes);
        let lane_y = lane_position(field, lane, waves.lanes);
        let last_of_boss_wave = progress.remaining == 1 && waves.is_boss_wave(progress.wave);
        let definition = if last_of_boss_wave {
            select_boss(enemies).or_else(|| select_weighted(enemies, rng))
        } else {
            select_weighted(enemies, rng)
        };
        let Some(definition) = definition else {
            return;
        };

        out.push(Command::SpawnEnemy {
            definition,
            lane_y,
            wave: progress.wave,
            next_spawn_tick: tick.saturating_add(u64::from(waves.spawn_interval_ticks)),
        });
    }
}

/// Vertical centre of a lane; lanes split the field height evenly.
fn lane_position(field: FieldConfig, lane: u32, lanes: u32) -> Fixed {
    let lane = i32::try_from(lane).unwrap_or(i32::MAX);
    let lanes = i32::try_from(lanes).unwrap_or(i32::MAX);
    field
        .height
        .mul_int(lane.saturating_add(1))
        .div_int(lanes.saturating_add(1))
}

fn select_boss(enemies: &[EnemyDefinition]) -> Option<EnemyDefinitionId> {
    enemies
        .iter()
        .find(|definition| definition.kind == EnemyKind::Boss)
        .map(|definition| definition.id)
}

fn select_weighted(enemies: &[EnemyDefinition], rng: &mut SimRng) -> Option<EnemyDefinitionId> {
    let candidates = || {
        enemies
            .iter()
            .filter(|definition| definition.kind != EnemyKind::Boss && definition.spawn_weight > 0)
    };
    let total = candidates().fold(0u32, |sum, definition| {
        sum.saturating_add(definition.spawn_weight)
    });
    if total == 0 {
        return None;
    }

    let mut roll = rng.below(total);
    for definition in candidates() {
        if roll < definition.spawn_weight {
            return Some(definition.id);
        }
        roll -= definition.spawn_weight;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::SimConfig;

    #[test]
    fn lanes_split_the_field_evenly() {
        let field = SimConfig::demo().field;
        assert_eq!(lane_position(field, 0, 3), Fixed::from_int(6));
        assert_eq!(lane_position(field, 1, 3), Fixed::from_int(12));
        assert_eq!(lane_position(field, 2, 3), Fixed::from_int(18));
    }

    #[test]
    fn bosses_are_never_drawn_by_weight() {
        let config = SimConfig::demo();
        let mut rng = SimRng::new(99);
        for _ in 0..200 {
            let picked = select_weighted(config.content.enemies(), &mut rng)
                .expect("weighted definitions exist");
            let kind = config
                .content
                .enemy(picked)
                .expect("picked definition exists")
                .kind;
            assert_ne!(kind, EnemyKind::Boss);
        }
    }

    #[test]
    fn boss_selection_skips_other_kinds() {
        let config = SimConfig::demo();
        assert_eq!(
            select_boss(config.content.enemies()),
            Some(EnemyDefinitionId::new(3))
        );
    }
}
