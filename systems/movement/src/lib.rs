#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that steers bodies and resolves collisions.

use rampart_core::{
    buff_sum, Body, BuffStat, Command, ContentTables, Enemy, EnemyId, FieldConfig, Fixed,
    FixedVec2, Hero, HeroState, Mover, PhysicsRules,
};

/// Pure system that integrates every live body once per tick.
#[derive(Debug, Default)]
pub struct Movement {
    bodies: Vec<Moving>,
}

impl Movement {
    /// Creates a new movement system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Steers heroes and enemies toward their goals and emits their new bodies.
    ///
    /// Heroes are processed before enemies, each in identifier order, and the
    /// collision passes visit pairs in that same order.
    #[allow(clippy::too_many_arguments)]
    pub fn handle(
        &mut self,
        heroes: &[Hero],
        enemies: &[Enemy],
        content: &ContentTables,
        physics: &PhysicsRules,
        field: FieldConfig,
        line_x: Fixed,
        out: &mut Vec<Command>,
    ) {
        self.bodies.clear();
        let live_enemies = || enemies.iter().filter(|enemy| !enemy.health.is_dead());

        for hero in heroes.iter().filter(|hero| !hero.health.is_dead()) {
            let Some(definition) = content.hero(hero.definition) else {
                continue;
            };
            let max_speed = (definition.move_speed
                * buff_sum(&hero.buffs, BuffStat::MoveSpeed).one_plus())
            .max(Fixed::ZERO);

            let commanded = hero
                .commanded_to
                .filter(|_| hero.state == HeroState::Commanded);
            let goal = if let Some(point) = commanded {
                Goal::new(point, Fixed::ZERO)
            } else {
                let lookup = |id: EnemyId| live_enemies().find(|enemy| enemy.id == id);
                let engaged = hero
                    .focus
                    .and_then(lookup)
                    .or_else(|| hero.target.and_then(lookup))
                    .or_else(|| {
                        live_enemies().min_by_key(|enemy| {
                            (enemy.body.position.distance_sq(hero.body.position), enemy.id)
                        })
                    });
                match engaged {
                    Some(enemy) => Goal::new(enemy.body.position, definition.attack_range),
                    None => Goal::new(hero.anchor, Fixed::ZERO),
                }
            };

            let body = steer(hero.body, goal, max_speed, physics, field);
            self.bodies.push(Moving {
                mover: Mover::Hero(hero.id),
                body,
            });
        }

        for enemy in live_enemies() {
            let goal = Goal::new(
                FixedVec2::new(line_x + enemy.body.radius, enemy.lane_y),
                physics.arrival_tolerance,
            );
            let body = steer(enemy.body, goal, enemy.speed, physics, field);
            self.bodies.push(Moving {
                mover: Mover::Enemy(enemy.id),
                body,
            });
        }

        separate(&mut self.bodies, physics);
        resolve_overlaps(&mut self.bodies);

        for moving in &self.bodies {
            let body = Body {
                position: field.clamp(moving.body.position),
                ..moving.body
            };
            out.push(Command::MoveBody {
                mover: moving.mover,
                body,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Moving {
    mover: Mover,
    body: Body,
}

/// Point a body steers toward and the distance at which it stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Goal {
    point: FixedVec2,
    stop_distance: Fixed,
}

impl Goal {
    const fn new(point: FixedVec2, stop_distance: Fixed) -> Self {
        Self {
            point,
            stop_distance,
        }
    }
}

/// Applies arrival steering, friction and the speed clamp, then integrates.
fn steer(
    body: Body,
    goal: Goal,
    max_speed: Fixed,
    physics: &PhysicsRules,
    field: FieldConfig,
) -> Body {
    let offset = goal.point - body.position;
    let distance = offset.length();

    let desired = if distance <= goal.stop_distance {
        FixedVec2::ZERO
    } else {
        let remaining = distance - goal.stop_distance;
        let speed = if physics.slowing_radius.is_positive() && remaining < physics.slowing_radius
        {
            max_speed * remaining / physics.slowing_radius
        } else {
            max_speed
        };
        offset.normalize().scale(speed)
    };

    let steering = (desired - body.velocity).clamp_length(physics.max_acceleration);
    let velocity = (body.velocity + steering)
        .scale(physics.friction)
        .clamp_length(max_speed);
    Body {
        position: field.clamp(body.position + velocity),
        velocity,
        radius: body.radius,
    }
}

/// Direction from `from` to `to`, falling back to `(1, 0)` for coincident points.
fn separation_normal(from: FixedVec2, to: FixedVec2) -> FixedVec2 {
    let offset = to - from;
    if offset.is_zero() {
        FixedVec2::new(Fixed::ONE, Fixed::ZERO)
    } else {
        offset.normalize()
    }
}

/// Nudges apart bodies that crowd each other within the separation margin.
fn separate(bodies: &mut [Moving], physics: &PhysicsRules) {
    if !physics.separation_strength.is_positive() {
        return;
    }
    let push_length = physics.separation_strength.div_int(2);
    for first in 0..bodies.len() {
        for second in first + 1..bodies.len() {
            let a = bodies[first].body;
            let b = bodies[second].body;
            let reach = a.radius + b.radius + physics.separation_margin;
            if a.position.distance_sq(b.position) >= reach * reach {
                continue;
            }
            let push = separation_normal(a.position, b.position).scale(push_length);
            bodies[first].body.position -= push;
            bodies[second].body.position += push;
        }
    }
}

/// Pushes overlapping circles apart so they just touch.
fn resolve_overlaps(bodies: &mut [Moving]) {
    for first in 0..bodies.len() {
        for second in first + 1..bodies.len() {
            let a = bodies[first].body;
            let b = bodies[second].body;
            let touching = a.radius + b.radius;
            let distance_sq = a.position.distance_sq(b.position);
            if distance_sq >= touching * touching {
                continue;
            }
            let depth = touching - distance_sq.sqrt();
            let correction = separation_normal(a.position, b.position).scale(depth.div_int(2));
            bodies[first].body.position -= correction;
            bodies[second].body.position += correction;
        }
    }
}
