//! Canonical SHA-256 digest of the simulation state.
//!
//! Fields are written in a fixed order as little-endian integers. Containers
//! are prefixed with their length and visited in identifier order, so two
//! worlds hash equally exactly when every field matches.

use std::{fmt, str::FromStr};

use rampart_core::{
    ActiveBuff, Attacker, Body, EffectSpec, Enemy, Fixed, FixedVec2, Health, Hero, Hit,
    Projectile, Relic, Turret, TurretState,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::World;

/// SHA-256 digest identifying a simulation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalHash([u8; 32]);

impl CanonicalHash {
    /// Wraps raw digest bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CanonicalHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Failure to parse a hexadecimal digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected 64 hexadecimal characters")]
pub struct ParseHashError;

impl FromStr for CanonicalHash {
    type Err = ParseHashError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.len() != 64 || !text.is_ascii() {
            return Err(ParseHashError);
        }
        let mut bytes = [0u8; 32];
        for (index, byte) in bytes.iter_mut().enumerate() {
            let pair = &text[index * 2..index * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| ParseHashError)?;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for CanonicalHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CanonicalHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Computes the canonical digest of the world.
#[must_use]
pub fn canonical_hash(world: &World) -> CanonicalHash {
    let mut writer = StateWriter::default();

    writer.u64(world.tick);
    writer.u32(world.rng.state());
    writer.u8(world.outcome.map_or(0, |_| 1));

    writer.u8(world.fortress.class.code());
    writer.health(&world.fortress.health);
    writer.fixed(world.fortress.line_x);

    let modifiers = &world.modifiers;
    writer.fixed(modifiers.damage_bonus);
    writer.fixed(modifiers.attack_speed_bonus);
    writer.fixed(modifiers.cooldown_reduction);
    writer.fixed(modifiers.fortress_armor);

    writer.len(world.relics.len());
    for relic in &world.relics {
        writer.relic(relic);
    }

    let waves = &world.waves;
    writer.u32(waves.wave);
    writer.u32(waves.remaining);
    writer.u64(waves.next_spawn_tick);
    writer.u64(waves.next_wave_tick);

    writer.u32(world.hero_ids.peek());
    writer.u32(world.enemy_ids.peek());
    writer.u32(world.projectile_ids.peek());

    writer.len(world.heroes.len());
    for hero in &world.heroes {
        writer.hero(hero);
    }
    writer.len(world.turrets.len());
    for turret in &world.turrets {
        writer.turret(turret);
    }
    writer.len(world.enemies.len());
    for enemy in &world.enemies {
        writer.enemy(enemy);
    }
    writer.len(world.projectiles.len());
    for projectile in &world.projectiles {
        writer.projectile(projectile);
    }

    writer.finish()
}

#[derive(Default)]
struct StateWriter {
    hasher: Sha256,
}

impl StateWriter {
    fn finish(self) -> CanonicalHash {
        CanonicalHash(self.hasher.finalize().into())
    }

    fn u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    fn u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    fn u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    fn len(&mut self, value: usize) {
        self.u64(value as u64);
    }

    fn fixed(&mut self, value: Fixed) {
        self.hasher.update(value.raw().to_le_bytes());
    }

    fn vec2(&mut self, value: FixedVec2) {
        self.fixed(value.x);
        self.fixed(value.y);
    }

    fn optional_u32(&mut self, value: Option<u32>) {
        match value {
            Some(value) => {
                self.u8(1);
                self.u32(value);
            }
            None => self.u8(0),
        }
    }

    fn body(&mut self, body: &Body) {
        self.vec2(body.position);
        self.vec2(body.velocity);
        self.fixed(body.radius);
    }

    fn health(&mut self, health: &Health) {
        self.fixed(health.current());
        self.fixed(health.max());
    }

    fn buffs(&mut self, buffs: &[ActiveBuff]) {
        self.len(buffs.len());
        for buff in buffs {
            self.u8(buff.stat as u8);
            self.fixed(buff.magnitude);
            self.u64(buff.expires_at);
        }
    }

    fn attacker(&mut self, attacker: Attacker) {
        match attacker {
            Attacker::Hero(hero) => {
                self.u8(0);
                self.u32(hero.get());
            }
            Attacker::Turret(turret) => {
                self.u8(1);
                self.u32(turret.get());
            }
        }
    }

    fn relic(&mut self, relic: &Relic) {
        let code = match relic {
            Relic::Whetstone { .. } => 0,
            Relic::WarDrums { .. } => 1,
            Relic::Hourglass { .. } => 2,
            Relic::Masonry { .. } => 3,
        };
        self.u8(code);
        self.fixed(relic.magnitude());
    }

    fn hero(&mut self, hero: &Hero) {
        self.u32(hero.id.get());
        self.u32(hero.definition.get());
        self.u8(hero.tier);
        self.u32(hero.level);
        self.body(&hero.body);
        self.health(&hero.health);
        self.u8(hero.state.code());
        self.vec2(hero.anchor);
        match hero.commanded_to {
            Some(point) => {
                self.u8(1);
                self.vec2(point);
            }
            None => self.u8(0),
        }
        self.optional_u32(hero.focus.map(|enemy| enemy.get()));
        self.optional_u32(hero.target.map(|enemy| enemy.get()));
        self.u64(hero.engage_at);
        self.u64(hero.next_attack_tick);
        self.len(hero.cooldowns.len());
        for cooldown in &hero.cooldowns {
            self.u32(cooldown.skill.get());
            self.u64(cooldown.ready_at);
        }
        self.len(hero.pending_casts.len());
        for skill in &hero.pending_casts {
            self.u32(skill.get());
        }
        self.buffs(&hero.buffs);
        self.optional_u32(hero.loadout.resource_bonus.map(|bonus| bonus.raw() as u32));
        self.fixed(hero.loadout.equipment_bonus);
    }

    fn turret(&mut self, turret: &Turret) {
        self.u32(turret.id.get());
        self.u32(turret.definition.get());
        self.u8(turret.tier);
        self.u32(turret.level);
        self.vec2(turret.position);
        self.u8(turret.mode as u8);
        match turret.state {
            TurretState::Searching => self.u8(0),
            TurretState::Locked(enemy) => {
                self.u8(1);
                self.u32(enemy.get());
            }
        }
        self.u64(turret.next_attack_tick);
        self.u64(turret.overcharge_until);
        self.u64(turret.overcharge_ready_at);
    }

    fn enemy(&mut self, enemy: &Enemy) {
        self.u32(enemy.id.get());
        self.u32(enemy.definition.get());
        self.u8(enemy.kind as u8);
        self.u32(enemy.wave);
        self.body(&enemy.body);
        self.health(&enemy.health);
        self.fixed(enemy.base_speed);
        self.fixed(enemy.speed);
        self.fixed(enemy.lane_y);
        self.len(enemy.statuses.len());
        for status in enemy.statuses.iter() {
            self.u8(status.kind.code());
            self.u32(status.remaining_ticks);
            self.fixed(status.strength);
            self.u64(status.applied_tick);
        }
        self.fixed(enemy.contact_damage);
        self.u32(enemy.attack_interval_ticks);
        self.u64(enemy.next_attack_tick);
        self.u32(enemy.drop_chance_bps);
    }

    fn hit(&mut self, hit: &Hit) {
        self.fixed(hit.damage);
        self.fixed(hit.lifesteal);
        self.u8(u8::from(hit.chained));
        self.len(hit.effects.len());
        for effect in &hit.effects {
            self.effect(effect);
        }
    }

    fn effect(&mut self, effect: &EffectSpec) {
        match *effect {
            EffectSpec::Damage { amount } => {
                self.u8(0);
                self.fixed(amount);
            }
            EffectSpec::Slow {
                strength,
                duration_ticks,
            } => {
                self.u8(1);
                self.fixed(strength);
                self.u32(duration_ticks);
            }
            EffectSpec::Burn {
                damage_per_interval,
                duration_ticks,
            } => {
                self.u8(2);
                self.fixed(damage_per_interval);
                self.u32(duration_ticks);
            }
            EffectSpec::Poison {
                damage_per_interval,
                duration_ticks,
            } => {
                self.u8(3);
                self.fixed(damage_per_interval);
                self.u32(duration_ticks);
            }
            EffectSpec::Freeze { duration_ticks } => {
                self.u8(4);
                self.u32(duration_ticks);
            }
            EffectSpec::Stun { duration_ticks } => {
                self.u8(5);
                self.u32(duration_ticks);
            }
            EffectSpec::Chain { jumps, range, decay } => {
                self.u8(6);
                self.u32(jumps);
                self.fixed(range);
                self.fixed(decay);
            }
            EffectSpec::Splash { radius, fraction } => {
                self.u8(7);
                self.fixed(radius);
                self.fixed(fraction);
            }
            EffectSpec::Heal { amount } => {
                self.u8(8);
                self.fixed(amount);
            }
            EffectSpec::Buff {
                stat,
                magnitude,
                duration_ticks,
            } => {
                self.u8(9);
                self.u8(stat as u8);
                self.fixed(magnitude);
                self.u32(duration_ticks);
            }
        }
    }

    fn projectile(&mut self, projectile: &Projectile) {
        self.u32(projectile.id.get());
        self.attacker(projectile.source);
        self.u32(projectile.target.get());
        self.vec2(projectile.position);
        self.vec2(projectile.target_position);
        self.fixed(projectile.speed);
        self.hit(&projectile.hit);
        self.u64(projectile.spawn_tick);
    }
}
