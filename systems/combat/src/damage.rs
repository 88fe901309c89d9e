//! Damage and cadence formulas.
//!
//! Hero damage runs through a fixed sequence of multipliers: tier and level
//! scaling, the special resource, equipment, damage buffs, passive
//! conditionals, weaknesses and finally the run-wide bonus. Reordering the
//! steps changes truncation and therefore replay hashes.

use rampart_core::{
    buff_multiplier, buff_sum, BuffStat, CombatRules, EffectSpec, Enemy, EnemyKind, Fixed,
    GlobalModifiers, Hero, HeroDefinition, PassiveTrait, Turret, TurretDefinition, Weakness,
};

/// Damage a hero deals to `target` from `base` before any on-hit effect.
pub(crate) fn hero_damage(
    base: Fixed,
    hero: &Hero,
    definition: &HeroDefinition,
    target: &Enemy,
    rules: &CombatRules,
    modifiers: GlobalModifiers,
) -> Fixed {
    let mut damage = rules.scale(base, hero.tier, hero.level);

    if let Some(bonus) = hero.loadout.resource_bonus {
        damage = damage * bonus.one_plus();
    }
    damage = damage * hero.loadout.equipment_bonus.one_plus();
    damage = damage * buff_multiplier(&hero.buffs, BuffStat::Damage);

    let mut execute = false;
    for passive in &definition.passives {
        match *passive {
            PassiveTrait::LastStand {
                health_ratio,
                bonus,
            } => {
                if hero.health.ratio() <= health_ratio {
                    damage = damage * bonus.one_plus();
                }
            }
            PassiveTrait::Opportunist { bonus } => {
                if !target.statuses.is_empty() {
                    damage = damage * bonus.one_plus();
                }
            }
            PassiveTrait::Executioner {
                normal,
                elite,
                boss,
            } => {
                let threshold = match target.kind {
                    EnemyKind::Normal => normal,
                    EnemyKind::Elite => elite,
                    EnemyKind::Boss => boss,
                };
                execute |= threshold.is_positive() && target.health.ratio() <= threshold;
            }
            PassiveTrait::Lifesteal { .. } => {}
        }
    }
    if execute {
        damage = damage.max(target.health.current());
    }

    for weakness in &definition.weaknesses {
        if let Weakness::Frail { against, penalty } = *weakness {
            if target.kind == against {
                damage = damage * penalty.one_minus().max(Fixed::ZERO);
            }
        }
    }

    (damage * modifiers.damage_bonus.one_plus()).max(Fixed::ZERO)
}

/// Fraction of dealt damage a hero's passives restore as health.
pub(crate) fn lifesteal(definition: &HeroDefinition) -> Fixed {
    definition
        .passives
        .iter()
        .fold(Fixed::ZERO, |total, passive| match *passive {
            PassiveTrait::Lifesteal { fraction } => total + fraction,
            PassiveTrait::LastStand { .. }
            | PassiveTrait::Opportunist { .. }
            | PassiveTrait::Executioner { .. } => total,
        })
}

/// Effects that ride on every hit: statuses, chains and splashes.
pub(crate) fn is_on_hit(effect: &EffectSpec) -> bool {
    match effect {
        EffectSpec::Slow { .. }
        | EffectSpec::Burn { .. }
        | EffectSpec::Poison { .. }
        | EffectSpec::Freeze { .. }
        | EffectSpec::Stun { .. }
        | EffectSpec::Chain { .. }
        | EffectSpec::Splash { .. } => true,
        EffectSpec::Damage { .. } | EffectSpec::Heal { .. } | EffectSpec::Buff { .. } => false,
    }
}

/// On-hit effects granted by the unlocked passive skills of a hero.
pub(crate) fn passive_effects(hero: &Hero, definition: &HeroDefinition) -> Vec<EffectSpec> {
    definition
        .skills
        .iter()
        .filter(|skill| skill.is_passive() && skill.is_unlocked(hero.level))
        .flat_map(|skill| skill.effects.iter().copied())
        .filter(is_on_hit)
        .collect()
}

/// Ticks between two basic attacks of a hero.
pub(crate) fn hero_attack_interval(
    hero: &Hero,
    definition: &HeroDefinition,
    synergy: bool,
    rules: &CombatRules,
    modifiers: GlobalModifiers,
) -> u32 {
    let mut speed = rules.scale(definition.attack_speed, hero.tier, hero.level)
        * modifiers.attack_speed_bonus.one_plus();
    if synergy {
        speed = speed * rules.synergy_attack_speed.one_plus();
    }
    speed = speed * buff_multiplier(&hero.buffs, BuffStat::AttackSpeed);
    rules.attack_interval(definition.attack_interval_ticks, speed)
}

/// Damage of a turret shot.
pub(crate) fn turret_damage(
    turret: &Turret,
    definition: &TurretDefinition,
    tick: u64,
    rules: &CombatRules,
    modifiers: GlobalModifiers,
) -> Fixed {
    let mut damage = rules.scale(definition.stats.damage(), turret.tier, turret.level);
    if turret.is_overcharged(tick) {
        damage = damage * rules.overcharge_damage;
    }
    (damage * modifiers.damage_bonus.one_plus()).max(Fixed::ZERO)
}

/// Ticks between two turret shots.
pub(crate) fn turret_attack_interval(
    turret: &Turret,
    definition: &TurretDefinition,
    tick: u64,
    rules: &CombatRules,
    modifiers: GlobalModifiers,
) -> u32 {
    let mut speed = rules.scale(definition.stats.attack_speed(), turret.tier, turret.level)
        * modifiers.attack_speed_bonus.one_plus();
    if turret.is_overcharged(tick) {
        speed = speed * rules.overcharge_attack_speed;
    }
    rules.attack_interval(definition.attack_interval_ticks, speed)
}

/// Skill cooldown after reductions, at least one tick.
pub(crate) fn skill_cooldown(
    cooldown_ticks: u32,
    hero: &Hero,
    rules: &CombatRules,
    modifiers: GlobalModifiers,
) -> u64 {
    let reduction = (modifiers.cooldown_reduction
        + buff_sum(&hero.buffs, BuffStat::CooldownReduction))
    .clamp(Fixed::ZERO, rules.max_cooldown_reduction);
    let base = Fixed::from_int(i32::try_from(cooldown_ticks).unwrap_or(i32::MAX));
    u64::from((base * reduction.one_minus()).to_ticks().max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{
        Body, EnemyDefinitionId, EnemyId, FixedVec2, Health, HeroDefinitionId, HeroId, HeroState,
        Loadout, SimConfig, StatusEffect, StatusEffects, StatusKind,
    };

    fn definition(id: u32) -> HeroDefinition {
        SimConfig::demo()
            .content
            .hero(HeroDefinitionId::new(id))
            .cloned()
            .expect("demo hero exists")
    }

    fn hero(definition: &HeroDefinition) -> Hero {
        Hero {
            id: HeroId::new(0),
            definition: definition.id,
            role: definition.role,
            tier: 1,
            level: 1,
            body: Body::at_rest(FixedVec2::from_ints(10, 10), definition.radius),
            health: Health::full(definition.max_health),
            state: HeroState::Combat,
            anchor: FixedVec2::from_ints(10, 10),
            commanded_to: None,
            focus: None,
            target: None,
            engage_at: 0,
            next_attack_tick: 0,
            cooldowns: Vec::new(),
            pending_casts: Vec::new(),
            buffs: Vec::new(),
            loadout: Loadout::default(),
        }
    }

    fn enemy(kind: EnemyKind, health: i32) -> Enemy {
        Enemy {
            id: EnemyId::new(1),
            definition: EnemyDefinitionId::new(1),
            kind,
            wave: 1,
            body: Body::at_rest(FixedVec2::from_ints(12, 10), Fixed::HALF),
            health: Health::full(Fixed::from_int(health)),
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

    #[test]
    fn pipeline_applies_loadout_then_global_bonus() {
        let warden = definition(1);
        let mut attacker = hero(&warden);
        attacker.loadout = Loadout {
            resource_bonus: Some(Fixed::HALF),
            equipment_bonus: Fixed::ONE,
        };
        let modifiers = GlobalModifiers {
            damage_bonus: Fixed::ONE,
            ..GlobalModifiers::NONE
        };
        let damage = hero_damage(
            Fixed::from_int(10),
            &attacker,
            &warden,
            &enemy(EnemyKind::Normal, 100),
            &CombatRules::default(),
            modifiers,
        );
        assert_eq!(damage, Fixed::from_int(60));
    }

    #[test]
    fn frail_penalty_applies_only_against_its_kind() {
        let warden = definition(1);
        let attacker = hero(&warden);
        let rules = CombatRules::default();
        let base = Fixed::from_int(20);
        let normal = enemy(EnemyKind::Normal, 500);
        let boss = enemy(EnemyKind::Boss, 500);

        let none = GlobalModifiers::NONE;
        assert_eq!(
            hero_damage(base, &attacker, &warden, &normal, &rules, none),
            base
        );
        assert_eq!(
            hero_damage(base, &attacker, &warden, &boss, &rules, none),
            Fixed::from_int(15)
        );
    }

    #[test]
    fn last_stand_boosts_wounded_heroes() {
        let warden = definition(1);
        let mut attacker = hero(&warden);
        let _ = attacker.health.apply_damage(Fixed::from_int(200));
        let damage = hero_damage(
            Fixed::from_int(10),
            &attacker,
            &warden,
            &enemy(EnemyKind::Normal, 100),
            &CombatRules::default(),
            GlobalModifiers::NONE,
        );
        assert_eq!(damage, Fixed::from_int(15));
    }

    #[test]
    fn executioner_finishes_weakened_enemies() {
        let ranger = definition(2);
        let attacker = hero(&ranger);
        let mut target = enemy(EnemyKind::Normal, 100);
        let _ = target.health.apply_damage(Fixed::from_int(92));
        let damage = hero_damage(
            Fixed::from_int(3),
            &attacker,
            &ranger,
            &target,
            &CombatRules::default(),
            GlobalModifiers::NONE,
        );
        assert_eq!(damage, Fixed::from_int(8));
    }

    #[test]
    fn opportunist_rewards_debuffed_targets() {
        let mystic = definition(3);
        let attacker = hero(&mystic);
        let mut target = enemy(EnemyKind::Normal, 100);
        target
            .statuses
            .apply(StatusEffect::new(StatusKind::Slow, 30, Fixed::HALF, 0));
        let damage = hero_damage(
            Fixed::from_int(8),
            &attacker,
            &mystic,
            &target,
            &CombatRules::default(),
            GlobalModifiers::NONE,
        );
        assert_eq!(damage, Fixed::from_int(10));
    }

    #[test]
    fn attack_interval_respects_the_floor() {
        let ranger = definition(2);
        let mut attacker = hero(&ranger);
        attacker.buffs.push(rampart_core::ActiveBuff {
            stat: BuffStat::AttackSpeed,
            magnitude: Fixed::from_int(50),
            expires_at: 100,
        });
        let rules = CombatRules::default();
        let interval =
            hero_attack_interval(&attacker, &ranger, true, &rules, GlobalModifiers::NONE);
        assert_eq!(interval, 7);
    }

    #[test]
    fn cooldown_reduction_is_capped() {
        let warden = definition(1);
        let attacker = hero(&warden);
        let rules = CombatRules::default();
        let modifiers = GlobalModifiers {
            cooldown_reduction: Fixed::from_int(5),
            ..GlobalModifiers::NONE
        };
        let cooldown = skill_cooldown(100, &attacker, &rules, modifiers);
        assert_eq!(cooldown, 40);
    }

    #[test]
    fn ranger_passives_feed_on_hit_effects_and_lifesteal() {
        let ranger = definition(2);
        let attacker = hero(&ranger);
        let effects = passive_effects(&attacker, &ranger);
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], EffectSpec::Poison { .. }));
        assert_eq!(lifesteal(&ranger), Fixed::from_ratio(1, 10));
    }
}
