//! Damage, crit/dodge, and technique effect resolution (`spec.md` §4.G
//! "Combat resolution").
//!
//! Mirrors the teacher's `actions/combat.rs` shape: a pure `resolve_*`
//! function takes a context built from `Entity` snapshots and returns a
//! result describing what happened, with no mutation; a paired `apply_*`
//! function is the only place `Entity` state actually changes. Unlike the
//! teacher (which resolves one attacker/defender pair), technique
//! resolution here also covers area targets and the five `SecondaryEffect`
//! shapes.

use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use shard_types::{ActiveEffect, EffectId, EffectKind, Entity, SecondaryEffect, Technique};

use crate::costs::{
    BASE_CRIT_CHANCE, BASE_DODGE_CHANCE, CRIT_CHANCE_PER_AGILITY, CRIT_DAMAGE_MULTIPLIER,
    DODGE_CHANCE_PER_AGILITY, MAX_CRIT_CHANCE, MAX_DODGE_CHANCE,
};

/// The outcome of one attacker-vs-defender exchange, before either entity's
/// state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Whether the defender dodged entirely (no damage, no effect).
    pub dodged: bool,
    /// Whether the hit was a critical strike.
    pub critical: bool,
    /// Raw damage that will be subtracted from the defender's hp.
    pub damage: u32,
    /// Hp restored to the attacker via lifesteal, if any.
    pub lifesteal: u32,
}

fn crit_chance(agility: i32) -> f64 {
    let agility = f64::from(agility.max(0));
    (BASE_CRIT_CHANCE + agility * CRIT_CHANCE_PER_AGILITY).min(MAX_CRIT_CHANCE)
}

fn dodge_chance(agility: i32) -> f64 {
    let agility = f64::from(agility.max(0));
    (BASE_DODGE_CHANCE + agility * DODGE_CHANCE_PER_AGILITY).min(MAX_DODGE_CHANCE)
}

/// Resolve a basic weapon attack from `attacker` against `defender`.
///
/// `base_damage` is the attacker's weapon damage (or the unarmed default);
/// `lifesteal_fraction` is `0.0` unless the attacker's weapon or an active
/// effect grants lifesteal.
pub fn resolve_basic_attack(
    attacker: &Entity,
    defender: &Entity,
    base_damage: u32,
    lifesteal_fraction: f64,
    rng: &mut impl Rng,
) -> AttackOutcome {
    if rng.random::<f64>() < dodge_chance(defender.effective_stats.agility) {
        return AttackOutcome { dodged: true, critical: false, damage: 0, lifesteal: 0 };
    }

    let critical = rng.random::<f64>() < crit_chance(attacker.effective_stats.agility);
    let strength_bonus = attacker.effective_stats.strength.max(0);
    #[allow(clippy::cast_sign_loss)]
    let mut damage = base_damage.saturating_add(strength_bonus as u32);
    if critical {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let scaled = (f64::from(damage) * CRIT_DAMAGE_MULTIPLIER) as u32;
        damage = scaled;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lifesteal = (f64::from(damage) * lifesteal_fraction) as u32;

    AttackOutcome { dodged: false, critical, damage, lifesteal }
}

/// Apply an [`AttackOutcome`] to the participating entities.
pub fn apply_attack_outcome(attacker: &mut Entity, defender: &mut Entity, outcome: AttackOutcome) {
    if outcome.dodged {
        return;
    }
    let new_hp = i64::from(defender.hp) - i64::from(outcome.damage);
    defender.set_hp(new_hp);
    if outcome.lifesteal > 0 {
        let healed = i64::from(attacker.hp) + i64::from(outcome.lifesteal);
        attacker.set_hp(healed);
    }
}

/// Base power, before the technique's own multiplier: `floor(5 +
/// primary_stat × 0.5)` (`spec.md` §4.G).
fn base_power(technique: &Technique, caster: &Entity) -> u32 {
    let stat = if matches!(technique.technique_type, shard_types::TechniqueType::Healing) {
        caster.effective_stats.intellect
    } else {
        caster.effective_stats.intellect.max(caster.effective_stats.strength)
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = (f64::from(stat.max(0)) * crate::costs::PRIMARY_STAT_POWER_FACTOR).floor() as u32;
    scaled.saturating_add(crate::costs::BASE_POWER_FLOOR)
}

/// Apply the technique's own `power_multiplier` to its base power, as a
/// separate scaling step from the primary-stat base (`spec.md` §4.G).
fn primary_power(technique: &Technique, caster: &Entity) -> u32 {
    let base = base_power(technique, caster);
    let multiplier = technique.power_multiplier.to_f64().unwrap_or(1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let power = (f64::from(base) * multiplier) as u32;
    power
}

/// The outcome of casting one technique against one target, before either
/// entity's state is touched.
#[derive(Debug, Clone)]
pub struct TechniqueOutcome {
    /// Whether the target dodged (attack-type techniques only).
    pub dodged: bool,
    /// Whether the cast landed as a critical hit (attack-type only).
    pub critical: bool,
    /// Damage to apply to the target's hp, if this is a damaging technique.
    pub damage: Option<u32>,
    /// Healing to apply to the target's hp, if this is a healing technique.
    pub heal: Option<u32>,
    /// An active effect to attach to the target, derived from the
    /// technique's duration/secondary effect.
    pub applied_effect: Option<ActiveEffect>,
}

/// Resolve casting `technique` from `caster` onto `target` at `current_tick`.
pub fn resolve_technique(
    technique: &Technique,
    caster: &Entity,
    target: &Entity,
    current_tick: u64,
    rng: &mut impl Rng,
) -> TechniqueOutcome {
    use shard_types::TechniqueType;

    let is_offensive = matches!(technique.technique_type, TechniqueType::Attack | TechniqueType::Debuff);
    if is_offensive && rng.random::<f64>() < dodge_chance(target.effective_stats.agility) {
        return TechniqueOutcome { dodged: true, critical: false, damage: None, heal: None, applied_effect: None };
    }

    let critical = is_offensive && rng.random::<f64>() < crit_chance(caster.effective_stats.agility);
    let mut power = primary_power(technique, caster);
    if critical {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let scaled = (f64::from(power) * CRIT_DAMAGE_MULTIPLIER) as u32;
        power = scaled;
    }

    let (damage, heal) = match technique.technique_type {
        TechniqueType::Attack => (Some(power), None),
        TechniqueType::Healing => (None, Some(power)),
        TechniqueType::Buff | TechniqueType::Debuff => (None, None),
    };

    let applied_effect = build_primary_effect(technique, caster, current_tick)
        .or_else(|| build_secondary_effect(technique, caster, current_tick));

    TechniqueOutcome { dodged: false, critical, damage, heal, applied_effect }
}

fn build_primary_effect(technique: &Technique, caster: &Entity, current_tick: u64) -> Option<ActiveEffect> {
    use shard_types::TechniqueType;
    if technique.duration_ticks == 0 {
        return None;
    }
    let kind = match technique.technique_type {
        TechniqueType::Buff => EffectKind::Buff,
        TechniqueType::Debuff => EffectKind::Debuff,
        TechniqueType::Attack | TechniqueType::Healing => return None,
    };
    Some(ActiveEffect {
        id: EffectId::new(),
        technique_id: technique.id,
        name: technique.name.clone(),
        effect_type: kind,
        caster_id: caster.id,
        applied_at_tick: current_tick,
        duration_ticks: technique.duration_ticks,
        remaining_ticks: technique.duration_ticks,
        stat_modifiers: Vec::new(),
        hot_heal_per_tick: None,
        dot_damage: None,
        shield_hp: None,
        shield_max_hp: None,
    })
}

fn build_secondary_effect(technique: &Technique, caster: &Entity, current_tick: u64) -> Option<ActiveEffect> {
    let secondary = technique.secondary_effect?;
    let (kind, duration, hot, dot, shield, shield_max, modifiers) = match secondary {
        SecondaryEffect::Dot { damage_per_tick, duration_ticks } => {
            (EffectKind::Dot, duration_ticks, None, Some(damage_per_tick), None, None, Vec::new())
        }
        SecondaryEffect::Shield { shield_hp } => {
            (EffectKind::Shield, technique.duration_ticks.max(1), None, None, Some(shield_hp), Some(shield_hp), Vec::new())
        }
        SecondaryEffect::Heal { heal_per_tick, duration_ticks } => {
            (EffectKind::Hot, duration_ticks, Some(heal_per_tick), None, None, None, Vec::new())
        }
        SecondaryEffect::StatBuff { modifier, duration_ticks } => {
            (EffectKind::Buff, duration_ticks, None, None, None, None, vec![modifier])
        }
        SecondaryEffect::StatDebuff { modifier, duration_ticks } => {
            (EffectKind::Debuff, duration_ticks, None, None, None, None, vec![modifier])
        }
    };
    Some(ActiveEffect {
        id: EffectId::new(),
        technique_id: technique.id,
        name: technique.name.clone(),
        effect_type: kind,
        caster_id: caster.id,
        applied_at_tick: current_tick,
        duration_ticks: duration,
        remaining_ticks: duration,
        stat_modifiers: modifiers,
        hot_heal_per_tick: hot,
        dot_damage: dot,
        shield_hp: shield,
        shield_max_hp: shield_max,
    })
}

/// Apply a [`TechniqueOutcome`] to the participating entities.
pub fn apply_technique_outcome(caster: &mut Entity, target: &mut Entity, outcome: TechniqueOutcome) {
    if outcome.dodged {
        return;
    }
    if let Some(damage) = outcome.damage {
        let new_hp = i64::from(target.hp) - i64::from(damage);
        target.set_hp(new_hp);
    }
    if let Some(heal) = outcome.heal {
        let new_hp = i64::from(target.hp) + i64::from(heal);
        target.set_hp(new_hp);
    }
    if let Some(effect) = outcome.applied_effect {
        target.active_effects.push(effect);
    }
    let _ = caster;
}

/// Select up to `max_targets` entities from `candidates` within `radius` of
/// `(center_x, center_y)`, nearest first, used for area techniques.
#[must_use]
pub fn select_area_targets<'a>(
    candidates: &[&'a Entity],
    center_x: f64,
    center_y: f64,
    radius: f64,
    max_targets: u32,
) -> Vec<&'a Entity> {
    let mut in_range: Vec<(&Entity, f64)> = candidates
        .iter()
        .copied()
        .map(|entity| (entity, (entity.x - center_x).hypot(entity.y - center_y)))
        .filter(|(_, dist)| *dist <= radius)
        .collect();
    in_range.sort_by(|a, b| a.1.total_cmp(&b.1));
    in_range
        .into_iter()
        .take(usize::try_from(max_targets).unwrap_or(usize::MAX))
        .map(|(entity, _)| entity)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use shard_types::{ClassId, EntityId, EntityKind, Gender, RaceId, Stats};
    use std::collections::{BTreeMap, BTreeSet};

    fn entity_with_stats(stats: Stats, hp: u32) -> Entity {
        Entity {
            id: EntityId::new(),
            kind: EntityKind::Player,
            name: "A".to_owned(),
            x: 0.0,
            y: 0.0,
            hp,
            max_hp: 100,
            essence: Some(50),
            max_essence: Some(50),
            wallet_address: None,
            character_token_id: None,
            level: Some(1),
            xp: Some(0),
            xp_reward: None,
            race_id: Some(RaceId::Human),
            class_id: Some(ClassId::Warrior),
            gender: Some(Gender::Male),
            kills: Some(0),
            stats,
            effective_stats: stats,
            equipment: BTreeMap::new(),
            learned_techniques: BTreeSet::new(),
            active_effects: Vec::new(),
            cooldowns: BTreeMap::new(),
            completed_quests: BTreeSet::new(),
            professions: BTreeMap::new(),
            signature_technique_id: None,
            ultimate_technique_id: None,
            party_id: None,
            charges: None,
            max_charges: None,
            node_material: None,
            node_tier: None,
            depleted_at_tick: None,
            respawn_ticks: None,
            skinned: None,
            skinnable_until: None,
            mob_name: None,
        }
    }

    #[test]
    fn attack_deals_damage_and_reduces_hp() {
        let zero_agility = Stats { strength: 10, agility: 0, intellect: 0, vitality: 10 };
        let attacker = entity_with_stats(zero_agility, 100);
        let defender = entity_with_stats(zero_agility, 100);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = resolve_basic_attack(&attacker, &defender, 10, 0.0, &mut rng);
        let mut attacker = attacker;
        let mut defender = defender;
        apply_attack_outcome(&mut attacker, &mut defender, outcome);
        if !outcome.dodged {
            assert!(defender.hp < 100);
        }
    }

    #[test]
    fn lifesteal_heals_the_attacker() {
        let stats = Stats { strength: 10, agility: 0, intellect: 0, vitality: 10 };
        let mut attacker = entity_with_stats(stats, 50);
        let mut defender = entity_with_stats(stats, 100);
        let outcome = AttackOutcome { dodged: false, critical: false, damage: 20, lifesteal: 10 };
        apply_attack_outcome(&mut attacker, &mut defender, outcome);
        assert_eq!(defender.hp, 80);
        assert_eq!(attacker.hp, 60);
    }

    #[test]
    fn select_area_targets_respects_radius_and_cap() {
        let a = entity_with_stats(Stats { strength: 0, agility: 0, intellect: 0, vitality: 0 }, 100);
        let mut b = entity_with_stats(Stats { strength: 0, agility: 0, intellect: 0, vitality: 0 }, 100);
        b.x = 5.0;
        let mut c = entity_with_stats(Stats { strength: 0, agility: 0, intellect: 0, vitality: 0 }, 100);
        c.x = 500.0;
        let candidates = [&a, &b, &c];
        let selected = select_area_targets(&candidates, 0.0, 0.0, 10.0, 5);
        assert_eq!(selected.len(), 2);
    }

    fn sample_technique(technique_type: shard_types::TechniqueType, power_multiplier: rust_decimal::Decimal) -> Technique {
        Technique {
            id: shard_types::TechniqueId::new(),
            name: "Test".to_owned(),
            technique_type,
            target_type: shard_types::TargetType::Enemy,
            essence_cost: 10,
            cooldown_ticks: 0,
            power_multiplier,
            duration_ticks: 0,
            max_targets: 1,
            area_radius: 0.0,
            secondary_effect: None,
            quality_tier: shard_types::Quality::Common,
            level_required: 1,
        }
    }

    #[test]
    fn base_power_applies_fixed_half_stat_factor() {
        let stats = Stats { strength: 0, agility: 0, intellect: 41, vitality: 0 };
        let caster = entity_with_stats(stats, 100);
        let technique = sample_technique(shard_types::TechniqueType::Healing, rust_decimal::Decimal::new(10, 1));
        // floor(5 + 41 * 0.5) = floor(25.5) = 25
        assert_eq!(base_power(&technique, &caster), 25);
    }

    #[test]
    fn primary_power_applies_technique_multiplier_after_base() {
        let stats = Stats { strength: 0, agility: 0, intellect: 41, vitality: 0 };
        let caster = entity_with_stats(stats, 100);
        let technique = sample_technique(shard_types::TechniqueType::Healing, rust_decimal::Decimal::new(20, 1));
        // base 25, multiplier 2.0 -> 50
        assert_eq!(primary_power(&technique, &caster), 50);
    }
}
