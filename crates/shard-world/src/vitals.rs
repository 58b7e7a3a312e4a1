//! Per-tick vital recalculation: effect ticking (step 1), cooldown expiry
//! (step 2), and hp/essence regen (step 3) -- §4.E.

use shard_types::Entity;

use crate::events::WorldEvent;

/// Fraction of max hp/essence regenerated per tick when no effect is
/// overriding it. One twentieth of max per tick is a gentle passive
/// regen; combat techniques restore essence far faster.
const REGEN_NUMERATOR: u32 = 1;
const REGEN_DENOMINATOR: u32 = 20;

/// Recompute `effective_stats` from base stats, non-broken equipment
/// bonuses, and active buff/debuff stat modifiers, then clamp current
/// hp/essence to the (possibly changed) max.
pub fn recalculate_entity_vitals(entity: &mut Entity) {
    let mut effective = entity.stats;
    for item in entity.equipment.values() {
        let bonus = item.effective_stats();
        effective = effective.saturating_add(bonus);
        if let Some(affix) = item.bonus_affix.filter(|_| !item.broken) {
            effective = apply_affix(effective, affix);
        }
    }
    for active in &entity.active_effects {
        for modifier in &active.stat_modifiers {
            effective = apply_stat_modifier(effective, modifier);
        }
    }
    entity.effective_stats = effective;
    entity.set_hp(i64::from(entity.hp));
}

fn apply_affix(stats: shard_types::Stats, affix: shard_types::BonusAffix) -> shard_types::Stats {
    apply_stat_modifier(stats, &shard_types::StatModifier { stat: affix.stat, amount: affix.amount })
}

fn apply_stat_modifier(mut stats: shard_types::Stats, modifier: &shard_types::StatModifier) -> shard_types::Stats {
    use shard_types::AffixStat;
    match modifier.stat {
        AffixStat::Strength => stats.strength = stats.strength.saturating_add(modifier.amount),
        AffixStat::Agility => stats.agility = stats.agility.saturating_add(modifier.amount),
        AffixStat::Intellect => stats.intellect = stats.intellect.saturating_add(modifier.amount),
        AffixStat::Vitality => stats.vitality = stats.vitality.saturating_add(modifier.amount),
        // Essence regen / crit chance are derived at point-of-use (technique
        // resolution), not folded into the base attribute block.
        AffixStat::EssenceRegen | AffixStat::CritChance => {}
    }
    stats
}

/// Step 1: apply HoT heal / DoT damage, decrement durations, drop expired
/// effects, and recompute effective stats.
pub fn tick_effects(entity: &mut Entity) -> Vec<WorldEvent> {
    let mut events = Vec::new();
    for active in &mut entity.active_effects {
        if let Some(heal) = active.hot_heal_per_tick {
            let current = i64::from(entity.hp);
            entity.set_hp(current.saturating_add(i64::from(heal)));
        }
        if let Some(damage) = active.dot_damage {
            let absorbed = active.shield_hp.unwrap_or(0).min(damage);
            if let Some(shield) = active.shield_hp.as_mut() {
                *shield = shield.saturating_sub(absorbed);
            }
            let remaining_damage = damage.saturating_sub(absorbed);
            let current = i64::from(entity.hp);
            entity.set_hp(current.saturating_sub(i64::from(remaining_damage)));
        }
    }

    let mut expired_names = Vec::new();
    entity.active_effects.retain_mut(|active| {
        let expired = active.tick_down();
        if expired {
            expired_names.push(active.name.clone());
        }
        !expired
    });
    for name in expired_names {
        events.push(WorldEvent::EffectExpired { entity: entity.id, name });
    }

    recalculate_entity_vitals(entity);
    if entity.is_dead() {
        events.push(WorldEvent::EntityDied { entity: entity.id });
    }
    events
}

/// Step 2: drop cooldown entries that have expired as of `current_tick`.
pub fn tick_cooldowns(entity: &mut Entity, current_tick: u64) -> Vec<WorldEvent> {
    let mut expired = Vec::new();
    entity.cooldowns.retain(|technique, expires_at| {
        let is_expired = *expires_at <= current_tick;
        if is_expired {
            expired.push(*technique);
        }
        !is_expired
    });
    expired
        .into_iter()
        .map(|technique| WorldEvent::CooldownExpired { entity: entity.id, technique })
        .collect()
}

/// Step 3: passively regenerate hp/essence toward max by a fixed fraction
/// per tick. A dead entity does not regenerate.
#[allow(clippy::arithmetic_side_effects)]
pub fn tick_regen(entity: &mut Entity) {
    if entity.is_dead() {
        return;
    }
    let hp_gain = entity.max_hp / REGEN_DENOMINATOR.max(1) * REGEN_NUMERATOR;
    let current_hp = i64::from(entity.hp);
    entity.set_hp(current_hp.saturating_add(i64::from(hp_gain)));

    if let (Some(essence), Some(max_essence)) = (entity.essence, entity.max_essence) {
        let gain = max_essence / REGEN_DENOMINATOR.max(1) * REGEN_NUMERATOR;
        entity.essence = Some(essence.saturating_add(gain).min(max_essence));
    }
}

#[cfg(test)]
mod tests {
    use shard_types::{ActiveEffect, EffectId, EffectKind, EntityId, EntityKind, TechniqueId};

    use super::*;

    fn blank_entity() -> Entity {
        Entity {
            id: EntityId::new(),
            kind: EntityKind::Player,
            name: String::from("hero"),
            x: 0.0,
            y: 0.0,
            hp: 50,
            max_hp: 100,
            essence: Some(20),
            max_essence: Some(100),
            wallet_address: None,
            character_token_id: None,
            level: Some(1),
            xp: Some(0),
            xp_reward: None,
            race_id: None,
            class_id: None,
            gender: None,
            kills: None,
            stats: shard_types::Stats { strength: 10, agility: 10, intellect: 10, vitality: 10 },
            effective_stats: shard_types::Stats { strength: 10, agility: 10, intellect: 10, vitality: 10 },
            equipment: std::collections::BTreeMap::new(),
            learned_techniques: std::collections::BTreeSet::new(),
            active_effects: Vec::new(),
            cooldowns: std::collections::BTreeMap::new(),
            completed_quests: std::collections::BTreeSet::new(),
            professions: std::collections::BTreeMap::new(),
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
    fn regen_heals_toward_max() {
        let mut entity = blank_entity();
        tick_regen(&mut entity);
        assert!(entity.hp > 50);
        assert!(entity.hp <= entity.max_hp);
    }

    #[test]
    fn dead_entity_does_not_regen() {
        let mut entity = blank_entity();
        entity.hp = 0;
        tick_regen(&mut entity);
        assert_eq!(entity.hp, 0);
    }

    #[test]
    fn dot_damages_through_shield_then_hp() {
        let mut entity = blank_entity();
        entity.active_effects.push(ActiveEffect {
            id: EffectId::new(),
            technique_id: TechniqueId::new(),
            name: String::from("Poison"),
            effect_type: EffectKind::Dot,
            caster_id: EntityId::new(),
            applied_at_tick: 0,
            duration_ticks: 3,
            remaining_ticks: 3,
            stat_modifiers: Vec::new(),
            hot_heal_per_tick: None,
            dot_damage: Some(15),
            shield_hp: Some(5),
            shield_max_hp: Some(5),
        });
        tick_effects(&mut entity);
        assert_eq!(entity.hp, 40);
    }

    #[test]
    fn effect_expires_after_duration() {
        let mut entity = blank_entity();
        entity.active_effects.push(ActiveEffect {
            id: EffectId::new(),
            technique_id: TechniqueId::new(),
            name: String::from("Rage"),
            effect_type: EffectKind::Buff,
            caster_id: entity.id,
            applied_at_tick: 0,
            duration_ticks: 1,
            remaining_ticks: 1,
            stat_modifiers: Vec::new(),
            hot_heal_per_tick: None,
            dot_damage: None,
            shield_hp: None,
            shield_max_hp: None,
        });
        let events = tick_effects(&mut entity);
        assert!(entity.active_effects.is_empty());
        assert!(events.iter().any(|e| matches!(e, WorldEvent::EffectExpired { .. })));
    }

    #[test]
    fn cooldown_expires_at_tick() {
        let mut entity = blank_entity();
        let technique = TechniqueId::new();
        entity.cooldowns.insert(technique, 10);
        assert!(tick_cooldowns(&mut entity, 5).is_empty());
        let events = tick_cooldowns(&mut entity, 10);
        assert_eq!(events.len(), 1);
        assert!(entity.cooldowns.is_empty());
    }
}
