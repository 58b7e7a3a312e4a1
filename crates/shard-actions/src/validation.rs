//! Synchronous pre-checks shared by the action handlers (§4.F/§7 rejection
//! taxonomy).
//!
//! Mirrors the teacher's staged `validate_*` functions
//! (`actions/validation.rs`): each check takes the minimal state it needs
//! and returns `Result<(), RejectionReason>`. Checks that require an async
//! chain read (gold/item balances) are not here -- those live inline in
//! `handlers` where the `ChainDriver` call already is.

use shard_types::{Entity, EquipmentSlot, Profession, RejectionReason, TechniqueId};

/// Euclidean distance between two entities' positions.
#[must_use]
pub fn distance(a: &Entity, b: &Entity) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Reject if `actor` and `target` are further apart than `max_range`.
pub fn validate_range(actor: &Entity, target: &Entity, max_range: f64) -> Result<(), RejectionReason> {
    if distance(actor, target) > max_range {
        return Err(RejectionReason::OutOfRange);
    }
    Ok(())
}

/// Reject if `entity` has learned a technique requiring a higher profession
/// tier than `tool_tier` the entity currently wields, for gathering actions.
pub fn validate_tool_tier(node_tier: Option<u32>, tool_tier: u32) -> Result<(), RejectionReason> {
    if let Some(required) = node_tier {
        if tool_tier < required {
            return Err(RejectionReason::ToolTierTooLow);
        }
    }
    Ok(())
}

/// Reject if the equipped tool in `slot` is broken.
pub fn validate_tool_not_broken(entity: &Entity, slot: EquipmentSlot) -> Result<(), RejectionReason> {
    if entity.equipment.get(&slot).is_some_and(|item| item.broken) {
        return Err(RejectionReason::ToolBroken);
    }
    Ok(())
}

/// Reject if `entity` has not learned `profession`.
pub fn validate_profession_known(entity: &Entity, profession: Profession) -> Result<(), RejectionReason> {
    if entity.professions.contains_key(&profession) {
        Ok(())
    } else {
        Err(RejectionReason::ProfessionMissing)
    }
}

/// Reject if a resource node has no charges remaining.
pub const fn validate_node_charges(charges: Option<u32>) -> Result<(), RejectionReason> {
    match charges {
        Some(0) => Err(RejectionReason::NodeDepleted),
        _ => Ok(()),
    }
}

/// Reject if `technique_id` is still cooling down for `entity`, returning
/// the remaining ticks in the rejection when it is.
pub fn validate_cooldown(
    entity: &Entity,
    technique_id: TechniqueId,
    current_tick: u64,
) -> Result<(), RejectionReason> {
    if let Some(&expires_at) = entity.cooldowns.get(&technique_id) {
        if current_tick < expires_at {
            return Err(RejectionReason::OnCooldown);
        }
    }
    Ok(())
}

/// Reject if `entity` has not learned `technique_id` (catalog, signature, or
/// ultimate).
pub fn validate_technique_learned(entity: &Entity, technique_id: TechniqueId) -> Result<(), RejectionReason> {
    let known = entity.learned_techniques.contains(&technique_id)
        || entity.signature_technique_id == Some(technique_id)
        || entity.ultimate_technique_id == Some(technique_id);
    if known {
        Ok(())
    } else {
        Err(RejectionReason::TechniqueNotLearned)
    }
}

/// Reject if `entity` does not have at least `required` essence.
pub const fn validate_essence(entity: &Entity, required: u32) -> Result<(), RejectionReason> {
    match entity.essence {
        Some(available) if available >= required => Ok(()),
        _ => Err(RejectionReason::InsufficientEssence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shard_types::{ClassId, EntityId, EntityKind, Gender, RaceId, Stats};
    use std::collections::{BTreeMap, BTreeSet};

    fn entity_at(x: f64, y: f64) -> Entity {
        Entity {
            id: EntityId::new(),
            kind: EntityKind::Player,
            name: "A".to_owned(),
            x,
            y,
            hp: 100,
            max_hp: 100,
            essence: Some(10),
            max_essence: Some(10),
            wallet_address: None,
            character_token_id: None,
            level: Some(1),
            xp: Some(0),
            xp_reward: None,
            race_id: Some(RaceId::Human),
            class_id: Some(ClassId::Warrior),
            gender: Some(Gender::Male),
            kills: Some(0),
            stats: Stats { strength: 10, agility: 10, intellect: 10, vitality: 10 },
            effective_stats: Stats { strength: 10, agility: 10, intellect: 10, vitality: 10 },
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
    fn range_check_rejects_when_too_far() {
        let a = entity_at(0.0, 0.0);
        let b = entity_at(100.0, 0.0);
        assert_eq!(validate_range(&a, &b, 10.0), Err(RejectionReason::OutOfRange));
        assert_eq!(validate_range(&a, &b, 200.0), Ok(()));
    }

    #[test]
    fn node_depleted_when_zero_charges() {
        assert_eq!(validate_node_charges(Some(0)), Err(RejectionReason::NodeDepleted));
        assert_eq!(validate_node_charges(Some(3)), Ok(()));
        assert_eq!(validate_node_charges(None), Ok(()));
    }

    #[test]
    fn profession_missing_rejected() {
        let entity = entity_at(0.0, 0.0);
        assert_eq!(
            validate_profession_known(&entity, Profession::Mining),
            Err(RejectionReason::ProfessionMissing)
        );
    }

    #[test]
    fn cooldown_blocks_until_expiry() {
        let mut entity = entity_at(0.0, 0.0);
        let technique_id = TechniqueId::new();
        entity.cooldowns.insert(technique_id, 100);
        assert_eq!(validate_cooldown(&entity, technique_id, 50), Err(RejectionReason::OnCooldown));
        assert_eq!(validate_cooldown(&entity, technique_id, 150), Ok(()));
    }

    #[test]
    fn essence_check() {
        let entity = entity_at(0.0, 0.0);
        assert_eq!(validate_essence(&entity, 5), Ok(()));
        assert_eq!(validate_essence(&entity, 50), Err(RejectionReason::InsufficientEssence));
    }
}
