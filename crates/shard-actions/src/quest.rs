//! Quest acceptance and completion (`spec.md` §4.F `quest_accept`/
//! `quest_complete`).
//!
//! `Entity` tracks only `completed_quests` -- there is no "currently
//! accepted" set in the data model. `quest_accept` is therefore a stateless
//! eligibility check (level gate, not already completed) with nothing to
//! persist; `quest_complete` repeats that same eligibility check before
//! awarding rewards, so a `QuestComplete` action with no prior `QuestAccept`
//! still only succeeds when the entity actually qualifies.

use shard_types::{Entity, QuestDefinition, RejectionReason};

/// Check whether `entity` is eligible to accept or complete `quest`.
///
/// Eligible means: the entity's level meets `quest.min_level`, and the
/// quest has not already been completed by this entity.
pub fn check_eligibility(entity: &Entity, quest: &QuestDefinition) -> Result<(), RejectionReason> {
    if entity.completed_quests.contains(&quest.id) {
        return Err(RejectionReason::InvalidInput);
    }
    let level = entity.level.unwrap_or(0);
    if level < quest.min_level {
        return Err(RejectionReason::InvalidInput);
    }
    Ok(())
}

/// The reward breakdown for a completed quest, to be applied by the caller
/// (XP via [`crate::leveling::apply_xp_gain`], copper/item mint via the
/// ledger/chain driver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestReward {
    /// XP awarded.
    pub xp: u64,
    /// Copper awarded.
    pub copper: u64,
    /// An item and quantity minted to the wallet, if the quest has one.
    pub item_reward: Option<(shard_types::ItemTokenId, u32)>,
}

/// Mark `quest` completed on `entity` and return its reward breakdown.
///
/// The caller must have already checked [`check_eligibility`]; this
/// function only records the completion and reads back the static reward
/// fields.
pub fn complete_quest(entity: &mut Entity, quest: &QuestDefinition) -> QuestReward {
    entity.completed_quests.insert(quest.id);
    QuestReward { xp: quest.xp_reward, copper: quest.copper_reward, item_reward: quest.item_reward }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shard_types::{ClassId, EntityId, EntityKind, Gender, QuestId, RaceId, Stats};
    use std::collections::{BTreeMap, BTreeSet};

    fn entity(level: u32) -> Entity {
        Entity {
            id: EntityId::new(),
            kind: EntityKind::Player,
            name: "A".to_owned(),
            x: 0.0,
            y: 0.0,
            hp: 100,
            max_hp: 100,
            essence: Some(10),
            max_essence: Some(10),
            wallet_address: None,
            character_token_id: None,
            level: Some(level),
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

    fn quest() -> QuestDefinition {
        QuestDefinition {
            id: QuestId::new(),
            name: "Clear the Warren".to_owned(),
            description: "Kill 5 rabbits.".to_owned(),
            min_level: 2,
            xp_reward: 500,
            copper_reward: 50,
            item_reward: None,
        }
    }

    #[test]
    fn below_level_is_ineligible() {
        let entity = entity(1);
        let quest = quest();
        assert_eq!(check_eligibility(&entity, &quest), Err(RejectionReason::InvalidInput));
    }

    #[test]
    fn already_completed_is_ineligible() {
        let mut entity = entity(5);
        let quest = quest();
        entity.completed_quests.insert(quest.id);
        assert_eq!(check_eligibility(&entity, &quest), Err(RejectionReason::InvalidInput));
    }

    #[test]
    fn eligible_entity_completes_and_is_rewarded() {
        let mut entity = entity(5);
        let quest = quest();
        assert!(check_eligibility(&entity, &quest).is_ok());
        let reward = complete_quest(&mut entity, &quest);
        assert_eq!(reward.xp, 500);
        assert_eq!(reward.copper, 50);
        assert!(entity.completed_quests.contains(&quest.id));
    }
}
