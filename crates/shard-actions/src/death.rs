//! Death handling: kill XP splitting, loot rolls, corpse creation, and
//! player respawn/XP-debt (`spec.md` §4.G "Death").
//!
//! Kept pure like the teacher's `death.rs`: every function here computes a
//! result from a snapshot and mutates nothing. The caller (`handlers`)
//! applies the result -- removing the mob entity, spawning the corpse,
//! minting loot through `ChainDriver`/`ConservationLedger`, and respawning
//! the player.

use rand::Rng;
use shard_catalog::LootTable;
use shard_types::{Entity, EntityId, EntityKind, ItemTokenId};

use crate::costs::PARTY_XP_BONUS_PER_MEMBER;
use crate::leveling;

/// One entity's share of a kill's XP reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpShare {
    /// The entity credited.
    pub entity_id: EntityId,
    /// The XP awarded to this entity.
    pub xp: u64,
}

/// Split `xp_reward` across `party_members` (including the killer if it is
/// itself a party member), applying a `+10%` bonus per member beyond the
/// first, capped at [`shard_types::PARTY_MAX_SIZE`].
///
/// If `party_members` is empty, the full reward goes to `killer`.
#[must_use]
pub fn split_kill_xp(xp_reward: u64, killer: EntityId, party_members: &[EntityId]) -> Vec<XpShare> {
    if party_members.is_empty() {
        return vec![XpShare { entity_id: killer, xp: xp_reward }];
    }

    let capped_size = party_members.len().min(shard_types::PARTY_MAX_SIZE);
    #[allow(clippy::cast_precision_loss)]
    let bonus_multiplier = 1.0 + (capped_size.saturating_sub(1) as f64) * PARTY_XP_BONUS_PER_MEMBER;
    #[allow(clippy::cast_precision_loss)]
    let total = xp_reward as f64 * bonus_multiplier;
    #[allow(clippy::cast_precision_loss)]
    let per_member = total / party_members.len().max(1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let per_member_xp = per_member as u64;

    party_members.iter().map(|&entity_id| XpShare { entity_id, xp: per_member_xp }).collect()
}

/// One item roll that succeeded from a [`LootTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LootDrop {
    /// The item minted.
    pub token_id: ItemTokenId,
    /// Quantity minted.
    pub quantity: u32,
}

/// The result of rolling a mob's loot table on death.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootResult {
    /// Copper minted to the killer's wallet.
    pub copper: u64,
    /// Items minted to the killer's wallet.
    pub drops: Vec<LootDrop>,
}

/// Roll `table` once, independently rolling each entry's drop chance.
pub fn roll_loot(table: &LootTable, rng: &mut impl Rng) -> LootResult {
    let copper = if table.gold_max > table.gold_min {
        rng.random_range(table.gold_min..=table.gold_max)
    } else {
        table.gold_min
    };

    let drops = table
        .entries
        .iter()
        .filter(|entry| rng.random::<f64>() < entry.drop_chance)
        .map(|entry| {
            let quantity = if entry.quantity_max > entry.quantity_min {
                rng.random_range(entry.quantity_min..=entry.quantity_max)
            } else {
                entry.quantity_min
            };
            LootDrop { token_id: entry.token_id, quantity }
        })
        .collect();

    LootResult { copper, drops }
}

/// Ticks a mob corpse remains skinnable/visible before decaying, absent a
/// zone-specific override.
pub const DEFAULT_CORPSE_LIFETIME_TICKS: u64 = 300;

/// Build the corpse entity left behind by a dead mob, positioned where the
/// mob died.
#[must_use]
pub fn build_corpse(mob: &Entity, current_tick: u64, lifetime_ticks: u64) -> Entity {
    Entity {
        id: EntityId::new(),
        kind: EntityKind::Corpse,
        name: format!("{} corpse", mob.name),
        x: mob.x,
        y: mob.y,
        hp: 0,
        max_hp: 0,
        essence: None,
        max_essence: None,
        wallet_address: None,
        character_token_id: None,
        level: None,
        xp: None,
        xp_reward: None,
        race_id: None,
        class_id: None,
        gender: None,
        kills: None,
        stats: mob.stats,
        effective_stats: mob.stats,
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
        skinned: Some(false),
        skinnable_until: Some(current_tick.saturating_add(lifetime_ticks)),
        mob_name: Some(mob.name.clone()),
    }
}

/// Respawn a dead player: restore hp/essence, apply XP debt, and clear
/// active effects/cooldowns. Position reset is the caller's job (it needs
/// the zone's configured respawn point).
pub fn respawn_player(entity: &mut Entity) {
    leveling::apply_xp_debt(entity);
    entity.hp = entity.max_hp;
    if let Some(max_essence) = entity.max_essence {
        entity.essence = Some(max_essence);
    }
    entity.active_effects.clear();
    entity.cooldowns.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use shard_types::{ClassId, Gender, RaceId, Stats};

    fn mob() -> Entity {
        Entity {
            id: EntityId::new(),
            kind: EntityKind::Mob,
            name: "Wolf".to_owned(),
            x: 10.0,
            y: 20.0,
            hp: 0,
            max_hp: 50,
            essence: None,
            max_essence: None,
            wallet_address: None,
            character_token_id: None,
            level: Some(3),
            xp: None,
            xp_reward: Some(100),
            race_id: None,
            class_id: None,
            gender: None,
            kills: None,
            stats: Stats { strength: 5, agility: 5, intellect: 0, vitality: 5 },
            effective_stats: Stats { strength: 5, agility: 5, intellect: 0, vitality: 5 },
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
    fn solo_kill_awards_full_xp() {
        let killer = EntityId::new();
        let shares = split_kill_xp(100, killer, &[]);
        assert_eq!(shares, vec![XpShare { entity_id: killer, xp: 100 }]);
    }

    #[test]
    fn party_kill_splits_with_bonus() {
        let members = vec![EntityId::new(), EntityId::new()];
        let shares = split_kill_xp(100, members[0], &members);
        assert_eq!(shares.len(), 2);
        // total = 100 * 1.10 = 110, split two ways = 55 each
        assert_eq!(shares[0].xp, 55);
    }

    #[test]
    fn loot_roll_respects_bounds() {
        let table = LootTable {
            gold_min: 10,
            gold_max: 20,
            entries: vec![shard_catalog::LootEntry {
                token_id: ItemTokenId::new(),
                quantity_min: 1,
                quantity_max: 3,
                drop_chance: 1.0,
            }],
        };
        let mut rng = StdRng::seed_from_u64(7);
        let result = roll_loot(&table, &mut rng);
        assert!(result.copper >= 10 && result.copper <= 20);
        assert_eq!(result.drops.len(), 1);
        assert!(result.drops[0].quantity >= 1 && result.drops[0].quantity <= 3);
    }

    #[test]
    fn corpse_inherits_mob_position_and_name() {
        let mob = mob();
        let corpse = build_corpse(&mob, 1_000, 300);
        assert_eq!(corpse.kind, EntityKind::Corpse);
        assert_eq!((corpse.x, corpse.y), (10.0, 20.0));
        assert_eq!(corpse.mob_name, Some("Wolf".to_owned()));
        assert_eq!(corpse.skinnable_until, Some(1_300));
    }

    #[test]
    fn respawn_restores_full_hp() {
        let mut entity = mob();
        entity.kind = EntityKind::Player;
        entity.hp = 0;
        entity.xp = Some(1_000);
        entity.race_id = Some(RaceId::Human);
        entity.class_id = Some(ClassId::Warrior);
        entity.gender = Some(Gender::Male);
        respawn_player(&mut entity);
        assert_eq!(entity.hp, entity.max_hp);
        assert_eq!(entity.xp, Some(900));
    }
}
