//! Corpse decay: step 6 of the zone tick. A skinnable corpse is removed
//! once `skinnable_until` has elapsed (§3 corpse lifecycle).

use shard_types::{EntityId, EntityKind};

use crate::events::WorldEvent;
use crate::zone::Zone;

/// Remove every corpse whose decay window has elapsed as of `current_tick`.
pub fn tick_corpse_decay(zone: &mut Zone, current_tick: u64) -> Vec<WorldEvent> {
    let expired: Vec<EntityId> = zone
        .entities()
        .filter(|e| e.kind == EntityKind::Corpse)
        .filter(|e| e.skinnable_until.is_some_and(|until| current_tick >= until))
        .map(|e| e.id)
        .collect();

    let mut events = Vec::new();
    for id in expired {
        zone.remove_entity(id);
        events.push(WorldEvent::CorpseDecayed { entity: id });
    }
    events
}

#[cfg(test)]
mod tests {
    use shard_catalog::ZoneLayout;
    use shard_types::{Entity, ZoneBounds, ZoneId};

    use super::*;

    fn empty_zone() -> Zone {
        Zone::from_layout(&ZoneLayout {
            id: ZoneId::new(),
            name: String::from("graveyard"),
            bounds: ZoneBounds { min_x: 0.0, min_y: 0.0, max_x: 50.0, max_y: 50.0 },
            mob_spawns: Vec::new(),
            resource_nodes: Vec::new(),
            portals: Vec::new(),
        })
    }

    fn corpse(skinnable_until: u64) -> Entity {
        Entity {
            id: shard_types::EntityId::new(),
            kind: EntityKind::Corpse,
            name: String::from("Goblin Corpse"),
            x: 1.0,
            y: 1.0,
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
            stats: shard_types::Stats { strength: 0, agility: 0, intellect: 0, vitality: 0 },
            effective_stats: shard_types::Stats { strength: 0, agility: 0, intellect: 0, vitality: 0 },
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
            skinnable_until: Some(skinnable_until),
            mob_name: Some(String::from("Goblin")),
        }
    }

    #[test]
    fn corpse_decays_after_window() {
        let mut zone = empty_zone();
        let entity = corpse(50);
        let id = entity.id;
        zone.insert_entity(entity);

        assert!(tick_corpse_decay(&mut zone, 40).is_empty());
        let events = tick_corpse_decay(&mut zone, 50);
        assert_eq!(events.len(), 1);
        assert!(zone.entity(id).is_err());
    }
}
