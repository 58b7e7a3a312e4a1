//! Resource node respawn check: step 5 of the zone tick (§4.E, §3
//! "depleted_at_tick + respawn_ticks" invariant).

use shard_types::{EntityId, EntityKind};

use crate::events::WorldEvent;
use crate::zone::Zone;

/// Restore any depleted node whose respawn window has elapsed to full
/// charges, clearing `depleted_at_tick`.
pub fn tick_resource_nodes(zone: &mut Zone, current_tick: u64) -> Vec<WorldEvent> {
    let node_ids: Vec<EntityId> = zone
        .entities()
        .filter(|e| matches!(e.kind, EntityKind::OreNode | EntityKind::FlowerNode))
        .map(|e| e.id)
        .collect();

    let mut events = Vec::new();
    for id in node_ids {
        let Ok(node) = zone.entity_mut(id) else { continue };
        let Some(depleted_at) = node.depleted_at_tick else { continue };
        let Some(respawn_ticks) = node.respawn_ticks else { continue };
        if current_tick.saturating_sub(depleted_at) >= respawn_ticks {
            node.charges = node.max_charges;
            node.depleted_at_tick = None;
            events.push(WorldEvent::NodeRespawned { entity: id });
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use shard_catalog::{ResourceNodeSpawn, ZoneLayout};
    use shard_types::{NodeMaterial, ZoneBounds, ZoneId};

    use super::*;

    fn layout() -> ZoneLayout {
        ZoneLayout {
            id: ZoneId::new(),
            name: String::from("quarry"),
            bounds: ZoneBounds { min_x: 0.0, min_y: 0.0, max_x: 50.0, max_y: 50.0 },
            mob_spawns: Vec::new(),
            resource_nodes: vec![ResourceNodeSpawn {
                name: String::from("Iron Vein"),
                material: NodeMaterial::Ore { ore_kind: String::from("iron") },
                x: 5.0,
                y: 5.0,
                tier: 1,
                max_charges: 3,
                respawn_ticks: 10,
            }],
            portals: Vec::new(),
        }
    }

    #[test]
    fn node_respawns_after_window() {
        let mut zone = Zone::from_layout(&layout());
        let id = zone.entities().next().expect("node exists").id;
        zone.entity_mut(id).expect("node exists").charges = Some(0);
        zone.entity_mut(id).expect("node exists").depleted_at_tick = Some(100);

        assert!(tick_resource_nodes(&mut zone, 105).is_empty());
        let events = tick_resource_nodes(&mut zone, 110);
        assert_eq!(events.len(), 1);
        assert_eq!(zone.entity(id).expect("node exists").charges, Some(3));
    }
}
