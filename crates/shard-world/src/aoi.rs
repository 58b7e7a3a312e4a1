//! Area-of-interest subscriptions: the set of entities visible to each
//! connected client/agent, recomputed from the spatial grid each tick and
//! consumed by the HTTP surface's `/state` read and `/ws` push channel
//! (§4.E supplemental).

use std::collections::{BTreeMap, BTreeSet};

use shard_types::EntityId;

use crate::zone::Zone;

/// Visible-entity radius around a subscriber's own entity. Wider than the
/// mob aggro radius so a player sees threats approaching before they close
/// to melee range.
const VISIBILITY_RADIUS: f64 = 40.0;

/// Per-subscriber visible-entity sets for one zone, rebuilt every tick
/// from the same spatial grid query the zone tick already performed.
#[derive(Debug, Clone, Default)]
pub struct AreaOfInterest {
    visible: BTreeMap<EntityId, BTreeSet<EntityId>>,
}

impl AreaOfInterest {
    /// Register `subscriber` (typically a player entity id) for AoI
    /// tracking. A no-op if already registered.
    pub fn subscribe(&mut self, subscriber: EntityId) {
        self.visible.entry(subscriber).or_default();
    }

    /// Drop a subscriber, e.g. on logout.
    pub fn unsubscribe(&mut self, subscriber: EntityId) {
        self.visible.remove(&subscriber);
    }

    /// Recompute every subscriber's visible set from the zone's current
    /// entity positions and spatial grid.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn recompute(&mut self, zone: &Zone) {
        for (subscriber, visible) in &mut self.visible {
            visible.clear();
            let Ok(origin) = zone.entity(*subscriber) else { continue };
            let (ox, oy) = (origin.x, origin.y);
            for candidate_id in zone.grid.candidates_near(ox, oy) {
                let Ok(candidate) = zone.entity(candidate_id) else { continue };
                let dist = (candidate.x - ox).hypot(candidate.y - oy);
                if dist <= VISIBILITY_RADIUS {
                    visible.insert(candidate_id);
                }
            }
        }
    }

    /// The entities currently visible to `subscriber`, or an empty set if
    /// not subscribed.
    #[must_use]
    pub fn visible_to(&self, subscriber: EntityId) -> BTreeSet<EntityId> {
        self.visible.get(&subscriber).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use shard_catalog::{MobSpawn, ZoneLayout};
    use shard_types::{EntityKind, ZoneBounds, ZoneId};

    use super::*;

    fn layout() -> ZoneLayout {
        ZoneLayout {
            id: ZoneId::new(),
            name: String::from("meadow"),
            bounds: ZoneBounds { min_x: 0.0, min_y: 0.0, max_x: 200.0, max_y: 200.0 },
            mob_spawns: vec![MobSpawn {
                mob_name: String::from("Rat"),
                x: 10.0,
                y: 10.0,
                level: 1,
                max_hp: 5,
                xp_reward: 1,
                loot_table: String::from("rat"),
                skinnable: false,
            }],
            resource_nodes: Vec::new(),
            portals: Vec::new(),
        }
    }

    #[test]
    fn visible_includes_nearby_not_far() {
        let zone = Zone::from_layout(&layout());
        let mob_id = zone.entities().find(|e| e.kind == EntityKind::Mob).expect("mob").id;

        let mut aoi = AreaOfInterest::default();
        aoi.subscribe(mob_id);
        aoi.recompute(&zone);
        assert!(aoi.visible_to(mob_id).contains(&mob_id));
    }

    #[test]
    fn unsubscribe_clears_visibility() {
        let zone = Zone::from_layout(&layout());
        let mob_id = zone.entities().next().expect("has entity").id;
        let mut aoi = AreaOfInterest::default();
        aoi.subscribe(mob_id);
        aoi.recompute(&zone);
        aoi.unsubscribe(mob_id);
        assert!(aoi.visible_to(mob_id).is_empty());
    }
}
