//! `ZoneRuntime`: owns every live zone and drives its per-tick advance
//! (§4.E).

use std::collections::BTreeMap;

use rand::Rng;
use shard_catalog::Catalog;
use shard_types::ZoneId;

use crate::aoi::AreaOfInterest;
use crate::error::WorldError;
use crate::events::WorldEvent;
use crate::zone::Zone;
use crate::{ai, corpses, nodes, vitals};

/// Everything a single zone tick produced, for the caller (`shard-core`)
/// to translate into durable/typed events and broadcast over `/ws`.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Events raised while advancing this zone.
    pub events: Vec<WorldEvent>,
}

/// Owns every live zone and advances them on each scheduler tick.
pub struct ZoneRuntime {
    zones: BTreeMap<ZoneId, Zone>,
    aoi: BTreeMap<ZoneId, AreaOfInterest>,
}

impl ZoneRuntime {
    /// An empty runtime with no zones instantiated yet.
    #[must_use]
    pub fn new() -> Self {
        Self { zones: BTreeMap::new(), aoi: BTreeMap::new() }
    }

    /// Look up a zone's live state, instantiating it from the catalog
    /// layout on first access.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ZoneNotFound`] if `zone_id` has no catalog
    /// layout.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn get_or_create_zone<'a>(&'a mut self, catalog: &Catalog, zone_id: ZoneId) -> Result<&'a mut Zone, WorldError> {
        if !self.zones.contains_key(&zone_id) {
            let layout = catalog.zone_layout(zone_id).map_err(|_| WorldError::ZoneNotFound(zone_id))?;
            tracing::info!(zone = %zone_id, entities = layout.mob_spawns.len() + layout.resource_nodes.len(), "instantiating zone");
            self.zones.insert(zone_id, Zone::from_layout(layout));
            self.aoi.insert(zone_id, AreaOfInterest::default());
        }
        self.zones.get_mut(&zone_id).ok_or(WorldError::ZoneNotFound(zone_id))
    }

    /// Borrow a zone's live state without instantiating it.
    pub fn zone(&self, zone_id: ZoneId) -> Result<&Zone, WorldError> {
        self.zones.get(&zone_id).ok_or(WorldError::ZoneNotFound(zone_id))
    }

    /// Borrow a zone's live state mutably without instantiating it.
    pub fn zone_mut(&mut self, zone_id: ZoneId) -> Result<&mut Zone, WorldError> {
        self.zones.get_mut(&zone_id).ok_or(WorldError::ZoneNotFound(zone_id))
    }

    /// The area-of-interest table for a zone.
    pub fn aoi(&self, zone_id: ZoneId) -> Result<&AreaOfInterest, WorldError> {
        self.aoi.get(&zone_id).ok_or(WorldError::ZoneNotFound(zone_id))
    }

    /// The area-of-interest table for a zone, mutably (subscribe/unsubscribe).
    pub fn aoi_mut(&mut self, zone_id: ZoneId) -> Result<&mut AreaOfInterest, WorldError> {
        self.aoi.get_mut(&zone_id).ok_or(WorldError::ZoneNotFound(zone_id))
    }

    /// Every zone id currently instantiated.
    pub fn zone_ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.zones.keys().copied()
    }

    /// Advance every instantiated zone by one tick, in the fixed order
    /// from §4.E: effect ticks, cooldown expiry, regen, AI, node respawn,
    /// corpse decay. The spatial grid and area-of-interest table are
    /// rebuilt once per zone at the start of its tick.
    pub fn tick(&mut self, rng: &mut impl Rng) -> BTreeMap<ZoneId, TickReport> {
        let mut reports = BTreeMap::new();
        for (zone_id, zone) in &mut self.zones {
            zone.tick = zone.tick.saturating_add(1);
            let current_tick = zone.tick;

            zone.grid.rebuild(zone.entities());

            let mut events = Vec::new();
            let entity_ids: Vec<_> = zone.entities().map(|e| e.id).collect();
            for id in &entity_ids {
                let Ok(entity) = zone.entity_mut(*id) else { continue };
                events.extend(vitals::tick_effects(entity));
            }
            for id in &entity_ids {
                let Ok(entity) = zone.entity_mut(*id) else { continue };
                events.extend(vitals::tick_cooldowns(entity, current_tick));
            }
            for id in &entity_ids {
                let Ok(entity) = zone.entity_mut(*id) else { continue };
                vitals::tick_regen(entity);
            }

            events.extend(ai::run_ai(zone, rng));
            events.extend(nodes::tick_resource_nodes(zone, current_tick));
            events.extend(corpses::tick_corpse_decay(zone, current_tick));

            if let Some(aoi) = self.aoi.get_mut(zone_id) {
                aoi.recompute(zone);
            }

            reports.insert(*zone_id, TickReport { events });
        }
        reports
    }
}

impl Default for ZoneRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use shard_catalog::{MobSpawn, ZoneLayout};
    use shard_types::ZoneBounds;

    use super::*;

    fn catalog_with_zone() -> (Catalog, ZoneId) {
        let zone_id = ZoneId::new();
        let layout = ZoneLayout {
            id: zone_id,
            name: String::from("wild-meadow"),
            bounds: ZoneBounds { min_x: 0.0, min_y: 0.0, max_x: 100.0, max_y: 100.0 },
            mob_spawns: vec![MobSpawn {
                mob_name: String::from("Goblin"),
                x: 10.0,
                y: 10.0,
                level: 1,
                max_hp: 20,
                xp_reward: 5,
                loot_table: String::from("goblin"),
                skinnable: false,
            }],
            resource_nodes: Vec::new(),
            portals: Vec::new(),
        };
        let dir = std::env::temp_dir().join(format!("shard-world-test-{zone_id}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        std::fs::write(dir.join("items.yaml"), "[]").expect("write items");
        std::fs::write(dir.join("recipes.yaml"), "[]").expect("write recipes");
        std::fs::write(dir.join("techniques.yaml"), "[]").expect("write techniques");
        std::fs::write(dir.join("zones.yaml"), serde_yml::to_string(&vec![layout]).expect("serialize")).expect("write zones");
        std::fs::write(dir.join("loot_tables.yaml"), "{}").expect("write loot tables");
        let catalog = Catalog::load(&dir).expect("catalog loads");
        (catalog, zone_id)
    }

    #[test]
    fn get_or_create_zone_instantiates_once() {
        let (catalog, zone_id) = catalog_with_zone();
        let mut runtime = ZoneRuntime::new();
        runtime.get_or_create_zone(&catalog, zone_id).expect("zone layout exists");
        assert_eq!(runtime.zone(zone_id).expect("zone exists").entity_count(), 1);
    }

    #[test]
    fn unknown_zone_is_typed_error() {
        let mut runtime = ZoneRuntime::new();
        let catalog = Catalog::default();
        let err = runtime.get_or_create_zone(&catalog, ZoneId::new()).expect_err("no such zone");
        assert!(matches!(err, WorldError::ZoneNotFound(_)));
    }

    #[test]
    fn tick_advances_zone_counter() {
        let (catalog, zone_id) = catalog_with_zone();
        let mut runtime = ZoneRuntime::new();
        runtime.get_or_create_zone(&catalog, zone_id).expect("zone layout exists");
        let mut rng = StdRng::seed_from_u64(7);
        runtime.tick(&mut rng);
        assert_eq!(runtime.zone(zone_id).expect("zone exists").tick, 1);
    }
}
