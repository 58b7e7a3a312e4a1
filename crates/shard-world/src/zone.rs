//! A single zone's live runtime state: its entity table and bounds (§3
//! `Zone`).

use std::collections::{BTreeMap, BTreeSet};

use shard_catalog::ZoneLayout;
use shard_types::{Entity, EntityId, EntityKind, NodeMaterial, Stats, ZoneBounds, ZoneId};

use crate::error::WorldError;
use crate::spatial_grid::SpatialGrid;

fn blank_stats() -> Stats {
    Stats { strength: 0, agility: 0, intellect: 0, vitality: 0 }
}

/// A zone's live runtime state: the current tick, every entity present,
/// and the walkable bounds mobs and resource nodes are confined to.
#[derive(Debug, Clone)]
pub struct Zone {
    /// Unique zone id.
    pub id: ZoneId,
    /// The tick this zone has most recently advanced to.
    pub tick: u64,
    /// Every live entity in the zone, keyed by id.
    entities: BTreeMap<EntityId, Entity>,
    /// Walkable rectangular bounds.
    pub bounds: ZoneBounds,
    /// Spatial index over `entities`, rebuilt once per tick and updated
    /// incrementally on individual moves.
    pub(crate) grid: SpatialGrid,
}

impl Zone {
    /// Instantiate a zone's live state from its static catalog layout,
    /// spawning every mob and resource node the layout describes. Portals
    /// are not materialized as entities here; the action pipeline resolves
    /// them directly against the layout's `portals` table.
    #[must_use]
    pub fn from_layout(layout: &ZoneLayout) -> Self {
        let mut zone = Self {
            id: layout.id,
            tick: 0,
            entities: BTreeMap::new(),
            bounds: layout.bounds,
            grid: SpatialGrid::new(layout.bounds),
        };

        for mob in &layout.mob_spawns {
            let entity = Entity {
                id: EntityId::new(),
                kind: EntityKind::Mob,
                name: mob.mob_name.clone(),
                x: mob.x,
                y: mob.y,
                hp: mob.max_hp,
                max_hp: mob.max_hp,
                essence: None,
                max_essence: None,
                wallet_address: None,
                character_token_id: None,
                level: Some(mob.level),
                xp: None,
                xp_reward: Some(mob.xp_reward),
                race_id: None,
                class_id: None,
                gender: None,
                kills: None,
                stats: blank_stats(),
                effective_stats: blank_stats(),
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
                skinned: Some(false),
                skinnable_until: None,
                mob_name: Some(mob.mob_name.clone()),
            };
            zone.insert_entity(entity);
        }

        for node in &layout.resource_nodes {
            let kind = match &node.material {
                NodeMaterial::Ore { .. } => EntityKind::OreNode,
                NodeMaterial::Flower { .. } => EntityKind::FlowerNode,
            };
            let entity = Entity {
                id: EntityId::new(),
                kind,
                name: node.name.clone(),
                x: node.x,
                y: node.y,
                hp: 1,
                max_hp: 1,
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
                stats: blank_stats(),
                effective_stats: blank_stats(),
                equipment: BTreeMap::new(),
                learned_techniques: BTreeSet::new(),
                active_effects: Vec::new(),
                cooldowns: BTreeMap::new(),
                completed_quests: BTreeSet::new(),
                professions: BTreeMap::new(),
                signature_technique_id: None,
                ultimate_technique_id: None,
                party_id: None,
                charges: Some(node.max_charges),
                max_charges: Some(node.max_charges),
                node_material: Some(node.material.clone()),
                node_tier: Some(node.tier),
                depleted_at_tick: None,
                respawn_ticks: Some(node.respawn_ticks),
                skinned: None,
                skinnable_until: None,
                mob_name: None,
            };
            zone.insert_entity(entity);
        }

        zone.grid.rebuild(zone.entities.values());
        zone
    }

    /// Insert a new entity, indexing it in the spatial grid.
    pub fn insert_entity(&mut self, entity: Entity) {
        self.grid.insert(&entity);
        self.entities.insert(entity.id, entity);
    }

    /// Remove an entity by id, returning it if present.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.entities.remove(&id);
        if let Some(entity) = &removed {
            self.grid.remove(entity);
        }
        removed
    }

    /// Borrow an entity by id.
    pub fn entity(&self, id: EntityId) -> Result<&Entity, WorldError> {
        self.entities.get(&id).ok_or(WorldError::EntityNotFound { entity: id, zone: self.id })
    }

    /// Mutably borrow an entity by id.
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, WorldError> {
        self.entities.get_mut(&id).ok_or(WorldError::EntityNotFound { entity: id, zone: self.id })
    }

    /// Iterate over every entity in the zone.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Mutably iterate over every entity in the zone.
    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Number of entities currently in the zone.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Reposition an entity within bounds, updating the spatial grid
    /// incrementally rather than waiting for the next full rebuild.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] if `id` is not present, or
    /// [`WorldError::NonFinitePosition`] if `x`/`y` is not finite.
    pub fn move_entity(&mut self, id: EntityId, x: f64, y: f64) -> Result<(), WorldError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(WorldError::NonFinitePosition(id));
        }
        let (cx, cy) = self.bounds.clamp_point(x, y);
        let before = self.entity(id)?.clone();
        let entity = self.entity_mut(id)?;
        entity.x = cx;
        entity.y = cy;
        let after = entity.clone();
        self.grid.update(&before, &after);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use shard_catalog::{MobSpawn, ResourceNodeSpawn};

    use super::*;

    fn layout() -> ZoneLayout {
        ZoneLayout {
            id: ZoneId::new(),
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
            resource_nodes: vec![ResourceNodeSpawn {
                name: String::from("Iron Vein"),
                material: NodeMaterial::Ore { ore_kind: String::from("iron") },
                x: 50.0,
                y: 50.0,
                tier: 1,
                max_charges: 3,
                respawn_ticks: 50,
            }],
            portals: Vec::new(),
        }
    }

    #[test]
    fn from_layout_spawns_mobs_and_nodes() {
        let zone = Zone::from_layout(&layout());
        assert_eq!(zone.entity_count(), 2);
        assert!(zone.entities().any(|e| e.kind == EntityKind::Mob));
        assert!(zone.entities().any(|e| e.kind == EntityKind::OreNode));
    }

    #[test]
    fn move_entity_clamps_to_bounds() {
        let mut zone = Zone::from_layout(&layout());
        let id = zone.entities().find(|e| e.kind == EntityKind::Mob).expect("mob exists").id;
        zone.move_entity(id, 500.0, -500.0).expect("move succeeds");
        let moved = zone.entity(id).expect("entity exists");
        assert_eq!(moved.x, 100.0);
        assert_eq!(moved.y, 0.0);
    }

    #[test]
    fn move_entity_rejects_non_finite() {
        let mut zone = Zone::from_layout(&layout());
        let id = zone.entities().next().expect("has entity").id;
        let err = zone.move_entity(id, f64::NAN, 0.0).expect_err("non-finite rejected");
        assert!(matches!(err, WorldError::NonFinitePosition(_)));
    }

    #[test]
    fn remove_entity_drops_from_grid() {
        let mut zone = Zone::from_layout(&layout());
        let id = zone.entities().next().expect("has entity").id;
        zone.remove_entity(id).expect("entity was present");
        assert!(zone.entity(id).is_err());
    }
}
