//! A cell-bucketed spatial index over a zone's entities, used to keep
//! radius queries (`entitiesWithin`) sub-linear in entity count (§4.E).
//!
//! Cell size is fixed to the zone's full extent divided into a small grid
//! ("chunk" in the data model's phrasing); entities are bucketed by the
//! cell their position falls into. The grid is rebuilt wholesale once per
//! tick and nudged incrementally whenever a single entity moves between
//! ticks (e.g. in response to a `move` action).

use std::collections::BTreeMap;

use shard_types::{Entity, EntityId, ZoneBounds};

/// Number of cells along each axis. Chosen so a zone of typical size
/// (a few hundred units per side) yields cells large enough that a
/// player's interaction/attack range rarely spans more than one
/// neighboring cell.
const GRID_DIVISIONS_F64: f64 = 8.0;

type CellKey = (i64, i64);

/// A grid-bucketed spatial index over one zone's entities.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    bounds: ZoneBounds,
    cell_width: f64,
    cell_height: f64,
    cells: BTreeMap<CellKey, Vec<EntityId>>,
}

impl SpatialGrid {
    /// Build an empty grid sized to `bounds`.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn new(bounds: ZoneBounds) -> Self {
        let span_x = (bounds.max_x - bounds.min_x).max(f64::EPSILON);
        let span_y = (bounds.max_y - bounds.min_y).max(f64::EPSILON);
        Self {
            bounds,
            cell_width: span_x / GRID_DIVISIONS_F64,
            cell_height: span_y / GRID_DIVISIONS_F64,
            cells: BTreeMap::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    fn cell_of(&self, x: f64, y: f64) -> CellKey {
        let (cx, cy) = self.bounds.clamp_point(x, y);
        // Clamped into [0, GRID_DIVISIONS) as floats before the cast, so
        // truncation to i64 cannot lose meaningful range.
        let col = (((cx - self.bounds.min_x) / self.cell_width).floor()).clamp(0.0, GRID_DIVISIONS_F64 - 1.0) as i64;
        let row = (((cy - self.bounds.min_y) / self.cell_height).floor()).clamp(0.0, GRID_DIVISIONS_F64 - 1.0) as i64;
        (col, row)
    }

    /// Wholesale rebuild from the current entity set. Called once at the
    /// start of every zone tick.
    pub fn rebuild<'a>(&mut self, entities: impl Iterator<Item = &'a Entity>) {
        self.cells.clear();
        for entity in entities {
            let key = self.cell_of(entity.x, entity.y);
            self.cells.entry(key).or_default().push(entity.id);
        }
    }

    /// Index a newly inserted entity.
    pub fn insert(&mut self, entity: &Entity) {
        let key = self.cell_of(entity.x, entity.y);
        self.cells.entry(key).or_default().push(entity.id);
    }

    /// Drop a removed entity from its cell.
    pub fn remove(&mut self, entity: &Entity) {
        let key = self.cell_of(entity.x, entity.y);
        if let Some(bucket) = self.cells.get_mut(&key) {
            bucket.retain(|id| *id != entity.id);
            if bucket.is_empty() {
                self.cells.remove(&key);
            }
        }
    }

    /// Move an entity's index entry from its old cell to its new one.
    pub fn update(&mut self, before: &Entity, after: &Entity) {
        let old_key = self.cell_of(before.x, before.y);
        let new_key = self.cell_of(after.x, after.y);
        if old_key == new_key {
            return;
        }
        if let Some(bucket) = self.cells.get_mut(&old_key) {
            bucket.retain(|id| *id != before.id);
            if bucket.is_empty() {
                self.cells.remove(&old_key);
            }
        }
        self.cells.entry(new_key).or_default().push(after.id);
    }

    /// Candidate entity ids near `(x, y)`: every entity in the cell
    /// containing the point plus its 8 neighbors. Callers must still
    /// filter by exact distance; this only narrows the search space.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn candidates_near(&self, x: f64, y: f64) -> Vec<EntityId> {
        let (col, row) = self.cell_of(x, y);
        let mut out = Vec::new();
        for dc in -1..=1 {
            for dr in -1..=1 {
                let key = (col + dc, row + dr);
                if let Some(bucket) = self.cells.get(&key) {
                    out.extend(bucket.iter().copied());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use shard_types::{EntityId, EntityKind};

    use super::*;

    fn bounds() -> ZoneBounds {
        ZoneBounds { min_x: 0.0, min_y: 0.0, max_x: 80.0, max_y: 80.0 }
    }

    fn entity_at(x: f64, y: f64) -> Entity {
        Entity {
            id: EntityId::new(),
            kind: EntityKind::Mob,
            name: String::from("test"),
            x,
            y,
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
            skinned: None,
            skinnable_until: None,
            mob_name: None,
        }
    }

    #[test]
    fn candidates_near_finds_same_cell_entity() {
        let mut grid = SpatialGrid::new(bounds());
        let e = entity_at(5.0, 5.0);
        grid.insert(&e);
        assert!(grid.candidates_near(6.0, 6.0).contains(&e.id));
    }

    #[test]
    fn candidates_near_excludes_far_cell() {
        let mut grid = SpatialGrid::new(bounds());
        let e = entity_at(5.0, 5.0);
        grid.insert(&e);
        assert!(!grid.candidates_near(75.0, 75.0).contains(&e.id));
    }

    #[test]
    fn update_moves_between_cells() {
        let mut grid = SpatialGrid::new(bounds());
        let before = entity_at(5.0, 5.0);
        grid.insert(&before);
        let mut after = before.clone();
        after.x = 75.0;
        after.y = 75.0;
        grid.update(&before, &after);
        assert!(!grid.candidates_near(5.0, 5.0).contains(&after.id));
        assert!(grid.candidates_near(75.0, 75.0).contains(&after.id));
    }

    #[test]
    fn remove_drops_entity() {
        let mut grid = SpatialGrid::new(bounds());
        let e = entity_at(5.0, 5.0);
        grid.insert(&e);
        grid.remove(&e);
        assert!(!grid.candidates_near(5.0, 5.0).contains(&e.id));
    }
}
