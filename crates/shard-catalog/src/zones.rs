//! Static zone layouts (§4.A catalog store, `zoneLayout(zoneId)`).

use serde::{Deserialize, Serialize};
use shard_types::{NodeMaterial, ZoneBounds, ZoneId};

/// A mob spawn point, instantiated into a live [`shard_types::Entity`] by
/// the zone runtime at startup (and again after its corpse decays).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobSpawn {
    /// Display name of the mob.
    pub mob_name: String,
    /// Spawn position x.
    pub x: f64,
    /// Spawn position y.
    pub y: f64,
    /// Mob level.
    pub level: u32,
    /// Maximum hp.
    pub max_hp: u32,
    /// XP awarded to the killer.
    pub xp_reward: u64,
    /// The key into the loot table catalog for this mob's drops.
    pub loot_table: String,
    /// Whether a killed mob leaves a skinnable corpse.
    pub skinnable: bool,
}

/// A resource node spawn point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNodeSpawn {
    /// Display name (e.g. `"Lavender"`, `"Iron Vein"`).
    pub name: String,
    /// The material this node yields.
    pub material: NodeMaterial,
    /// Spawn position x.
    pub x: f64,
    /// Spawn position y.
    pub y: f64,
    /// Node tier; a gathering tool must be of this tier or higher.
    pub tier: u32,
    /// Charges available before depletion.
    pub max_charges: u32,
    /// Ticks between depletion and automatic respawn.
    pub respawn_ticks: u64,
}

/// A portal linking this zone to another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortalSpawn {
    /// Position x of the portal entity.
    pub x: f64,
    /// Position y of the portal entity.
    pub y: f64,
    /// The zone this portal transitions into.
    pub target_zone: ZoneId,
    /// The position the traveler arrives at in the target zone.
    pub target_x: f64,
    /// The position the traveler arrives at in the target zone.
    pub target_y: f64,
}

/// A static, read-only zone layout as authored in `zones.yaml`: bounds plus
/// the initial spawn set the zone runtime instantiates on startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneLayout {
    /// Unique zone id.
    pub id: ZoneId,
    /// Display name (e.g. `"wild-meadow"`).
    pub name: String,
    /// Walkable rectangular bounds.
    pub bounds: ZoneBounds,
    /// Mob spawn points.
    #[serde(default)]
    pub mob_spawns: Vec<MobSpawn>,
    /// Resource node spawn points.
    #[serde(default)]
    pub resource_nodes: Vec<ResourceNodeSpawn>,
    /// Portals to other zones.
    #[serde(default)]
    pub portals: Vec<PortalSpawn>,
}
