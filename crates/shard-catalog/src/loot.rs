//! Static loot tables (§4.A catalog store, `lootTable(mobName)`).

use serde::{Deserialize, Serialize};
use shard_types::ItemTokenId;

/// One possible item drop within a loot table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// The item minted on a hit.
    pub token_id: ItemTokenId,
    /// Minimum quantity minted.
    pub quantity_min: u32,
    /// Maximum quantity minted (inclusive).
    pub quantity_max: u32,
    /// Independent drop chance in `[0.0, 1.0]`.
    pub drop_chance: f64,
}

/// A static, read-only loot table as authored in `loot_tables.yaml`, rolled
/// on mob death (§4.G death handling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    /// Minimum copper minted to the killer.
    pub gold_min: u64,
    /// Maximum copper minted to the killer (inclusive).
    pub gold_max: u64,
    /// Independent item drop entries.
    #[serde(default)]
    pub entries: Vec<LootEntry>,
}
