//! Static item definitions (§4.A catalog store, `itemByTokenId`).

use serde::{Deserialize, Serialize};
use shard_types::{EquipmentSlot, ItemTokenId, Stats};

/// The broad shape of an item, determining which fields apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Equippable into a slot; may be a weapon/armor/tool.
    Equipment,
    /// A raw or refined crafting ingredient. Never equipped.
    Material,
    /// Consumed on use for an instant effect (e.g. food, potions).
    Consumable,
}

/// The effect applied when a consumable item is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsumableEffect {
    /// Restores hp, clamped to the consumer's `maxHp`.
    RestoreHp {
        /// Hit points restored.
        amount: u32,
    },
    /// Restores essence, clamped to the consumer's `maxEssence`.
    RestoreEssence {
        /// Essence restored.
        amount: u32,
    },
}

/// A static, read-only item record as authored in `items.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// The on-chain token id this definition describes.
    pub token_id: ItemTokenId,
    /// Display name.
    pub name: String,
    /// The broad item shape.
    pub category: ItemCategory,
    /// Whether stacks of this item merge into a single inventory line.
    pub stackable: bool,
    /// The slot this item occupies, for `Equipment` category items.
    #[serde(default)]
    pub slot: Option<EquipmentSlot>,
    /// Durability when new, for equipment that degrades with use.
    #[serde(default)]
    pub base_durability: Option<u32>,
    /// Base stat contribution before quality scaling, for equipment.
    #[serde(default)]
    pub base_stats: Option<Stats>,
    /// The gathering tool tier, for tools; the minimum node tier a tool of
    /// this item can harvest.
    #[serde(default)]
    pub tool_tier: Option<u32>,
    /// The effect applied on use, for `Consumable` category items.
    #[serde(default)]
    pub consumable_effect: Option<ConsumableEffect>,
    /// Baseline merchant sell price in copper, for items merchants stock
    /// (§4.I dynamic pricing). `None` for items no merchant sells.
    #[serde(default)]
    pub base_price: Option<u64>,
    /// Target stock quantity merchants restock toward (§4.I). `None` for
    /// items no merchant sells.
    #[serde(default)]
    pub target_stock: Option<u32>,
    /// Attack range in world units, for weapons (`slot == Some(Weapon)`).
    /// `None` for non-weapon items, and for unarmed attacks (which use the
    /// default melee range baked into the combat resolver).
    #[serde(default)]
    pub weapon_range: Option<f64>,
    /// Flat damage a basic attack with this weapon adds before the
    /// wielder's strength modifier, for weapons. `None` for non-weapon
    /// items.
    #[serde(default)]
    pub weapon_base_damage: Option<u32>,
}
