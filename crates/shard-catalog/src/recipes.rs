//! Static recipe definitions (§4.A catalog store, `recipeById`).

use serde::{Deserialize, Serialize};
use shard_types::{EntityKind, ItemTokenId, Profession, RecipeId};

/// One material requirement within a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRequirement {
    /// The material consumed.
    pub token_id: ItemTokenId,
    /// The quantity consumed.
    pub quantity: u32,
}

/// A static, read-only recipe record as authored in `recipes.yaml`
/// (§4.F craft handler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDefinition {
    /// Unique recipe id.
    pub id: RecipeId,
    /// Display name.
    pub name: String,
    /// The profession required to attempt this recipe.
    pub profession: Profession,
    /// The station entity kind the crafter must be within range of
    /// (forge, alchemy lab, campfire, …).
    pub station: EntityKind,
    /// Materials burned, in the order they are burned.
    pub materials: Vec<MaterialRequirement>,
    /// The item minted on success.
    pub output_token_id: ItemTokenId,
    /// The quantity minted on success.
    pub output_quantity: u32,
    /// Whether this recipe's output rolls a quality tier, affix, and stats
    /// (equipment/jewelcrafting recipes) rather than minting a fixed item
    /// (food/potion recipes).
    pub quality_rollable: bool,
}
