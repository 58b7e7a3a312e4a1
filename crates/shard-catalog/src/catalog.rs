//! The top-level read-only catalog: loads YAML tables at startup and
//! exposes pure lookups (§4.A).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use shard_types::{ItemTokenId, QuestDefinition, QuestId, RecipeId, Technique, TechniqueId, ZoneId};
use tracing::info;

use crate::error::CatalogError;
use crate::items::ItemDefinition;
use crate::loot::LootTable;
use crate::recipes::RecipeDefinition;
use crate::zones::ZoneLayout;

fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_yml::from_str(&raw).map_err(|source| CatalogError::Yaml {
        path: path.display().to_string(),
        source,
    })
}

/// Read-only static game data: items, recipes, techniques, zone layouts,
/// and loot tables, loaded once from a directory of YAML files at startup.
///
/// Every lookup returns [`CatalogError::NotFound`] on a miss; there is no
/// panicking accessor.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: BTreeMap<ItemTokenId, ItemDefinition>,
    recipes: BTreeMap<RecipeId, RecipeDefinition>,
    techniques: BTreeMap<TechniqueId, Technique>,
    zones: BTreeMap<ZoneId, ZoneLayout>,
    loot_tables: BTreeMap<String, LootTable>,
    quests: BTreeMap<QuestId, QuestDefinition>,
}

impl Catalog {
    /// Load all catalog tables from `dir`, expecting `items.yaml`,
    /// `recipes.yaml`, `techniques.yaml`, `zones.yaml`, `loot_tables.yaml`,
    /// and `quests.yaml` each to contain a YAML sequence of entries.
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let items: Vec<ItemDefinition> = load_yaml(&dir.join("items.yaml"))?;
        let recipes: Vec<RecipeDefinition> = load_yaml(&dir.join("recipes.yaml"))?;
        let techniques: Vec<Technique> = load_yaml(&dir.join("techniques.yaml"))?;
        let zones: Vec<ZoneLayout> = load_yaml(&dir.join("zones.yaml"))?;
        let loot_tables: BTreeMap<String, LootTable> = load_yaml(&dir.join("loot_tables.yaml"))?;
        let quests: Vec<QuestDefinition> = load_yaml(&dir.join("quests.yaml"))?;

        info!(
            items = items.len(),
            recipes = recipes.len(),
            techniques = techniques.len(),
            zones = zones.len(),
            loot_tables = loot_tables.len(),
            quests = quests.len(),
            "catalog loaded"
        );

        Ok(Self {
            items: items.into_iter().map(|i| (i.token_id, i)).collect(),
            recipes: recipes.into_iter().map(|r| (r.id, r)).collect(),
            techniques: techniques.into_iter().map(|t| (t.id, t)).collect(),
            zones: zones.into_iter().map(|z| (z.id, z)).collect(),
            loot_tables,
            quests: quests.into_iter().map(|q| (q.id, q)).collect(),
        })
    }

    /// Look up an item definition by its on-chain token id.
    pub fn item_by_token_id(&self, token_id: ItemTokenId) -> Result<&ItemDefinition, CatalogError> {
        self.items.get(&token_id).ok_or_else(|| CatalogError::NotFound {
            kind: "item",
            id: token_id.to_string(),
        })
    }

    /// Look up a recipe definition by id.
    pub fn recipe_by_id(&self, id: RecipeId) -> Result<&RecipeDefinition, CatalogError> {
        self.recipes.get(&id).ok_or_else(|| CatalogError::NotFound {
            kind: "recipe",
            id: id.to_string(),
        })
    }

    /// Look up a statically authored technique by id. Procedurally
    /// generated signature/ultimate techniques are not stored here; they
    /// are resolved through the runtime technique registry instead.
    pub fn technique_by_id(&self, id: TechniqueId) -> Result<&Technique, CatalogError> {
        self.techniques.get(&id).ok_or_else(|| CatalogError::NotFound {
            kind: "technique",
            id: id.to_string(),
        })
    }

    /// Look up a zone's static layout by id.
    pub fn zone_layout(&self, zone_id: ZoneId) -> Result<&ZoneLayout, CatalogError> {
        self.zones.get(&zone_id).ok_or_else(|| CatalogError::NotFound {
            kind: "zone",
            id: zone_id.to_string(),
        })
    }

    /// Look up a mob's loot table by its catalog key.
    pub fn loot_table(&self, mob_name: &str) -> Result<&LootTable, CatalogError> {
        self.loot_tables
            .get(mob_name)
            .ok_or_else(|| CatalogError::NotFound {
                kind: "loot table",
                id: mob_name.to_string(),
            })
    }

    /// All zone layouts, for startup zone instantiation.
    pub fn all_zones(&self) -> impl Iterator<Item = &ZoneLayout> {
        self.zones.values()
    }

    /// All item definitions, for building a merchant's initial stock
    /// table from whichever items carry `base_price`/`target_stock`.
    pub fn all_items(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    /// Look up a quest definition by id.
    pub fn quest_by_id(&self, id: QuestId) -> Result<&QuestDefinition, CatalogError> {
        self.quests.get(&id).ok_or_else(|| CatalogError::NotFound {
            kind: "quest",
            id: id.to_string(),
        })
    }

    /// All quest definitions, for building a zone's quest-giver listing.
    pub fn all_quests(&self) -> impl Iterator<Item = &QuestDefinition> {
        self.quests.values()
    }

    /// All recipe definitions, for listing what an agent could craft at a
    /// station for its learned profession.
    pub fn all_recipes(&self) -> impl Iterator<Item = &RecipeDefinition> {
        self.recipes.values()
    }

    /// All statically authored techniques (excludes per-wallet generated
    /// signature/ultimate techniques, which live in
    /// `shard_techniques::TechniqueCatalog`).
    pub fn all_techniques(&self) -> impl Iterator<Item = &Technique> {
        self.techniques.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_item_is_typed_not_found() {
        let catalog = Catalog::default();
        let err = catalog
            .item_by_token_id(ItemTokenId::new())
            .expect_err("empty catalog has no items");
        assert!(matches!(err, CatalogError::NotFound { kind: "item", .. }));
    }

    #[test]
    fn missing_zone_is_typed_not_found() {
        let catalog = Catalog::default();
        let err = catalog
            .zone_layout(ZoneId::new())
            .expect_err("empty catalog has no zones");
        assert!(matches!(err, CatalogError::NotFound { kind: "zone", .. }));
    }

    #[test]
    fn missing_loot_table_is_typed_not_found() {
        let catalog = Catalog::default();
        let err = catalog
            .loot_table("goblin")
            .expect_err("empty catalog has no loot tables");
        assert!(matches!(err, CatalogError::NotFound { kind: "loot table", .. }));
    }

    #[test]
    fn missing_quest_is_typed_not_found() {
        let catalog = Catalog::default();
        let err = catalog
            .quest_by_id(shard_types::QuestId::new())
            .expect_err("empty catalog has no quests");
        assert!(matches!(err, CatalogError::NotFound { kind: "quest", .. }));
    }
}
