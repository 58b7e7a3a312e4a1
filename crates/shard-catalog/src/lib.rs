//! Read-only static game data loaded from YAML at startup (§4.A).
//!
//! Exposes pure lookups over items, recipes, techniques, zone layouts, and
//! loot tables. A lookup miss is always a typed [`error::CatalogError`],
//! never a panic.
//!
//! # Modules
//!
//! - [`catalog`] -- the top-level [`catalog::Catalog`] and its `load`/lookup API
//! - [`items`] -- [`items::ItemDefinition`] and consumable effects
//! - [`recipes`] -- [`recipes::RecipeDefinition`] and material requirements
//! - [`zones`] -- [`zones::ZoneLayout`] and its spawn tables
//! - [`loot`] -- [`loot::LootTable`] and [`loot::LootEntry`]
//! - [`quests`] -- quest definition lookups over `shard_types::QuestDefinition`
//! - [`error`] -- [`error::CatalogError`]

pub mod catalog;
pub mod error;
pub mod items;
pub mod loot;
pub mod quests;
pub mod recipes;
pub mod zones;

pub use catalog::Catalog;
pub use error::CatalogError;
pub use items::{ConsumableEffect, ItemCategory, ItemDefinition};
pub use loot::{LootEntry, LootTable};
pub use recipes::{MaterialRequirement, RecipeDefinition};
pub use zones::{MobSpawn, PortalSpawn, ResourceNodeSpawn, ZoneLayout};
