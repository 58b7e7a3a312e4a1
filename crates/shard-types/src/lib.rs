//! Shared type definitions for the shard simulation.
//!
//! This crate is the single source of truth for all types used across the
//! workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the web UI / MCP facade.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all identifiers
//! - [`enums`] -- Enumeration types (entity kinds, actions, events, rejections)
//! - [`structs`] -- Core domain structs (entities, zones, ledger, agent config)
//! - [`actions`] -- Action request/result types for the HTTP surface and agent runner
//! - [`perception`] -- Perception payload delivered to the agent runner each cycle
//! - [`currency`] -- Copper/gold display formatting and parsing

pub mod actions;
pub mod currency;
pub mod enums;
pub mod ids;
pub mod perception;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{ActionOutcome, ActionParameters, ActionRequest, ActionResult};
pub use currency::{
    CurrencyParseError, format_gold_string, format_gold_to_metals, parse_gold_string,
    parse_metals_to_gold,
};
pub use enums::{
    ActionType, AffixStat, ClassId, EffectKind, EntityKind, EquipmentSlot, EventType, Gender,
    LedgerEntryType, LedgerPartyType, Profession, Quality, RaceId, RejectionReason, TargetType,
    TechniqueType,
};
pub use ids::{
    ChainTxId, EffectId, EntityId, EventId, ItemTokenId, LedgerEntryId, PartyId, QuestId,
    RecipeId, TechniqueId, TradeId, ZoneId,
};
pub use perception::{
    AgentPerception, PartySummary, PendingTradeSummary, SelfState as PerceptionSelfState,
    VisibleEntity, VisibleQuest,
};
pub use structs::{
    ActiveEffect, AgentConfig, AgentFocus, AgentStrategy, BonusAffix, BOUNDED_LIST_CAP,
    CharacterSave, ChatTurn, DiaryEntry, Entity, EntityRef, EquippedItem, LedgerEntry,
    NodeMaterial, PARTY_MAX_SIZE, Party, QuestDefinition, RejectionDetails, SecondaryEffect,
    StatModifier, Stats, Technique, WalletReservation, ZoneBounds,
};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::EntityId::export_all();
        let _ = crate::ids::ZoneId::export_all();
        let _ = crate::ids::EffectId::export_all();
        let _ = crate::ids::TechniqueId::export_all();
        let _ = crate::ids::RecipeId::export_all();
        let _ = crate::ids::ItemTokenId::export_all();
        let _ = crate::ids::TradeId::export_all();
        let _ = crate::ids::PartyId::export_all();
        let _ = crate::ids::QuestId::export_all();
        let _ = crate::ids::LedgerEntryId::export_all();
        let _ = crate::ids::EventId::export_all();
        let _ = crate::ids::ChainTxId::export_all();

        // Enums
        let _ = crate::enums::EntityKind::export_all();
        let _ = crate::enums::EquipmentSlot::export_all();
        let _ = crate::enums::Profession::export_all();
        let _ = crate::enums::Quality::export_all();
        let _ = crate::enums::AffixStat::export_all();
        let _ = crate::enums::RaceId::export_all();
        let _ = crate::enums::ClassId::export_all();
        let _ = crate::enums::Gender::export_all();
        let _ = crate::enums::EffectKind::export_all();
        let _ = crate::enums::TechniqueType::export_all();
        let _ = crate::enums::TargetType::export_all();
        let _ = crate::enums::ActionType::export_all();
        let _ = crate::enums::EventType::export_all();
        let _ = crate::enums::RejectionReason::export_all();
        let _ = crate::enums::LedgerEntryType::export_all();
        let _ = crate::enums::LedgerPartyType::export_all();

        // Structs
        let _ = crate::structs::Stats::export_all();
        let _ = crate::structs::StatModifier::export_all();
        let _ = crate::structs::BonusAffix::export_all();
        let _ = crate::structs::EquippedItem::export_all();
        let _ = crate::structs::ActiveEffect::export_all();
        let _ = crate::structs::NodeMaterial::export_all();
        let _ = crate::structs::Entity::export_all();
        let _ = crate::structs::ZoneBounds::export_all();
        let _ = crate::structs::SecondaryEffect::export_all();
        let _ = crate::structs::Technique::export_all();
        let _ = crate::structs::CharacterSave::export_all();
        let _ = crate::structs::DiaryEntry::export_all();
        let _ = crate::structs::WalletReservation::export_all();
        let _ = crate::structs::LedgerEntry::export_all();
        let _ = crate::structs::AgentFocus::export_all();
        let _ = crate::structs::AgentStrategy::export_all();
        let _ = crate::structs::ChatTurn::export_all();
        let _ = crate::structs::EntityRef::export_all();
        let _ = crate::structs::AgentConfig::export_all();
        let _ = crate::structs::RejectionDetails::export_all();

        // Actions
        let _ = crate::actions::ActionParameters::export_all();
        let _ = crate::actions::ActionRequest::export_all();
        let _ = crate::actions::ActionOutcome::export_all();
        let _ = crate::actions::ActionResult::export_all();

        // Perception
        let _ = crate::perception::AgentPerception::export_all();
        let _ = crate::perception::SelfState::export_all();
        let _ = crate::perception::VisibleEntity::export_all();
        let _ = crate::perception::VisibleQuest::export_all();
        let _ = crate::perception::PartySummary::export_all();
        let _ = crate::perception::PendingTradeSummary::export_all();
    }
}
