//! Perception payload delivered to the Agent Runner each decision cycle.
//!
//! This is the only information an autonomous character's LLM decision loop
//! receives about the world; if something is not in the perception, the
//! agent does not know about it (§4.K).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ClassId, EntityKind, EquipmentSlot, RaceId};
use crate::ids::{EntityId, PartyId, QuestId, TechniqueId, ZoneId};
use crate::structs::{ActiveEffect, EquippedItem, Stats};

// ---------------------------------------------------------------------------
// AgentPerception
// ---------------------------------------------------------------------------

/// The complete view of the world handed to an Agent Runner decision cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentPerception {
    /// The tick this perception was captured on.
    pub tick: u64,
    /// The zone the controlled entity currently occupies.
    pub zone_id: ZoneId,
    /// The controlled entity's own state summary.
    pub self_state: SelfState,
    /// Other entities visible within the agent's area of interest.
    pub nearby_entities: Vec<VisibleEntity>,
    /// Quests available from quest givers in the area of interest.
    pub available_quests: Vec<VisibleQuest>,
    /// The agent's party, if any.
    pub party: Option<PartySummary>,
    /// Pending trades awaiting this entity's response.
    pub pending_trades: Vec<PendingTradeSummary>,
    /// System notifications (low hp, node depleted, trade received, etc.).
    pub notifications: Vec<String>,
}

// ---------------------------------------------------------------------------
// SelfState
// ---------------------------------------------------------------------------

/// The controlled entity's own state, as presented to the decision loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SelfState {
    /// The controlled entity's id.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Current level.
    pub level: u32,
    /// Accumulated XP toward the next level.
    pub xp: u64,
    /// Race.
    pub race_id: RaceId,
    /// Class.
    pub class_id: ClassId,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Current essence.
    pub essence: u32,
    /// Maximum essence.
    pub max_essence: u32,
    /// Position x.
    pub x: f64,
    /// Position y.
    pub y: f64,
    /// Effective stats (base + equipment + effects).
    pub effective_stats: Stats,
    /// Equipped items by slot.
    pub equipment: BTreeMap<EquipmentSlot, EquippedItem>,
    /// Techniques currently learned and usable (cooldown allowing).
    pub learned_techniques: Vec<TechniqueId>,
    /// Techniques currently on cooldown, with remaining ticks.
    pub on_cooldown: BTreeMap<TechniqueId, u64>,
    /// Active effects currently applied to the entity.
    pub active_effects: Vec<ActiveEffect>,
    /// Current gold balance, formatted (e.g. `"3g 42s 10c"`).
    pub gold_balance: String,
    /// Raw copper balance backing `gold_balance`.
    pub copper_balance: u64,
}

// ---------------------------------------------------------------------------
// VisibleEntity
// ---------------------------------------------------------------------------

/// Another entity visible within the agent's area of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisibleEntity {
    /// The entity's id.
    pub id: EntityId,
    /// What kind of entity this is.
    pub kind: EntityKind,
    /// Display name.
    pub name: String,
    /// Position x.
    pub x: f64,
    /// Position y.
    pub y: f64,
    /// Current hp, if applicable (mobs, players).
    pub hp: Option<u32>,
    /// Maximum hp, if applicable.
    pub max_hp: Option<u32>,
    /// Level, for mobs and players.
    pub level: Option<u32>,
    /// Remaining charges, for resource nodes.
    pub charges: Option<u32>,
    /// Whether this entity is hostile to the controlled character.
    pub hostile: bool,
}

// ---------------------------------------------------------------------------
// VisibleQuest
// ---------------------------------------------------------------------------

/// A quest available or in progress, as seen by the decision loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisibleQuest {
    /// The quest's id.
    pub id: QuestId,
    /// Display name.
    pub name: String,
    /// Narrative description.
    pub description: String,
    /// Whether the entity has already accepted this quest.
    pub accepted: bool,
    /// Whether the entity has met the completion condition.
    pub ready_to_complete: bool,
}

// ---------------------------------------------------------------------------
// PartySummary
// ---------------------------------------------------------------------------

/// A summary of the entity's current party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PartySummary {
    /// The party's id.
    pub id: PartyId,
    /// Names of the other members.
    pub member_names: Vec<String>,
}

// ---------------------------------------------------------------------------
// PendingTradeSummary
// ---------------------------------------------------------------------------

/// A pending trade offer awaiting this entity's accept/reject decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PendingTradeSummary {
    /// The trade's id.
    pub id: crate::ids::TradeId,
    /// Display name of the entity who proposed the trade.
    pub offerer_name: String,
    /// Copper offered.
    pub offer_copper: u64,
    /// Copper requested in return.
    pub request_copper: u64,
}
