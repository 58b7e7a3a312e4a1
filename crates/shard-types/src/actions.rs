//! Action request and result types shared between the HTTP surface, the
//! action pipeline, and the agent runner.
//!
//! `spawn` and `logout` have their own request/response shapes (defined in
//! `shard-server`) since they do not fit the generic command envelope; every
//! other action in §4.F of the specification is a variant of
//! [`ActionParameters`] carried inside an [`ActionRequest`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActionType, Profession};
use crate::ids::{EntityId, PartyId, QuestId, RecipeId, TechniqueId, TradeId, ZoneId};
use crate::structs::RejectionDetails;

// ---------------------------------------------------------------------------
// ActionParameters
// ---------------------------------------------------------------------------

/// Action-specific parameters submitted alongside an [`ActionRequest`].
///
/// Each variant corresponds to one [`ActionType`] and carries the data
/// needed to validate and execute that action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionParameters {
    /// Parameters for [`ActionType::Move`].
    Move {
        /// Destination x coordinate.
        x: f64,
        /// Destination y coordinate.
        y: f64,
    },
    /// Parameters for [`ActionType::Attack`].
    Attack {
        /// The entity being attacked.
        target_id: EntityId,
    },
    /// Parameters for [`ActionType::UseTechnique`].
    UseTechnique {
        /// The technique to invoke.
        technique_id: TechniqueId,
        /// Optional target (self-cast techniques omit this).
        target_id: Option<EntityId>,
    },
    /// Parameters for [`ActionType::Gather`].
    Gather {
        /// The profession performing the gather (mining/herbalism/skinning).
        profession: Profession,
        /// The resource node being gathered from.
        node_id: EntityId,
    },
    /// Parameters for [`ActionType::Craft`].
    Craft {
        /// The profession performing the craft.
        profession: Profession,
        /// The station entity (forge/alchemy-lab/campfire/…).
        station_id: EntityId,
        /// The recipe to produce.
        recipe_id: RecipeId,
    },
    /// Parameters for [`ActionType::Equip`].
    Equip {
        /// The owned item to equip (by on-chain token id).
        token_id: crate::ids::ItemTokenId,
    },
    /// Parameters for [`ActionType::Unequip`].
    Unequip {
        /// The slot to clear.
        slot: crate::enums::EquipmentSlot,
    },
    /// Parameters for [`ActionType::Repair`].
    Repair {
        /// The slot whose equipped item should be repaired.
        slot: crate::enums::EquipmentSlot,
    },
    /// Parameters for [`ActionType::Buy`].
    Buy {
        /// The merchant entity.
        merchant_id: EntityId,
        /// The item to purchase.
        token_id: crate::ids::ItemTokenId,
        /// Quantity to purchase.
        quantity: u32,
    },
    /// Parameters for [`ActionType::Sell`].
    Sell {
        /// The merchant entity.
        merchant_id: EntityId,
        /// The item to sell.
        token_id: crate::ids::ItemTokenId,
        /// Quantity to sell.
        quantity: u32,
    },
    /// Parameters for [`ActionType::TradeOffer`].
    TradeOffer {
        /// The player to propose a trade to.
        target_id: EntityId,
        /// Items offered (token id -> quantity).
        offer_items: BTreeMap<crate::ids::ItemTokenId, u32>,
        /// Copper offered alongside the items.
        offer_copper: u64,
        /// Items requested in return.
        request_items: BTreeMap<crate::ids::ItemTokenId, u32>,
        /// Copper requested in return.
        request_copper: u64,
    },
    /// Parameters for [`ActionType::TradeAccept`].
    TradeAccept {
        /// The trade to accept.
        trade_id: TradeId,
    },
    /// Parameters for [`ActionType::TradeReject`].
    TradeReject {
        /// The trade to reject.
        trade_id: TradeId,
    },
    /// Parameters for [`ActionType::PartyForm`].
    PartyForm {
        /// The entity invited to form or join the party.
        target_id: EntityId,
    },
    /// Parameters for [`ActionType::PartyLeave`].
    PartyLeave {
        /// The party being left.
        party_id: PartyId,
    },
    /// Parameters for [`ActionType::QuestAccept`].
    QuestAccept {
        /// The quest being accepted.
        quest_id: QuestId,
    },
    /// Parameters for [`ActionType::QuestComplete`].
    QuestComplete {
        /// The quest being turned in.
        quest_id: QuestId,
    },
}

// ---------------------------------------------------------------------------
// ActionRequest
// ---------------------------------------------------------------------------

/// An action submitted to the Action Pipeline, by either a human client
/// (via the HTTP Surface's `/command` endpoint) or the Agent Runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionRequest {
    /// The zone this action targets.
    pub zone_id: ZoneId,
    /// The entity performing the action.
    pub entity_id: EntityId,
    /// The wallet authenticated for this request; must own `entity_id`.
    pub wallet_address: String,
    /// The type of action being taken (redundant with `parameters`'
    /// variant, kept for logging/event correlation without matching).
    pub action_type: ActionType,
    /// Action-specific data.
    pub parameters: ActionParameters,
}

// ---------------------------------------------------------------------------
// ActionOutcome / ActionResult
// ---------------------------------------------------------------------------

/// The outcome of a successfully executed action.
///
/// This is a generic container; the actual payload shape depends on the
/// action type and is carried as a JSON value so handler-specific result
/// structs don't all need to be unified into one giant struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionOutcome {
    /// Copper gained (positive) or spent (negative) as a result of the action.
    pub copper_delta: i64,
    /// Items gained or spent (token id -> signed quantity delta).
    pub item_deltas: BTreeMap<crate::ids::ItemTokenId, i64>,
    /// Profession XP gained, if any.
    pub profession_xp: BTreeMap<Profession, u32>,
    /// Additional outcome-specific data (e.g. the crafted item's rolled stats).
    pub details: serde_json::Value,
}

/// The result returned to the caller after the resolution phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionResult {
    /// The tick the action was resolved on.
    pub tick: u64,
    /// The entity that acted.
    pub entity_id: EntityId,
    /// The action that was attempted.
    pub action_type: ActionType,
    /// Whether the action succeeded.
    pub success: bool,
    /// Success details (present only if `success` is true).
    pub outcome: Option<ActionOutcome>,
    /// Failure details (present only if `success` is false).
    pub rejection: Option<RejectionDetails>,
}
