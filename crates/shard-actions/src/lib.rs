//! The action pipeline: validation, execution, combat/technique resolution,
//! death handling, leveling, and the economy-adjacent handlers (trade,
//! party, quest) for the shard simulation (`spec.md` §4.F/§4.G).
//!
//! Every handler is split the way the teacher splits its agent actions: a
//! pure `validate_*`/`resolve_*` function computes what *would* happen with
//! no mutation, and a paired `apply_*`/`execute_*` function is the only
//! place state actually changes. Handlers that cross the [`shard_chain`]
//! boundary (mint/burn/transfer) are `async`; everything else is
//! synchronous.
//!
//! # Modules
//!
//! - [`error`] -- [`error::ActionError`], the crate's unified error type
//! - [`costs`] -- fixed gameplay constants (XP awards, ranges, repair price)
//! - [`validation`] -- shared synchronous pre-checks (range, cooldown, tool tier, ...)
//! - [`combat`] -- damage/crit/dodge and technique effect resolution
//! - [`leveling`] -- the XP table, stat growth curve, and level-up events
//! - [`death`] -- kill XP splitting, loot rolls, corpses, and respawn
//! - [`crafting`] -- quality/stat/affix rolls for crafted equipment
//! - [`party`] -- party formation and membership
//! - [`quest`] -- quest eligibility and completion
//! - [`reputation`] -- per-wallet reputation scoring
//! - [`trade`] -- player-to-player trade offer/accept/reject lifecycle
//! - [`handlers`] -- the `execute_*` entry points binding the above into
//!   `ActionOutcome`s, one per `spec.md` §4.F action

pub mod combat;
pub mod costs;
pub mod crafting;
pub mod death;
pub mod error;
pub mod handlers;
pub mod leveling;
pub mod party;
pub mod quest;
pub mod reputation;
pub mod trade;
pub mod validation;

pub use error::ActionError;
pub use handlers::{
    apply_level_up_unlocks, apply_trade_leg, execute_attack, execute_buy, execute_craft,
    execute_equip, execute_gather, execute_move, execute_party_form, execute_quest_complete,
    execute_repair, execute_sell, execute_unequip, execute_use_technique, DEFAULT_MELEE_RANGE,
};
pub use leveling::{LevelUpEvent, MAX_LEVEL, SIGNATURE_LEVEL, ULTIMATE_LEVEL};
pub use party::{form_party, is_member, join_party, leave_party, LeaveOutcome};
pub use quest::{check_eligibility, complete_quest, QuestReward};
pub use reputation::{ReputationStore, DEFAULT_REPUTATION, PLAYER_KILL_DELTA, QUEST_COMPLETE_DELTA, TRADE_DEFAULT_DELTA};
pub use death::{
    build_corpse, respawn_player, roll_loot, split_kill_xp, LootDrop, LootResult, XpShare,
    DEFAULT_CORPSE_LIFETIME_TICKS,
};
pub use trade::{
    is_trade_expired, trade_accept, trade_offer, PendingTrade, TradeAcceptResult, TradeLeg,
    DEFAULT_TRADE_EXPIRY_TICKS,
};
