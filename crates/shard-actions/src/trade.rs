//! Player-to-player trading (`spec.md` §4.F `trade_offer`/`trade_accept`/
//! `trade_reject`).
//!
//! Grounded in the teacher's `trade_offer`/`trade_accept`/`trade_reject`
//! lifecycle shape -- a pending offer keyed by [`TradeId`], accepted or
//! rejected by the target, expiring after a fixed number of ticks -- but
//! reworked onto [`ItemTokenId`] quantities and copper instead of a local
//! `Resource` inventory, since character assets live in on-chain item
//! balances rather than an in-memory map.

use std::collections::BTreeMap;

use shard_types::{EntityId, ItemTokenId, TradeId};

use crate::error::ActionError;

/// Default number of ticks a trade offer remains pending before expiring.
pub const DEFAULT_TRADE_EXPIRY_TICKS: u64 = 200;

/// A pending trade offer between two players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTrade {
    /// The trade's id.
    pub id: TradeId,
    /// The entity that proposed the trade.
    pub proposer_id: EntityId,
    /// The entity the trade was proposed to.
    pub target_id: EntityId,
    /// Items the proposer is offering.
    pub offer_items: BTreeMap<ItemTokenId, u32>,
    /// Copper the proposer is offering.
    pub offer_copper: u64,
    /// Items the proposer wants in return.
    pub request_items: BTreeMap<ItemTokenId, u32>,
    /// Copper the proposer wants in return.
    pub request_copper: u64,
    /// Tick the offer was created.
    pub created_at_tick: u64,
    /// Tick at which the offer expires if not accepted or rejected.
    pub expires_at_tick: u64,
}

/// Create a pending trade from `proposer` to `target_id`.
///
/// Rejects an offer and request that are both empty (nothing would change
/// hands). Does not check balances -- that happens at [`trade_accept`] time,
/// against both sides' balances as they stand then.
pub fn trade_offer(
    proposer_id: EntityId,
    target_id: EntityId,
    offer_items: BTreeMap<ItemTokenId, u32>,
    offer_copper: u64,
    request_items: BTreeMap<ItemTokenId, u32>,
    request_copper: u64,
    current_tick: u64,
    expiry_ticks: u64,
) -> Result<PendingTrade, ActionError> {
    if offer_items.is_empty() && offer_copper == 0 && request_items.is_empty() && request_copper == 0
    {
        return Err(ActionError::ArithmeticOverflow {
            context: String::from("trade offer and request are both empty"),
        });
    }

    Ok(PendingTrade {
        id: TradeId::new(),
        proposer_id,
        target_id,
        offer_items,
        offer_copper,
        request_items,
        request_copper,
        created_at_tick: current_tick,
        expires_at_tick: current_tick.saturating_add(expiry_ticks),
    })
}

/// One side of a trade's net effect: items and copper gained, items and
/// copper given up, to be applied by the caller through the chain driver
/// (item transfers) and the gold ledger (copper reservation adjustment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeLeg {
    /// The entity on this side of the trade.
    pub entity_id: EntityId,
    /// Items this entity gives up.
    pub gives_items: BTreeMap<ItemTokenId, u32>,
    /// Copper this entity gives up.
    pub gives_copper: u64,
    /// Items this entity receives.
    pub receives_items: BTreeMap<ItemTokenId, u32>,
    /// Copper this entity receives.
    pub receives_copper: u64,
}

/// Both sides' legs for an accepted trade, ready for the caller to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeAcceptResult {
    /// The proposer's leg.
    pub proposer: TradeLeg,
    /// The target's leg.
    pub target: TradeLeg,
}

/// Accept `trade`, producing the two legs the caller must apply.
///
/// Balance checks (does each side actually hold what it's offering/
/// requesting right now) are the caller's job, since they require reading
/// live chain/ledger state this module has no access to; this function only
/// computes the symmetric exchange once the caller has confirmed both sides
/// can pay.
#[must_use]
pub fn trade_accept(trade: &PendingTrade) -> TradeAcceptResult {
    TradeAcceptResult {
        proposer: TradeLeg {
            entity_id: trade.proposer_id,
            gives_items: trade.offer_items.clone(),
            gives_copper: trade.offer_copper,
            receives_items: trade.request_items.clone(),
            receives_copper: trade.request_copper,
        },
        target: TradeLeg {
            entity_id: trade.target_id,
            gives_items: trade.request_items.clone(),
            gives_copper: trade.request_copper,
            receives_items: trade.offer_items.clone(),
            receives_copper: trade.offer_copper,
        },
    }
}

/// Whether `trade` has passed its expiry tick.
#[must_use]
pub const fn is_trade_expired(trade: &PendingTrade, current_tick: u64) -> bool {
    current_tick >= trade.expires_at_tick
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(token: ItemTokenId, qty: u32) -> BTreeMap<ItemTokenId, u32> {
        let mut map = BTreeMap::new();
        map.insert(token, qty);
        map
    }

    #[test]
    fn empty_offer_and_request_is_rejected() {
        let proposer = EntityId::new();
        let target = EntityId::new();
        let result = trade_offer(
            proposer,
            target,
            BTreeMap::new(),
            0,
            BTreeMap::new(),
            0,
            0,
            DEFAULT_TRADE_EXPIRY_TICKS,
        );
        assert!(result.is_err());
    }

    #[test]
    fn copper_only_offer_is_allowed() {
        let proposer = EntityId::new();
        let target = EntityId::new();
        let trade = trade_offer(
            proposer,
            target,
            BTreeMap::new(),
            100,
            BTreeMap::new(),
            0,
            0,
            DEFAULT_TRADE_EXPIRY_TICKS,
        )
        .expect("valid offer");
        assert_eq!(trade.offer_copper, 100);
        assert_eq!(trade.expires_at_tick, DEFAULT_TRADE_EXPIRY_TICKS);
    }

    #[test]
    fn accept_swaps_legs_symmetrically() {
        let proposer = EntityId::new();
        let target = EntityId::new();
        let token = ItemTokenId::new();
        let trade = trade_offer(
            proposer,
            target,
            items(token, 3),
            50,
            BTreeMap::new(),
            200,
            0,
            DEFAULT_TRADE_EXPIRY_TICKS,
        )
        .expect("valid offer");

        let result = trade_accept(&trade);
        assert_eq!(result.proposer.gives_items.get(&token), Some(&3));
        assert_eq!(result.proposer.gives_copper, 50);
        assert_eq!(result.proposer.receives_copper, 200);
        assert_eq!(result.target.gives_copper, 200);
        assert_eq!(result.target.receives_items.get(&token), Some(&3));
    }

    #[test]
    fn expiry_is_checked_against_current_tick() {
        let trade = trade_offer(
            EntityId::new(),
            EntityId::new(),
            BTreeMap::new(),
            1,
            BTreeMap::new(),
            0,
            100,
            50,
        )
        .expect("valid offer");
        assert!(!is_trade_expired(&trade, 149));
        assert!(is_trade_expired(&trade, 150));
    }
}
