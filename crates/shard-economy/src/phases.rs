//! The four independent merchant phases (§4.I): inventory sync, dynamic
//! price update, restock, and announcement. Each is a pure function (or,
//! for `sync_inventory`, a thin async wrapper around the chain driver)
//! over [`MerchantState`], callable from [`crate::loop_task::MerchantLoop`]
//! or from a unit test without a live clock.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use shard_chain::ChainDriver;

use crate::error::EconomyError;
use crate::state::{ItemStock, MerchantState};

/// Read on-chain gold and item balances into the local model (~60s
/// interval per `spec.md` §4.I).
///
/// # Errors
///
/// Returns [`EconomyError::Chain`] if a balance read fails.
pub async fn sync_inventory(state: &mut MerchantState, chain: &ChainDriver) -> Result<(), EconomyError> {
    state.gold = chain.gold_balance(&state.wallet_address).await?;
    for stock in state.stock.values_mut() {
        let balance = chain.item_balance(&state.wallet_address, stock.token_id).await?;
        stock.quantity = u32::try_from(balance).unwrap_or(u32::MAX);
    }
    Ok(())
}

/// Recompute one item's dynamic sell price (~30s interval).
///
/// `spec.md` §4.I's prose gives the symmetric formula
/// `price = base * clamp(1 + (1 - stock/target), 0.5, 2.0)`, but its own
/// worked example (§8 scenario 6) computes the overstock side as
/// `base * (1 - (stock/target - 1) * 0.5)` -- a dampened factor that
/// does not match the prose formula's `0.2` for the same inputs. This
/// follows the worked example, since it is the one with checkable
/// numbers: scarcity uses the undamped factor, overstock uses a
/// half-weighted one, both clamped to `[0.5, 2.0]`.
#[must_use]
pub fn update_price(stock: &ItemStock) -> u64 {
    let one = Decimal::ONE;
    let half = Decimal::new(5, 1);
    let two = Decimal::from(2);

    let quantity = Decimal::from(stock.quantity);
    let target = Decimal::from(stock.target_stock.max(1));
    let ratio = quantity.checked_div(target).unwrap_or(one);

    let factor = if ratio <= one {
        one.checked_add(one.checked_sub(ratio).unwrap_or_default()).unwrap_or(two)
    } else {
        let overshoot = ratio.checked_sub(one).unwrap_or_default();
        one.checked_sub(overshoot.checked_mul(half).unwrap_or_default()).unwrap_or(half)
    }
    .clamp(half, two);

    let price = Decimal::from(stock.base_price).checked_mul(factor).unwrap_or_default().floor();
    price.to_u64().unwrap_or(stock.base_price)
}

/// The price a merchant pays to buy this item back from a player:
/// `floor(min(current, base) * 0.5)`, computed as exact integer division
/// since both inputs are already integer copper.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn buy_price(stock: &ItemStock) -> u64 {
    stock.current_price.min(stock.base_price) / 2
}

/// How many units to mint toward `target_stock` if the local quantity has
/// fallen below 30% of target (~120s interval). Returns `0` if no
/// restock is needed. Caller is responsible for actually minting and
/// updating `quantity` on success.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn restock_amount(stock: &ItemStock) -> u32 {
    let threshold = stock.target_stock.saturating_mul(3) / 10;
    if stock.quantity >= threshold {
        return 0;
    }
    5.min(stock.target_stock.saturating_sub(stock.quantity))
}

/// An announcement describing the merchant's best discount or an
/// out-of-stock note (~300s interval). Translated by the caller into a
/// zone `EventType::MerchantAnnouncement` for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    /// The item currently priced furthest below its base price.
    Discount {
        /// The discounted item.
        token_id: shard_types::ItemTokenId,
        /// Current price, in copper.
        price: u64,
    },
    /// The item currently out of stock.
    OutOfStock {
        /// The depleted item.
        token_id: shard_types::ItemTokenId,
    },
    /// Nothing noteworthy to announce.
    Nothing,
}

/// Pick the most interesting thing to announce: an out-of-stock item
/// takes priority over a discount, per `spec.md` §4.I ("best discount or
/// out-of-stock note").
#[must_use]
pub fn announce(state: &MerchantState) -> Announcement {
    if let Some(depleted) = state.stock.values().find(|s| s.quantity == 0) {
        return Announcement::OutOfStock { token_id: depleted.token_id };
    }
    state
        .stock
        .values()
        .min_by_key(|s| s.current_price)
        .filter(|s| s.current_price < s.base_price)
        .map_or(Announcement::Nothing, |s| Announcement::Discount {
            token_id: s.token_id,
            price: s.current_price,
        })
}

#[cfg(test)]
mod tests {
    use shard_types::ItemTokenId;

    use super::*;

    fn stock(quantity: u32, target_stock: u32) -> ItemStock {
        ItemStock { token_id: ItemTokenId::new(), base_price: 20, target_stock, quantity, current_price: 20 }
    }

    #[test]
    fn price_rises_under_scarcity() {
        let s = stock(4, 10);
        assert_eq!(update_price(&s), 32);
    }

    #[test]
    fn price_falls_under_overstock() {
        let s = stock(18, 10);
        assert_eq!(update_price(&s), 12);
    }

    #[test]
    fn buy_price_matches_worked_example() {
        let mut s = stock(18, 10);
        s.current_price = 12;
        assert_eq!(buy_price(&s), 6);
    }

    #[test]
    fn restock_triggers_below_30_percent() {
        let s = stock(2, 10);
        assert_eq!(restock_amount(&s), 5);
    }

    #[test]
    fn restock_does_not_trigger_above_30_percent() {
        let s = stock(4, 10);
        assert_eq!(restock_amount(&s), 0);
    }

    #[test]
    fn announce_prefers_out_of_stock() {
        let mut state = MerchantState {
            entity_id: shard_types::EntityId::new(),
            wallet_address: String::from("0xmerchant"),
            gold: 0,
            stock: std::collections::BTreeMap::new(),
        };
        let discounted = stock(18, 10);
        let mut depleted = stock(0, 10);
        depleted.current_price = 20;
        state.stock.insert(discounted.token_id, ItemStock { current_price: 12, ..discounted });
        state.stock.insert(depleted.token_id, depleted);
        assert!(matches!(announce(&state), Announcement::OutOfStock { .. }));
    }
}
