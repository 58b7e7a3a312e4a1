//! A merchant's custodial wallet and per-item stock/price state (§4.I).

use std::collections::BTreeMap;

use shard_catalog::Catalog;
use shard_types::{EntityId, ItemTokenId};

use crate::error::EconomyError;

/// One merchant-stocked item's price and quantity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemStock {
    /// The item being stocked.
    pub token_id: ItemTokenId,
    /// Baseline price, from the catalog.
    pub base_price: u64,
    /// Target quantity restocking aims for, from the catalog.
    pub target_stock: u32,
    /// Current on-hand quantity (synced from the chain).
    pub quantity: u32,
    /// Current sell price, recomputed each price-update phase.
    pub current_price: u64,
}

/// A merchant NPC's custodial wallet and stock table, independent of the
/// zone entity it is attached to.
#[derive(Debug, Clone)]
pub struct MerchantState {
    /// The merchant entity this state belongs to.
    pub entity_id: EntityId,
    /// The merchant's custodial wallet address.
    pub wallet_address: String,
    /// Current custodial gold balance (synced from the chain).
    pub gold: u64,
    /// Stocked items by token id.
    pub stock: BTreeMap<ItemTokenId, ItemStock>,
}

impl MerchantState {
    /// Build a merchant's initial state from the catalog's items that
    /// carry `base_price`/`target_stock`, starting fully stocked at the
    /// target quantity.
    #[must_use]
    pub fn from_catalog(entity_id: EntityId, wallet_address: String, catalog: &Catalog) -> Self {
        let stock = catalog
            .all_items()
            .filter_map(|item| {
                let base_price = item.base_price?;
                let target_stock = item.target_stock?;
                Some((
                    item.token_id,
                    ItemStock {
                        token_id: item.token_id,
                        base_price,
                        target_stock,
                        quantity: target_stock,
                        current_price: base_price,
                    },
                ))
            })
            .collect();
        Self { entity_id, wallet_address, gold: 0, stock }
    }

    /// Look up a stocked item's state mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::UnknownStock`] if this merchant does not
    /// stock `token_id`.
    pub fn stock_mut(&mut self, token_id: ItemTokenId) -> Result<&mut ItemStock, EconomyError> {
        self.stock.get_mut(&token_id).ok_or(EconomyError::UnknownStock(token_id))
    }
}
