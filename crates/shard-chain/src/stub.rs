//! In-memory chain driver: maintains only a local projection, for tests
//! and environments without a live ledger (§4.B stub mode).

use std::collections::BTreeMap;
use std::sync::Mutex;

use shard_types::{ChainTxId, ItemTokenId};

use crate::driver::ContractKind;
use crate::error::ChainError;

/// A chain driver that never leaves the process: all balances live in
/// memory and are seeded explicitly by the caller.
#[derive(Debug, Default)]
pub struct StubChainDriver {
    gold: Mutex<BTreeMap<String, u64>>,
    items: Mutex<BTreeMap<(String, ItemTokenId), u64>>,
    next_ids: Mutex<BTreeMap<ContractKind, u64>>,
}

impl StubChainDriver {
    /// An empty stub driver with no seeded balances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a wallet's starting gold balance (e.g. agent deploy flow,
    /// §4.J).
    pub fn seed_gold(&self, address: &str, copper: u64) {
        self.gold
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(address.to_owned(), copper);
    }

    /// Seed a wallet's starting item balance.
    pub fn seed_item(&self, address: &str, token_id: ItemTokenId, quantity: u64) {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert((address.to_owned(), token_id), quantity);
    }

    /// Read a wallet's gold balance, in copper.
    #[must_use]
    pub fn gold_balance(&self, address: &str) -> u64 {
        self.gold
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    /// Read a wallet's balance of a specific item token.
    #[must_use]
    pub fn item_balance(&self, address: &str, token_id: ItemTokenId) -> u64 {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&(address.to_owned(), token_id))
            .copied()
            .unwrap_or(0)
    }

    /// Mint copper to a wallet.
    pub fn mint_gold(&self, address: &str, copper: u64) -> ChainTxId {
        let mut gold = self
            .gold
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = gold.entry(address.to_owned()).or_insert(0);
        *entry = entry.saturating_add(copper);
        ChainTxId::new()
    }

    /// Mint a quantity of an item token to a wallet.
    pub fn mint_item(&self, address: &str, token_id: ItemTokenId, quantity: u64) -> ChainTxId {
        let mut items = self
            .items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = items.entry((address.to_owned(), token_id)).or_insert(0);
        *entry = entry.saturating_add(quantity);
        ChainTxId::new()
    }

    /// Burn a quantity of an item token held by a wallet.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InsufficientBalance`] if the wallet does not
    /// hold enough.
    pub fn burn_item(
        &self,
        address: &str,
        token_id: ItemTokenId,
        quantity: u64,
    ) -> Result<ChainTxId, ChainError> {
        let mut items = self
            .items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let key = (address.to_owned(), token_id);
        let available = items.get(&key).copied().unwrap_or(0);
        if available < quantity {
            return Err(ChainError::InsufficientBalance {
                address: address.to_owned(),
                available,
                requested: quantity,
            });
        }
        items.insert(key, available - quantity);
        Ok(ChainTxId::new())
    }

    /// Transfer a quantity of an item token from one wallet to another.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InsufficientBalance`] if `from` does not hold
    /// enough.
    pub fn transfer_item(
        &self,
        from: &str,
        to: &str,
        token_id: ItemTokenId,
        quantity: u64,
    ) -> Result<ChainTxId, ChainError> {
        let mut items = self
            .items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let from_key = (from.to_owned(), token_id);
        let available = items.get(&from_key).copied().unwrap_or(0);
        if available < quantity {
            return Err(ChainError::InsufficientBalance {
                address: from.to_owned(),
                available,
                requested: quantity,
            });
        }
        items.insert(from_key, available - quantity);
        let to_key = (to.to_owned(), token_id);
        let to_balance = items.entry(to_key).or_insert(0);
        *to_balance = to_balance.saturating_add(quantity);
        Ok(ChainTxId::new())
    }

    /// The next unused sequence id for `contract`, incrementing on each
    /// call.
    pub fn next_id(&self, contract: ContractKind) -> u64 {
        let mut next_ids = self
            .next_ids
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = next_ids.entry(contract).or_insert(0);
        let id = *entry;
        *entry = entry.saturating_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_and_read_gold_balance() {
        let driver = StubChainDriver::new();
        driver.mint_gold("0xabc", 500);
        assert_eq!(driver.gold_balance("0xabc"), 500);
    }

    #[test]
    fn burn_more_than_available_is_rejected() {
        let driver = StubChainDriver::new();
        let token = ItemTokenId::new();
        driver.seed_item("0xabc", token, 2);
        let err = driver
            .burn_item("0xabc", token, 5)
            .expect_err("burning more than held must fail");
        assert!(matches!(err, ChainError::InsufficientBalance { .. }));
    }

    #[test]
    fn transfer_moves_balance_between_wallets() {
        let driver = StubChainDriver::new();
        let token = ItemTokenId::new();
        driver.seed_item("0xabc", token, 10);
        driver
            .transfer_item("0xabc", "0xdef", token, 4)
            .expect("transfer within balance succeeds");
        assert_eq!(driver.item_balance("0xabc", token), 6);
        assert_eq!(driver.item_balance("0xdef", token), 4);
    }

    #[test]
    fn next_id_increments_independently_per_contract() {
        let driver = StubChainDriver::new();
        assert_eq!(driver.next_id(ContractKind::Character), 0);
        assert_eq!(driver.next_id(ContractKind::Character), 1);
        assert_eq!(driver.next_id(ContractKind::Item), 0);
    }
}
