//! The conservation ledger: an append-only log of currency/item movements
//! (§3 `LedgerEntry`).

use shard_types::{ChainTxId, ItemTokenId, LedgerEntry, LedgerEntryType, LedgerPartyType};

use crate::conservation::{verify_conservation, verify_conservation_strict, ConservationResult};
use crate::transaction::TransactionBuilder;
use crate::LedgerError;

/// The well-known party identifier for the external chain, used as the
/// `from`/`to` of source/sink entries.
pub const CHAIN_PARTY: &str = "chain";

/// Parameters for recording a wallet-to-wallet (or wallet-to-merchant)
/// transfer or trade.
pub struct TransferParams {
    /// The tick number.
    pub tick: u64,
    /// `Transfer` for a direct gift/trade, `Trade` for a merchant buy/sell.
    pub entry_type: LedgerEntryType,
    /// `None` for copper, `Some` for an item movement.
    pub token_id: Option<ItemTokenId>,
    /// Quantity moved.
    pub quantity: u64,
    /// Source party identifier.
    pub from: String,
    /// Source party type.
    pub from_type: LedgerPartyType,
    /// Destination party identifier.
    pub to: String,
    /// Destination party type.
    pub to_type: LedgerPartyType,
    /// Human-readable reason.
    pub reason: String,
}

/// An append-only log of every currency/item movement recorded by the
/// action pipeline (mints, burns, gathers, crafts, loot, repairs, trades).
#[derive(Debug, Default)]
pub struct ConservationLedger {
    entries: Vec<LedgerEntry>,
}

impl ConservationLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Return the number of entries in the ledger.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the ledger has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a pre-built entry (e.g. one loaded from persistence).
    pub fn append(&mut self, entry: LedgerEntry) {
        self.entries.push(entry);
    }

    /// Mint copper or an item to a wallet/merchant (§4.B `mintGold`/`mintItem`).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_mint(
        &mut self,
        tick: u64,
        token_id: Option<ItemTokenId>,
        quantity: u64,
        to: &str,
        to_type: LedgerPartyType,
        reason: &str,
        chain_tx: Option<ChainTxId>,
    ) -> Result<&LedgerEntry, LedgerError> {
        let mut builder = TransactionBuilder::new(tick, LedgerEntryType::Mint)
            .from(CHAIN_PARTY, LedgerPartyType::Chain)
            .to(to, to_type)
            .quantity(quantity)
            .reason(reason);
        if let Some(token_id) = token_id {
            builder = builder.token(token_id);
        }
        self.build_and_append(chain_tx, builder)
    }

    /// Burn copper or an item held by a wallet/merchant (§4.B `burnItem`).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_burn(
        &mut self,
        tick: u64,
        token_id: Option<ItemTokenId>,
        quantity: u64,
        from: &str,
        from_type: LedgerPartyType,
        reason: &str,
        chain_tx: Option<ChainTxId>,
    ) -> Result<&LedgerEntry, LedgerError> {
        let mut builder = TransactionBuilder::new(tick, LedgerEntryType::Burn)
            .from(from, from_type)
            .to(CHAIN_PARTY, LedgerPartyType::Chain)
            .quantity(quantity)
            .reason(reason);
        if let Some(token_id) = token_id {
            builder = builder.token(token_id);
        }
        self.build_and_append(chain_tx, builder)
    }

    /// Record a gathering mint (resource node -> wallet).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_gather(
        &mut self,
        tick: u64,
        token_id: ItemTokenId,
        quantity: u64,
        wallet: &str,
    ) -> Result<&LedgerEntry, LedgerError> {
        let builder = TransactionBuilder::new(tick, LedgerEntryType::Gather)
            .token(token_id)
            .from(CHAIN_PARTY, LedgerPartyType::Chain)
            .to(wallet, LedgerPartyType::Wallet)
            .quantity(quantity)
            .reason("GATHER");
        self.build_and_append(None, builder)
    }

    /// Record a craft mint (recipe output -> wallet).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_craft(
        &mut self,
        tick: u64,
        token_id: ItemTokenId,
        quantity: u64,
        wallet: &str,
    ) -> Result<&LedgerEntry, LedgerError> {
        let builder = TransactionBuilder::new(tick, LedgerEntryType::Craft)
            .token(token_id)
            .from(CHAIN_PARTY, LedgerPartyType::Chain)
            .to(wallet, LedgerPartyType::Wallet)
            .quantity(quantity)
            .reason("CRAFT");
        self.build_and_append(None, builder)
    }

    /// Record a mob-death loot mint (drop -> killer's wallet).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_loot(
        &mut self,
        tick: u64,
        token_id: ItemTokenId,
        quantity: u64,
        wallet: &str,
    ) -> Result<&LedgerEntry, LedgerError> {
        let builder = TransactionBuilder::new(tick, LedgerEntryType::Loot)
            .token(token_id)
            .from(CHAIN_PARTY, LedgerPartyType::Chain)
            .to(wallet, LedgerPartyType::Wallet)
            .quantity(quantity)
            .reason("LOOT");
        self.build_and_append(None, builder)
    }

    /// Record a repair payment (wallet copper -> chain).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_repair(
        &mut self,
        tick: u64,
        copper: u64,
        wallet: &str,
    ) -> Result<&LedgerEntry, LedgerError> {
        let builder = TransactionBuilder::new(tick, LedgerEntryType::Repair)
            .from(wallet, LedgerPartyType::Wallet)
            .to(CHAIN_PARTY, LedgerPartyType::Chain)
            .quantity(copper)
            .reason("REPAIR");
        self.build_and_append(None, builder)
    }

    /// Record a general transfer or merchant trade between two parties.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_transfer(&mut self, params: TransferParams) -> Result<&LedgerEntry, LedgerError> {
        let mut builder = TransactionBuilder::new(params.tick, params.entry_type)
            .from(params.from, params.from_type)
            .to(params.to, params.to_type)
            .quantity(params.quantity)
            .reason(params.reason);
        if let Some(token_id) = params.token_id {
            builder = builder.token(token_id);
        }
        self.build_and_append(None, builder)
    }

    fn build_and_append(
        &mut self,
        chain_tx: Option<ChainTxId>,
        builder: TransactionBuilder,
    ) -> Result<&LedgerEntry, LedgerError> {
        let builder = if let Some(tx) = chain_tx { builder.chain_tx(tx) } else { builder };
        let entry = builder.build()?;
        self.entries.push(entry);
        self.entries.last().ok_or(LedgerError::MissingField("entry"))
    }

    /// All entries, in insertion order.
    #[must_use]
    pub fn all_entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// All entries recorded in a given tick.
    #[must_use]
    pub fn entries_for_tick(&self, tick: u64) -> Vec<&LedgerEntry> {
        self.entries.iter().filter(|e| e.tick == tick).collect()
    }

    /// The net signed balance change for `party` and `token_id` (`None` for
    /// copper) across every recorded entry.
    #[must_use]
    pub fn party_net_change(&self, party: &str, token_id: Option<ItemTokenId>) -> i64 {
        let mut balance: i64 = 0;
        for entry in &self.entries {
            if entry.token_id != token_id {
                continue;
            }
            let quantity = i64::try_from(entry.quantity).unwrap_or(i64::MAX);
            if entry.to == party {
                balance = balance.saturating_add(quantity);
            }
            if entry.from == party {
                balance = balance.saturating_sub(quantity);
            }
        }
        balance
    }

    /// Verify the conservation law for a given tick.
    #[must_use]
    pub fn verify_conservation(&self, tick: u64) -> ConservationResult {
        verify_conservation(tick, &self.entries)
    }

    /// Verify conservation with additional non-negative flow checks.
    #[must_use]
    pub fn verify_conservation_strict(&self, tick: u64) -> ConservationResult {
        verify_conservation_strict(tick, &self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ledger_is_empty() {
        let ledger = ConservationLedger::new();
        assert!(ledger.is_empty());
    }

    #[test]
    fn mint_then_transfer_tracks_balances() {
        let mut ledger = ConservationLedger::new();
        ledger
            .record_mint(1, None, 1_000, "0xabc", LedgerPartyType::Wallet, "MINT", None)
            .expect("mint should succeed");
        ledger
            .record_transfer(TransferParams {
                tick: 1,
                entry_type: LedgerEntryType::Transfer,
                token_id: None,
                quantity: 400,
                from: "0xabc".to_owned(),
                from_type: LedgerPartyType::Wallet,
                to: "0xdef".to_owned(),
                to_type: LedgerPartyType::Wallet,
                reason: "GIFT".to_owned(),
            })
            .expect("transfer should succeed");

        assert_eq!(ledger.party_net_change("0xabc", None), 600);
        assert_eq!(ledger.party_net_change("0xdef", None), 400);
    }

    #[test]
    fn gather_craft_loot_are_source_flows() {
        let mut ledger = ConservationLedger::new();
        let token = ItemTokenId::new();
        ledger.record_gather(1, token, 3, "0xabc").expect("gather");
        assert_eq!(ledger.party_net_change("0xabc", Some(token)), 3);
        assert_eq!(ledger.verify_conservation(1), ConservationResult::Balanced);
    }

    #[test]
    fn entries_for_tick_filters() {
        let mut ledger = ConservationLedger::new();
        ledger
            .record_mint(1, None, 100, "0xabc", LedgerPartyType::Wallet, "MINT", None)
            .expect("mint");
        ledger
            .record_mint(2, None, 50, "0xabc", LedgerPartyType::Wallet, "MINT", None)
            .expect("mint");
        assert_eq!(ledger.entries_for_tick(1).len(), 1);
        assert_eq!(ledger.entries_for_tick(2).len(), 1);
    }
}
