//! Transaction builder and validation for the conservation ledger.
//!
//! Provides a [`TransactionBuilder`] that enforces the double-entry
//! invariant: every movement must specify a source party (debit) and a
//! destination party (credit) of a type valid for the entry's
//! [`LedgerEntryType`], with a strictly positive quantity.

use shard_types::{ChainTxId, ItemTokenId, LedgerEntry, LedgerEntryId, LedgerEntryType, LedgerPartyType};

use crate::LedgerError;

/// Builder for constructing validated [`LedgerEntry`] values.
///
/// # Examples
///
/// ```
/// use shard_ledger::TransactionBuilder;
/// use shard_types::{LedgerEntryType, LedgerPartyType};
///
/// let entry = TransactionBuilder::new(1, LedgerEntryType::Transfer)
///     .from("0xabc", LedgerPartyType::Wallet)
///     .to("0xdef", LedgerPartyType::Wallet)
///     .quantity(500)
///     .reason("TRADE")
///     .build();
///
/// assert!(entry.is_ok());
/// ```
#[derive(Debug)]
pub struct TransactionBuilder {
    tick: u64,
    entry_type: LedgerEntryType,
    token_id: Option<ItemTokenId>,
    from: Option<String>,
    from_type: Option<LedgerPartyType>,
    to: Option<String>,
    to_type: Option<LedgerPartyType>,
    quantity: Option<u64>,
    reason: Option<String>,
    chain_tx: Option<ChainTxId>,
}

impl TransactionBuilder {
    /// Start building a ledger entry for the given tick and entry type.
    /// Defaults to the copper (gold) ledger; call [`Self::token`] for an
    /// item movement.
    #[must_use]
    pub const fn new(tick: u64, entry_type: LedgerEntryType) -> Self {
        Self {
            tick,
            entry_type,
            token_id: None,
            from: None,
            from_type: None,
            to: None,
            to_type: None,
            quantity: None,
            reason: None,
            chain_tx: None,
        }
    }

    /// Mark this entry as an item movement rather than a copper movement.
    #[must_use]
    pub const fn token(mut self, token_id: ItemTokenId) -> Self {
        self.token_id = Some(token_id);
        self
    }

    /// Set the source party (debit side).
    #[must_use]
    pub fn from(mut self, party: impl Into<String>, party_type: LedgerPartyType) -> Self {
        self.from = Some(party.into());
        self.from_type = Some(party_type);
        self
    }

    /// Set the destination party (credit side).
    #[must_use]
    pub fn to(mut self, party: impl Into<String>, party_type: LedgerPartyType) -> Self {
        self.to = Some(party.into());
        self.to_type = Some(party_type);
        self
    }

    /// Set the quantity moved (copper amount, or item count).
    #[must_use]
    pub const fn quantity(mut self, quantity: u64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the human-readable reason for the movement.
    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attach the chain transaction this entry corresponds to, once known.
    #[must_use]
    pub const fn chain_tx(mut self, tx: ChainTxId) -> Self {
        self.chain_tx = Some(tx);
        self
    }

    /// Validate inputs and produce a [`LedgerEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroQuantity`] if the quantity is zero or
    /// unset. Returns [`LedgerError::MissingField`] if `from`/`to`/`reason`
    /// are not set. Returns [`LedgerError::InvalidPartyType`] if the
    /// from/to party types do not match the expected pairing for the entry
    /// type.
    pub fn build(self) -> Result<LedgerEntry, LedgerError> {
        let quantity = self.quantity.unwrap_or(0);
        if quantity == 0 {
            return Err(LedgerError::ZeroQuantity);
        }
        let from = self.from.ok_or(LedgerError::MissingField("from"))?;
        let from_type = self.from_type.ok_or(LedgerError::MissingField("from_type"))?;
        let to = self.to.ok_or(LedgerError::MissingField("to"))?;
        let to_type = self.to_type.ok_or(LedgerError::MissingField("to_type"))?;
        let reason = self.reason.ok_or(LedgerError::MissingField("reason"))?;

        validate_party_types(self.entry_type, from_type, to_type)?;

        Ok(LedgerEntry {
            id: LedgerEntryId::new(),
            tick: self.tick,
            entry_type: self.entry_type,
            token_id: self.token_id,
            quantity,
            from,
            from_type,
            to,
            to_type,
            reason,
            chain_tx: self.chain_tx,
        })
    }
}

fn validate_party_types(
    entry_type: LedgerEntryType,
    from_type: LedgerPartyType,
    to_type: LedgerPartyType,
) -> Result<(), LedgerError> {
    let (from_ok, from_desc, to_ok, to_desc) = expected_party_types(entry_type);

    if !from_ok(from_type) {
        return Err(LedgerError::InvalidPartyType {
            entry_type,
            side: "from",
            expected: from_desc,
            actual: from_type,
        });
    }
    if !to_ok(to_type) {
        return Err(LedgerError::InvalidPartyType {
            entry_type,
            side: "to",
            expected: to_desc,
            actual: to_type,
        });
    }
    Ok(())
}

type PartyPredicate = fn(LedgerPartyType) -> bool;

/// Return predicates (and descriptions) for the valid from/to party types
/// of each [`LedgerEntryType`] (§4.G, §3 `LedgerEntry`).
const fn expected_party_types(
    entry_type: LedgerEntryType,
) -> (PartyPredicate, &'static str, PartyPredicate, &'static str) {
    fn is_chain(p: LedgerPartyType) -> bool {
        matches!(p, LedgerPartyType::Chain)
    }
    fn is_wallet_or_merchant(p: LedgerPartyType) -> bool {
        matches!(p, LedgerPartyType::Wallet | LedgerPartyType::Merchant)
    }
    fn is_wallet(p: LedgerPartyType) -> bool {
        matches!(p, LedgerPartyType::Wallet)
    }

    match entry_type {
        // Source flows: newly minted from the chain to a wallet/merchant.
        LedgerEntryType::Mint | LedgerEntryType::Gather | LedgerEntryType::Craft | LedgerEntryType::Loot => {
            (is_chain, "chain", is_wallet_or_merchant, "wallet or merchant")
        }
        // Sink flows: burned back into the chain.
        LedgerEntryType::Burn => (
            is_wallet_or_merchant,
            "wallet or merchant",
            is_chain,
            "chain",
        ),
        LedgerEntryType::Repair => (is_wallet, "wallet", is_chain, "chain"),
        // Internal movements: both sides are wallets/merchants.
        LedgerEntryType::Transfer | LedgerEntryType::Trade => (
            is_wallet_or_merchant,
            "wallet or merchant",
            is_wallet_or_merchant,
            "wallet or merchant",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_valid_entry() {
        let entry = TransactionBuilder::new(1, LedgerEntryType::Transfer)
            .from("0xabc", LedgerPartyType::Wallet)
            .to("0xdef", LedgerPartyType::Wallet)
            .quantity(500)
            .reason("TRADE")
            .build()
            .expect("valid transfer should build");

        assert_eq!(entry.tick, 1);
        assert_eq!(entry.entry_type, LedgerEntryType::Transfer);
        assert_eq!(entry.quantity, 500);
    }

    #[test]
    fn zero_quantity_rejected() {
        let result = TransactionBuilder::new(1, LedgerEntryType::Mint)
            .from("chain", LedgerPartyType::Chain)
            .to("0xabc", LedgerPartyType::Wallet)
            .reason("MINT")
            .build();
        assert!(matches!(result, Err(LedgerError::ZeroQuantity)));
    }

    #[test]
    fn mint_requires_chain_source() {
        let result = TransactionBuilder::new(1, LedgerEntryType::Mint)
            .from("0xabc", LedgerPartyType::Wallet)
            .to("0xdef", LedgerPartyType::Wallet)
            .quantity(10)
            .reason("MINT")
            .build();
        assert!(matches!(result, Err(LedgerError::InvalidPartyType { .. })));
    }

    #[test]
    fn burn_requires_chain_destination() {
        let result = TransactionBuilder::new(1, LedgerEntryType::Burn)
            .from("0xabc", LedgerPartyType::Wallet)
            .to("0xdef", LedgerPartyType::Wallet)
            .quantity(10)
            .reason("BURN")
            .build();
        assert!(matches!(result, Err(LedgerError::InvalidPartyType { .. })));
    }

    #[test]
    fn trade_between_wallet_and_merchant_is_valid() {
        let result = TransactionBuilder::new(1, LedgerEntryType::Trade)
            .from("0xabc", LedgerPartyType::Wallet)
            .to("merchant-1", LedgerPartyType::Merchant)
            .quantity(250)
            .reason("BUY")
            .build();
        assert!(result.is_ok());
    }
}
