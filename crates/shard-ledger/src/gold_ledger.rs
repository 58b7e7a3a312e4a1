//! Per-wallet pending-spend reservation against the on-chain gold balance
//! (§4.C Gold Ledger).
//!
//! On-chain writes have latency and can fail. Gameplay must see a spend as
//! "committed" instantly, to prevent double-spend within a session, but
//! must not diverge permanently from the chain.

use std::collections::BTreeMap;

use chrono::Utc;
use shard_types::WalletReservation;
use tracing::warn;

/// Tracks, per wallet, the copper reserved against pending (not-yet-chain-
/// confirmed) spends.
#[derive(Debug, Default)]
pub struct GoldLedger {
    reserved: BTreeMap<String, WalletReservation>,
}

impl GoldLedger {
    /// An empty ledger with no reservations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The copper this wallet may still spend: `max(0, onChain - reserved)`.
    #[must_use]
    pub fn available_gold(&self, wallet: &str, on_chain_gold: u64) -> u64 {
        let reserved = self.reserved_copper(wallet);
        on_chain_gold.saturating_sub(reserved)
    }

    /// The copper currently reserved for this wallet.
    #[must_use]
    pub fn reserved_copper(&self, wallet: &str) -> u64 {
        self.reserved
            .get(wallet)
            .map_or(0, |r| r.reserved_copper)
    }

    /// Increase the reservation for `wallet` by `copper` (a spend
    /// committed in-memory ahead of chain confirmation).
    pub fn record_spend(&mut self, wallet: &str, copper: u64) {
        let entry = self.entry(wallet);
        entry.reserved_copper = entry.reserved_copper.saturating_add(copper);
    }

    /// Decrease the reservation for `wallet` by `copper`, floored at zero
    /// (a spend that failed to commit on-chain, or was refunded).
    pub fn record_refund(&mut self, wallet: &str, copper: u64) {
        let entry = self.entry(wallet);
        entry.reserved_copper = entry.reserved_copper.saturating_sub(copper);
    }

    /// Reconcile `wallet`'s reservation against the on-chain balance. If
    /// `reserved > onChainGold`, the reservation is truncated to
    /// `onChainGold` and the drift is logged. Never increases `reserved`.
    pub fn reconcile(&mut self, wallet: &str, on_chain_gold: u64) {
        let entry = self.entry(wallet);
        if entry.reserved_copper > on_chain_gold {
            warn!(
                wallet,
                reserved = entry.reserved_copper,
                on_chain = on_chain_gold,
                "gold ledger drift: truncating reservation to on-chain balance"
            );
            entry.reserved_copper = on_chain_gold;
        }
        entry.last_reconciled_at = Utc::now();
    }

    fn entry(&mut self, wallet: &str) -> &mut WalletReservation {
        self.reserved
            .entry(wallet.to_owned())
            .or_insert_with(|| WalletReservation {
                reserved_copper: 0,
                last_reconciled_at: Utc::now(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_gold_subtracts_reservation() {
        let mut ledger = GoldLedger::new();
        ledger.record_spend("0xabc", 300);
        assert_eq!(ledger.available_gold("0xabc", 1_000), 700);
    }

    #[test]
    fn available_gold_floors_at_zero() {
        let mut ledger = GoldLedger::new();
        ledger.record_spend("0xabc", 2_000);
        assert_eq!(ledger.available_gold("0xabc", 1_000), 0);
    }

    #[test]
    fn refund_decreases_reservation_floored_at_zero() {
        let mut ledger = GoldLedger::new();
        ledger.record_spend("0xabc", 100);
        ledger.record_refund("0xabc", 500);
        assert_eq!(ledger.reserved_copper("0xabc"), 0);
    }

    #[test]
    fn reconcile_truncates_but_never_increases() {
        let mut ledger = GoldLedger::new();
        ledger.record_spend("0xabc", 900);
        ledger.reconcile("0xabc", 500);
        assert_eq!(ledger.reserved_copper("0xabc"), 500);

        // A reconcile with a larger on-chain balance must not raise
        // `reserved` back up.
        ledger.reconcile("0xabc", 10_000);
        assert_eq!(ledger.reserved_copper("0xabc"), 500);
    }

    #[test]
    fn unknown_wallet_has_zero_reservation() {
        let ledger = GoldLedger::new();
        assert_eq!(ledger.available_gold("0xnew", 100), 100);
    }
}
