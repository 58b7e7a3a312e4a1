//! Conservation law verification for the conservation ledger.
//!
//! Internal movements (`Transfer`, `Trade`) transfer currency/items between
//! two wallets/merchants without creating or destroying them: every debit
//! must match a credit. Movements that touch the chain (`Mint`, `Gather`,
//! `Craft`, `Loot` as sources; `Burn`, `Repair` as sinks) are legitimate
//! creation/destruction and are excluded from the internal balance check.
//!
//! For each token (or copper, keyed by `None`) in tick T, the check is:
//!
//! ```text
//! sum(internal_credits in T) == sum(internal_debits in T)
//! ```
//!
//! Each well-formed internal entry adds its quantity to both sides equally,
//! so this check passes by construction for entries built through
//! [`crate::TransactionBuilder`]. It exists as defense-in-depth against
//! data corruption, e.g. entries loaded from a cold store after a restart.

use std::collections::{BTreeMap, BTreeSet};

use shard_types::{ItemTokenId, LedgerEntry, LedgerEntryType};

use crate::LedgerAnomaly;

/// The result of a conservation check for a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConservationResult {
    /// The ledger is balanced for this tick.
    Balanced,
    /// One or more tokens (or copper) have imbalanced internal flows.
    Anomaly(LedgerAnomaly),
}

/// Returns `true` if the entry type is an internal movement (both sides
/// are wallets/merchants; never touches the chain).
const fn is_internal(entry_type: LedgerEntryType) -> bool {
    matches!(entry_type, LedgerEntryType::Transfer | LedgerEntryType::Trade)
}

/// Returns `true` if the entry type is a chain source flow (mints).
const fn is_source(entry_type: LedgerEntryType) -> bool {
    matches!(
        entry_type,
        LedgerEntryType::Mint | LedgerEntryType::Gather | LedgerEntryType::Craft | LedgerEntryType::Loot
    )
}

/// Returns `true` if the entry type is a chain sink flow (burns).
const fn is_sink(entry_type: LedgerEntryType) -> bool {
    matches!(entry_type, LedgerEntryType::Burn | LedgerEntryType::Repair)
}

/// Verify the conservation law for all entries in a single tick.
///
/// Checks that internal movements (`Transfer`, `Trade`) balance for every
/// token: total credits must equal total debits. Source flows (`Mint`,
/// `Gather`, `Craft`, `Loot`) and sink flows (`Burn`, `Repair`) are excluded
/// because they represent legitimate chain-backed creation and destruction.
#[must_use]
pub fn verify_conservation(tick: u64, entries: &[LedgerEntry]) -> ConservationResult {
    let mut internal_credit: BTreeMap<Option<ItemTokenId>, u64> = BTreeMap::new();
    let mut internal_debit: BTreeMap<Option<ItemTokenId>, u64> = BTreeMap::new();

    for entry in entries {
        if entry.tick != tick || !is_internal(entry.entry_type) {
            continue;
        }

        let credit = internal_credit.entry(entry.token_id).or_insert(0);
        *credit = credit.saturating_add(entry.quantity);

        let debit = internal_debit.entry(entry.token_id).or_insert(0);
        *debit = debit.saturating_add(entry.quantity);
    }

    let all_tokens: BTreeSet<Option<ItemTokenId>> = internal_credit
        .keys()
        .chain(internal_debit.keys())
        .copied()
        .collect();

    let mut imbalances: BTreeMap<Option<ItemTokenId>, (u64, u64)> = BTreeMap::new();
    for token in &all_tokens {
        let credit = internal_credit.get(token).copied().unwrap_or(0);
        let debit = internal_debit.get(token).copied().unwrap_or(0);
        if credit != debit {
            imbalances.insert(*token, (debit, credit));
        }
    }

    if imbalances.is_empty() {
        ConservationResult::Balanced
    } else {
        let count = imbalances.len();
        ConservationResult::Anomaly(LedgerAnomaly {
            tick,
            imbalances,
            message: format!(
                "ledger anomaly at tick {tick}: conservation law violated for {count} token(s)"
            ),
        })
    }
}

/// Verify conservation with an additional source/sink classification check:
/// every entry in the tick must be internal, a source, or a sink -- there
/// is no fourth category. This guards against a future `LedgerEntryType`
/// variant being added without updating [`is_internal`]/[`is_source`]/
/// [`is_sink`].
#[must_use]
pub fn verify_conservation_strict(tick: u64, entries: &[LedgerEntry]) -> ConservationResult {
    let result = verify_conservation(tick, entries);
    if matches!(result, ConservationResult::Anomaly(_)) {
        return result;
    }

    for entry in entries {
        if entry.tick != tick {
            continue;
        }
        if !is_internal(entry.entry_type) && !is_source(entry.entry_type) && !is_sink(entry.entry_type) {
            let mut imbalances = BTreeMap::new();
            imbalances.insert(entry.token_id, (0, 0));
            return ConservationResult::Anomaly(LedgerAnomaly {
                tick,
                imbalances,
                message: format!(
                    "ledger anomaly at tick {tick}: unclassified entry type {:?}",
                    entry.entry_type
                ),
            });
        }
    }

    ConservationResult::Balanced
}

#[cfg(test)]
mod tests {
    use shard_types::LedgerPartyType;

    use super::*;
    use crate::transaction::TransactionBuilder;

    fn entry(tick: u64, entry_type: LedgerEntryType, quantity: u64) -> LedgerEntry {
        let (from, from_type, to, to_type) = match entry_type {
            LedgerEntryType::Mint | LedgerEntryType::Gather | LedgerEntryType::Craft | LedgerEntryType::Loot => {
                ("chain", LedgerPartyType::Chain, "0xabc", LedgerPartyType::Wallet)
            }
            LedgerEntryType::Burn | LedgerEntryType::Repair => {
                ("0xabc", LedgerPartyType::Wallet, "chain", LedgerPartyType::Chain)
            }
            LedgerEntryType::Transfer | LedgerEntryType::Trade => {
                ("0xabc", LedgerPartyType::Wallet, "0xdef", LedgerPartyType::Wallet)
            }
        };
        TransactionBuilder::new(tick, entry_type)
            .from(from, from_type)
            .to(to, to_type)
            .quantity(quantity)
            .reason("TEST")
            .build()
            .expect("well-formed test entry")
    }

    #[test]
    fn empty_tick_is_balanced() {
        assert_eq!(verify_conservation(1, &[]), ConservationResult::Balanced);
    }

    #[test]
    fn single_transfer_is_balanced() {
        let entries = vec![entry(1, LedgerEntryType::Transfer, 500)];
        assert_eq!(verify_conservation(1, &entries), ConservationResult::Balanced);
    }

    #[test]
    fn mint_alone_is_balanced() {
        // Mint is a source flow; excluded from the internal balance check.
        let entries = vec![entry(1, LedgerEntryType::Mint, 1_000)];
        assert_eq!(verify_conservation(1, &entries), ConservationResult::Balanced);
    }

    #[test]
    fn burn_alone_is_balanced() {
        let entries = vec![entry(1, LedgerEntryType::Burn, 300)];
        assert_eq!(verify_conservation(1, &entries), ConservationResult::Balanced);
    }

    #[test]
    fn mixed_lifecycle_is_balanced() {
        let entries = vec![
            entry(1, LedgerEntryType::Mint, 1_000),
            entry(1, LedgerEntryType::Transfer, 250),
            entry(1, LedgerEntryType::Burn, 100),
        ];
        assert_eq!(verify_conservation(1, &entries), ConservationResult::Balanced);
    }

    #[test]
    fn entries_from_other_ticks_are_filtered() {
        let entries = vec![entry(2, LedgerEntryType::Transfer, 99)];
        assert_eq!(verify_conservation(1, &entries), ConservationResult::Balanced);
    }

    #[test]
    fn strict_check_passes_for_well_formed_entries() {
        let entries = vec![entry(1, LedgerEntryType::Mint, 1_000), entry(1, LedgerEntryType::Trade, 200)];
        assert_eq!(verify_conservation_strict(1, &entries), ConservationResult::Balanced);
    }

    #[test]
    fn anomaly_display_shows_message() {
        let anomaly = LedgerAnomaly {
            tick: 5,
            imbalances: BTreeMap::new(),
            message: "ledger anomaly at tick 5: test".to_owned(),
        };
        let display = format!("{anomaly}");
        assert!(display.contains("tick 5"));
    }
}
