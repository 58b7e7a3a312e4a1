//! Gold ledger and conservation bookkeeping for the shard simulation
//! (§4.C Gold Ledger, §3 `GoldLedger`).
//!
//! # Architecture
//!
//! - [`gold_ledger`] -- The [`GoldLedger`] struct: per-wallet pending-spend
//!   reservation against the on-chain balance.
//! - [`ledger`] -- The [`ConservationLedger`] struct: append-only log of
//!   currency/item movements, with recording methods per entry type.
//! - [`transaction`] -- The [`TransactionBuilder`] for validated entry
//!   construction.
//! - [`conservation`] -- Conservation law verification and anomaly
//!   detection over a batch of entries.
//!
//! # Conservation law
//!
//! Every movement between two wallets/merchants (`Transfer`, `Trade`) is
//! internal and must balance within a tick by construction. Movements that
//! touch the chain (`Mint`, `Gather`, `Craft`, `Loot` as sources; `Burn`,
//! `Repair` as sinks) are legitimate creation/destruction and are excluded
//! from the internal balance check (§3 currency invariant: "currency is
//! denominated in integer copper everywhere internally").
//!
//! # Usage
//!
//! ```
//! use shard_ledger::GoldLedger;
//! use chrono::Utc;
//!
//! let mut ledger = GoldLedger::new();
//! ledger.record_spend("0xabc", 500);
//! assert_eq!(ledger.available_gold("0xabc", 1_000), 500);
//! ledger.record_refund("0xabc", 200);
//! assert_eq!(ledger.available_gold("0xabc", 1_000), 700);
//! ```

pub mod conservation;
pub mod gold_ledger;
pub mod ledger;
pub mod transaction;

pub use conservation::ConservationResult;
pub use gold_ledger::GoldLedger;
pub use ledger::ConservationLedger;
pub use transaction::TransactionBuilder;

use std::collections::BTreeMap;

use shard_types::{ItemTokenId, LedgerEntryType};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording ledger entries.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Quantity must be strictly positive.
    #[error("ledger entry quantity must be non-zero")]
    ZeroQuantity,

    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The from/to party types do not match the expected pairing for the
    /// entry type.
    #[error("invalid party type for {entry_type:?} {side}: expected one of {expected}, got {actual:?}")]
    InvalidPartyType {
        /// The entry type being validated.
        entry_type: LedgerEntryType,
        /// Which side of the entry ("from" or "to").
        side: &'static str,
        /// A human-readable description of the expected party types.
        expected: &'static str,
        /// The actual party type supplied.
        actual: shard_types::LedgerPartyType,
    },
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A conservation law violation detected during tick verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// The tick where the anomaly was detected.
    pub tick: u64,
    /// Per-token imbalance: (`debit_total`, `credit_total`). `None` keys
    /// the copper (gold) ledger.
    pub imbalances: BTreeMap<Option<ItemTokenId>, (u64, u64)>,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
