//! Ledger persistence for batch-inserting currency/item movement records.
//!
//! The conservation ledger (`shard-ledger`) tracks every movement in
//! memory; this store flushes it to `PostgreSQL` at the end of each tick
//! for durable, queryable history.

use chrono::{DateTime, Utc};
use shard_types::{ItemTokenId, LedgerEntry, LedgerEntryType, LedgerPartyType};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

/// Default batch size for ledger inserts.
const DEFAULT_BATCH_SIZE: usize = 100;

/// Operations on the `ledger_entries` table.
pub struct LedgerStore<'a> {
    pool: &'a PgPool,
    batch_size: usize,
}

impl<'a> LedgerStore<'a> {
    /// Create a new ledger store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool, batch_size: DEFAULT_BATCH_SIZE }
    }

    /// Set the batch size for inserts.
    #[must_use]
    pub const fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Batch-insert ledger entries into the `ledger_entries` table.
    ///
    /// Entries are inserted in batches for efficiency. Each batch is
    /// wrapped in a transaction for atomicity.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn batch_insert(&self, entries: &[LedgerEntry]) -> Result<(), DbError> {
        if entries.is_empty() {
            return Ok(());
        }

        for chunk in entries.chunks(self.batch_size) {
            let mut tx = self.pool.begin().await?;

            for entry in chunk {
                let token_id: Option<Uuid> = entry.token_id.map(ItemTokenId::into_inner);
                let quantity_i64 = i64::try_from(entry.quantity).unwrap_or(i64::MAX);
                let chain_tx: Option<Uuid> = entry.chain_tx.map(shard_types::ChainTxId::into_inner);

                sqlx::query(
                    r"INSERT INTO ledger_entries (id, tick, entry_type, token_id, quantity, from_party, from_party_type, to_party, to_party_type, reason, chain_tx, created_at)
                      VALUES ($1, $2, $3::ledger_entry_type, $4, $5, $6, $7::ledger_party_type, $8, $9::ledger_party_type, $10, $11, $12)",
                )
                .bind(entry.id.into_inner())
                .bind(i64::try_from(entry.tick).unwrap_or(i64::MAX))
                .bind(ledger_entry_type_to_db(entry.entry_type))
                .bind(token_id)
                .bind(quantity_i64)
                .bind(&entry.from)
                .bind(ledger_party_type_to_db(entry.from_type))
                .bind(&entry.to)
                .bind(ledger_party_type_to_db(entry.to_type))
                .bind(&entry.reason)
                .bind(chain_tx)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
        }

        tracing::debug!(count = entries.len(), "inserted ledger entries");
        Ok(())
    }

    /// Query all ledger entries for a specific tick.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get_entries_by_tick(&self, tick: u64) -> Result<Vec<LedgerRow>, DbError> {
        let tick_i64 = i64::try_from(tick).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, LedgerRow>(
            r"SELECT id, tick, entry_type::TEXT as entry_type, token_id, quantity, from_party, from_party_type::TEXT as from_party_type, to_party, to_party_type::TEXT as to_party_type, reason, chain_tx, created_at
              FROM ledger_entries
              WHERE tick = $1
              ORDER BY created_at",
        )
        .bind(tick_i64)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Query all ledger entries involving a specific party (wallet address
    /// or merchant id), as either source or destination.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get_entries_by_party(&self, party: &str) -> Result<Vec<LedgerRow>, DbError> {
        let rows = sqlx::query_as::<_, LedgerRow>(
            r"SELECT id, tick, entry_type::TEXT as entry_type, token_id, quantity, from_party, from_party_type::TEXT as from_party_type, to_party, to_party_type::TEXT as to_party_type, reason, chain_tx, created_at
              FROM ledger_entries
              WHERE from_party = $1 OR to_party = $1
              ORDER BY tick, created_at",
        )
        .bind(party)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

/// A row from the `ledger_entries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LedgerRow {
    /// Ledger entry UUID.
    pub id: Uuid,
    /// Tick when the movement occurred.
    pub tick: i64,
    /// Entry type as a string (cast from `PostgreSQL` enum).
    pub entry_type: String,
    /// Item token id, `NULL` for a copper movement.
    pub token_id: Option<Uuid>,
    /// Quantity moved.
    pub quantity: i64,
    /// Source party identifier.
    pub from_party: String,
    /// Source party type as a string.
    pub from_party_type: String,
    /// Destination party identifier.
    pub to_party: String,
    /// Destination party type as a string.
    pub to_party_type: String,
    /// Reason for the movement.
    pub reason: String,
    /// Correlated chain transaction id, if confirmed.
    pub chain_tx: Option<Uuid>,
    /// Real-world timestamp.
    pub created_at: DateTime<Utc>,
}

/// Convert a [`LedgerEntryType`] to its `PostgreSQL` enum string.
const fn ledger_entry_type_to_db(entry_type: LedgerEntryType) -> &'static str {
    match entry_type {
        LedgerEntryType::Mint => "mint",
        LedgerEntryType::Burn => "burn",
        LedgerEntryType::Gather => "gather",
        LedgerEntryType::Craft => "craft",
        LedgerEntryType::Loot => "loot",
        LedgerEntryType::Repair => "repair",
        LedgerEntryType::Transfer => "transfer",
        LedgerEntryType::Trade => "trade",
    }
}

/// Convert a [`LedgerPartyType`] to its `PostgreSQL` enum string.
const fn ledger_party_type_to_db(party_type: LedgerPartyType) -> &'static str {
    match party_type {
        LedgerPartyType::Wallet => "wallet",
        LedgerPartyType::Merchant => "merchant",
        LedgerPartyType::Chain => "chain",
    }
}
