//! End-of-tick persistence operations spanning the hot store (per-wallet
//! state, available every tick) and the cold store (durable event/ledger
//! history, periodic character snapshots).
//!
//! # Architecture
//!
//! ```text
//! End of tick
//!   |
//!   +-- persist_character_to_hot_store()  --> hot store, wallet:{addr}:save
//!   +-- append_diary_to_hot_store()       --> hot store, wallet:{addr}:diary (capped)
//!   +-- persist_events_to_postgres()      --> PostgreSQL events table
//!   +-- persist_ledger_to_postgres()      --> PostgreSQL ledger_entries table
//!   +-- flush_character_to_cold_store()   --> PostgreSQL character_saves (periodic)
//! ```

use shard_types::{CharacterSave, DiaryEntry, LedgerEntry, BOUNDED_LIST_CAP};
use sqlx::PgPool;

use crate::character_store::CharacterStore;
use crate::error::DbError;
use crate::event_store::{EventStore, NewEvent};
use crate::ledger_store::LedgerStore;
use crate::persistence::PersistenceStore;

/// Errors that can occur during end-of-tick persistence.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// A hot store operation failed.
    #[error("hot store persist error: {0}")]
    HotStore(#[from] DbError),

    /// A cold store (`PostgreSQL`) operation failed.
    #[error("cold store persist error: {0}")]
    ColdStore(String),
}

fn save_key(wallet: &str) -> String {
    format!("wallet:{wallet}:save")
}

fn diary_key(wallet: &str) -> String {
    format!("wallet:{wallet}:diary")
}

/// Write the current character snapshot to the hot store so the next tick
/// (and any HTTP read) observes it immediately.
///
/// # Errors
///
/// Returns [`PersistError::HotStore`] if the write fails.
pub async fn persist_character_to_hot_store(
    store: &PersistenceStore,
    wallet: &str,
    save: &CharacterSave,
) -> Result<(), PersistError> {
    store.set(&save_key(wallet), save).await?;
    Ok(())
}

/// Read the character snapshot from the hot store.
///
/// # Errors
///
/// Returns [`PersistError::HotStore`] if the read fails.
pub async fn load_character_from_hot_store(
    store: &PersistenceStore,
    wallet: &str,
) -> Result<Option<CharacterSave>, PersistError> {
    Ok(store.get(&save_key(wallet)).await?)
}

/// Append a diary entry to the hot store's capped list (§4.D, 200 entries).
///
/// # Errors
///
/// Returns [`PersistError::HotStore`] if the write fails.
pub async fn append_diary_to_hot_store(
    store: &PersistenceStore,
    wallet: &str,
    entry: &DiaryEntry,
) -> Result<(), PersistError> {
    store.push_capped(&diary_key(wallet), entry, BOUNDED_LIST_CAP).await?;
    Ok(())
}

/// Read the hot store's capped diary list for `wallet`.
///
/// # Errors
///
/// Returns [`PersistError::HotStore`] if the read fails.
pub async fn read_diary_from_hot_store(store: &PersistenceStore, wallet: &str) -> Result<Vec<DiaryEntry>, PersistError> {
    Ok(store.get_list(&diary_key(wallet)).await?)
}

/// Batch-insert this tick's events into the durable event log.
///
/// # Errors
///
/// Returns [`PersistError::ColdStore`] if the insert fails.
pub async fn persist_events_to_postgres(pool: &PgPool, events: &[NewEvent]) -> Result<(), PersistError> {
    if events.is_empty() {
        return Ok(());
    }
    let store = EventStore::new(pool);
    store.batch_insert(events).await.map_err(|e| PersistError::ColdStore(format!("event batch insert failed: {e}")))?;
    tracing::debug!(count = events.len(), "persisted events to PostgreSQL");
    Ok(())
}

/// Batch-insert this tick's ledger entries into the durable ledger log.
///
/// # Errors
///
/// Returns [`PersistError::ColdStore`] if the insert fails.
pub async fn persist_ledger_to_postgres(pool: &PgPool, entries: &[LedgerEntry]) -> Result<(), PersistError> {
    if entries.is_empty() {
        return Ok(());
    }
    let store = LedgerStore::new(pool);
    store
        .batch_insert(entries)
        .await
        .map_err(|e| PersistError::ColdStore(format!("ledger batch insert failed: {e}")))?;
    tracing::debug!(count = entries.len(), "persisted ledger entries to PostgreSQL");
    Ok(())
}

/// Periodically flush a character's durable snapshot to `PostgreSQL`,
/// beyond the hot store's eviction horizon.
///
/// # Errors
///
/// Returns [`PersistError::ColdStore`] if the upsert fails.
pub async fn flush_character_to_cold_store(pool: &PgPool, wallet: &str, save: &CharacterSave) -> Result<(), PersistError> {
    let store = CharacterStore::new(pool);
    store
        .upsert_save(wallet, save)
        .await
        .map_err(|e| PersistError::ColdStore(format!("character snapshot upsert failed: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_error_display() {
        let err = PersistError::ColdStore(String::from("test error"));
        let msg = format!("{err}");
        assert!(msg.contains("test error"));
    }

    #[test]
    fn persist_error_from_db_error() {
        let db_err = DbError::KeyNotFound(String::from("wallet:0xabc:save"));
        let persist_err = PersistError::from(db_err);
        let msg = format!("{persist_err}");
        assert!(msg.contains("0xabc"));
    }
}
