//! Persistence layer for the shard server: a Redis-compatible hot store for
//! per-wallet state available within the current tick, and a `PostgreSQL`
//! cold store for durable event/ledger history and periodic character
//! snapshots (§4.D Persistence Store).
//!
//! # Architecture
//!
//! ```text
//! Action Pipeline / Zone Tick
//!     |
//!     +-- Read/write per-wallet state --> PersistenceStore (Redis or in-memory)
//!     |
//!     +-- End of tick flush ----------> PostgreSQL
//!         |-- EventStore           (append-only domain events)
//!         |-- LedgerStore          (currency/item movement records)
//!         +-- CharacterStore       (periodic character-save + diary snapshots)
//! ```
//!
//! # Modules
//!
//! - [`persistence`] -- [`PersistenceStore`], the hot-store contract
//!   (`get`/`set`/`hget`/`hset`/`push_capped`), dispatching to [`RedisStore`]
//!   or [`InMemoryStore`].
//! - [`redis_store`] -- Redis-compatible hot store with write-through
//!   caching.
//! - [`memory_store`] -- pure in-memory hot store, used when `REDIS_URL` is
//!   unset and under test.
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration.
//! - [`event_store`] -- batch event insertion and querying.
//! - [`ledger_store`] -- batch ledger entry insertion and querying.
//! - [`character_store`] -- durable character-save and diary persistence.
//! - [`tick_persist`] -- end-of-tick orchestration across both stores.
//! - [`error`] -- shared error types.

pub mod character_store;
pub mod error;
pub mod event_store;
pub mod experiment_store;
pub mod ledger_store;
pub mod memory_store;
pub mod persistence;
pub mod postgres;
pub mod redis_store;
pub mod tick_persist;

pub use character_store::{CharacterStore, DiaryEntryRow};
pub use error::DbError;
pub use event_store::{EventRow, EventStore, NewEvent};
pub use ledger_store::{LedgerRow, LedgerStore};
pub use memory_store::InMemoryStore;
pub use persistence::PersistenceStore;
pub use postgres::{PostgresConfig, PostgresPool};
pub use redis_store::RedisStore;
pub use tick_persist::PersistError;
