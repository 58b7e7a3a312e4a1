//! The `PersistenceStore` hot-store contract (§4.D), dispatching to either
//! a Redis-compatible backend or a pure in-memory fallback.
//!
//! An enum rather than a trait object: async trait methods are not
//! dyn-compatible without pulling in `async-trait`, and the shard server
//! only ever needs one of two concrete backends at a time.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DbError;
use crate::memory_store::InMemoryStore;
use crate::redis_store::RedisStore;

/// The hot store backing per-wallet state: character saves, diary/chat
/// history, and gold reservations.
pub enum PersistenceStore {
    /// Redis-compatible backend with write-through caching.
    Redis(RedisStore),
    /// Pure in-memory backend, used when `REDIS_URL` is unset or under test.
    InMemory(InMemoryStore),
}

impl PersistenceStore {
    /// Connect to a Redis-compatible store at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection fails.
    pub async fn connect_redis(url: &str) -> Result<Self, DbError> {
        Ok(Self::Redis(RedisStore::connect(url).await?))
    }

    /// A pure in-memory store with no external dependency.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryStore::new())
    }

    /// Read the JSON value at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the stored payload fails to
    /// deserialize.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DbError> {
        match self {
            Self::Redis(store) => store.get(key).await,
            Self::InMemory(store) => store.get(key),
        }
    }

    /// Store `value` as JSON at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if `value` cannot be serialized.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), DbError> {
        match self {
            Self::Redis(store) => store.set(key, value).await,
            Self::InMemory(store) => store.set(key, value),
        }
    }

    /// Read one field of a hash at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the stored field fails to
    /// deserialize.
    pub async fn hget<T: DeserializeOwned>(&self, key: &str, field: &str) -> Result<Option<T>, DbError> {
        match self {
            Self::Redis(store) => store.hget(key, field).await,
            Self::InMemory(store) => store.hget(key, field),
        }
    }

    /// Store one field of a hash at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if `value` cannot be serialized.
    pub async fn hset<T: Serialize>(&self, key: &str, field: &str, value: &T) -> Result<(), DbError> {
        match self {
            Self::Redis(store) => store.hset(key, field, value).await,
            Self::InMemory(store) => store.hset(key, field, value),
        }
    }

    /// Append `value` to the list at `key`, truncating to the most recent
    /// `cap` entries (§3 `BOUNDED_LIST_CAP`).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if `value` cannot be serialized.
    pub async fn push_capped<T: Serialize>(&self, key: &str, value: &T, cap: usize) -> Result<(), DbError> {
        match self {
            Self::Redis(store) => store.push_capped(key, value, cap).await,
            Self::InMemory(store) => store.push_capped(key, value, cap),
        }
    }

    /// Read the full list at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if a stored entry fails to
    /// deserialize.
    pub async fn get_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, DbError> {
        match self {
            Self::Redis(store) => store.get_list(key).await,
            Self::InMemory(store) => store.get_list(key),
        }
    }

    /// Delete a key from every map (value, hash fields, and list).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Redis`] if the backing Redis delete fails.
    pub async fn delete(&self, key: &str) -> Result<(), DbError> {
        match self {
            Self::Redis(store) => store.delete(key).await,
            Self::InMemory(store) => {
                store.delete(key);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_store_roundtrips() {
        let store = PersistenceStore::in_memory();
        store.set("wallet:0xabc:level", &5_u32).await.expect("set");
        let value: Option<u32> = store.get("wallet:0xabc:level").await.expect("get");
        assert_eq!(value, Some(5));
    }

    #[tokio::test]
    async fn in_memory_push_capped_truncates() {
        let store = PersistenceStore::in_memory();
        for i in 0..4_u32 {
            store.push_capped("wallet:0xabc:diary", &i, 2).await.expect("push");
        }
        let values: Vec<u32> = store.get_list("wallet:0xabc:diary").await.expect("get_list");
        assert_eq!(values, vec![2, 3]);
    }
}
