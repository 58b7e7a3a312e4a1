//! Redis-compatible hot store (§4.D Persistence Store).
//!
//! Every per-wallet key (character save, diary, chat history, gold
//! reservation) is dual-written: a synchronous in-memory cache is updated
//! first so the current tick always observes its own writes, then a
//! best-effort write-through to the external store follows. Reads go to the
//! external store first and fall back to the in-memory cache on connection
//! error, so a `Redis`-compatible outage degrades to stale-but-available
//! rather than failing the action pipeline.

use std::collections::BTreeMap;
use std::sync::Mutex;

use fred::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DbError;

/// Connection handle to a Redis-compatible hot store, with an in-memory
/// fallback cache for read availability during connection errors.
pub struct RedisStore {
    client: Client,
    cache: Mutex<BTreeMap<String, String>>,
}

impl RedisStore {
    /// Connect to the hot store at the given URL.
    ///
    /// The URL follows the Redis URL scheme: `redis://host:port` or
    /// `redis://host:port/db`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the URL cannot be parsed.
    /// Returns [`DbError::Redis`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let config = Config::from_url(url).map_err(|e| DbError::Config(format!("invalid hot store URL: {e}")))?;
        let client = Builder::from_config(config).build()?;
        client.init().await?;
        tracing::info!("connected to hot store");
        Ok(Self { client, cache: Mutex::new(BTreeMap::new()) })
    }

    fn cache_get(&self, key: &str) -> Option<String> {
        self.cache.lock().unwrap_or_else(std::sync::PoisonError::into_inner).get(key).cloned()
    }

    fn cache_set(&self, key: &str, value: String) {
        self.cache.lock().unwrap_or_else(std::sync::PoisonError::into_inner).insert(key.to_owned(), value);
    }

    fn cache_list(&self, key: &str) -> Vec<String> {
        self.cache_get(key)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .unwrap_or_default()
    }

    /// Read the JSON value at `key`, external store first, falling back to
    /// the in-memory cache on connection error.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if a cached or stored payload
    /// fails to deserialize.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DbError> {
        match self.client.get::<Option<String>, _>(key).await {
            Ok(Some(raw)) => {
                self.cache_set(key, raw.clone());
                Ok(Some(serde_json::from_str(&raw)?))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                tracing::warn!(key, error = %err, "hot store read failed, falling back to in-memory cache");
                self.cache_get(key).map(|raw| serde_json::from_str(&raw)).transpose().map_err(DbError::from)
            }
        }
    }

    /// Dual-write `value` as JSON to `key`: the in-memory cache is updated
    /// synchronously, then a best-effort write-through to the external
    /// store is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if `value` cannot be serialized.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), DbError> {
        let json = serde_json::to_string(value)?;
        self.cache_set(key, json.clone());
        if let Err(err) = self.client.set::<(), _, _>(key, json.as_str(), None, None, false).await {
            tracing::warn!(key, error = %err, "hot store write-through failed, cache updated only");
        }
        Ok(())
    }

    /// Read one field of a JSON hash at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the stored hash field fails to
    /// deserialize.
    pub async fn hget<T: DeserializeOwned>(&self, key: &str, field: &str) -> Result<Option<T>, DbError> {
        match self.client.hget::<Option<String>, _, _>(key, field).await {
            Ok(Some(raw)) => Ok(Some(serde_json::from_str(&raw)?)),
            Ok(None) => Ok(None),
            Err(err) => {
                tracing::warn!(key, field, error = %err, "hot store hash read failed");
                Ok(None)
            }
        }
    }

    /// Dual-write one field of a JSON hash at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if `value` cannot be serialized.
    pub async fn hset<T: Serialize>(&self, key: &str, field: &str, value: &T) -> Result<(), DbError> {
        let json = serde_json::to_string(value)?;
        if let Err(err) = self.client.hset::<(), _, _>(key, (field, json.as_str())).await {
            tracing::warn!(key, field, error = %err, "hot store hash write failed");
        }
        Ok(())
    }

    /// Append `value` to the JSON list at `key`, truncating to the most
    /// recent `cap` entries.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if `value` cannot be serialized.
    pub async fn push_capped<T: Serialize>(&self, key: &str, value: &T, cap: usize) -> Result<(), DbError> {
        let mut items = match self.get_list_raw(key).await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(key, error = %err, "hot store list read failed before push, starting empty");
                Vec::new()
            }
        };
        items.push(serde_json::to_string(value)?);
        if items.len() > cap {
            let excess = items.len().saturating_sub(cap);
            items.drain(0..excess);
        }
        let encoded = serde_json::to_string(&items)?;
        self.cache_set(key, encoded.clone());
        if let Err(err) = self.client.set::<(), _, _>(key, encoded.as_str(), None, None, false).await {
            tracing::warn!(key, error = %err, "hot store list write-through failed, cache updated only");
        }
        Ok(())
    }

    /// Read the full JSON list at `key`, external store first, falling back
    /// to the in-memory cache on connection error.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if a stored entry fails to
    /// deserialize.
    pub async fn get_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, DbError> {
        let raw = self.get_list_raw(key).await.unwrap_or_else(|_| self.cache_list(key));
        raw.iter().map(|s| serde_json::from_str(s).map_err(DbError::from)).collect()
    }

    async fn get_list_raw(&self, key: &str) -> Result<Vec<String>, DbError> {
        match self.client.get::<Option<String>, _>(key).await {
            Ok(Some(raw)) => {
                self.cache_set(key, raw.clone());
                Ok(serde_json::from_str(&raw)?)
            }
            Ok(None) => Ok(Vec::new()),
            Err(err) => Err(DbError::from(err)),
        }
    }

    /// Delete a key from the hot store and the in-memory cache.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Redis`] if the delete fails.
    pub async fn delete(&self, key: &str) -> Result<(), DbError> {
        self.cache.lock().unwrap_or_else(std::sync::PoisonError::into_inner).remove(key);
        let _: u32 = self.client.del(key).await?;
        Ok(())
    }

    /// Return a reference to the underlying [`Client`].
    pub const fn client(&self) -> &Client {
        &self.client
    }
}
