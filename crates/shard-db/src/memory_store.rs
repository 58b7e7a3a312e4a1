//! Pure in-memory hot store (§4.D Persistence Store), used when
//! `REDIS_URL` is unset and as the store under test.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DbError;

/// An in-memory [`PersistenceStore`](crate::persistence::PersistenceStore)
/// backend with the same key/field/list shape as [`RedisStore`](crate::RedisStore).
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: Mutex<BTreeMap<String, String>>,
    hashes: Mutex<BTreeMap<(String, String), String>>,
    lists: Mutex<BTreeMap<String, Vec<String>>>,
}

impl InMemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the JSON value at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the stored payload fails to
    /// deserialize.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DbError> {
        let values = self.values.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        values.get(key).map(|raw| serde_json::from_str(raw)).transpose().map_err(DbError::from)
    }

    /// Store `value` as JSON at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if `value` cannot be serialized.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), DbError> {
        let json = serde_json::to_string(value)?;
        self.values.lock().unwrap_or_else(std::sync::PoisonError::into_inner).insert(key.to_owned(), json);
        Ok(())
    }

    /// Read one field of a hash at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the stored field fails to
    /// deserialize.
    pub fn hget<T: DeserializeOwned>(&self, key: &str, field: &str) -> Result<Option<T>, DbError> {
        let hashes = self.hashes.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        hashes
            .get(&(key.to_owned(), field.to_owned()))
            .map(|raw| serde_json::from_str(raw))
            .transpose()
            .map_err(DbError::from)
    }

    /// Store one field of a hash at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if `value` cannot be serialized.
    pub fn hset<T: Serialize>(&self, key: &str, field: &str, value: &T) -> Result<(), DbError> {
        let json = serde_json::to_string(value)?;
        self.hashes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert((key.to_owned(), field.to_owned()), json);
        Ok(())
    }

    /// Append `value` to the list at `key`, truncating to the most recent
    /// `cap` entries.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if `value` cannot be serialized.
    pub fn push_capped<T: Serialize>(&self, key: &str, value: &T, cap: usize) -> Result<(), DbError> {
        let json = serde_json::to_string(value)?;
        let mut lists = self.lists.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = lists.entry(key.to_owned()).or_default();
        entry.push(json);
        if entry.len() > cap {
            let excess = entry.len().saturating_sub(cap);
            entry.drain(0..excess);
        }
        Ok(())
    }

    /// Read the full list at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if a stored entry fails to
    /// deserialize.
    pub fn get_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, DbError> {
        let lists = self.lists.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        lists.get(key).into_iter().flatten().map(|raw| serde_json::from_str(raw).map_err(DbError::from)).collect()
    }

    /// Delete a key from every map (value, hash fields, and list).
    pub fn delete(&self, key: &str) {
        self.values.lock().unwrap_or_else(std::sync::PoisonError::into_inner).remove(key);
        self.lists.lock().unwrap_or_else(std::sync::PoisonError::into_inner).remove(key);
        self.hashes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .retain(|(k, _), _| k != key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_roundtrips() {
        let store = InMemoryStore::new();
        store.set("wallet:0xabc:save", &42_u32).expect("set");
        let value: Option<u32> = store.get("wallet:0xabc:save").expect("get");
        assert_eq!(value, Some(42));
    }

    #[test]
    fn missing_key_is_none() {
        let store = InMemoryStore::new();
        let value: Option<u32> = store.get("missing").expect("get");
        assert_eq!(value, None);
    }

    #[test]
    fn push_capped_truncates_to_cap() {
        let store = InMemoryStore::new();
        for i in 0..5_u32 {
            store.push_capped("wallet:0xabc:diary", &i, 3).expect("push");
        }
        let values: Vec<u32> = store.get_list("wallet:0xabc:diary").expect("get_list");
        assert_eq!(values, vec![2, 3, 4]);
    }

    #[test]
    fn hset_hget_roundtrips() {
        let store = InMemoryStore::new();
        store.hset("wallet:0xabc", "level", &7_u32).expect("hset");
        let value: Option<u32> = store.hget("wallet:0xabc", "level").expect("hget");
        assert_eq!(value, Some(7));
    }

    #[test]
    fn delete_clears_all_maps() {
        let store = InMemoryStore::new();
        store.set("k", &1_u32).expect("set");
        store.hset("k", "f", &1_u32).expect("hset");
        store.push_capped("k", &1_u32, 10).expect("push");
        store.delete("k");
        assert_eq!(store.get::<u32>("k").expect("get"), None);
        assert_eq!(store.hget::<u32>("k", "f").expect("hget"), None);
        assert!(store.get_list::<u32>("k").expect("get_list").is_empty());
    }
}
