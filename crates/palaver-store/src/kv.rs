//! The store capability: byte-string get/set/expire plus the hash and
//! list operations the interpreter needs. Implementations must match
//! Redis semantics for negative list indices.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, StoreError};

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Delete a key, returning the number of keys removed (0 or 1).
    async fn del(&self, key: &str) -> Result<i64>;
    async fn expire(&self, key: &str, seconds: i64) -> Result<()>;

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;
    /// Set a hash field, returning 1 when the field is new, 0 on overwrite.
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<i64>;
    /// All hash fields, sorted by field name.
    async fn hgetall(&self, key: &str) -> Result<Vec<(String, String)>>;

    /// Append to a list, returning the new length.
    async fn rpush(&self, key: &str, value: &str) -> Result<i64>;
    /// Inclusive range with Redis negative-index semantics.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>>;
    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<()>;
}

// ── In-memory implementation (tests, local development) ──────────────────────

#[derive(Debug, Clone)]
enum Entry {
    Str(String),
    Hash(BTreeMap<String, String>),
    List(Vec<String>),
}

/// Process-local [`KvStore`] with Redis list/hash semantics.
///
/// Expiries are recorded but never enforced; [`MemoryStore::ttl`] lets
/// tests assert that a refresh happened.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    ttls: Mutex<HashMap<String, i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last TTL set for a key, if any.
    pub fn ttl(&self, key: &str) -> Option<i64> {
        self.ttls.lock().unwrap().get(key).copied()
    }
}

/// Map a possibly-negative Redis index onto `[0, len]`.
fn abs_index(index: i64, len: usize) -> i64 {
    if index < 0 {
        len as i64 + index
    } else {
        index
    }
}

/// Resolve an inclusive Redis range into a half-open Rust range.
fn resolve_range(start: i64, stop: i64, len: usize) -> Option<(usize, usize)> {
    let start = abs_index(start, len).max(0);
    let stop = abs_index(stop, len).min(len as i64 - 1);
    if start > stop {
        return None;
    }
    Some((start as usize, stop as usize + 1))
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::Backend(format!(
        "WRONGTYPE operation against key {key} holding the wrong kind of value"
    ))
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            None => Ok(None),
            Some(Entry::Str(s)) => Ok(Some(s.clone())),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), Entry::Str(value.to_string()));
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<i64> {
        let removed = self.entries.lock().unwrap().remove(key).is_some();
        self.ttls.lock().unwrap().remove(key);
        Ok(removed as i64)
    }

    async fn expire(&self, key: &str, seconds: i64) -> Result<()> {
        self.ttls.lock().unwrap().insert(key.to_string(), seconds);
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            None => Ok(None),
            Some(Entry::Hash(h)) => Ok(h.get(field).cloned()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<i64> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(BTreeMap::new()));
        match entry {
            Entry::Hash(h) => {
                let fresh = h.insert(field.to_string(), value.to_string()).is_none();
                Ok(fresh as i64)
            }
            _ => Err(wrong_type(key)),
        }
    }

    async fn hgetall(&self, key: &str) -> Result<Vec<(String, String)>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::Hash(h)) => Ok(h.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn rpush(&self, key: &str, value: &str) -> Result<i64> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(Vec::new()));
        match entry {
            Entry::List(l) => {
                l.push(value.to_string());
                Ok(l.len() as i64)
            }
            _ => Err(wrong_type(key)),
        }
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::List(l)) => Ok(match resolve_range(start, stop, l.len()) {
                Some((from, to)) => l[from..to].to_vec(),
                None => Vec::new(),
            }),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(key) {
            None => Ok(()),
            Some(Entry::List(l)) => {
                match resolve_range(start, stop, l.len()) {
                    Some((from, to)) => {
                        l.truncate(to);
                        l.drain(..from);
                    }
                    None => l.clear(),
                }
                Ok(())
            }
            Some(_) => Err(wrong_type(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn string_ops_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".into()));
        assert_eq!(store.del("k").await.unwrap(), 1);
        assert_eq!(store.del("k").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn hash_ops_report_fresh_fields() {
        let store = MemoryStore::new();
        assert_eq!(store.hset("h", "a", "1").await.unwrap(), 1);
        assert_eq!(store.hset("h", "a", "2").await.unwrap(), 0);
        assert_eq!(store.hget("h", "a").await.unwrap(), Some("2".into()));
        assert_eq!(store.hget("h", "b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn hgetall_sorts_by_field() {
        let store = MemoryStore::new();
        store.hset("h", "z", "1").await.unwrap();
        store.hset("h", "a", "2").await.unwrap();
        let all = store.hgetall("h").await.unwrap();
        assert_eq!(all, vec![("a".into(), "2".into()), ("z".into(), "1".into())]);
    }

    #[tokio::test]
    async fn lrange_handles_negative_indices() {
        let store = MemoryStore::new();
        for v in ["a", "b", "c", "d"] {
            store.rpush("l", v).await.unwrap();
        }
        assert_eq!(store.lrange("l", -2, -1).await.unwrap(), vec!["c", "d"]);
        assert_eq!(store.lrange("l", 0, -1).await.unwrap().len(), 4);
        assert_eq!(store.lrange("l", -10, -1).await.unwrap().len(), 4);
        assert!(store.lrange("l", 3, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ltrim_keeps_the_tail() {
        let store = MemoryStore::new();
        for v in ["a", "b", "c", "d"] {
            store.rpush("l", v).await.unwrap();
        }
        store.ltrim("l", -1, -1).await.unwrap();
        assert_eq!(store.lrange("l", 0, -1).await.unwrap(), vec!["d"]);
    }

    #[tokio::test]
    async fn wrong_type_access_errors() {
        let store = MemoryStore::new();
        store.set("k", "v").await.unwrap();
        assert!(store.rpush("k", "x").await.is_err());
        assert!(store.hget("k", "f").await.is_err());
    }
}
