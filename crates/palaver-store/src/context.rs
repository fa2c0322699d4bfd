//! Conversation context — a bounded, expiring, append-only list of
//! serialized turns per (caller, group) pair.
//!
//! Storage keeps up to [`MAX_TURNS`] turns; each read requests only the
//! window the caller resolved. The read-then-append sequence is not
//! atomic across concurrent requests for the same pair; interleaved
//! turns are accepted best-effort ordering.

use std::sync::Arc;

use palaver_core::types::Message;

use crate::error::Result;
use crate::keys;
use crate::kv::KvStore;

/// Upper bound on stored turns per (caller, group) pair.
pub const MAX_TURNS: i64 = 42;
/// Idle expiry refreshed on every append.
pub const TTL_SECS: i64 = 3600;

#[derive(Clone)]
pub struct ContextStore {
    store: Arc<dyn KvStore>,
}

impl ContextStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// The last `length` turns, flattened oldest-first.
    /// A non-positive length reads nothing.
    pub async fn load(&self, caller: &str, group: &str, length: i64) -> Result<Vec<Message>> {
        if length <= 0 {
            return Ok(Vec::new());
        }
        let raw = self
            .store
            .lrange(&keys::context(caller, group), -length, -1)
            .await?;
        let mut messages = Vec::new();
        for item in raw {
            let turn: Vec<Message> = serde_json::from_str(&item)?;
            messages.extend(turn);
        }
        Ok(messages)
    }

    /// Append one turn, trim to the newest [`MAX_TURNS`], refresh the
    /// expiry. Callers invoke this only after a successful generation.
    pub async fn append(&self, caller: &str, group: &str, turn: &[Message]) -> Result<()> {
        let key = keys::context(caller, group);
        let record = serde_json::to_string(turn)?;
        self.store.rpush(&key, &record).await?;
        self.store.ltrim(&key, -MAX_TURNS, -1).await?;
        self.store.expire(&key, TTL_SECS).await?;
        Ok(())
    }

    /// Delete the whole list. Idempotent; returns the removed-key count.
    pub async fn clear(&self, caller: &str, group: &str) -> Result<i64> {
        self.store.del(&keys::context(caller, group)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use palaver_core::types::Message;

    fn setup() -> (Arc<MemoryStore>, ContextStore) {
        let store = Arc::new(MemoryStore::new());
        let context = ContextStore::new(store.clone());
        (store, context)
    }

    fn turn(user: &str, assistant: &str) -> Vec<Message> {
        vec![Message::user(user), Message::assistant(assistant)]
    }

    #[tokio::test]
    async fn append_then_load_one_round_trips() {
        let (_, context) = setup();
        context.append("u", "g", &turn("hi", "hello")).await.unwrap();
        let loaded = context.load("u", "g", 1).await.unwrap();
        assert_eq!(loaded, turn("hi", "hello"));
    }

    #[tokio::test]
    async fn load_respects_window_length() {
        let (_, context) = setup();
        for i in 0..5 {
            let q = format!("q{i}");
            let a = format!("a{i}");
            context.append("u", "g", &turn(&q, &a)).await.unwrap();
        }
        let loaded = context.load("u", "g", 2).await.unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded[0], Message::user("q3"));
        assert_eq!(loaded[3], Message::assistant("a4"));
    }

    #[tokio::test]
    async fn zero_length_loads_nothing() {
        let (_, context) = setup();
        context.append("u", "g", &turn("hi", "ho")).await.unwrap();
        assert!(context.load("u", "g", 0).await.unwrap().is_empty());
        assert!(context.load("u", "g", -3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_is_trimmed_to_the_bound() {
        let (store, context) = setup();
        for i in 0..50 {
            let q = format!("q{i}");
            context.append("u", "g", &turn(&q, "a")).await.unwrap();
        }
        let stored = store
            .lrange(&keys::context("u", "g"), 0, -1)
            .await
            .unwrap();
        assert_eq!(stored.len() as i64, MAX_TURNS);
        // oldest surviving turn is q8
        assert!(stored[0].contains("q8"));
    }

    #[tokio::test]
    async fn append_refreshes_expiry() {
        let (store, context) = setup();
        context.append("u", "g", &turn("hi", "ho")).await.unwrap();
        assert_eq!(store.ttl(&keys::context("u", "g")), Some(TTL_SECS));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let (_, context) = setup();
        context.append("u", "g", &turn("hi", "ho")).await.unwrap();
        assert_eq!(context.clear("u", "g").await.unwrap(), 1);
        assert_eq!(context.clear("u", "g").await.unwrap(), 0);
        assert!(context.load("u", "g", 7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pairs_are_isolated() {
        let (_, context) = setup();
        context.append("u", "g1", &turn("one", "1")).await.unwrap();
        context.append("u", "g2", &turn("two", "2")).await.unwrap();
        let g1 = context.load("u", "g1", 7).await.unwrap();
        assert_eq!(g1, turn("one", "1"));
    }
}
