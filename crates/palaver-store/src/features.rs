//! Per-caller feature flags — a `feature:<caller>` hash of
//! `"true"/"false"` strings plus the stored context window length.

use std::sync::Arc;

use crate::error::Result;
use crate::keys;
use crate::kv::KvStore;

/// Stored context window length, turns.
pub const DEFAULT_WINDOW: i64 = 7;
/// Hard ceiling on the context window.
pub const MAX_WINDOW: i64 = 42;
/// Hash field holding the window length.
const LENGTH_FIELD: &str = "length";

#[derive(Clone)]
pub struct FeatureFlags {
    store: Arc<dyn KvStore>,
}

impl FeatureFlags {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Whether a flag is explicitly enabled for this caller.
    pub async fn enabled(&self, caller: &str, flag: &str) -> Result<bool> {
        let value = self.store.hget(&keys::features(caller), flag).await?;
        Ok(value.as_deref() == Some("true"))
    }

    /// Write a flag; returns the store's fresh-field indicator.
    pub async fn set(&self, caller: &str, flag: &str, on: bool) -> Result<i64> {
        let value = if on { "true" } else { "false" };
        self.store.hset(&keys::features(caller), flag, value).await
    }

    /// All flags for a caller, sorted by name.
    pub async fn all(&self, caller: &str) -> Result<Vec<(String, String)>> {
        self.store.hgetall(&keys::features(caller)).await
    }

    /// Drop every flag for a caller.
    pub async fn reset(&self, caller: &str) -> Result<i64> {
        self.store.del(&keys::features(caller)).await
    }

    /// Resolve the context window length for this call.
    ///
    /// Order: explicit per-call override, else the stored `length`
    /// field, else [`DEFAULT_WINDOW`]. The result is clamped to
    /// `[0, MAX_WINDOW]` and, when any value was provided, persisted
    /// back so the next call inherits it.
    pub async fn window(&self, caller: &str, override_len: Option<&str>) -> Result<i64> {
        let stored = self
            .store
            .hget(&keys::features(caller), LENGTH_FIELD)
            .await?;
        let requested = override_len.map(str::to_string).or(stored);

        let mut length = DEFAULT_WINDOW;
        if let Some(raw) = requested {
            length = raw
                .parse::<i64>()
                .unwrap_or(DEFAULT_WINDOW)
                .clamp(0, MAX_WINDOW);
            self.store
                .hset(&keys::features(caller), LENGTH_FIELD, &length.to_string())
                .await?;
        }
        Ok(length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn flags() -> FeatureFlags {
        FeatureFlags::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn flags_default_off() {
        let f = flags();
        assert!(!f.enabled("u", "context").await.unwrap());
        f.set("u", "context", true).await.unwrap();
        assert!(f.enabled("u", "context").await.unwrap());
        f.set("u", "context", false).await.unwrap();
        assert!(!f.enabled("u", "context").await.unwrap());
    }

    #[tokio::test]
    async fn window_defaults_without_persisting() {
        let f = flags();
        assert_eq!(f.window("u", None).await.unwrap(), DEFAULT_WINDOW);
        assert!(f.all("u").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn window_override_is_clamped_and_persisted() {
        let f = flags();
        assert_eq!(f.window("u", Some("100")).await.unwrap(), MAX_WINDOW);
        assert_eq!(
            f.all("u").await.unwrap(),
            vec![("length".to_string(), "42".to_string())]
        );
        // next call inherits the stored value without an override
        assert_eq!(f.window("u", None).await.unwrap(), MAX_WINDOW);
    }

    #[tokio::test]
    async fn negative_window_clamps_to_zero() {
        let f = flags();
        assert_eq!(f.window("u", Some("-5")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reset_drops_all_flags() {
        let f = flags();
        f.set("u", "a", true).await.unwrap();
        f.set("u", "b", false).await.unwrap();
        assert_eq!(f.reset("u").await.unwrap(), 1);
        assert!(f.all("u").await.unwrap().is_empty());
    }
}
