//! Last-call usage records, keyed `usage:<caller>:<group>:last`.

use std::sync::Arc;

use crate::error::Result;
use crate::keys;
use crate::kv::KvStore;

#[derive(Clone)]
pub struct UsageLog {
    store: Arc<dyn KvStore>,
}

impl UsageLog {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Overwrite the last-call record for a (caller, group) pair.
    pub async fn record(
        &self,
        caller: &str,
        group: &str,
        record: &serde_json::Value,
    ) -> Result<()> {
        self.store
            .set(&keys::last_usage(caller, group), &record.to_string())
            .await
    }

    pub async fn last(&self, caller: &str, group: &str) -> Result<Option<serde_json::Value>> {
        match self.store.get(&keys::last_usage(caller, group)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    #[tokio::test]
    async fn record_overwrites_last() {
        let log = UsageLog::new(Arc::new(MemoryStore::new()));
        assert_eq!(log.last("u", "g").await.unwrap(), None);

        log.record("u", "g", &serde_json::json!({"promptTokens": 1}))
            .await
            .unwrap();
        log.record("u", "g", &serde_json::json!({"promptTokens": 9}))
            .await
            .unwrap();

        let last = log.last("u", "g").await.unwrap().unwrap();
        assert_eq!(last["promptTokens"], 9);
    }
}
