//! Alias-chain resolution.
//!
//! A directive name resolves through `key:/<name>` hops until the
//! value contains the qualifying `/` separator of a `provider/model`
//! id. The graph is externally mutable between requests; termination
//! relies only on the depth bound, not on cycle detection — a cyclic
//! graph runs to the bound and fails with `ChainTooDeep`.

use palaver_core::{PalaverError, Result};
use palaver_store::{keys, KvStore};

/// Hard bound on the resolution chain length.
pub const MAX_DEPTH: usize = 42;

/// Resolve a name seed into a full chain ending in a `provider/model`
/// id. The seed may be "" — deployments point `key:/` at the default
/// alias.
pub async fn resolve(store: &dyn KvStore, seed: String) -> Result<Vec<String>> {
    let mut chain = vec![seed];
    loop {
        let current = &chain[chain.len() - 1];
        if current.contains('/') {
            return Ok(chain);
        }
        if chain.len() > MAX_DEPTH {
            return Err(PalaverError::ChainTooDeep);
        }
        match store.get(&keys::alias(current)).await.map_err(PalaverError::from)? {
            Some(next) => chain.push(next),
            None => {
                return Err(PalaverError::AliasNotFound {
                    chain: render_chain(&chain),
                })
            }
        }
    }
}

/// Arrow-joined diagnostic form: `/a -> /b -> /provider/model`.
pub fn render_chain(chain: &[String]) -> String {
    chain
        .iter()
        .map(|name| format!("/{name}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use palaver_store::MemoryStore;

    #[tokio::test]
    async fn qualified_seed_resolves_immediately() {
        let store = MemoryStore::new();
        let chain = resolve(&store, "acme/large".into()).await.unwrap();
        assert_eq!(chain, vec!["acme/large"]);
    }

    #[tokio::test]
    async fn chain_follows_hops_in_order() {
        let store = MemoryStore::new();
        store.set("key:/m", "fast").await.unwrap();
        store.set("key:/fast", "acme/small").await.unwrap();
        let chain = resolve(&store, "m".into()).await.unwrap();
        assert_eq!(chain, vec!["m", "fast", "acme/small"]);
    }

    #[tokio::test]
    async fn empty_seed_uses_the_default_hop() {
        let store = MemoryStore::new();
        store.set("key:/", "acme/large").await.unwrap();
        let chain = resolve(&store, String::new()).await.unwrap();
        assert_eq!(chain, vec!["", "acme/large"]);
    }

    #[tokio::test]
    async fn missing_hop_reports_the_whole_chain() {
        let store = MemoryStore::new();
        let err = resolve(&store, "missing-name".into()).await.unwrap_err();
        match err {
            PalaverError::AliasNotFound { chain } => assert_eq!(chain, "/missing-name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn deep_acyclic_graph_resolves_within_the_bound() {
        let store = MemoryStore::new();
        for i in 0..41 {
            let key = format!("key:/n{i}");
            let next = format!("n{}", i + 1);
            store.set(&key, &next).await.unwrap();
        }
        store.set("key:/n41", "acme/deep").await.unwrap();
        let chain = resolve(&store, "n0".into()).await.unwrap();
        assert_eq!(chain.len(), 43);
        assert_eq!(chain.last().map(String::as_str), Some("acme/deep"));
    }

    #[tokio::test]
    async fn cycle_fails_at_the_depth_bound() {
        let store = MemoryStore::new();
        store.set("key:/a", "b").await.unwrap();
        store.set("key:/b", "a").await.unwrap();
        let err = resolve(&store, "a".into()).await.unwrap_err();
        assert!(matches!(err, PalaverError::ChainTooDeep));
    }

    #[test]
    fn rendered_chain_is_arrow_joined() {
        let chain = vec!["a".to_string(), "b".to_string()];
        assert_eq!(render_chain(&chain), "/a -> /b");
    }
}
