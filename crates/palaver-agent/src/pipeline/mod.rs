//! The request pipeline: peel, dispatch, resolve, enrich, harvest,
//! contextualize, invoke.
//!
//! All per-request state lives in [`Turn`], threaded mutably through
//! every handler so tag consumption is explicit rather than ambient.
//! Cross-request state is reached only through [`Services`].

pub mod dispatch;

mod commands;
mod early;
mod enrich;
mod interpret;
mod invoke;
mod links;

pub use interpret::interpret;

use std::sync::Arc;

use palaver_command::{LabelMap, Peeled, TagSet};
use palaver_core::types::{ContentPart, InterpretRequest};
use palaver_fetch::Fetcher;
use palaver_store::{ContextStore, FeatureFlags, KvStore, UsageLog};

use crate::provider::ModelProvider;

/// Dependency-injected service handles. Constructed once at startup;
/// tests substitute fakes for the store and the model capability.
pub struct Services {
    pub store: Arc<dyn KvStore>,
    pub features: FeatureFlags,
    pub context: ContextStore,
    pub usage: UsageLog,
    pub provider: Arc<dyn ModelProvider>,
    pub fetcher: Fetcher,
}

impl Services {
    pub fn new(
        store: Arc<dyn KvStore>,
        provider: Arc<dyn ModelProvider>,
        fetcher: Fetcher,
    ) -> Self {
        Self {
            features: FeatureFlags::new(store.clone()),
            context: ContextStore::new(store.clone()),
            usage: UsageLog::new(store.clone()),
            store,
            provider,
            fetcher,
        }
    }
}

/// Request-scoped state, owned exclusively by one interpretation and
/// discarded at its end.
pub struct Turn {
    pub services: Arc<Services>,
    pub caller: String,
    pub group: String,
    pub reference: Option<String>,
    pub image: Option<String>,
    /// Request snapshot as logged at ingestion (image uri truncated).
    pub snapshot: serde_json::Value,
    pub tags: TagSet,
    pub labels: LabelMap,
    /// Alias chain: starts as `[name_seed]`, filled by resolution.
    pub chain: Vec<String>,
    /// The message with all consumed command prefixes stripped.
    pub remainder: String,
    /// Content parts accumulated for the outgoing user message.
    pub content: Vec<ContentPart>,
}

impl Turn {
    pub fn new(services: Arc<Services>, request: &InterpretRequest, peeled: Peeled) -> Self {
        let snapshot = serde_json::json!({
            "caller_id": request.caller_id,
            "group_id": request.group_id,
            "message": request.message,
            "reference": request.reference,
            "image_uri": request
                .image_uri
                .as_deref()
                .map(|uri| uri.chars().take(42).collect::<String>()),
        });
        Self {
            services,
            caller: request.caller().to_string(),
            group: request.group().to_string(),
            reference: request.reference.clone(),
            image: request.image_uri.clone(),
            snapshot,
            tags: peeled.tags,
            labels: peeled.labels,
            chain: vec![peeled.name_seed],
            remainder: peeled.remainder,
            content: Vec::new(),
        }
    }

    /// The resolved model id — the chain's terminal element.
    pub fn model(&self) -> &str {
        self.chain.last().map(String::as_str).unwrap_or_default()
    }
}
