//! Key-value store boundary.
//!
//! Everything durable lives behind [`kv::KvStore`]: aliases, tag
//! prompts, feature flags, conversation context and usage records.
//! Production talks to Redis; tests swap in [`kv::MemoryStore`].

pub mod context;
pub mod error;
pub mod features;
pub mod keys;
pub mod kv;
pub mod redis;
pub mod usage;

pub use context::ContextStore;
pub use error::StoreError;
pub use features::FeatureFlags;
pub use kv::{KvStore, MemoryStore};
pub use redis::RedisStore;
pub use usage::UsageLog;
