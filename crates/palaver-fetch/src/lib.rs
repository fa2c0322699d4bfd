//! Outbound content collaborators.
//!
//! Every integration is a plain HTTP call against a fixed third-party
//! endpoint, treated as a black box returning JSON or HTML. One shared
//! [`reqwest::Client`] serves them all; per-module `impl Fetcher`
//! blocks keep each integration in its own file.

pub mod catalog;
pub mod decks;
pub mod error;
pub mod esports;
pub mod geoip;
pub mod github;
pub mod harvest;
pub mod league;
pub mod pages;
pub mod rooms;
pub mod xkcd;

pub use error::FetchError;

use palaver_core::config::{FetchConfig, ProviderConfig};

/// Shared handle for all outbound fetches.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    config: FetchConfig,
    provider: ProviderConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig, provider: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            provider,
        }
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub(crate) fn provider(&self) -> &ProviderConfig {
        &self.provider
    }
}
