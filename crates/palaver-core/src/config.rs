use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Top-level config (palaver.toml + PALAVER_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PalaverConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Redis connection URL.
    #[serde(default = "default_store_url")]
    pub url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for the model provider.
    /// Override with env var: PALAVER_PROVIDER_API_KEY
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_provider_base_url(),
        }
    }
}

/// Settings for the outbound content collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Token for the GitHub API (pull listing + manual fetch).
    pub github_token: Option<String>,
    /// `owner/repo` watched by the `pulls` command.
    #[serde(default = "default_pulls_repo")]
    pub pulls_repo: String,
    /// `owner/repo` holding the manual served by the `help` command.
    #[serde(default = "default_manual_repo")]
    pub manual_repo: String,
    /// Path of the manual file inside `manual_repo`.
    #[serde(default = "default_manual_path")]
    pub manual_path: String,
    /// Primary room listing source.
    #[serde(default = "default_rooms_main_url")]
    pub rooms_main_url: String,
    /// Beta room listing source, fetched alongside the primary.
    #[serde(default = "default_rooms_beta_url")]
    pub rooms_beta_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            pulls_repo: default_pulls_repo(),
            manual_repo: default_manual_repo(),
            manual_path: default_manual_path(),
            rooms_main_url: default_rooms_main_url(),
            rooms_beta_url: default_rooms_beta_url(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_store_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}
fn default_provider_base_url() -> String {
    "https://openrouter.ai".to_string()
}
fn default_pulls_repo() -> String {
    "palaver-bot/palaver".to_string()
}
fn default_manual_repo() -> String {
    "palaver-bot/palaver".to_string()
}
fn default_manual_path() -> String {
    "README.md".to_string()
}
fn default_rooms_main_url() -> String {
    "https://rooms.palaver.dev/api/rooms".to_string()
}
fn default_rooms_beta_url() -> String {
    "https://beta.rooms.palaver.dev/api/rooms".to_string()
}

impl PalaverConfig {
    /// Load config from a TOML file with PALAVER_* env var overrides.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: PalaverConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("PALAVER_").split("_"))
            .extract()
            .map_err(|e| crate::error::PalaverError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.palaver/palaver.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = PalaverConfig::default();
        assert_eq!(config.gateway.port, DEFAULT_PORT);
        assert!(config.store.url.starts_with("redis://"));
        assert!(config.provider.base_url.starts_with("https://"));
    }
}
