use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use palaver_agent::openrouter::OpenRouterProvider;
use palaver_agent::Services;
use palaver_core::config::PalaverConfig;
use palaver_fetch::Fetcher;
use palaver_store::RedisStore;

mod app;
mod http;

#[derive(Parser)]
#[command(name = "palaver-gateway", version, about = "Message-command interpreter gateway")]
struct Args {
    /// Path to palaver.toml (default: ~/.palaver/palaver.toml).
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palaver_gateway=info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();
    let config = PalaverConfig::load(args.config.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        PalaverConfig::default()
    });

    let store = Arc::new(RedisStore::connect(&config.store.url).await?);

    if config.provider.api_key.is_empty() {
        warn!("provider.api_key is empty — generation requests will fail");
    }
    let provider = Arc::new(OpenRouterProvider::new(
        config.provider.api_key.clone(),
        Some(config.provider.base_url.clone()),
    ));
    let fetcher = Fetcher::new(config.fetch.clone(), config.provider.clone());

    let services = Arc::new(Services::new(store, provider, fetcher));
    let state = Arc::new(app::AppState::new(config.clone(), services));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    info!("palaver gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
