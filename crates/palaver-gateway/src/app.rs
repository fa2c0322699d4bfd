use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use palaver_agent::Services;
use palaver_core::config::PalaverConfig;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: PalaverConfig,
    pub services: Arc<Services>,
    /// Client for the completions passthrough.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: PalaverConfig, services: Arc<Services>) -> Self {
        Self {
            config,
            services,
            http: reqwest::Client::new(),
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(crate::http::health::hello).post(crate::http::interpret::interpret_handler),
        )
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/api/v1/chat/completions",
            post(crate::http::proxy::completions_proxy),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
