use axum::Json;

/// GET / — liveness for humans.
pub async fn hello() -> &'static str {
    "palaver is listening"
}

/// GET /health — JSON status.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
