//! Raw passthrough to the provider's completions endpoint.
//!
//! An administrative kill-switch lives in the store: setting
//! `key:$/api/v1/chat/completions` to "false" disables the route.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::warn;

use palaver_store::keys;

use crate::app::AppState;
use crate::http::ApiError;

const ROUTE: &str = "/api/v1/chat/completions";

pub async fn completions_proxy(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Response {
    match state.services.store.get(&keys::internal(ROUTE)).await {
        Ok(Some(flag)) if flag == "false" => {
            return (
                StatusCode::FORBIDDEN,
                Json(ApiError::new("endpoint disabled")),
            )
                .into_response();
        }
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "kill-switch lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(e.to_string())),
            )
                .into_response();
        }
    }

    let url = format!("{}{}", state.config.provider.base_url, ROUTE);
    let upstream = state
        .http
        .post(&url)
        .bearer_auth(&state.config.provider.api_key)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await;

    match upstream {
        Ok(resp) => {
            let status = StatusCode::from_u16(resp.status().as_u16())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            match resp.bytes().await {
                Ok(bytes) => (
                    status,
                    [(header::CONTENT_TYPE, "application/json")],
                    bytes,
                )
                    .into_response(),
                Err(e) => {
                    warn!(error = %e, "completions passthrough body read failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        Json(ApiError::new(e.to_string())),
                    )
                        .into_response()
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "completions passthrough failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiError::new(e.to_string())),
            )
                .into_response()
        }
    }
}
