//! The interpret endpoint — POST /
//!
//! Request:  `{"message": "...", "caller_id": "...", ...}`
//! Response: plain text for generated/terminal replies, JSON for raw
//!           and diagnostic modes, a bare integer for store mutations.
//! Error:    `{"error": "..."}` with the taxonomy's status code.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use palaver_core::types::{InterpretRequest, Reply};
use palaver_core::PalaverError;

use crate::app::AppState;
use crate::http::ApiError;

pub async fn interpret_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InterpretRequest>,
) -> Response {
    let request_id = uuid::Uuid::new_v4();
    info!(
        request = %request_id,
        caller = %request.caller(),
        group = %request.group(),
        message = %request.message,
        has_reference = request.reference.is_some(),
        has_image = request.image_uri.is_some(),
        "interpret"
    );

    match palaver_agent::interpret(state.services.clone(), request).await {
        Ok(Reply::Text(text)) => text.into_response(),
        Ok(Reply::Int(n)) => Json(serde_json::json!(n)).into_response(),
        Ok(Reply::Json(value)) => Json(value).into_response(),
        Err(e) => error_response(&request_id, e),
    }
}

fn error_response(request_id: &uuid::Uuid, error: PalaverError) -> Response {
    let status = StatusCode::from_u16(error.status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        warn!(request = %request_id, error = %error, "interpret failed");
    }
    (status, Json(ApiError::new(error.to_string()))).into_response()
}
