pub mod health;
pub mod interpret;
pub mod proxy;

use serde::Serialize;

/// Structured error body: `{"error": "..."}`.
#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
