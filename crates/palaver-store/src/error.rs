use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("stored record is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl From<::redis::RedisError> for StoreError {
    fn from(e: ::redis::RedisError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<StoreError> for palaver_core::PalaverError {
    fn from(e: StoreError) -> Self {
        palaver_core::PalaverError::Store(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
