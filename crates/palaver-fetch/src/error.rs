use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

impl From<FetchError> for palaver_core::PalaverError {
    fn from(e: FetchError) -> Self {
        palaver_core::PalaverError::Upstream(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
