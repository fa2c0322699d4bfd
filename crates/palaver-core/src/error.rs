use thiserror::Error;

#[derive(Debug, Error)]
pub enum PalaverError {
    #[error("{0}")]
    InvalidCommand(String),

    #[error("key {0} not found")]
    KeyNotFound(String),

    #[error("key chain {chain} not found")]
    AliasNotFound { chain: String },

    #[error("key #{tag} not found")]
    TagPromptNotFound { tag: String },

    #[error("too deep key chain")]
    ChainTooDeep,

    #[error("no user message")]
    NoUserMessage,

    #[error("endpoint disabled")]
    EndpointDisabled,

    #[error("lol authorization not set")]
    LeagueAuthMissing,

    #[error("usage not found")]
    UsageNotFound,

    #[error("match {0} not found")]
    MatchNotFound(String),

    #[error("news not found")]
    NewsNotFound,

    #[error("{0} image not found")]
    ImageNotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Upstream fetch failed: {0}")]
    Upstream(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PalaverError {
    /// HTTP status for the structured error object returned to the caller.
    pub fn status(&self) -> u16 {
        match self {
            PalaverError::InvalidCommand(_) => 400,
            PalaverError::KeyNotFound(_) => 404,
            PalaverError::AliasNotFound { .. } => 404,
            PalaverError::TagPromptNotFound { .. } => 404,
            PalaverError::ChainTooDeep => 400,
            PalaverError::NoUserMessage => 400,
            PalaverError::EndpointDisabled => 403,
            PalaverError::LeagueAuthMissing => 403,
            PalaverError::UsageNotFound => 404,
            PalaverError::MatchNotFound(_) => 404,
            PalaverError::NewsNotFound => 404,
            PalaverError::ImageNotFound(_) => 502,
            PalaverError::Store(_) => 500,
            PalaverError::Provider(_) => 502,
            PalaverError::Upstream(_) => 502,
            PalaverError::Serialization(_) => 500,
            PalaverError::Config(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, PalaverError>;
