use async_trait::async_trait;

use palaver_core::types::{Message, TokenUsage};

/// Result of one completed generation.
#[derive(Debug, Clone)]
pub struct Generation {
    /// The generated text, returned verbatim to the caller.
    pub text: String,
    /// Model id the provider actually served.
    pub model_id: String,
    pub usage: TokenUsage,
    /// The provider's own reply messages, appended to context after
    /// system-role echoes are filtered out.
    pub messages: Vec<Message>,
}

/// The opaque model capability: given messages, return text + usage +
/// provider message echoes. No retries live behind this trait.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name for logging and error messages.
    fn name(&self) -> &str;

    async fn generate(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<Generation, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<ProviderError> for palaver_core::PalaverError {
    fn from(e: ProviderError) -> Self {
        palaver_core::PalaverError::Provider(e.to_string())
    }
}
