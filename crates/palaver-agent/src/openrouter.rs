use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use palaver_core::types::{ContentPart, Message, MessageContent, Role, TokenUsage};

use crate::provider::{Generation, ModelProvider, ProviderError};

pub struct OpenRouterProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterProvider {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://openrouter.ai".to_string()),
        }
    }
}

#[async_trait]
impl ModelProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn generate(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<Generation, ProviderError> {
        let body = build_request_body(model, messages);
        let url = format!("{}/api/v1/chat/completions", self.base_url);

        debug!(model = %model, messages = messages.len(), "sending generation request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "provider API error");
            return Err(ProviderError::Api {
                status,
                message: text,
            });
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        parse_response(api_resp)
    }
}

/// Map messages onto the OpenAI-flavored wire shape. Image parts
/// become `image_url` entries; plain-text content stays a string.
fn build_request_body(model: &str, messages: &[Message]) -> serde_json::Value {
    let wire: Vec<serde_json::Value> = messages
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::Tool => "tool",
            };
            let content = match &m.content {
                MessageContent::Text(t) => serde_json::Value::String(t.clone()),
                MessageContent::Parts(parts) => serde_json::Value::Array(
                    parts
                        .iter()
                        .map(|p| match p {
                            ContentPart::Text { text } => serde_json::json!({
                                "type": "text",
                                "text": text,
                            }),
                            ContentPart::Image { image } => serde_json::json!({
                                "type": "image_url",
                                "image_url": { "url": image },
                            }),
                        })
                        .collect(),
                ),
            };
            serde_json::json!({ "role": role, "content": content })
        })
        .collect();

    serde_json::json!({
        "model": model,
        "messages": wire,
    })
}

fn parse_response(resp: ApiResponse) -> Result<Generation, ProviderError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("response has no choices".to_string()))?;
    let text = choice.message.content.unwrap_or_default();

    let usage = resp.usage.map(|u| TokenUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok(Generation {
        model_id: resp.model,
        messages: vec![Message::assistant(text.clone())],
        usage: usage.unwrap_or_default(),
        text,
    })
}

// Provider wire types — deserialization only.

#[derive(Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_maps_image_parts() {
        let messages = vec![
            Message::system("be brief"),
            Message::user_parts(vec![
                ContentPart::Image {
                    image: "https://example.org/a.png".into(),
                },
                ContentPart::Text {
                    text: "what is this".into(),
                },
            ]),
        ];
        let body = build_request_body("acme/large", &messages);
        assert_eq!(body["model"], "acme/large");
        assert_eq!(body["messages"][0]["content"], "be brief");
        assert_eq!(body["messages"][1]["content"][0]["type"], "image_url");
        assert_eq!(
            body["messages"][1]["content"][0]["image_url"]["url"],
            "https://example.org/a.png"
        );
    }

    #[test]
    fn response_parses_text_and_usage() {
        let resp: ApiResponse = serde_json::from_value(serde_json::json!({
            "model": "acme/large",
            "choices": [{"message": {"role": "assistant", "content": "hi"}}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 5, "total_tokens": 8}
        }))
        .unwrap();
        let generation = parse_response(resp).unwrap();
        assert_eq!(generation.text, "hi");
        assert_eq!(generation.usage.total_tokens, 8);
        assert_eq!(generation.messages.len(), 1);
    }

    #[test]
    fn empty_choices_is_a_parse_error() {
        let resp: ApiResponse = serde_json::from_value(serde_json::json!({
            "model": "acme/large",
            "choices": [],
        }))
        .unwrap();
        assert!(parse_response(resp).is_err());
    }
}
