use serde::{Deserialize, Serialize};

/// Body of the interpret endpoint. Only `message` is mandatory;
/// absent identifiers normalize to "" when building store keys.
#[derive(Debug, Clone, Deserialize)]
pub struct InterpretRequest {
    pub caller_id: Option<String>,
    pub group_id: Option<String>,
    pub message: String,
    pub reference: Option<String>,
    pub image_uri: Option<String>,
}

impl InterpretRequest {
    pub fn caller(&self) -> &str {
        self.caller_id.as_deref().unwrap_or("")
    }

    pub fn group(&self) -> &str {
        self.group_id.as_deref().unwrap_or("")
    }
}

/// What a terminal handler hands back to the HTTP layer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Reply {
    Text(String),
    Int(i64),
    Json(serde_json::Value),
}

impl From<String> for Reply {
    fn from(s: String) -> Self {
        Reply::Text(s)
    }
}

impl From<&str> for Reply {
    fn from(s: &str) -> Self {
        Reply::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One part of a mixed-content user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Text { text: String },
    Image { image: String },
}

/// Message content: plain text or an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A single role-tagged message, as persisted in the context list and
/// as sent to the model provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// The text portions of this message, in order. Image parts are skipped.
    pub fn text_chunks(&self) -> Vec<&str> {
        match &self.content {
            MessageContent::Text(t) => vec![t.as_str()],
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::Image { .. } => None,
                })
                .collect(),
        }
    }
}

/// Token accounting reported by the provider for one generation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_text_round_trip() {
        let msg = Message::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);

        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn message_parts_round_trip() {
        let msg = Message::user_parts(vec![
            ContentPart::Image {
                image: "https://example.org/a.png".into(),
            },
            ContentPart::Text {
                text: "caption".into(),
            },
        ]);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"image""#));
        assert!(json.contains(r#""type":"text""#));

        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn text_chunks_skips_images() {
        let msg = Message::user_parts(vec![
            ContentPart::Image {
                image: "https://example.org/a.png".into(),
            },
            ContentPart::Text { text: "one".into() },
            ContentPart::Text { text: "two".into() },
        ]);
        assert_eq!(msg.text_chunks(), vec!["one", "two"]);
    }

    #[test]
    fn reply_serialization_shapes() {
        assert_eq!(serde_json::to_string(&Reply::Text("hi".into())).unwrap(), r#""hi""#);
        assert_eq!(serde_json::to_string(&Reply::Int(1)).unwrap(), "1");
        let json = Reply::Json(serde_json::json!({"a": 1}));
        assert_eq!(serde_json::to_string(&json).unwrap(), r#"{"a":1}"#);
    }
}
