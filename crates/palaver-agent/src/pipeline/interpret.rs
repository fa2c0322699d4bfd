//! Top-level request orchestration.
//!
//! Data flow: peel → early terminals → short commands (length-gated)
//! → alias resolution (`#name`/`#chain` terminals) → content assembly
//! → enriching handlers → link harvest → context load (`context`/
//! `clear` terminals) → invoke.

use std::sync::Arc;

use palaver_command::peel;
use palaver_core::types::{ContentPart, InterpretRequest, Message, Reply, Role};
use palaver_core::{PalaverError, Result};

use crate::alias;

use super::dispatch::dispatch;
use super::{commands, early, enrich, invoke, links, Services, Turn};

/// Messages at least this long are never short commands.
const SHORT_COMMAND_LIMIT: usize = 42;
/// Context summary line budget, characters.
const SUMMARY_CHARS: usize = 137;

pub async fn interpret(services: Arc<Services>, request: InterpretRequest) -> Result<Reply> {
    let peeled =
        peel(&request.message).map_err(|e| PalaverError::InvalidCommand(e.to_string()))?;
    let mut turn = Turn::new(services.clone(), &request, peeled);

    if let Some(reply) = dispatch(early::table(), &mut turn).await? {
        return Ok(reply);
    }

    if turn.remainder.chars().count() < SHORT_COMMAND_LIMIT {
        if let Some(reply) = dispatch(commands::table(), &mut turn).await? {
            return Ok(reply);
        }
    }

    let seed = turn.chain.first().cloned().unwrap_or_default();
    turn.chain = alias::resolve(services.store.as_ref(), seed).await?;
    if turn.tags.contains("name") {
        return Ok(Reply::Text(turn.model().to_string()));
    }
    if turn.tags.contains("chain") {
        return Ok(Reply::Text(alias::render_chain(&turn.chain)));
    }

    if let Some(image) = &turn.image {
        if reqwest::Url::parse(image).is_ok() {
            turn.content.push(ContentPart::Image {
                image: image.clone(),
            });
        }
    }
    if let Some(reference) = &turn.reference {
        turn.content.push(ContentPart::Text {
            text: reference.clone(),
        });
    }

    if let Some(reply) = dispatch(enrich::table(), &mut turn).await? {
        return Ok(reply);
    }

    if let Some(reply) = links::run(&mut turn).await? {
        return Ok(reply);
    }

    // Context inclusion: per-caller flag or the `context` tag; the tag
    // is cleared here so it never reaches tag-prompt injection.
    let mut context: Vec<Message> = Vec::new();
    let include = services.features.enabled(&turn.caller, "context").await?
        || turn.tags.contains("context");
    if include {
        let override_len = turn.labels.get("context").map(str::to_string);
        turn.tags.remove("context");
        let length = services
            .features
            .window(&turn.caller, override_len.as_deref())
            .await?;
        context = services
            .context
            .load(&turn.caller, &turn.group, length)
            .await?;
    }

    if turn.remainder == "context" {
        if turn.tags.contains("raw") {
            return Ok(Reply::Json(serde_json::to_value(&context)?));
        }
        return Ok(Reply::Text(summarize_context(&context)));
    }
    if turn.remainder == "clear" {
        let removed = services.context.clear(&turn.caller, &turn.group).await?;
        return Ok(Reply::Int(removed));
    }

    invoke::run(&mut turn, context).await
}

/// One line per message: a role glyph and the first line of the
/// content, truncated.
fn summarize_context(context: &[Message]) -> String {
    context
        .iter()
        .flat_map(|message| {
            let glyph = match message.role {
                Role::System => "⚙️",
                Role::User => "🤔",
                Role::Assistant => "🤖",
                Role::Tool => "🔧",
            };
            message
                .text_chunks()
                .into_iter()
                .map(|text| {
                    let clipped: String = text.trim().chars().take(SUMMARY_CHARS).collect();
                    let first = clipped.lines().next().unwrap_or("").trim();
                    format!("{glyph} {first}")
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_is_one_line_per_message() {
        let context = vec![
            Message::user("first question\nsecond line"),
            Message::assistant("an answer"),
        ];
        let summary = summarize_context(&context);
        assert_eq!(summary, "🤔 first question\n🤖 an answer");
    }

    #[test]
    fn summary_clips_long_content() {
        let long = "x".repeat(500);
        let summary = summarize_context(&[Message::user(long)]);
        // glyph + space + clipped body
        assert_eq!(summary.chars().count(), 2 + SUMMARY_CHARS);
    }

    #[test]
    fn summary_expands_text_parts() {
        let context = vec![Message::user_parts(vec![
            ContentPart::Image {
                image: "https://example.org/i.png".into(),
            },
            ContentPart::Text {
                text: "caption".into(),
            },
        ])];
        assert_eq!(summarize_context(&context), "🤔 caption");
    }
}
