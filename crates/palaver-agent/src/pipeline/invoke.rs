//! Model invocation shim: assemble the final message list, call the
//! provider, persist usage and context, return the generated text.
//!
//! A failed generation must leave the context list untouched — usage
//! and context writes happen strictly after the provider returns.

use palaver_core::types::{Message, Reply, Role};
use palaver_core::{PalaverError, Result};
use palaver_store::keys;
use tracing::info;

use super::Turn;

pub async fn run(turn: &mut Turn, context: Vec<Message>) -> Result<Reply> {
    let services = turn.services.clone();

    // One system message per surviving tag, prepended in discovery
    // order. A tag without a registered prompt fails the request.
    let mut outgoing: Vec<Message> = Vec::new();
    for tag in turn.tags.iter() {
        let prompt = services
            .store
            .get(&keys::tag_prompt(tag))
            .await?
            .ok_or_else(|| PalaverError::TagPromptNotFound {
                tag: tag.to_string(),
            })?;
        outgoing.insert(0, Message::system(prompt));
    }

    let mut new_turn: Vec<Message> = Vec::new();
    if !turn.content.is_empty() {
        new_turn.push(Message::user_parts(turn.content.clone()));
    }
    if !turn.remainder.is_empty() {
        new_turn.push(Message::user(turn.remainder.clone()));
    }
    if !new_turn.iter().any(|m| m.role == Role::User) {
        return Err(PalaverError::NoUserMessage);
    }

    outgoing.extend(context);
    outgoing.extend(new_turn.iter().cloned());

    let model = turn.model().to_string();
    let generation = services.provider.generate(&model, &outgoing).await?;

    info!(
        model = %generation.model_id,
        tokens_in = generation.usage.prompt_tokens,
        tokens_out = generation.usage.completion_tokens,
        caller = %turn.caller,
        "generation complete"
    );

    let record = serde_json::json!({
        "modelId": generation.model_id,
        "promptTokens": generation.usage.prompt_tokens,
        "completionTokens": generation.usage.completion_tokens,
        "totalTokens": generation.usage.total_tokens,
    });
    services.usage.record(&turn.caller, &turn.group, &record).await?;

    // Persist the new turn plus the provider's reply echoes; system
    // messages never enter the context list.
    let mut persisted = new_turn;
    persisted.extend(
        generation
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned(),
    );
    services
        .context
        .append(&turn.caller, &turn.group, &persisted)
        .await?;

    Ok(Reply::Text(generation.text))
}
