//! Early terminal handlers: diagnostics and the raw get/set family.
//!
//! These run before the short-command length gate and never invoke the
//! model. The get/set entries with a reference payload outrank their
//! two-token forms — the reference is the value (or key) then.

use palaver_command::args;
use palaver_core::types::Reply;
use palaver_core::PalaverError;
use palaver_store::keys;

use super::dispatch::{Command, HandlerFuture, Outcome};
use super::Turn;

pub fn table() -> &'static [Command] {
    const TABLE: &[Command] = &[
        Command {
            name: "tags",
            applies: |t| t.remainder == "tags",
            run: tags,
        },
        Command {
            name: "labels",
            applies: |t| t.remainder == "labels",
            run: labels,
        },
        Command {
            name: "set-reference",
            applies: |t| t.remainder.starts_with("set") && t.reference.is_some(),
            run: set_reference,
        },
        Command {
            name: "set",
            applies: |t| t.remainder.starts_with("set"),
            run: set_value,
        },
        Command {
            name: "get-reference",
            applies: |t| t.remainder == "get" && t.reference.is_some(),
            run: get_reference,
        },
        Command {
            name: "get",
            applies: |t| t.remainder.starts_with("get"),
            run: get_value,
        },
        Command {
            name: "echo",
            applies: |t| t.remainder.starts_with("echo"),
            run: echo,
        },
    ];
    TABLE
}

fn invalid(command: &str) -> PalaverError {
    PalaverError::InvalidCommand(format!("invalid {command} command"))
}

fn tags(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let listing = turn.tags.iter().collect::<Vec<_>>().join(", ");
        Ok(Outcome::Reply(Reply::Text(listing)))
    })
}

fn labels(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let listing = turn
            .labels
            .iter()
            .map(|(key, value)| match value {
                Some(value) => format!("{key}: {value}"),
                None => key.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Outcome::Reply(Reply::Text(listing)))
    })
}

/// `set <key>` with a reference payload — the reference is the value.
fn set_reference(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let rest = args::strip_word(&turn.remainder, "set").ok_or_else(|| invalid("set"))?;
        let (key, _) = args::first_token(rest).ok_or_else(|| invalid("set"))?;
        let value = turn.reference.clone().unwrap_or_default();
        turn.services.store.set(&keys::value(key), &value).await?;
        Ok(Outcome::Reply(Reply::Text(format!("{key}: {value}"))))
    })
}

/// `set <key> <value>` — the value is the rest of the message.
fn set_value(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let rest = args::strip_word(&turn.remainder, "set").ok_or_else(|| invalid("set"))?;
        let (key, value) = args::first_token(rest).ok_or_else(|| invalid("set"))?;
        if value.is_empty() {
            return Err(invalid("set"));
        }
        turn.services.store.set(&keys::value(key), value).await?;
        Ok(Outcome::Reply(Reply::Text(format!("{key}: {value}"))))
    })
}

/// `get` with a reference payload — the reference is the key.
fn get_reference(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let key = turn.reference.clone().unwrap_or_default();
        let value = turn
            .services
            .store
            .get(&keys::value(&key))
            .await?
            .ok_or_else(|| PalaverError::KeyNotFound(key.clone()))?;
        Ok(Outcome::Reply(Reply::Text(value)))
    })
}

fn get_value(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let rest = args::strip_word(&turn.remainder, "get").ok_or_else(|| invalid("get"))?;
        let (key, _) = args::first_token(rest).ok_or_else(|| invalid("get"))?;
        let value = turn
            .services
            .store
            .get(&keys::value(key))
            .await?
            .ok_or_else(|| PalaverError::KeyNotFound(key.to_string()))?;
        Ok(Outcome::Reply(Reply::Text(value)))
    })
}

/// `echo [text]` — `#image`/`#ref` echo the attachment instead.
fn echo(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        if turn.tags.contains("image") {
            if let Some(image) = &turn.image {
                return Ok(Outcome::Reply(Reply::Text(image.clone())));
            }
        }
        if turn.tags.contains("ref") {
            if let Some(reference) = &turn.reference {
                return Ok(Outcome::Reply(Reply::Text(reference.clone())));
            }
        }
        let rest = args::strip_loose(&turn.remainder, "echo").ok_or_else(|| invalid("echo"))?;
        Ok(Outcome::Reply(Reply::Text(rest.to_string())))
    })
}
