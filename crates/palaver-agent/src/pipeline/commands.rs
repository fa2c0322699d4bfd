//! Short-command terminals — only consulted when the remainder is
//! below the length threshold, so ordinary prose never trips them.

use std::net::IpAddr;

use palaver_command::args;
use palaver_core::types::Reply;
use palaver_core::{PalaverError, Result};
use palaver_fetch::{catalog, decks, esports, rooms};

use super::dispatch::{Command, HandlerFuture, Outcome};
use super::Turn;

pub fn table() -> &'static [Command] {
    const TABLE: &[Command] = &[
        Command {
            name: "ping",
            applies: |t| t.remainder == "ping",
            run: ping,
        },
        Command {
            name: "snapshot",
            applies: |t| t.remainder == "snapshot",
            run: snapshot,
        },
        Command {
            name: "enable",
            applies: |t| t.remainder.starts_with("enable"),
            run: enable,
        },
        Command {
            name: "disable",
            applies: |t| t.remainder.starts_with("disable"),
            run: disable,
        },
        Command {
            name: "features",
            applies: |t| t.remainder == "features",
            run: features,
        },
        Command {
            name: "rooms",
            applies: |t| t.remainder == "rooms" || t.remainder == "r",
            run: room_listing,
        },
        Command {
            name: "pulls",
            applies: |t| t.remainder == "pulls" || t.remainder == "pr",
            run: pulls,
        },
        Command {
            name: "ip",
            applies: |t| t.remainder.starts_with("ip"),
            run: ip_lookup,
        },
        Command {
            name: "list-models",
            applies: |t| t.remainder.starts_with("list models"),
            run: list_models,
        },
        Command {
            name: "day-matches",
            applies: |t| t.remainder.starts_with("lolm") || t.remainder.starts_with("csm"),
            run: day_matches,
        },
        Command {
            name: "decks",
            applies: |t| t.remainder == "decks" || t.remainder == "d",
            run: deck_listing,
        },
        Command {
            name: "usage",
            applies: |t| t.remainder == "usage",
            run: usage,
        },
    ];
    TABLE
}

fn invalid(command: &str) -> PalaverError {
    PalaverError::InvalidCommand(format!("invalid {command} command"))
}

fn ping(_turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move { Ok(Outcome::Reply(Reply::Text("pong".to_string()))) })
}

fn snapshot(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move { Ok(Outcome::Reply(Reply::Json(turn.snapshot.clone()))) })
}

fn enable(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move { set_flag(turn, "enable", true).await })
}

fn disable(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move { set_flag(turn, "disable", false).await })
}

async fn set_flag(turn: &mut Turn, command: &str, on: bool) -> Result<Outcome> {
    let rest = args::strip_word(&turn.remainder, command).ok_or_else(|| invalid(command))?;
    let (flag, _) = args::first_token(rest).ok_or_else(|| invalid(command))?;
    let fresh = turn.services.features.set(&turn.caller, flag, on).await?;
    Ok(Outcome::Reply(Reply::Int(fresh)))
}

fn features(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let services = turn.services.clone();
        if turn.tags.contains("reset") {
            let removed = services.features.reset(&turn.caller).await?;
            return Ok(Outcome::Reply(Reply::Int(removed)));
        }

        let all = services.features.all(&turn.caller).await?;

        if turn.tags.contains("raw") {
            let map: serde_json::Map<String, serde_json::Value> = all
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            return Ok(Outcome::Reply(Reply::Json(serde_json::Value::Object(map))));
        }

        let listing = all
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Outcome::Reply(Reply::Text(listing)))
    })
}

fn room_listing(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let (main, beta) = turn.services.fetcher.rooms().await?;
        if turn.tags.contains("raw") {
            return Ok(Outcome::Reply(Reply::Json(
                serde_json::json!({ "main": main, "beta": beta }),
            )));
        }
        Ok(Outcome::Reply(Reply::Text(rooms::format_rooms(
            &main, &beta,
        )?)))
    })
}

fn pulls(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let pull = turn.services.fetcher.latest_pull().await?;
        Ok(Outcome::Reply(Reply::Text(format!(
            "{}\n{}",
            pull.title, pull.html_url
        ))))
    })
}

fn ip_lookup(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let rest = args::strip_loose(&turn.remainder, "ip").ok_or_else(|| invalid("ip"))?;
        let (host, _) = args::token_or_empty(rest);
        let address: IpAddr = host
            .parse()
            .map_err(|_| PalaverError::InvalidCommand("invalid ip address".to_string()))?;
        let location = turn.services.fetcher.ip_location(address).await?;
        Ok(Outcome::Reply(Reply::Text(location)))
    })
}

fn list_models(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let filter = args::strip_loose(&turn.remainder, "list models")
            .ok_or_else(|| invalid("list models"))?;
        let models = turn.services.fetcher.models().await?;

        if turn.tags.contains("raw") {
            return Ok(Outcome::Reply(Reply::Json(models)));
        }

        let with_price = turn.tags.contains("price");
        Ok(Outcome::Reply(Reply::Text(catalog::format_models(
            &models, filter, with_price,
        )?)))
    })
}

/// `lolm`/`csm [start] [end]` — day results, defaults to today.
fn day_matches(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let (discipline, rest) =
            if let Some(rest) = args::strip_loose(&turn.remainder, "lolm") {
                (esports::Discipline::Lol, rest)
            } else if let Some(rest) = args::strip_loose(&turn.remainder, "csm") {
                (esports::Discipline::Cs, rest)
            } else {
                return Err(invalid("m"));
            };
        let (start, rest) = args::token_or_empty(rest);
        let (end, _) = args::token_or_empty(rest);
        let start = if start.is_empty() {
            esports::today()
        } else {
            start.to_string()
        };
        let end = if end.is_empty() {
            start.clone()
        } else {
            end.to_string()
        };

        let matches = turn
            .services
            .fetcher
            .day_matches(discipline, &start, &end)
            .await?;
        let with_grades = turn.tags.contains("grade");
        let listing = matches
            .iter()
            .map(|m| esports::format_day_match(m, with_grades))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Outcome::Reply(Reply::Text(listing)))
    })
}

fn deck_listing(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let listing = turn.services.fetcher.decks().await?;
        Ok(Outcome::Reply(Reply::Text(decks::format_decks(&listing))))
    })
}

fn usage(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let record = turn
            .services
            .usage
            .last(&turn.caller, &turn.group)
            .await?
            .ok_or(PalaverError::UsageNotFound)?;
        let listing = record
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", scalar(v)))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();
        Ok(Outcome::Reply(Reply::Text(listing)))
    })
}

/// JSON scalars without quoting; everything else verbatim JSON.
fn scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
