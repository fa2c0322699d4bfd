//! Enriching handlers — they attach fetched content and fall through
//! to the model call, except where a tag asks for the raw artifact.

use palaver_command::args;
use palaver_core::types::{ContentPart, Reply};
use palaver_core::PalaverError;
use palaver_fetch::{league, xkcd};
use palaver_store::keys;

use super::dispatch::{Command, HandlerFuture, Outcome};
use super::Turn;

/// Cache lifetime for the questions essay.
const ESSAY_TTL_SECS: i64 = 86_400;

pub fn table() -> &'static [Command] {
    const TABLE: &[Command] = &[
        Command {
            name: "help",
            applies: |t| t.remainder.starts_with("help"),
            run: help,
        },
        Command {
            name: "credits",
            applies: |t| t.remainder == "credits",
            run: credits,
        },
        Command {
            name: "league",
            applies: |t| t.remainder.starts_with("lol"),
            run: league_report,
        },
        Command {
            name: "hacker-news",
            applies: |t| t.remainder.starts_with("hacker news"),
            run: hacker_news,
        },
        Command {
            name: "github-trending",
            applies: |t| t.remainder == "github trending",
            run: github_trending,
        },
        Command {
            name: "xkcd",
            applies: |t| t.remainder.starts_with("xkcd"),
            run: comic,
        },
        Command {
            name: "ask",
            applies: |t| t.remainder == "ask" && t.reference.is_some(),
            run: ask,
        },
    ];
    TABLE
}

fn invalid(command: &str) -> PalaverError {
    PalaverError::InvalidCommand(format!("invalid {command} command"))
}

/// `help [prompt]` — attach the project manual and let the model answer.
fn help(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let rest = args::strip_loose(&turn.remainder, "help")
            .ok_or_else(|| invalid("help"))?
            .to_string();
        turn.remainder = rest;
        turn.tags.add("help");

        let manual = turn.services.fetcher.manual().await?;
        turn.content.push(ContentPart::Text { text: manual });
        Ok(Outcome::Continue)
    })
}

fn credits(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        turn.remainder.clear();
        turn.tags.add("credits");

        let balance = turn.services.fetcher.credits().await?;
        turn.content.push(ContentPart::Text { text: balance });
        Ok(Outcome::Continue)
    })
}

/// `lol [filter] [start] [end]` — league schedule and results.
///
/// Terminal shortcuts, in order: `#gaming` (active seasons), the `all`
/// filter (every match in range), `#last` (latest matching match),
/// `#news` (headline titles), `#detail` (raw stats payload). The
/// default path attaches the authorized stats detail as content.
fn league_report(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let services = turn.services.clone();

        let rest = args::strip_loose(&turn.remainder, "lol").ok_or_else(|| invalid("lol"))?;
        let (filter, rest) = args::token_or_empty(rest);
        let (start, rest) = args::token_or_empty(rest);
        let (end, _) = args::token_or_empty(rest);
        let filter = filter.to_lowercase();
        let start_given = !start.is_empty();

        let now = league::now_local();
        let start_day = if start_given {
            league::parse_day(start).ok_or_else(|| invalid("lol"))?
        } else {
            now.date()
        };
        let end_day = if end.is_empty() {
            start_day
        } else {
            league::parse_day(end).ok_or_else(|| invalid("lol"))?
        };

        let games = services.fetcher.season_games().await?;
        let active = league::active_games(games, start_day, end_day);

        if turn.tags.contains("gaming") {
            return Ok(Outcome::Reply(Reply::Text(league::format_gaming(&active))));
        }

        let matches = services.fetcher.league_matches(&active).await;

        // `lol all [start] [end]` — every match in the day range.
        if filter == "all" {
            let listing = matches
                .iter()
                .filter(|m| {
                    league::match_stamp(m)
                        .map(|s| s.date() >= start_day && s.date() <= end_day)
                        .unwrap_or(false)
                })
                .map(league::format_league_match)
                .collect::<Vec<_>>()
                .join("\n");
            return Ok(Outcome::Reply(Reply::Text(listing)));
        }

        turn.remainder.clear();
        turn.tags.add("lol");

        // Latest match whose name matches the filter. Without an
        // explicit start the window is "anything already played".
        let last = matches
            .iter()
            .filter(|m| {
                if !m.match_name.to_lowercase().contains(&filter) {
                    return false;
                }
                match league::match_stamp(m) {
                    Some(stamp) if !start_given => stamp < now,
                    Some(stamp) => stamp.date() >= start_day && stamp.date() <= end_day,
                    None => false,
                }
            })
            .next_back()
            .ok_or_else(|| PalaverError::MatchNotFound(filter.clone()))?;

        if turn.tags.contains("last") {
            return Ok(Outcome::Reply(Reply::Text(league::format_league_match(
                last,
            ))));
        }

        if turn.tags.contains("news") {
            let titles = services
                .fetcher
                .match_news(&last.match_id)
                .await?
                .ok_or(PalaverError::NewsNotFound)?;
            return Ok(Outcome::Reply(Reply::Text(titles.join("\n"))));
        }

        let authorization = services
            .store
            .get(&keys::internal("lol"))
            .await?
            .ok_or(PalaverError::LeagueAuthMissing)?;
        let detail = services
            .fetcher
            .match_stats(&last.match_id, &authorization)
            .await?;

        if turn.tags.contains("detail") {
            return Ok(Outcome::Reply(Reply::Text(detail)));
        }

        turn.content.push(ContentPart::Text { text: detail });
        Ok(Outcome::Continue)
    })
}

/// `hacker news [prompt]` — front page HTML as content.
fn hacker_news(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let rest = args::strip_loose(&turn.remainder, "hacker news")
            .ok_or_else(|| invalid("hacker news"))?
            .to_string();
        turn.remainder = rest;
        turn.tags.add("hacker-news");

        let page = turn.services.fetcher.hacker_news().await?;
        turn.content.push(ContentPart::Text { text: page });
        Ok(Outcome::Continue)
    })
}

fn github_trending(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        turn.remainder.clear();
        turn.tags.add("github-trending");

        let page = turn.services.fetcher.github_trending().await?;
        turn.content.push(ContentPart::Text { text: page });
        Ok(Outcome::Continue)
    })
}

/// `xkcd [comic] [prompt]` — scrape the comic image; `#random` picks a
/// random one (consumed), `#image` returns the bare URL.
fn comic(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let rest = args::strip_loose(&turn.remainder, "xkcd").ok_or_else(|| invalid("xkcd"))?;
        let (number, prompt) = args::token_or_empty(rest);
        let number = number.to_string();
        turn.remainder = prompt.to_string();
        turn.tags.add("xkcd");

        let pick = if turn.tags.remove("random") {
            xkcd::ComicPick::Random
        } else if !number.is_empty() {
            xkcd::ComicPick::Numbered(&number)
        } else {
            xkcd::ComicPick::Current
        };
        let page = turn.services.fetcher.comic_page(pick).await?;
        let image = xkcd::og_image(&page)
            .ok_or_else(|| PalaverError::ImageNotFound("xkcd".to_string()))?
            .to_string();

        if turn.tags.contains("image") {
            return Ok(Outcome::Reply(Reply::Text(image)));
        }

        turn.content.push(ContentPart::Image { image });
        Ok(Outcome::Continue)
    })
}

/// `ask` with a reference — attach the questions essay, store-cached.
fn ask(turn: &mut Turn) -> HandlerFuture<'_> {
    Box::pin(async move {
        let services = turn.services.clone();
        turn.remainder.clear();
        turn.tags.add("ask");

        let key = keys::internal("smart-questions");
        let essay = match services.store.get(&key).await? {
            Some(essay) => essay,
            None => {
                let essay = services.fetcher.smart_questions().await?;
                services.store.set(&key, &essay).await?;
                services.store.expire(&key, ESSAY_TTL_SECS).await?;
                essay
            }
        };
        turn.content.push(ContentPart::Text { text: essay });
        Ok(Outcome::Continue)
    })
}
