//! Link harvesting step.
//!
//! Runs after the enriching handlers: scans the reference and the
//! remaining message text for URLs, fetches them concurrently and
//! appends each body as a tagged resource block. `#nolinks` skips the
//! whole pass (tag consumed), `#links` returns the bare list instead,
//! and the `links` tag is set afterwards so the pass cannot re-run.

use futures_util::future::join_all;

use palaver_core::types::{ContentPart, Reply};
use palaver_core::Result;
use palaver_fetch::harvest;

use super::Turn;

pub async fn run(turn: &mut Turn) -> Result<Option<Reply>> {
    let links = harvest::extract_links([
        turn.reference.as_deref().unwrap_or(""),
        turn.remainder.as_str(),
    ]);

    if turn.tags.remove("nolinks") {
        return Ok(None);
    }
    if links.is_empty() {
        return Ok(None);
    }
    if turn.tags.contains("links") {
        return Ok(Some(Reply::Text(links.join("\n"))));
    }
    turn.tags.add("links");

    let services = turn.services.clone();
    let bodies = join_all(links.iter().map(|link| services.fetcher.link_body(link))).await;

    let extract_all = services
        .features
        .enabled(&turn.caller, "cheerio")
        .await?;

    for (link, body) in links.iter().zip(bodies) {
        let mut body = body?;
        if extract_all || turn.tags.contains("cheerio") {
            body = harvest::to_visible_text(&body);
            turn.tags.remove("cheerio");
        }
        turn.content.push(ContentPart::Text {
            text: harvest::resource_block(link, &body),
        });
    }
    Ok(None)
}
