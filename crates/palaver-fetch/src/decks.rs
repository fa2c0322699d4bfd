//! Shared deck listing.

use serde::Deserialize;

use crate::error::{FetchError, Result};
use crate::Fetcher;

const DECKS_URL: &str = "https://api-takumi.mihoyo.com/event/cardsquare/index";

#[derive(Debug, Deserialize)]
pub struct Deck {
    pub nickname: String,
    pub title: String,
    pub tags: Vec<String>,
    pub card_code: String,
}

#[derive(Debug, Deserialize)]
struct DecksBody {
    data: DecksData,
}

#[derive(Debug, Deserialize)]
struct DecksData {
    list: Vec<Deck>,
}

impl Fetcher {
    pub async fn decks(&self) -> Result<Vec<Deck>> {
        let body: DecksBody = self
            .client()
            .post(DECKS_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| FetchError::Shape(format!("deck listing: {e}")))?;
        Ok(body.data.list)
    }
}

pub fn format_decks(decks: &[Deck]) -> String {
    decks
        .iter()
        .map(|deck| {
            [
                format!("🎴 {}", deck.title),
                format!("🎮 {} 🏷️ {}", deck.nickname, deck.tags.join(", ")),
                format!("🃏 {}", deck.card_code),
            ]
            .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
