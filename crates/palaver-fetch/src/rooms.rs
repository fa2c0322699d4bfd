//! Room listings — the primary and beta sources are independent, so
//! both are fetched concurrently and joined before formatting.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{FetchError, Result};
use crate::Fetcher;

#[derive(Debug, Deserialize)]
pub struct Room {
    pub id: i64,
    pub players: Vec<Player>,
}

#[derive(Debug, Deserialize)]
pub struct Player {
    pub name: String,
}

impl Fetcher {
    /// Both room sources as raw JSON, in (main, beta) order.
    pub async fn rooms(&self) -> Result<(Value, Value)> {
        let main = fetch_listing(self.client(), &self.config().rooms_main_url);
        let beta = fetch_listing(self.client(), &self.config().rooms_beta_url);
        let (main, beta) = tokio::join!(main, beta);
        Ok((main?, beta?))
    }
}

async fn fetch_listing(client: &reqwest::Client, url: &str) -> Result<Value> {
    Ok(client.get(url).send().await?.json().await?)
}

/// `id 👉 a 🆚 b` per room, sections per source.
pub fn format_rooms(main: &Value, beta: &Value) -> Result<String> {
    let mut lines = vec!["===== Main =====".to_string()];
    lines.extend(format_listing(main)?);
    lines.push("===== Beta =====".to_string());
    lines.extend(format_listing(beta)?);
    Ok(lines.join("\n"))
}

fn format_listing(listing: &Value) -> Result<Vec<String>> {
    let rooms: Vec<Room> = serde_json::from_value(listing.clone())
        .map_err(|e| FetchError::Shape(format!("room listing: {e}")))?;
    Ok(rooms
        .iter()
        .map(|room| {
            let sides = room
                .players
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(" 🆚 ");
            format!("{} 👉 {}", room.id, sides)
        })
        .collect())
}
