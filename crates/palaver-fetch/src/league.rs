//! League schedule and results.
//!
//! The upstream publishes JS assignments (`var GameList=...;`) rather
//! than plain JSON, per-season match listings as separate documents,
//! and an authorized stats API for full match detail. All dates are
//! Asia/Shanghai wall-clock strings; comparisons stay naive in that
//! zone.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Asia::Shanghai;
use serde::Deserialize;

use crate::error::{FetchError, Result};
use crate::Fetcher;

const GAME_LIST_URL: &str =
    "https://lpl.qq.com/web201612/data/LOL_MATCH2_GAME_LIST_BRIEF.js";
const MATCH_LIST_URL: &str =
    "https://lpl.qq.com/web201612/data/LOL_MATCH2_MATCH_HOMEPAGE_BMATCH_LIST_";
const MATCH_DETAIL_URL: &str = "https://lpl.qq.com/web201612/data/LOL_MATCH_DETAIL_";
const STATS_URL: &str =
    "https://open.tjstats.com/match-auth-app/open/v1/compound/matchDetail";

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonGame {
    #[serde(rename = "GameId")]
    pub game_id: String,
    #[serde(rename = "GameName")]
    pub game_name: String,
    #[serde(rename = "sDate")]
    pub start_date: String,
    #[serde(rename = "eDate")]
    pub end_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueMatch {
    #[serde(rename = "bMatchId")]
    pub match_id: String,
    #[serde(rename = "bMatchName")]
    pub match_name: String,
    #[serde(rename = "GameName")]
    pub game_name: String,
    #[serde(rename = "GameModeName")]
    pub mode_name: String,
    #[serde(rename = "GameTypeName")]
    pub type_name: String,
    #[serde(rename = "GameProcName")]
    pub proc_name: String,
    #[serde(rename = "ScoreA")]
    pub score_a: String,
    #[serde(rename = "ScoreB")]
    pub score_b: String,
    #[serde(rename = "MatchDate")]
    pub match_date: String,
}

#[derive(Debug, Deserialize)]
struct GameListBody {
    msg: GameListMsg,
}

#[derive(Debug, Deserialize)]
struct GameListMsg {
    #[serde(rename = "sGameList")]
    game_list: BTreeMap<String, Vec<SeasonGame>>,
}

#[derive(Debug, Deserialize)]
struct MatchListBody {
    msg: Vec<LeagueMatch>,
}

#[derive(Debug, Deserialize)]
struct DetailBody {
    #[serde(rename = "sExt4")]
    ext4: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Headline {
    title: String,
}

/// Strip a `var name=...;` JS assignment down to its JSON payload.
fn strip_js_assignment<'a>(text: &'a str, prefix: &str) -> Result<&'a str> {
    let trimmed = text.trim();
    let payload = trimmed
        .strip_prefix(prefix)
        .ok_or_else(|| FetchError::Shape(format!("missing `{prefix}` assignment")))?;
    Ok(payload.strip_suffix(';').unwrap_or(payload))
}

impl Fetcher {
    /// Every season the league publishes, flattened across groupings.
    pub async fn season_games(&self) -> Result<Vec<SeasonGame>> {
        let text = self
            .client()
            .get(GAME_LIST_URL)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let body: GameListBody = serde_json::from_str(strip_js_assignment(&text, "var GameList=")?)
            .map_err(|e| FetchError::Shape(format!("game list: {e}")))?;
        Ok(body.msg.game_list.into_values().flatten().collect())
    }

    /// All matches of the given seasons, fetched concurrently.
    /// A season whose listing is unavailable contributes nothing.
    pub async fn league_matches(&self, games: &[SeasonGame]) -> Vec<LeagueMatch> {
        let fetches = games.iter().map(|game| {
            let url = format!("{MATCH_LIST_URL}{}.js", game.game_id);
            let client = self.client().clone();
            async move {
                let resp = match client.get(&url).send().await {
                    Ok(r) if r.status().is_success() => r,
                    _ => return Vec::new(),
                };
                match resp.json::<MatchListBody>().await {
                    Ok(body) => body.msg,
                    Err(_) => Vec::new(),
                }
            }
        });
        futures_util::future::join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Headline titles attached to a finished match, if any.
    pub async fn match_news(&self, match_id: &str) -> Result<Option<Vec<String>>> {
        let url = format!("{MATCH_DETAIL_URL}{match_id}.js");
        let text = self
            .client()
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let body: DetailBody = serde_json::from_str(strip_js_assignment(&text, "var dataObj=")?)
            .map_err(|e| FetchError::Shape(format!("match detail: {e}")))?;
        let Some(ext4) = body.ext4 else {
            return Ok(None);
        };
        let headlines: Vec<Headline> = serde_json::from_str(&ext4)
            .map_err(|e| FetchError::Shape(format!("match news: {e}")))?;
        Ok(Some(headlines.into_iter().map(|h| h.title).collect()))
    }

    /// Full match detail from the authorized stats API, verbatim.
    pub async fn match_stats(&self, match_id: &str, authorization: &str) -> Result<String> {
        Ok(self
            .client()
            .get(STATS_URL)
            .query(&[("matchId", match_id)])
            .header("authorization", authorization)
            .send()
            .await?
            .text()
            .await?)
    }
}

pub fn parse_day(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Current wall-clock in the league's timezone.
pub fn now_local() -> NaiveDateTime {
    Utc::now().with_timezone(&Shanghai).naive_local()
}

/// A match's wall-clock stamp; date-only stamps read as midnight.
pub fn match_stamp(m: &LeagueMatch) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&m.match_date, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| parse_day(&m.match_date).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Seasons whose span overlaps the inclusive day range.
pub fn active_games(games: Vec<SeasonGame>, start: NaiveDate, end: NaiveDate) -> Vec<SeasonGame> {
    games
        .into_iter()
        .filter(|g| {
            let Some(s) = parse_day(&g.start_date) else {
                return false;
            };
            let Some(e) = parse_day(&g.end_date) else {
                return false;
            };
            s <= end && e >= start
        })
        .collect()
}

pub fn format_gaming(games: &[SeasonGame]) -> String {
    games
        .iter()
        .map(|g| format!("{} {} ~ {}", g.game_name, g.start_date, g.end_date))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Season, stage, date and score for one match.
pub fn format_league_match(m: &LeagueMatch) -> String {
    let (a, b) = m
        .match_name
        .split_once(" vs ")
        .unwrap_or((m.match_name.as_str(), ""));
    [
        format!(
            "{} {} {} ({})",
            m.game_name, m.type_name, m.proc_name, m.mode_name
        ),
        m.match_date.clone(),
        format!("{} {} - {} {}", a, m.score_a, m.score_b, b),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: &str, start: &str, end: &str) -> SeasonGame {
        SeasonGame {
            game_id: id.into(),
            game_name: format!("Season {id}"),
            start_date: start.into(),
            end_date: end.into(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn strip_assignment_handles_trailing_semicolon() {
        assert_eq!(
            strip_js_assignment("var GameList={\"a\":1};", "var GameList=").unwrap(),
            "{\"a\":1}"
        );
        assert!(strip_js_assignment("{\"a\":1}", "var GameList=").is_err());
    }

    #[test]
    fn active_games_keep_overlapping_spans() {
        let games = vec![
            game("1", "2024-01-01", "2024-02-01"),
            game("2", "2024-03-01", "2024-04-01"),
        ];
        let active = active_games(games, day("2024-01-15"), day("2024-01-20"));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].game_id, "1");
    }

    #[test]
    fn active_games_include_boundary_days() {
        let games = vec![game("1", "2024-01-01", "2024-02-01")];
        assert_eq!(
            active_games(games.clone(), day("2024-02-01"), day("2024-02-10")).len(),
            1
        );
        assert!(active_games(games, day("2024-02-02"), day("2024-02-10")).is_empty());
    }

    #[test]
    fn match_stamp_accepts_date_only() {
        let mut m = sample_match();
        m.match_date = "2024-05-01".into();
        assert_eq!(
            match_stamp(&m).unwrap(),
            day("2024-05-01").and_hms_opt(0, 0, 0).unwrap()
        );
    }

    fn sample_match() -> LeagueMatch {
        LeagueMatch {
            match_id: "m1".into(),
            match_name: "Alpha vs Beta".into(),
            game_name: "Spring".into(),
            mode_name: "BO3".into(),
            type_name: "Regular".into(),
            proc_name: "W1".into(),
            score_a: "2".into(),
            score_b: "0".into(),
            match_date: "2024-05-01 17:00:00".into(),
        }
    }

    #[test]
    fn match_formatting_splits_sides() {
        let out = format_league_match(&sample_match());
        assert_eq!(
            out,
            "Spring Regular W1 (BO3)\n2024-05-01 17:00:00\nAlpha 2 - 0 Beta"
        );
    }
}
