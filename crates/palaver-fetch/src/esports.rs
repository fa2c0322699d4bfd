//! Esports day results (bilibili match listing).
//!
//! All timestamps from this source are Asia/Shanghai wall-clock; the
//! formatted output keeps that timezone.

use chrono::{TimeZone, Utc};
use chrono_tz::Asia::Shanghai;
use serde::Deserialize;

use crate::error::{FetchError, Result};
use crate::Fetcher;

const LIST_URL: &str = "https://api.bilibili.com/x/esports/matchs/list";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    Lol,
    Cs,
}

impl Discipline {
    /// Upstream game id.
    fn gid(self) -> &'static str {
        match self {
            Discipline::Lol => "2",
            Discipline::Cs => "7",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DayMatch {
    pub game_stage: String,
    pub stime: i64,
    pub etime: i64,
    pub home_score: i64,
    pub away_score: i64,
    pub season: Season,
    pub home: Side,
    pub away: Side,
}

#[derive(Debug, Deserialize)]
pub struct Season {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct Side {
    pub name: String,
    pub player_grade_detail: Option<Vec<GradeDetail>>,
}

#[derive(Debug, Deserialize)]
pub struct GradeDetail {
    pub nickname: String,
    pub grade_users: i64,
    pub avg_grade: String,
    pub position: String,
}

#[derive(Debug, Deserialize)]
struct ListBody {
    data: ListData,
}

#[derive(Debug, Deserialize)]
struct ListData {
    list: Vec<DayMatch>,
}

impl Fetcher {
    /// Matches for a discipline within an inclusive `YYYY-MM-DD` range.
    pub async fn day_matches(
        &self,
        discipline: Discipline,
        start: &str,
        end: &str,
    ) -> Result<Vec<DayMatch>> {
        let body: ListBody = self
            .client()
            .get(LIST_URL)
            .query(&[
                ("mid", "0"),
                ("gid", discipline.gid()),
                ("tid", "0"),
                ("pn", "1"),
                ("ps", "10"),
                ("contest_status", ""),
                ("stime", start),
                ("etime", end),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| FetchError::Shape(format!("match listing: {e}")))?;
        Ok(body.data.list)
    }
}

/// Today's date in the source's timezone, `YYYY-MM-DD`.
pub fn today() -> String {
    Utc::now().with_timezone(&Shanghai).format("%Y-%m-%d").to_string()
}

fn format_stamp(unix: i64) -> String {
    match Utc.timestamp_opt(unix, 0) {
        chrono::LocalResult::Single(t) => t
            .with_timezone(&Shanghai)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        _ => unix.to_string(),
    }
}

/// Stage, time range and score; player grades appended on request.
pub fn format_day_match(m: &DayMatch, with_grades: bool) -> String {
    let mut lines = vec![
        format!("{} {}", m.season.title, m.game_stage),
        format!("{} ~ {}", format_stamp(m.stime), format_stamp(m.etime)),
        format!(
            "{} {} - {} {}",
            m.home.name, m.home_score, m.away_score, m.away.name
        ),
    ];

    if with_grades {
        for side in [&m.home, &m.away] {
            if let Some(details) = &side.player_grade_detail {
                for d in details {
                    lines.push(format!(
                        "{} {} {} {} ({})",
                        side.name, d.nickname, d.position, d.avg_grade, d.grade_users
                    ));
                }
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DayMatch {
        DayMatch {
            game_stage: "Finals".into(),
            stime: 1_700_000_000,
            etime: 1_700_010_000,
            home_score: 2,
            away_score: 1,
            season: Season {
                title: "Cup".into(),
            },
            home: Side {
                name: "Alpha".into(),
                player_grade_detail: Some(vec![GradeDetail {
                    nickname: "ace".into(),
                    grade_users: 12,
                    avg_grade: "9.1".into(),
                    position: "mid".into(),
                }]),
            },
            away: Side {
                name: "Beta".into(),
                player_grade_detail: None,
            },
        }
    }

    #[test]
    fn formats_score_line() {
        let out = format_day_match(&sample(), false);
        assert!(out.starts_with("Cup Finals\n"));
        assert!(out.ends_with("Alpha 2 - 1 Beta"));
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn grades_append_per_player_lines() {
        let out = format_day_match(&sample(), true);
        assert!(out.ends_with("Alpha ace mid 9.1 (12)"));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn stamps_render_in_source_timezone() {
        let out = format_day_match(&sample(), false);
        // 2023-11-14 22:13:20 UTC == 2023-11-15 06:13:20 +08:00
        assert!(out.contains("2023-11-15 06:13:20"));
    }
}
