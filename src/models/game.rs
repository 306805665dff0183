//! Match entries and the form a new match is submitted with.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a recorded match.
pub type MatchId = Uuid;

/// Which team won the match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    One,
    Two,
}

impl Team {
    /// Label used in the match log file.
    pub fn label(self) -> &'static str {
        match self {
            Team::One => "Equipo 1",
            Team::Two => "Equipo 2",
        }
    }

    /// Accepts the file label as well as "1"/"2" and the snake_case API names.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "equipo 1" | "equipo1" | "1" | "one" | "team 1" => Some(Team::One),
            "equipo 2" | "equipo2" | "2" | "two" | "team 2" => Some(Team::Two),
            _ => None,
        }
    }
}

/// One recorded match. Never changed after it is appended to the log.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub id: MatchId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Known venue name, or the free text given for "other".
    pub place: String,
    pub team_1: [String; 2],
    pub team_2: [String; 2],
    pub winner: Team,
    /// Raw score as typed, e.g. "6-4, 6-3".
    pub result_text: Option<String>,
    /// Team 1 games minus team 2 games.
    pub net_diff: i64,
}

impl MatchEntry {
    pub fn team(&self, team: Team) -> &[String; 2] {
        match team {
            Team::One => &self.team_1,
            Team::Two => &self.team_2,
        }
    }

    /// Signed differential seen from `team`'s side. None only for `i64::MIN` seen from team 2.
    pub fn diff_for(&self, team: Team) -> Option<i64> {
        match team {
            Team::One => Some(self.net_diff),
            Team::Two => self.net_diff.checked_neg(),
        }
    }
}

/// A candidate match as submitted from the page, before validation.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MatchForm {
    /// Defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Defaults to the configured time of day.
    #[serde(default)]
    pub time: Option<NaiveTime>,
    /// A known venue, or "other".
    #[serde(default)]
    pub place: Option<String>,
    /// Free text used when `place` is "other".
    #[serde(default)]
    pub place_other: Option<String>,
    pub team_1: Vec<String>,
    pub team_2: Vec<String>,
    /// May be omitted when the result text decides it on sets.
    #[serde(default)]
    pub winner: Option<Team>,
    /// Comma-separated set scores. Takes precedence over `manual_diff`.
    #[serde(default)]
    pub result_text: Option<String>,
    /// Games won by minus games lost by the winner, when no result text is given.
    #[serde(default)]
    pub manual_diff: Option<u32>,
}
