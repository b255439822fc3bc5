use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Team identity as seen by the standings engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsTeam {
    pub id: i64,
    pub name: String,
    pub short_name: Option<String>,
}

impl StandingsTeam {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            short_name: None,
        }
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }
}

/// A finished match as consumed by the engine.
///
/// Goals stay optional so that a `completed` record with a missing score is
/// rejected by the engine instead of silently counting as nil.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedMatch {
    pub id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl FormResult {
    /// Outcome for the side that scored `scored` and conceded `conceded`
    pub fn from_score(scored: u32, conceded: u32) -> Self {
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => FormResult::Win,
            std::cmp::Ordering::Equal => FormResult::Draw,
            std::cmp::Ordering::Less => FormResult::Loss,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            FormResult::Win => 'W',
            FormResult::Draw => 'D',
            FormResult::Loss => 'L',
        }
    }
}

impl fmt::Display for FormResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One line of a group table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub position: u32,
    pub team_id: i64,
    pub team_name: String,
    pub short_name: Option<String>,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
    /// Most recent result last
    pub form: Vec<FormResult>,
}

impl StandingsRow {
    /// Compact form string such as `"WWDLW"`, as stored by the dashboard
    pub fn form_string(&self) -> String {
        self.form.iter().map(FormResult::symbol).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub teams: u32,
    pub matches_played: u32,
    pub total_goals: u32,
    pub draws: u32,
}

/// Response shape of the standings endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsTable {
    pub group_id: i64,
    pub rows: Vec<StandingsRow>,
    pub summary: TableSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerRow {
    pub player_id: i64,
    pub team_id: i64,
    pub player_name: String,
    pub goals: u32,
    pub penalties: u32,
    pub assists: u32,
}
