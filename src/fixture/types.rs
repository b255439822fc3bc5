use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{EventType, MatchModel, MatchStatus};
use crate::{shared::AppError, team::models::TeamModel, validation};

/// Highest score one side may record; the database enforces the same bound
pub const MAX_GOALS: i32 = 99;

/// Request payload for scheduling or editing a match
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchRequest {
    pub league_id: i64,
    #[serde(default)]
    pub group_id: Option<i64>,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub matchday: Option<i32>,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub home_score: Option<i32>,
    #[serde(default)]
    pub away_score: Option<i32>,
    #[serde(default)]
    pub home_halftime_score: Option<i32>,
    #[serde(default)]
    pub away_halftime_score: Option<i32>,
    #[serde(default)]
    pub attendance: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MatchRequest {
    pub fn validated(mut self) -> Result<Self, AppError> {
        self.venue = validation::blank_to_none(self.venue);
        self.notes = validation::blank_to_none(self.notes);

        if self.home_team_id == self.away_team_id {
            return Err(AppError::Validation(
                "away_team_id: home and away teams must be different".to_string(),
            ));
        }
        validation::optional_text("venue", self.venue.as_deref(), 100)?;
        validation::in_range("matchday", self.matchday, 1, i32::MAX)?;
        validation::in_range("home_score", self.home_score, 0, MAX_GOALS)?;
        validation::in_range("away_score", self.away_score, 0, MAX_GOALS)?;
        validation::in_range("home_halftime_score", self.home_halftime_score, 0, MAX_GOALS)?;
        validation::in_range("away_halftime_score", self.away_halftime_score, 0, MAX_GOALS)?;
        validation::non_negative("attendance", self.attendance)?;

        if self.home_score.is_some() != self.away_score.is_some() {
            return Err(AppError::Validation(
                "score: home and away scores must be given together".to_string(),
            ));
        }
        if self.home_halftime_score.is_some() != self.away_halftime_score.is_some() {
            return Err(AppError::Validation(
                "halftime score: home and away scores must be given together".to_string(),
            ));
        }
        if self.status == MatchStatus::Completed && self.home_score.is_none() {
            return Err(AppError::Validation(
                "score: a completed match needs a final score".to_string(),
            ));
        }
        if let (Some(ht), Some(ft)) = (self.home_halftime_score, self.home_score) {
            if ht > ft {
                return Err(AppError::Validation(
                    "home_halftime_score: cannot exceed the final score".to_string(),
                ));
            }
        }
        if let (Some(ht), Some(ft)) = (self.away_halftime_score, self.away_score) {
            if ht > ft {
                return Err(AppError::Validation(
                    "away_halftime_score: cannot exceed the final score".to_string(),
                ));
            }
        }
        Ok(self)
    }
}

/// Query string for `GET /matches`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchFilter {
    pub league_id: Option<i64>,
    pub group_id: Option<i64>,
    pub team_id: Option<i64>,
    pub status: Option<MatchStatus>,
}

impl MatchFilter {
    pub fn completed_in_group(group_id: i64) -> Self {
        Self {
            group_id: Some(group_id),
            status: Some(MatchStatus::Completed),
            ..Self::default()
        }
    }

    pub fn matches(&self, m: &MatchModel) -> bool {
        self.league_id.map_or(true, |id| m.league_id == id)
            && self.group_id.map_or(true, |id| m.group_id == Some(id))
            && self.team_id.map_or(true, |id| m.involves(id))
            && self.status.map_or(true, |s| m.status == s)
    }
}

/// Request payload for logging a match event
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchEventRequest {
    pub player_id: i64,
    pub team_id: i64,
    pub event_type: EventType,
    pub minute: i32,
    #[serde(default)]
    pub additional_time: i32,
    #[serde(default)]
    pub assist_player_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MatchEventRequest {
    pub fn validated(mut self) -> Result<Self, AppError> {
        self.notes = validation::blank_to_none(self.notes);

        validation::in_range("minute", Some(self.minute), 0, 120)?;
        validation::in_range("additional_time", Some(self.additional_time), 0, 15)?;

        if let Some(assist) = self.assist_player_id {
            if !self.event_type.allows_assist() {
                return Err(AppError::Validation(format!(
                    "assist_player_id: {} events carry no assist",
                    self.event_type
                )));
            }
            if assist == self.player_id {
                return Err(AppError::Validation(
                    "assist_player_id: a player cannot assist their own goal".to_string(),
                ));
            }
        }
        Ok(self)
    }
}

/// Compact team identity embedded in match listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSummary {
    pub id: i64,
    pub name: String,
    pub short_name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
}

impl From<&TeamModel> for TeamSummary {
    fn from(team: &TeamModel) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            short_name: team.short_name.clone(),
            logo_url: team.logo_url.clone(),
            primary_color: team.primary_color.clone(),
        }
    }
}

/// Match joined with both teams
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchDetailResponse {
    #[serde(flatten)]
    pub fixture: MatchModel,
    pub home_team: Option<TeamSummary>,
    pub away_team: Option<TeamSummary>,
}
