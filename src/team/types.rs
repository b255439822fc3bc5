use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::models::TeamModel;
use crate::{
    league::models::{GroupModel, LeagueModel},
    shared::AppError,
    validation,
};

/// Request payload for registering or editing a team
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeamRequest {
    pub group_id: i64,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub home_field: Option<String>,
    #[serde(default)]
    pub coach_name: Option<String>,
    #[serde(default)]
    pub founded_year: Option<i32>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
}

impl TeamRequest {
    pub fn validated(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_string();
        self.short_name = validation::blank_to_none(self.short_name);
        self.logo_url = validation::blank_to_none(self.logo_url);
        self.home_field = validation::blank_to_none(self.home_field);
        self.coach_name = validation::blank_to_none(self.coach_name);
        self.primary_color = validation::blank_to_none(self.primary_color);
        self.secondary_color = validation::blank_to_none(self.secondary_color);

        validation::required_text("name", &self.name, 100)?;
        validation::optional_text("short_name", self.short_name.as_deref(), 10)?;
        validation::optional_text("home_field", self.home_field.as_deref(), 100)?;
        validation::optional_text("coach_name", self.coach_name.as_deref(), 100)?;
        validation::url("logo_url", self.logo_url.as_deref())?;
        validation::in_range("founded_year", self.founded_year, 1800, Utc::now().year())?;
        validation::hex_color("primary_color", self.primary_color.as_deref())?;
        validation::hex_color("secondary_color", self.secondary_color.as_deref())?;
        Ok(self)
    }
}

/// Query string for `GET /teams`
#[derive(Debug, Default, Deserialize)]
pub struct TeamQuery {
    pub group_id: Option<i64>,
}

/// Team joined with its group and league
#[derive(Debug, Serialize, Deserialize)]
pub struct TeamDetailResponse {
    #[serde(flatten)]
    pub team: TeamModel,
    pub group_name: String,
    pub league_id: i64,
    pub league_name: String,
    pub league_season: String,
}

impl TeamDetailResponse {
    pub fn new(team: TeamModel, group: &GroupModel, league: &LeagueModel) -> Self {
        Self {
            team,
            group_name: group.name.clone(),
            league_id: league.id,
            league_name: league.name.clone(),
            league_season: league.season.clone(),
        }
    }
}
