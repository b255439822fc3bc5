use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::models::{GroupModel, LeagueModel, LeagueStatus};
use crate::{shared::AppError, validation};

/// Request payload for creating or updating a league
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeagueRequest {
    pub name: String,
    pub season: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: LeagueStatus,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl LeagueRequest {
    pub fn validated(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_string();
        self.description = validation::blank_to_none(self.description);
        self.logo_url = validation::blank_to_none(self.logo_url);

        validation::required_text("name", &self.name, 100)?;
        validation::season(&self.season)?;
        validation::url("logo_url", self.logo_url.as_deref())?;
        if self.end_date < self.start_date {
            return Err(AppError::Validation(
                "end_date: must not be before start_date".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Request payload for adding a group to a league
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupCreateRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl GroupCreateRequest {
    pub fn validated(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_string();
        self.description = validation::blank_to_none(self.description);

        validation::required_text("name", &self.name, 50)?;
        Ok(self)
    }
}

/// League with the groups it contains
#[derive(Debug, Serialize, Deserialize)]
pub struct LeagueDetailResponse {
    #[serde(flatten)]
    pub league: LeagueModel,
    pub groups: Vec<GroupModel>,
}

/// Group joined with its league's name and season
#[derive(Debug, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: i64,
    pub league_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub league_name: String,
    pub league_season: String,
}

impl GroupResponse {
    pub fn new(group: GroupModel, league: &LeagueModel) -> Self {
        Self {
            id: group.id,
            league_id: group.league_id,
            name: group.name,
            description: group.description,
            league_name: league.name.clone(),
            league_season: league.season.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LeagueRequest {
        LeagueRequest {
            name: "  Premier Division ".to_string(),
            season: "2024-25".to_string(),
            description: Some("".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
            status: LeagueStatus::Draft,
            logo_url: None,
        }
    }

    #[test]
    fn validated_trims_and_normalizes() {
        let league = request().validated().unwrap();
        assert_eq!(league.name, "Premier Division");
        assert_eq!(league.description, None);
    }

    #[test]
    fn rejects_end_before_start() {
        let mut league = request();
        league.end_date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert!(matches!(league.validated(), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_bad_season() {
        let mut league = request();
        league.season = "2024".to_string();
        assert!(league.validated().is_err());
    }

    #[test]
    fn status_is_optional_in_json() {
        let json = r#"{
            "name": "Sunday League",
            "season": "2024-25",
            "start_date": "2024-09-01",
            "end_date": "2025-04-30"
        }"#;
        let parsed: LeagueRequest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, LeagueStatus::Draft);
    }

    #[test]
    fn group_name_is_required() {
        let group = GroupCreateRequest {
            name: " ".to_string(),
            description: None,
        };
        assert!(group.validated().is_err());
    }
}
