use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::models::{PlayerPosition, PlayerStatus, PreferredFoot};
use crate::{shared::AppError, validation};

/// Request payload for registering or editing a player
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerRequest {
    pub team_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub jersey_number: Option<i32>,
    pub position: PlayerPosition,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub weight: Option<i32>,
    #[serde(default)]
    pub preferred_foot: Option<PreferredFoot>,
    #[serde(default)]
    pub status: PlayerStatus,
}

impl PlayerRequest {
    pub fn validated(mut self) -> Result<Self, AppError> {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.nationality = validation::blank_to_none(self.nationality);
        self.photo_url = validation::blank_to_none(self.photo_url);

        validation::required_text("first_name", &self.first_name, 50)?;
        validation::required_text("last_name", &self.last_name, 50)?;
        validation::in_range("jersey_number", self.jersey_number, 0, 99)?;
        validation::optional_text("nationality", self.nationality.as_deref(), 50)?;
        validation::url("photo_url", self.photo_url.as_deref())?;
        validation::in_range("height", self.height, 100, 250)?;
        validation::in_range("weight", self.weight, 30, 150)?;

        if let Some(born) = self.date_of_birth {
            if born > Utc::now().date_naive() {
                return Err(AppError::Validation(
                    "date_of_birth: must not be in the future".to_string(),
                ));
            }
        }
        Ok(self)
    }
}

/// Query string for `GET /players`
#[derive(Debug, Default, Deserialize)]
pub struct PlayerQuery {
    pub team_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PlayerRequest {
        serde_json::from_str(
            r#"{
                "team_id": 3,
                "first_name": "Sam",
                "last_name": "Keeper",
                "jersey_number": 1,
                "position": "goalkeeper",
                "height": 191
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn defaults_status_to_active() {
        let player = request().validated().unwrap();
        assert_eq!(player.status, PlayerStatus::Active);
        assert_eq!(player.preferred_foot, None);
    }

    #[test]
    fn rejects_out_of_range_measurements() {
        let mut player = request();
        player.height = Some(99);
        assert!(player.validated().is_err());

        let mut player = request();
        player.weight = Some(151);
        assert!(player.validated().is_err());

        let mut player = request();
        player.jersey_number = Some(100);
        assert!(matches!(player.validated(), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_future_birth_date() {
        let mut player = request();
        player.date_of_birth = Some(Utc::now().date_naive() + chrono::Duration::days(2));
        assert!(player.validated().is_err());
    }
}
