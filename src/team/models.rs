use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for teams table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct TeamModel {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub short_name: Option<String>, // e.g. "MUN"
    pub logo_url: Option<String>,
    pub home_field: Option<String>,
    pub coach_name: Option<String>,
    pub founded_year: Option<i32>,
    pub primary_color: Option<String>, // "#RRGGBB"
    pub secondary_color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamModel {
    /// Case-insensitive comparison used for the per-group name uniqueness rule
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}
