use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::{models::TeamModel, types::TeamRequest};
use crate::db::db_error;
use crate::shared::AppError;

/// Trait for team repository operations
#[async_trait]
pub trait TeamRepository {
    async fn create_team(&self, request: &TeamRequest) -> Result<TeamModel, AppError>;
    async fn get_team(&self, team_id: i64) -> Result<Option<TeamModel>, AppError>;
    /// Teams ordered by name, optionally restricted to one group
    async fn list_teams(&self, group_id: Option<i64>) -> Result<Vec<TeamModel>, AppError>;
    async fn update_team(
        &self,
        team_id: i64,
        request: &TeamRequest,
    ) -> Result<Option<TeamModel>, AppError>;
    async fn delete_team(&self, team_id: i64) -> Result<bool, AppError>;
}

#[derive(Debug, Default)]
struct TeamTable {
    rows: BTreeMap<i64, TeamModel>,
    next_id: i64,
}

/// In-memory implementation of TeamRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    table: RwLock<TeamTable>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_request(team: &mut TeamModel, request: &TeamRequest) {
    team.group_id = request.group_id;
    team.name = request.name.clone();
    team.short_name = request.short_name.clone();
    team.logo_url = request.logo_url.clone();
    team.home_field = request.home_field.clone();
    team.coach_name = request.coach_name.clone();
    team.founded_year = request.founded_year;
    team.primary_color = request.primary_color.clone();
    team.secondary_color = request.secondary_color.clone();
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    #[instrument(skip(self, request))]
    async fn create_team(&self, request: &TeamRequest) -> Result<TeamModel, AppError> {
        let mut table = self.table.write().await;
        table.next_id += 1;

        let now = Utc::now();
        let mut team = TeamModel {
            id: table.next_id,
            group_id: request.group_id,
            name: String::new(),
            short_name: None,
            logo_url: None,
            home_field: None,
            coach_name: None,
            founded_year: None,
            primary_color: None,
            secondary_color: None,
            created_at: now,
            updated_at: now,
        };
        apply_request(&mut team, request);
        table.rows.insert(team.id, team.clone());

        debug!(team_id = team.id, group_id = team.group_id, "Team created in memory");
        Ok(team)
    }

    #[instrument(skip(self))]
    async fn get_team(&self, team_id: i64) -> Result<Option<TeamModel>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&team_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_teams(&self, group_id: Option<i64>) -> Result<Vec<TeamModel>, AppError> {
        let table = self.table.read().await;
        let mut teams: Vec<TeamModel> = table
            .rows
            .values()
            .filter(|t| group_id.map_or(true, |g| t.group_id == g))
            .cloned()
            .collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(teams)
    }

    #[instrument(skip(self, request))]
    async fn update_team(
        &self,
        team_id: i64,
        request: &TeamRequest,
    ) -> Result<Option<TeamModel>, AppError> {
        let mut table = self.table.write().await;
        let Some(team) = table.rows.get_mut(&team_id) else {
            return Ok(None);
        };
        apply_request(team, request);
        team.updated_at = Utc::now();
        Ok(Some(team.clone()))
    }

    #[instrument(skip(self))]
    async fn delete_team(&self, team_id: i64) -> Result<bool, AppError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&team_id).is_some())
    }
}

/// PostgreSQL implementation of team repository
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TEAM_COLUMNS: &str = "id, group_id, name, short_name, logo_url, home_field, coach_name, \
     founded_year, primary_color, secondary_color, created_at, updated_at";

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    #[instrument(skip(self, request))]
    async fn create_team(&self, request: &TeamRequest) -> Result<TeamModel, AppError> {
        sqlx::query_as::<_, TeamModel>(&format!(
            "INSERT INTO teams (group_id, name, short_name, logo_url, home_field, coach_name, \
             founded_year, primary_color, secondary_color) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {TEAM_COLUMNS}"
        ))
        .bind(request.group_id)
        .bind(&request.name)
        .bind(&request.short_name)
        .bind(&request.logo_url)
        .bind(&request.home_field)
        .bind(&request.coach_name)
        .bind(request.founded_year)
        .bind(&request.primary_color)
        .bind(&request.secondary_color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("create_team", e))
    }

    #[instrument(skip(self))]
    async fn get_team(&self, team_id: i64) -> Result<Option<TeamModel>, AppError> {
        sqlx::query_as::<_, TeamModel>(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("get_team", e))
    }

    #[instrument(skip(self))]
    async fn list_teams(&self, group_id: Option<i64>) -> Result<Vec<TeamModel>, AppError> {
        sqlx::query_as::<_, TeamModel>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE ($1::BIGINT IS NULL OR group_id = $1) \
             ORDER BY name, id"
        ))
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list_teams", e))
    }

    #[instrument(skip(self, request))]
    async fn update_team(
        &self,
        team_id: i64,
        request: &TeamRequest,
    ) -> Result<Option<TeamModel>, AppError> {
        sqlx::query_as::<_, TeamModel>(&format!(
            "UPDATE teams SET group_id = $2, name = $3, short_name = $4, logo_url = $5, \
             home_field = $6, coach_name = $7, founded_year = $8, primary_color = $9, \
             secondary_color = $10, updated_at = now() WHERE id = $1 RETURNING {TEAM_COLUMNS}"
        ))
        .bind(team_id)
        .bind(request.group_id)
        .bind(&request.name)
        .bind(&request.short_name)
        .bind(&request.logo_url)
        .bind(&request.home_field)
        .bind(&request.coach_name)
        .bind(request.founded_year)
        .bind(&request.primary_color)
        .bind(&request.secondary_color)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("update_team", e))
    }

    #[instrument(skip(self))]
    async fn delete_team(&self, team_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_team", e))?;

        Ok(result.rows_affected() > 0)
    }
}
