use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::{models::PlayerModel, types::PlayerRequest};
use crate::db::{db_error, parse_column};
use crate::shared::AppError;

/// Trait for player repository operations
#[async_trait]
pub trait PlayerRepository {
    async fn create_player(&self, request: &PlayerRequest) -> Result<PlayerModel, AppError>;
    async fn get_player(&self, player_id: i64) -> Result<Option<PlayerModel>, AppError>;
    /// Players ordered by last then first name, optionally for one team
    async fn list_players(&self, team_id: Option<i64>) -> Result<Vec<PlayerModel>, AppError>;
    async fn update_player(
        &self,
        player_id: i64,
        request: &PlayerRequest,
    ) -> Result<Option<PlayerModel>, AppError>;
    async fn delete_player(&self, player_id: i64) -> Result<bool, AppError>;
    /// Removes a team's whole squad, returning how many rows went
    async fn delete_players_for_team(&self, team_id: i64) -> Result<u64, AppError>;
}

#[derive(Debug, Default)]
struct PlayerTable {
    rows: BTreeMap<i64, PlayerModel>,
    next_id: i64,
}

/// In-memory implementation of PlayerRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryPlayerRepository {
    table: RwLock<PlayerTable>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn build_player(id: i64, request: &PlayerRequest) -> PlayerModel {
    let now = Utc::now();
    PlayerModel {
        id,
        team_id: request.team_id,
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        jersey_number: request.jersey_number,
        position: request.position,
        date_of_birth: request.date_of_birth,
        nationality: request.nationality.clone(),
        photo_url: request.photo_url.clone(),
        height: request.height,
        weight: request.weight,
        preferred_foot: request.preferred_foot,
        status: request.status,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    #[instrument(skip(self, request))]
    async fn create_player(&self, request: &PlayerRequest) -> Result<PlayerModel, AppError> {
        let mut table = self.table.write().await;
        table.next_id += 1;

        let player = build_player(table.next_id, request);
        table.rows.insert(player.id, player.clone());

        debug!(player_id = player.id, team_id = player.team_id, "Player created in memory");
        Ok(player)
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: i64) -> Result<Option<PlayerModel>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&player_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_players(&self, team_id: Option<i64>) -> Result<Vec<PlayerModel>, AppError> {
        let table = self.table.read().await;
        let mut players: Vec<PlayerModel> = table
            .rows
            .values()
            .filter(|p| team_id.map_or(true, |t| p.team_id == t))
            .cloned()
            .collect();
        players.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
                .then(a.id.cmp(&b.id))
        });
        Ok(players)
    }

    #[instrument(skip(self, request))]
    async fn update_player(
        &self,
        player_id: i64,
        request: &PlayerRequest,
    ) -> Result<Option<PlayerModel>, AppError> {
        let mut table = self.table.write().await;
        let Some(existing) = table.rows.get_mut(&player_id) else {
            return Ok(None);
        };

        let mut updated = build_player(player_id, request);
        updated.created_at = existing.created_at;
        *existing = updated.clone();
        Ok(Some(updated))
    }

    #[instrument(skip(self))]
    async fn delete_player(&self, player_id: i64) -> Result<bool, AppError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&player_id).is_some())
    }

    #[instrument(skip(self))]
    async fn delete_players_for_team(&self, team_id: i64) -> Result<u64, AppError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|_, p| p.team_id != team_id);
        let removed = (before - table.rows.len()) as u64;

        debug!(team_id, removed, "Squad removed from memory");
        Ok(removed)
    }
}

/// PostgreSQL implementation of player repository
pub struct PostgresPlayerRepository {
    pool: PgPool,
}

impl PostgresPlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PLAYER_COLUMNS: &str = "id, team_id, first_name, last_name, jersey_number, position, \
     date_of_birth, nationality, photo_url, height, weight, preferred_foot, status, \
     created_at, updated_at";

fn player_from_row(row: &PgRow) -> Result<PlayerModel, AppError> {
    let position: String = row.get("position");
    let status: String = row.get("status");
    let preferred_foot: Option<String> = row.get("preferred_foot");

    Ok(PlayerModel {
        id: row.get("id"),
        team_id: row.get("team_id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        jersey_number: row.get("jersey_number"),
        position: parse_column("position", &position)?,
        date_of_birth: row.get("date_of_birth"),
        nationality: row.get("nationality"),
        photo_url: row.get("photo_url"),
        height: row.get("height"),
        weight: row.get("weight"),
        preferred_foot: preferred_foot
            .as_deref()
            .map(|foot| parse_column("preferred_foot", foot))
            .transpose()?,
        status: parse_column("status", &status)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl PlayerRepository for PostgresPlayerRepository {
    #[instrument(skip(self, request))]
    async fn create_player(&self, request: &PlayerRequest) -> Result<PlayerModel, AppError> {
        let row = sqlx::query(&format!(
            "INSERT INTO players (team_id, first_name, last_name, jersey_number, position, \
             date_of_birth, nationality, photo_url, height, weight, preferred_foot, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {PLAYER_COLUMNS}"
        ))
        .bind(request.team_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(request.jersey_number)
        .bind(request.position.to_string())
        .bind(request.date_of_birth)
        .bind(&request.nationality)
        .bind(&request.photo_url)
        .bind(request.height)
        .bind(request.weight)
        .bind(request.preferred_foot.map(|f| f.to_string()))
        .bind(request.status.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("create_player", e))?;

        player_from_row(&row)
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: i64) -> Result<Option<PlayerModel>, AppError> {
        let row = sqlx::query(&format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1"))
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("get_player", e))?;

        row.as_ref().map(player_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_players(&self, team_id: Option<i64>) -> Result<Vec<PlayerModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE ($1::BIGINT IS NULL OR team_id = $1) \
             ORDER BY last_name, first_name, id"
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list_players", e))?;

        rows.iter().map(player_from_row).collect()
    }

    #[instrument(skip(self, request))]
    async fn update_player(
        &self,
        player_id: i64,
        request: &PlayerRequest,
    ) -> Result<Option<PlayerModel>, AppError> {
        let row = sqlx::query(&format!(
            "UPDATE players SET team_id = $2, first_name = $3, last_name = $4, jersey_number = $5, \
             position = $6, date_of_birth = $7, nationality = $8, photo_url = $9, height = $10, \
             weight = $11, preferred_foot = $12, status = $13, updated_at = now() \
             WHERE id = $1 RETURNING {PLAYER_COLUMNS}"
        ))
        .bind(player_id)
        .bind(request.team_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(request.jersey_number)
        .bind(request.position.to_string())
        .bind(request.date_of_birth)
        .bind(&request.nationality)
        .bind(&request.photo_url)
        .bind(request.height)
        .bind(request.weight)
        .bind(request.preferred_foot.map(|f| f.to_string()))
        .bind(request.status.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("update_player", e))?;

        row.as_ref().map(player_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_player(&self, player_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(player_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_player", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_players_for_team(&self, team_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM players WHERE team_id = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_players_for_team", e))?;

        Ok(result.rows_affected())
    }
}
