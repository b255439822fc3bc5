use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::{
    models::{GroupModel, LeagueModel},
    types::{GroupCreateRequest, LeagueRequest},
};
use crate::db::{db_error, parse_column};
use crate::shared::AppError;

/// Trait for league and group repository operations
#[async_trait]
pub trait LeagueRepository {
    async fn create_league(&self, request: &LeagueRequest) -> Result<LeagueModel, AppError>;
    async fn get_league(&self, league_id: i64) -> Result<Option<LeagueModel>, AppError>;
    async fn list_leagues(&self) -> Result<Vec<LeagueModel>, AppError>;
    async fn update_league(
        &self,
        league_id: i64,
        request: &LeagueRequest,
    ) -> Result<Option<LeagueModel>, AppError>;
    /// Removes the league row only; dependants are the service's concern
    async fn delete_league(&self, league_id: i64) -> Result<bool, AppError>;

    async fn create_group(
        &self,
        league_id: i64,
        request: &GroupCreateRequest,
    ) -> Result<GroupModel, AppError>;
    async fn get_group(&self, group_id: i64) -> Result<Option<GroupModel>, AppError>;
    async fn list_groups(&self, league_id: i64) -> Result<Vec<GroupModel>, AppError>;
    async fn delete_group(&self, group_id: i64) -> Result<bool, AppError>;
}

#[derive(Debug, Default)]
struct LeagueTables {
    leagues: BTreeMap<i64, LeagueModel>,
    groups: BTreeMap<i64, GroupModel>,
    next_league_id: i64,
    next_group_id: i64,
}

/// In-memory implementation of LeagueRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryLeagueRepository {
    tables: RwLock<LeagueTables>,
}

impl InMemoryLeagueRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeagueRepository for InMemoryLeagueRepository {
    #[instrument(skip(self, request))]
    async fn create_league(&self, request: &LeagueRequest) -> Result<LeagueModel, AppError> {
        let mut tables = self.tables.write().await;
        tables.next_league_id += 1;

        let now = Utc::now();
        let league = LeagueModel {
            id: tables.next_league_id,
            name: request.name.clone(),
            season: request.season.clone(),
            description: request.description.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            status: request.status,
            logo_url: request.logo_url.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.leagues.insert(league.id, league.clone());

        debug!(league_id = league.id, "League created in memory");
        Ok(league)
    }

    #[instrument(skip(self))]
    async fn get_league(&self, league_id: i64) -> Result<Option<LeagueModel>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.leagues.get(&league_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_leagues(&self) -> Result<Vec<LeagueModel>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.leagues.values().cloned().collect())
    }

    #[instrument(skip(self, request))]
    async fn update_league(
        &self,
        league_id: i64,
        request: &LeagueRequest,
    ) -> Result<Option<LeagueModel>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(league) = tables.leagues.get_mut(&league_id) else {
            debug!(league_id, "League not found for update in memory");
            return Ok(None);
        };

        league.name = request.name.clone();
        league.season = request.season.clone();
        league.description = request.description.clone();
        league.start_date = request.start_date;
        league.end_date = request.end_date;
        league.status = request.status;
        league.logo_url = request.logo_url.clone();
        league.updated_at = Utc::now();

        Ok(Some(league.clone()))
    }

    #[instrument(skip(self))]
    async fn delete_league(&self, league_id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.leagues.remove(&league_id).is_some())
    }

    #[instrument(skip(self, request))]
    async fn create_group(
        &self,
        league_id: i64,
        request: &GroupCreateRequest,
    ) -> Result<GroupModel, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.leagues.contains_key(&league_id) {
            return Err(AppError::NotFound(format!("League {league_id} not found")));
        }
        tables.next_group_id += 1;

        let now = Utc::now();
        let group = GroupModel {
            id: tables.next_group_id,
            league_id,
            name: request.name.clone(),
            description: request.description.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.groups.insert(group.id, group.clone());

        debug!(group_id = group.id, league_id, "Group created in memory");
        Ok(group)
    }

    #[instrument(skip(self))]
    async fn get_group(&self, group_id: i64) -> Result<Option<GroupModel>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.get(&group_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_groups(&self, league_id: i64) -> Result<Vec<GroupModel>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .groups
            .values()
            .filter(|g| g.league_id == league_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn delete_group(&self, group_id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.groups.remove(&group_id).is_some())
    }
}

/// PostgreSQL implementation of league repository
pub struct PostgresLeagueRepository {
    pool: PgPool,
}

impl PostgresLeagueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const LEAGUE_COLUMNS: &str = "id, name, season, description, start_date, end_date, status, logo_url, created_at, updated_at";
const GROUP_COLUMNS: &str = "id, league_id, name, description, created_at, updated_at";

fn league_from_row(row: &PgRow) -> Result<LeagueModel, AppError> {
    let status: String = row.get("status");
    Ok(LeagueModel {
        id: row.get("id"),
        name: row.get("name"),
        season: row.get("season"),
        description: row.get("description"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        status: parse_column("status", &status)?,
        logo_url: row.get("logo_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn group_from_row(row: &PgRow) -> GroupModel {
    GroupModel {
        id: row.get("id"),
        league_id: row.get("league_id"),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl LeagueRepository for PostgresLeagueRepository {
    #[instrument(skip(self, request))]
    async fn create_league(&self, request: &LeagueRequest) -> Result<LeagueModel, AppError> {
        let row = sqlx::query(&format!(
            "INSERT INTO leagues (name, season, description, start_date, end_date, status, logo_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {LEAGUE_COLUMNS}"
        ))
        .bind(&request.name)
        .bind(&request.season)
        .bind(&request.description)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.status.to_string())
        .bind(&request.logo_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("create_league", e))?;

        league_from_row(&row)
    }

    #[instrument(skip(self))]
    async fn get_league(&self, league_id: i64) -> Result<Option<LeagueModel>, AppError> {
        let row = sqlx::query(&format!("SELECT {LEAGUE_COLUMNS} FROM leagues WHERE id = $1"))
            .bind(league_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("get_league", e))?;

        row.as_ref().map(league_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_leagues(&self) -> Result<Vec<LeagueModel>, AppError> {
        let rows = sqlx::query(&format!("SELECT {LEAGUE_COLUMNS} FROM leagues ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list_leagues", e))?;

        rows.iter().map(league_from_row).collect()
    }

    #[instrument(skip(self, request))]
    async fn update_league(
        &self,
        league_id: i64,
        request: &LeagueRequest,
    ) -> Result<Option<LeagueModel>, AppError> {
        let row = sqlx::query(&format!(
            "UPDATE leagues SET name = $2, season = $3, description = $4, start_date = $5, \
             end_date = $6, status = $7, logo_url = $8, updated_at = now() \
             WHERE id = $1 RETURNING {LEAGUE_COLUMNS}"
        ))
        .bind(league_id)
        .bind(&request.name)
        .bind(&request.season)
        .bind(&request.description)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.status.to_string())
        .bind(&request.logo_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("update_league", e))?;

        row.as_ref().map(league_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_league(&self, league_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leagues WHERE id = $1")
            .bind(league_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_league", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request))]
    async fn create_group(
        &self,
        league_id: i64,
        request: &GroupCreateRequest,
    ) -> Result<GroupModel, AppError> {
        let row = sqlx::query(&format!(
            "INSERT INTO groups (league_id, name, description) VALUES ($1, $2, $3) \
             RETURNING {GROUP_COLUMNS}"
        ))
        .bind(league_id)
        .bind(&request.name)
        .bind(&request.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("create_group", e))?;

        Ok(group_from_row(&row))
    }

    #[instrument(skip(self))]
    async fn get_group(&self, group_id: i64) -> Result<Option<GroupModel>, AppError> {
        let row = sqlx::query(&format!("SELECT {GROUP_COLUMNS} FROM groups WHERE id = $1"))
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("get_group", e))?;

        Ok(row.as_ref().map(group_from_row))
    }

    #[instrument(skip(self))]
    async fn list_groups(&self, league_id: i64) -> Result<Vec<GroupModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {GROUP_COLUMNS} FROM groups WHERE league_id = $1 ORDER BY id"
        ))
        .bind(league_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list_groups", e))?;

        Ok(rows.iter().map(group_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn delete_group(&self, group_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(group_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_group", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::models::LeagueStatus;
    use chrono::NaiveDate;

    /// Test helper functions for creating test data
    mod helpers {
        use super::*;

        pub fn league_request(name: &str) -> LeagueRequest {
            LeagueRequest {
                name: name.to_string(),
                season: "2024-25".to_string(),
                description: None,
                start_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
                status: LeagueStatus::Active,
                logo_url: None,
            }
        }

        pub fn group_request(name: &str) -> GroupCreateRequest {
            GroupCreateRequest {
                name: name.to_string(),
                description: None,
            }
        }
    }

    use helpers::*;

    #[tokio::test]
    async fn test_create_and_get_league() {
        let repo = InMemoryLeagueRepository::new();
        let league = repo.create_league(&league_request("Premier")).await.unwrap();

        assert_eq!(league.id, 1);
        let fetched = repo.get_league(league.id).await.unwrap().unwrap();
        assert_eq!(fetched, league);
        assert_eq!(fetched.status, LeagueStatus::Active);
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryLeagueRepository::new();
        let first = repo.create_league(&league_request("One")).await.unwrap();
        let second = repo.create_league(&league_request("Two")).await.unwrap();

        assert_eq!(second.id, first.id + 1);
        let names: Vec<String> = repo
            .list_leagues()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["One", "Two"]);
    }

    #[tokio::test]
    async fn test_update_missing_league_returns_none() {
        let repo = InMemoryLeagueRepository::new();
        let updated = repo.update_league(99, &league_request("Ghost")).await.unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_update_league_changes_fields() {
        let repo = InMemoryLeagueRepository::new();
        let league = repo.create_league(&league_request("Old")).await.unwrap();

        let mut request = league_request("New");
        request.status = LeagueStatus::Completed;
        let updated = repo.update_league(league.id, &request).await.unwrap().unwrap();

        assert_eq!(updated.name, "New");
        assert_eq!(updated.status, LeagueStatus::Completed);
        assert!(updated.updated_at >= league.updated_at);
    }

    #[tokio::test]
    async fn test_groups_are_scoped_to_league() {
        let repo = InMemoryLeagueRepository::new();
        let first = repo.create_league(&league_request("One")).await.unwrap();
        let second = repo.create_league(&league_request("Two")).await.unwrap();

        repo.create_group(first.id, &group_request("Group A")).await.unwrap();
        repo.create_group(first.id, &group_request("Group B")).await.unwrap();
        repo.create_group(second.id, &group_request("North")).await.unwrap();

        assert_eq!(repo.list_groups(first.id).await.unwrap().len(), 2);
        assert_eq!(repo.list_groups(second.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_group_requires_league() {
        let repo = InMemoryLeagueRepository::new();
        let result = repo.create_group(7, &group_request("Orphans")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_group_and_league() {
        let repo = InMemoryLeagueRepository::new();
        let league = repo.create_league(&league_request("One")).await.unwrap();
        let group = repo.create_group(league.id, &group_request("A")).await.unwrap();

        assert!(repo.delete_group(group.id).await.unwrap());
        assert!(!repo.delete_group(group.id).await.unwrap());
        assert!(repo.delete_league(league.id).await.unwrap());
        assert!(repo.get_league(league.id).await.unwrap().is_none());
    }
}
