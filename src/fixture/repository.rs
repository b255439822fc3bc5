use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::{
    models::{MatchEventModel, MatchModel},
    types::{MatchEventRequest, MatchFilter, MatchRequest},
};
use crate::db::{db_error, parse_column};
use crate::shared::AppError;

/// Trait for match and match event repository operations
#[async_trait]
pub trait MatchRepository {
    async fn create_match(&self, request: &MatchRequest) -> Result<MatchModel, AppError>;
    async fn get_match(&self, match_id: i64) -> Result<Option<MatchModel>, AppError>;
    /// Matches in kick-off order
    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchModel>, AppError>;
    async fn update_match(
        &self,
        match_id: i64,
        request: &MatchRequest,
    ) -> Result<Option<MatchModel>, AppError>;
    /// Deletes the match together with its events
    async fn delete_match(&self, match_id: i64) -> Result<bool, AppError>;
    async fn delete_matches_for_league(&self, league_id: i64) -> Result<u64, AppError>;
    async fn count_matches_for_team(&self, team_id: i64) -> Result<u64, AppError>;

    async fn create_event(
        &self,
        match_id: i64,
        request: &MatchEventRequest,
    ) -> Result<MatchEventModel, AppError>;
    async fn get_event(&self, event_id: i64) -> Result<Option<MatchEventModel>, AppError>;
    /// Events of one match ordered by minute then added time
    async fn list_events(&self, match_id: i64) -> Result<Vec<MatchEventModel>, AppError>;
    async fn list_events_for_matches(
        &self,
        match_ids: &[i64],
    ) -> Result<Vec<MatchEventModel>, AppError>;
    async fn delete_event(&self, event_id: i64) -> Result<bool, AppError>;
    /// Events naming the player as the primary actor (assists excluded)
    async fn count_events_for_player(&self, player_id: i64) -> Result<u64, AppError>;
    async fn clear_assists_for_player(&self, player_id: i64) -> Result<u64, AppError>;
}

#[derive(Debug, Default)]
struct MatchTables {
    matches: BTreeMap<i64, MatchModel>,
    events: BTreeMap<i64, MatchEventModel>,
    next_match_id: i64,
    next_event_id: i64,
}

/// In-memory implementation of MatchRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryMatchRepository {
    tables: RwLock<MatchTables>,
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_request(fixture: &mut MatchModel, request: &MatchRequest) {
    fixture.league_id = request.league_id;
    fixture.group_id = request.group_id;
    fixture.home_team_id = request.home_team_id;
    fixture.away_team_id = request.away_team_id;
    fixture.scheduled_at = request.scheduled_at;
    fixture.venue = request.venue.clone();
    fixture.matchday = request.matchday;
    fixture.status = request.status;
    fixture.home_score = request.home_score;
    fixture.away_score = request.away_score;
    fixture.home_halftime_score = request.home_halftime_score;
    fixture.away_halftime_score = request.away_halftime_score;
    fixture.attendance = request.attendance;
    fixture.notes = request.notes.clone();
}

fn sort_events(events: &mut [MatchEventModel]) {
    events.sort_by(|a, b| {
        a.minute
            .cmp(&b.minute)
            .then(a.additional_time.cmp(&b.additional_time))
            .then(a.id.cmp(&b.id))
    });
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    #[instrument(skip(self, request))]
    async fn create_match(&self, request: &MatchRequest) -> Result<MatchModel, AppError> {
        let mut tables = self.tables.write().await;
        tables.next_match_id += 1;

        let now = Utc::now();
        let mut fixture = MatchModel {
            id: tables.next_match_id,
            league_id: request.league_id,
            group_id: None,
            home_team_id: request.home_team_id,
            away_team_id: request.away_team_id,
            scheduled_at: request.scheduled_at,
            venue: None,
            matchday: None,
            status: request.status,
            home_score: None,
            away_score: None,
            home_halftime_score: None,
            away_halftime_score: None,
            attendance: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        apply_request(&mut fixture, request);
        tables.matches.insert(fixture.id, fixture.clone());

        debug!(match_id = fixture.id, "Match created in memory");
        Ok(fixture)
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: i64) -> Result<Option<MatchModel>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.matches.get(&match_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchModel>, AppError> {
        let tables = self.tables.read().await;
        let mut matches: Vec<MatchModel> = tables
            .matches
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
        Ok(matches)
    }

    #[instrument(skip(self, request))]
    async fn update_match(
        &self,
        match_id: i64,
        request: &MatchRequest,
    ) -> Result<Option<MatchModel>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(fixture) = tables.matches.get_mut(&match_id) else {
            return Ok(None);
        };
        apply_request(fixture, request);
        fixture.updated_at = Utc::now();
        Ok(Some(fixture.clone()))
    }

    #[instrument(skip(self))]
    async fn delete_match(&self, match_id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.matches.remove(&match_id).is_none() {
            return Ok(false);
        }
        tables.events.retain(|_, e| e.match_id != match_id);
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn delete_matches_for_league(&self, league_id: i64) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let doomed: Vec<i64> = tables
            .matches
            .values()
            .filter(|m| m.league_id == league_id)
            .map(|m| m.id)
            .collect();

        for id in &doomed {
            tables.matches.remove(id);
        }
        tables.events.retain(|_, e| !doomed.contains(&e.match_id));

        debug!(league_id, removed = doomed.len(), "League matches removed from memory");
        Ok(doomed.len() as u64)
    }

    #[instrument(skip(self))]
    async fn count_matches_for_team(&self, team_id: i64) -> Result<u64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.matches.values().filter(|m| m.involves(team_id)).count() as u64)
    }

    #[instrument(skip(self, request))]
    async fn create_event(
        &self,
        match_id: i64,
        request: &MatchEventRequest,
    ) -> Result<MatchEventModel, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.matches.contains_key(&match_id) {
            return Err(AppError::NotFound(format!("Match {match_id} not found")));
        }
        tables.next_event_id += 1;

        let event = MatchEventModel {
            id: tables.next_event_id,
            match_id,
            player_id: request.player_id,
            team_id: request.team_id,
            event_type: request.event_type,
            minute: request.minute,
            additional_time: request.additional_time,
            assist_player_id: request.assist_player_id,
            notes: request.notes.clone(),
            created_at: Utc::now(),
        };
        tables.events.insert(event.id, event.clone());

        debug!(event_id = event.id, match_id, "Match event created in memory");
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn get_event(&self, event_id: i64) -> Result<Option<MatchEventModel>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.events.get(&event_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_events(&self, match_id: i64) -> Result<Vec<MatchEventModel>, AppError> {
        let tables = self.tables.read().await;
        let mut events: Vec<MatchEventModel> = tables
            .events
            .values()
            .filter(|e| e.match_id == match_id)
            .cloned()
            .collect();
        sort_events(&mut events);
        Ok(events)
    }

    #[instrument(skip(self, match_ids), fields(matches = match_ids.len()))]
    async fn list_events_for_matches(
        &self,
        match_ids: &[i64],
    ) -> Result<Vec<MatchEventModel>, AppError> {
        let tables = self.tables.read().await;
        let mut events: Vec<MatchEventModel> = tables
            .events
            .values()
            .filter(|e| match_ids.contains(&e.match_id))
            .cloned()
            .collect();
        sort_events(&mut events);
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, event_id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.events.remove(&event_id).is_some())
    }

    #[instrument(skip(self))]
    async fn count_events_for_player(&self, player_id: i64) -> Result<u64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .values()
            .filter(|e| e.player_id == player_id)
            .count() as u64)
    }

    #[instrument(skip(self))]
    async fn clear_assists_for_player(&self, player_id: i64) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let mut cleared = 0;
        for event in tables.events.values_mut() {
            if event.assist_player_id == Some(player_id) {
                event.assist_player_id = None;
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}

/// PostgreSQL implementation of match repository
pub struct PostgresMatchRepository {
    pool: PgPool,
}

impl PostgresMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MATCH_COLUMNS: &str = "id, league_id, group_id, home_team_id, away_team_id, scheduled_at, \
     venue, matchday, status, home_score, away_score, home_halftime_score, away_halftime_score, \
     attendance, notes, created_at, updated_at";

const EVENT_COLUMNS: &str = "id, match_id, player_id, team_id, event_type, minute, \
     additional_time, assist_player_id, notes, created_at";

fn match_from_row(row: &PgRow) -> Result<MatchModel, AppError> {
    let status: String = row.get("status");
    Ok(MatchModel {
        id: row.get("id"),
        league_id: row.get("league_id"),
        group_id: row.get("group_id"),
        home_team_id: row.get("home_team_id"),
        away_team_id: row.get("away_team_id"),
        scheduled_at: row.get("scheduled_at"),
        venue: row.get("venue"),
        matchday: row.get("matchday"),
        status: parse_column("status", &status)?,
        home_score: row.get("home_score"),
        away_score: row.get("away_score"),
        home_halftime_score: row.get("home_halftime_score"),
        away_halftime_score: row.get("away_halftime_score"),
        attendance: row.get("attendance"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn event_from_row(row: &PgRow) -> Result<MatchEventModel, AppError> {
    let event_type: String = row.get("event_type");
    Ok(MatchEventModel {
        id: row.get("id"),
        match_id: row.get("match_id"),
        player_id: row.get("player_id"),
        team_id: row.get("team_id"),
        event_type: parse_column("event_type", &event_type)?,
        minute: row.get("minute"),
        additional_time: row.get("additional_time"),
        assist_player_id: row.get("assist_player_id"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl MatchRepository for PostgresMatchRepository {
    #[instrument(skip(self, request))]
    async fn create_match(&self, request: &MatchRequest) -> Result<MatchModel, AppError> {
        let row = sqlx::query(&format!(
            "INSERT INTO matches (league_id, group_id, home_team_id, away_team_id, scheduled_at, \
             venue, matchday, status, home_score, away_score, home_halftime_score, \
             away_halftime_score, attendance, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {MATCH_COLUMNS}"
        ))
        .bind(request.league_id)
        .bind(request.group_id)
        .bind(request.home_team_id)
        .bind(request.away_team_id)
        .bind(request.scheduled_at)
        .bind(&request.venue)
        .bind(request.matchday)
        .bind(request.status.to_string())
        .bind(request.home_score)
        .bind(request.away_score)
        .bind(request.home_halftime_score)
        .bind(request.away_halftime_score)
        .bind(request.attendance)
        .bind(&request.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("create_match", e))?;

        match_from_row(&row)
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: i64) -> Result<Option<MatchModel>, AppError> {
        let row = sqlx::query(&format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"))
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("get_match", e))?;

        row.as_ref().map(match_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches \
             WHERE ($1::BIGINT IS NULL OR league_id = $1) \
             AND ($2::BIGINT IS NULL OR group_id = $2) \
             AND ($3::BIGINT IS NULL OR home_team_id = $3 OR away_team_id = $3) \
             AND ($4::TEXT IS NULL OR status = $4) \
             ORDER BY scheduled_at, id"
        ))
        .bind(filter.league_id)
        .bind(filter.group_id)
        .bind(filter.team_id)
        .bind(filter.status.map(|s| s.to_string()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list_matches", e))?;

        rows.iter().map(match_from_row).collect()
    }

    #[instrument(skip(self, request))]
    async fn update_match(
        &self,
        match_id: i64,
        request: &MatchRequest,
    ) -> Result<Option<MatchModel>, AppError> {
        let row = sqlx::query(&format!(
            "UPDATE matches SET league_id = $2, group_id = $3, home_team_id = $4, \
             away_team_id = $5, scheduled_at = $6, venue = $7, matchday = $8, status = $9, \
             home_score = $10, away_score = $11, home_halftime_score = $12, \
             away_halftime_score = $13, attendance = $14, notes = $15, updated_at = now() \
             WHERE id = $1 RETURNING {MATCH_COLUMNS}"
        ))
        .bind(match_id)
        .bind(request.league_id)
        .bind(request.group_id)
        .bind(request.home_team_id)
        .bind(request.away_team_id)
        .bind(request.scheduled_at)
        .bind(&request.venue)
        .bind(request.matchday)
        .bind(request.status.to_string())
        .bind(request.home_score)
        .bind(request.away_score)
        .bind(request.home_halftime_score)
        .bind(request.away_halftime_score)
        .bind(request.attendance)
        .bind(&request.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("update_match", e))?;

        row.as_ref().map(match_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_match(&self, match_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_match", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_matches_for_league(&self, league_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM matches WHERE league_id = $1")
            .bind(league_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_matches_for_league", e))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn count_matches_for_team(&self, team_id: i64) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM matches WHERE home_team_id = $1 OR away_team_id = $1",
        )
        .bind(team_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("count_matches_for_team", e))?;

        Ok(count as u64)
    }

    #[instrument(skip(self, request))]
    async fn create_event(
        &self,
        match_id: i64,
        request: &MatchEventRequest,
    ) -> Result<MatchEventModel, AppError> {
        let row = sqlx::query(&format!(
            "INSERT INTO match_events (match_id, player_id, team_id, event_type, minute, \
             additional_time, assist_player_id, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {EVENT_COLUMNS}"
        ))
        .bind(match_id)
        .bind(request.player_id)
        .bind(request.team_id)
        .bind(request.event_type.to_string())
        .bind(request.minute)
        .bind(request.additional_time)
        .bind(request.assist_player_id)
        .bind(&request.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("create_event", e))?;

        event_from_row(&row)
    }

    #[instrument(skip(self))]
    async fn get_event(&self, event_id: i64) -> Result<Option<MatchEventModel>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM match_events WHERE id = $1"
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("get_event", e))?;

        row.as_ref().map(event_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_events(&self, match_id: i64) -> Result<Vec<MatchEventModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM match_events WHERE match_id = $1 \
             ORDER BY minute, additional_time, id"
        ))
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list_events", e))?;

        rows.iter().map(event_from_row).collect()
    }

    #[instrument(skip(self, match_ids), fields(matches = match_ids.len()))]
    async fn list_events_for_matches(
        &self,
        match_ids: &[i64],
    ) -> Result<Vec<MatchEventModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM match_events WHERE match_id = ANY($1) \
             ORDER BY minute, additional_time, id"
        ))
        .bind(match_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list_events_for_matches", e))?;

        rows.iter().map(event_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, event_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM match_events WHERE id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_event", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn count_events_for_player(&self, player_id: i64) -> Result<u64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM match_events WHERE player_id = $1")
                .bind(player_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("count_events_for_player", e))?;

        Ok(count as u64)
    }

    #[instrument(skip(self))]
    async fn clear_assists_for_player(&self, player_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE match_events SET assist_player_id = NULL WHERE assist_player_id = $1",
        )
        .bind(player_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("clear_assists_for_player", e))?;

        Ok(result.rows_affected())
    }
}
