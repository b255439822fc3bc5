use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::fixture::repository::MatchRepository;
use crate::league::repository::LeagueRepository;
use crate::player::repository::PlayerRepository;
use crate::standings::{StandingsError, StandingsService};
use crate::team::repository::TeamRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub league_repository: Arc<dyn LeagueRepository + Send + Sync>,
    pub team_repository: Arc<dyn TeamRepository + Send + Sync>,
    pub player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    pub match_repository: Arc<dyn MatchRepository + Send + Sync>,
    pub standings: Arc<StandingsService>,
}

impl AppState {
    pub fn new(
        league_repository: Arc<dyn LeagueRepository + Send + Sync>,
        team_repository: Arc<dyn TeamRepository + Send + Sync>,
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        standings_cache: bool,
    ) -> Self {
        let standings = StandingsService::builder(
            Arc::clone(&league_repository),
            Arc::clone(&team_repository),
            Arc::clone(&player_repository),
            Arc::clone(&match_repository),
        )
        .with_cache(standings_cache)
        .build();

        Self {
            league_repository,
            team_repository,
            player_repository,
            match_repository,
            standings: Arc::new(standings),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Standings(#[from] StandingsError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Standings(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
