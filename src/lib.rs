// Library crate for the league dashboard service
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod db;
pub mod fixture;
pub mod league;
pub mod player;
pub mod shared;
pub mod standings;
pub mod team;
pub mod validation;

use axum::{
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Re-export commonly used types for easier access in tests
pub use config::{AppConfig, ConfigError};
pub use shared::{AppError, AppState};
pub use standings::{
    compute_table, summarize, CompletedMatch, FormResult, StandingsError, StandingsRow,
    StandingsService, StandingsTable, StandingsTeam,
};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Every route of the HTTP API, bound to the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/leagues",
            get(league::list_leagues).post(league::create_league),
        )
        .route(
            "/leagues/:id",
            get(league::get_league)
                .put(league::update_league)
                .delete(league::delete_league),
        )
        .route(
            "/leagues/:id/groups",
            get(league::list_groups).post(league::create_group),
        )
        .route(
            "/groups/:id",
            get(league::get_group).delete(league::delete_group),
        )
        .route("/groups/:id/standings", get(standings::get_group_standings))
        .route("/groups/:id/scorers", get(standings::get_group_scorers))
        .route("/teams", get(team::list_teams).post(team::create_team))
        .route(
            "/teams/:id",
            get(team::get_team)
                .put(team::update_team)
                .delete(team::delete_team),
        )
        .route(
            "/players",
            get(player::list_players).post(player::create_player),
        )
        .route(
            "/players/:id",
            get(player::get_player)
                .put(player::update_player)
                .delete(player::delete_player),
        )
        .route(
            "/matches",
            get(fixture::list_matches).post(fixture::create_match),
        )
        .route(
            "/matches/:id",
            get(fixture::get_match)
                .put(fixture::update_match)
                .delete(fixture::delete_match),
        )
        .route(
            "/matches/:id/events",
            get(fixture::list_match_events).post(fixture::create_match_event),
        )
        .route("/events/:id", delete(fixture::delete_match_event))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
