use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    models::PlayerModel,
    service::PlayerService,
    types::{PlayerQuery, PlayerRequest},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for listing players
///
/// GET /players?team_id=
#[instrument(name = "list_players", skip(state))]
pub async fn list_players(
    State(state): State<AppState>,
    Query(query): Query<PlayerQuery>,
) -> Result<Json<Vec<PlayerModel>>, AppError> {
    let players = PlayerService::from_state(&state)
        .list_players(query.team_id)
        .await?;

    info!(player_count = players.len(), "Players listed");

    Ok(Json(players))
}

/// POST /players
#[instrument(name = "create_player", skip(state, request))]
pub async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<PlayerRequest>,
) -> Result<(StatusCode, Json<PlayerModel>), AppError> {
    let player = PlayerService::from_state(&state)
        .create_player(request)
        .await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// GET /players/:id
#[instrument(name = "get_player", skip(state))]
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
) -> Result<Json<PlayerModel>, AppError> {
    let player = PlayerService::from_state(&state).get_player(player_id).await?;
    Ok(Json(player))
}

/// PUT /players/:id
#[instrument(name = "update_player", skip(state, request))]
pub async fn update_player(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
    Json(request): Json<PlayerRequest>,
) -> Result<Json<PlayerModel>, AppError> {
    let player = PlayerService::from_state(&state)
        .update_player(player_id, request)
        .await?;
    Ok(Json(player))
}

/// DELETE /players/:id
#[instrument(name = "delete_player", skip(state))]
pub async fn delete_player(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    PlayerService::from_state(&state)
        .delete_player(player_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
