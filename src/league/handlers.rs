use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    models::{GroupModel, LeagueModel},
    service::LeagueService,
    types::{GroupCreateRequest, GroupResponse, LeagueDetailResponse, LeagueRequest},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for listing leagues
///
/// GET /leagues
#[instrument(name = "list_leagues", skip(state))]
pub async fn list_leagues(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeagueModel>>, AppError> {
    let leagues = LeagueService::from_state(&state).list_leagues().await?;

    info!(league_count = leagues.len(), "Leagues listed");

    Ok(Json(leagues))
}

/// HTTP handler for creating a league
///
/// POST /leagues
#[instrument(name = "create_league", skip(state, request))]
pub async fn create_league(
    State(state): State<AppState>,
    Json(request): Json<LeagueRequest>,
) -> Result<(StatusCode, Json<LeagueModel>), AppError> {
    let league = LeagueService::from_state(&state)
        .create_league(request)
        .await?;
    Ok((StatusCode::CREATED, Json(league)))
}

/// GET /leagues/:id
#[instrument(name = "get_league", skip(state))]
pub async fn get_league(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
) -> Result<Json<LeagueDetailResponse>, AppError> {
    let league = LeagueService::from_state(&state).get_league(league_id).await?;
    Ok(Json(league))
}

/// PUT /leagues/:id
#[instrument(name = "update_league", skip(state, request))]
pub async fn update_league(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
    Json(request): Json<LeagueRequest>,
) -> Result<Json<LeagueModel>, AppError> {
    let league = LeagueService::from_state(&state)
        .update_league(league_id, request)
        .await?;
    Ok(Json(league))
}

/// DELETE /leagues/:id
#[instrument(name = "delete_league", skip(state))]
pub async fn delete_league(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    LeagueService::from_state(&state)
        .delete_league(league_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /leagues/:id/groups
#[instrument(name = "list_groups", skip(state))]
pub async fn list_groups(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
) -> Result<Json<Vec<GroupModel>>, AppError> {
    let groups = LeagueService::from_state(&state)
        .list_groups(league_id)
        .await?;
    Ok(Json(groups))
}

/// POST /leagues/:id/groups
#[instrument(name = "create_group", skip(state, request))]
pub async fn create_group(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
    Json(request): Json<GroupCreateRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), AppError> {
    let group = LeagueService::from_state(&state)
        .create_group(league_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /groups/:id
#[instrument(name = "get_group", skip(state))]
pub async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Result<Json<GroupResponse>, AppError> {
    let group = LeagueService::from_state(&state).get_group(group_id).await?;
    Ok(Json(group))
}

/// DELETE /groups/:id
#[instrument(name = "delete_group", skip(state))]
pub async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    LeagueService::from_state(&state)
        .delete_group(group_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
