use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    models::TeamModel,
    service::TeamService,
    types::{TeamDetailResponse, TeamQuery, TeamRequest},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for listing teams
///
/// GET /teams?group_id=
#[instrument(name = "list_teams", skip(state))]
pub async fn list_teams(
    State(state): State<AppState>,
    Query(query): Query<TeamQuery>,
) -> Result<Json<Vec<TeamModel>>, AppError> {
    let teams = TeamService::from_state(&state)
        .list_teams(query.group_id)
        .await?;

    info!(team_count = teams.len(), "Teams listed");

    Ok(Json(teams))
}

/// HTTP handler for registering a team in a group
///
/// POST /teams
#[instrument(name = "create_team", skip(state, request))]
pub async fn create_team(
    State(state): State<AppState>,
    Json(request): Json<TeamRequest>,
) -> Result<(StatusCode, Json<TeamModel>), AppError> {
    let team = TeamService::from_state(&state).create_team(request).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// GET /teams/:id
#[instrument(name = "get_team", skip(state))]
pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
) -> Result<Json<TeamDetailResponse>, AppError> {
    let team = TeamService::from_state(&state).get_team(team_id).await?;
    Ok(Json(team))
}

/// PUT /teams/:id
#[instrument(name = "update_team", skip(state, request))]
pub async fn update_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
    Json(request): Json<TeamRequest>,
) -> Result<Json<TeamModel>, AppError> {
    let team = TeamService::from_state(&state)
        .update_team(team_id, request)
        .await?;
    Ok(Json(team))
}

/// DELETE /teams/:id
#[instrument(name = "delete_team", skip(state))]
pub async fn delete_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    TeamService::from_state(&state).delete_team(team_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
