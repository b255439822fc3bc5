use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::{ScorerRow, StandingsTable};
use crate::shared::{AppError, AppState};

/// HTTP handler for a group's league table
///
/// GET /groups/:id/standings
#[instrument(name = "get_group_standings", skip(state))]
pub async fn get_group_standings(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Result<Json<StandingsTable>, AppError> {
    let table = state.standings.group_table(group_id).await?;

    info!(group_id, rows = table.rows.len(), "Standings served");

    Ok(Json(table))
}

/// HTTP handler for a group's top scorers
///
/// GET /groups/:id/scorers
#[instrument(name = "get_group_scorers", skip(state))]
pub async fn get_group_scorers(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<ScorerRow>>, AppError> {
    let scorers = state.standings.group_scorers(group_id).await?;
    Ok(Json(scorers))
}
