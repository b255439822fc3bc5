use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    models::{MatchEventModel, MatchModel},
    service::MatchService,
    types::{MatchDetailResponse, MatchEventRequest, MatchFilter, MatchRequest},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for listing matches
///
/// GET /matches?league_id=&group_id=&team_id=&status=
/// Returns matches in kick-off order with both teams embedded
#[instrument(name = "list_matches", skip(state))]
pub async fn list_matches(
    State(state): State<AppState>,
    Query(filter): Query<MatchFilter>,
) -> Result<Json<Vec<MatchDetailResponse>>, AppError> {
    let matches = MatchService::from_state(&state).list_matches(filter).await?;

    info!(match_count = matches.len(), "Matches listed");

    Ok(Json(matches))
}

/// HTTP handler for scheduling a match
///
/// POST /matches
#[instrument(name = "create_match", skip(state, request))]
pub async fn create_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<(StatusCode, Json<MatchModel>), AppError> {
    let fixture = MatchService::from_state(&state)
        .create_match(request)
        .await?;
    Ok((StatusCode::CREATED, Json(fixture)))
}

/// GET /matches/:id
#[instrument(name = "get_match", skip(state))]
pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> Result<Json<MatchDetailResponse>, AppError> {
    let fixture = MatchService::from_state(&state).get_match(match_id).await?;
    Ok(Json(fixture))
}

/// HTTP handler for editing a match or recording its result
///
/// PUT /matches/:id
#[instrument(name = "update_match", skip(state, request))]
pub async fn update_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchModel>, AppError> {
    let fixture = MatchService::from_state(&state)
        .update_match(match_id, request)
        .await?;
    Ok(Json(fixture))
}

/// DELETE /matches/:id
#[instrument(name = "delete_match", skip(state))]
pub async fn delete_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    MatchService::from_state(&state)
        .delete_match(match_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /matches/:id/events
#[instrument(name = "list_match_events", skip(state))]
pub async fn list_match_events(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> Result<Json<Vec<MatchEventModel>>, AppError> {
    let events = MatchService::from_state(&state)
        .list_events(match_id)
        .await?;
    Ok(Json(events))
}

/// POST /matches/:id/events
#[instrument(name = "create_match_event", skip(state, request))]
pub async fn create_match_event(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
    Json(request): Json<MatchEventRequest>,
) -> Result<(StatusCode, Json<MatchEventModel>), AppError> {
    let event = MatchService::from_state(&state)
        .create_event(match_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// DELETE /events/:id
#[instrument(name = "delete_match_event", skip(state))]
pub async fn delete_match_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    MatchService::from_state(&state)
        .delete_event(event_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{models::MatchStatus, repository::MatchRepository};
    use crate::shared::test_utils::{seed_group_with_result, AppStateBuilder};
    use axum::{
        body::Body,
        http::Request,
        routing::{delete, get, post},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/matches", post(create_match).get(list_matches))
            .route(
                "/matches/:id",
                get(get_match).put(update_match).delete(delete_match),
            )
            .route(
                "/matches/:id/events",
                post(create_match_event).get(list_match_events),
            )
            .route("/events/:id", delete(delete_match_event))
            .with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_list_matches_filters_by_status() {
        let state = AppStateBuilder::new().build();
        seed_group_with_result(&state).await;

        let request = Request::builder()
            .uri("/matches?status=completed")
            .body(Body::empty())
            .unwrap();
        let response = app(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["home_team"]["name"], "Harbour FC");
        assert_eq!(json[0]["home_score"], 3);

        let request = Request::builder()
            .uri("/matches?status=live")
            .body(Body::empty())
            .unwrap();
        let response = app(state).oneshot(request).await.unwrap();
        let json = body_json(response).await;
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_illegal_status_change_conflicts() {
        let state = AppStateBuilder::new().build();
        seed_group_with_result(&state).await;
        let matches = state
            .match_repository
            .list_matches(&MatchFilter::default())
            .await
            .unwrap();
        let fixture = &matches[0];
        assert_eq!(fixture.status, MatchStatus::Completed);

        let body = serde_json::json!({
            "league_id": fixture.league_id,
            "group_id": fixture.group_id,
            "home_team_id": fixture.home_team_id,
            "away_team_id": fixture.away_team_id,
            "scheduled_at": fixture.scheduled_at,
            "status": "scheduled"
        });
        let request = Request::builder()
            .method("PUT")
            .uri(format!("/matches/{}", fixture.id))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(
            json["error"],
            "Match status cannot change from completed to scheduled"
        );
    }

    #[tokio::test]
    async fn test_create_match_same_teams_rejected() {
        let state = AppStateBuilder::new().build();
        seed_group_with_result(&state).await;

        let body = r#"{
            "league_id": 1,
            "group_id": 1,
            "home_team_id": 1,
            "away_team_id": 1,
            "scheduled_at": "2024-10-01T18:30:00Z"
        }"#;
        let request = Request::builder()
            .method("POST")
            .uri("/matches")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_events_for_missing_match() {
        let state = AppStateBuilder::new().build();

        let request = Request::builder()
            .uri("/matches/12/events")
            .body(Body::empty())
            .unwrap();
        let response = app(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let request = Request::builder()
            .method("DELETE")
            .uri("/events/12")
            .body(Body::empty())
            .unwrap();
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
