//! HTTP actions against the in-process router
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::TestSetup;

pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// Id of a freshly created resource; panics with the body otherwise
    pub fn id(&self) -> i64 {
        self.body["id"]
            .as_i64()
            .unwrap_or_else(|| panic!("no id in response {}: {}", self.status, self.body))
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestSetup {
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> ApiResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        ApiResponse { status, body }
    }

    pub async fn get(&self, uri: &str) -> ApiResponse {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> ApiResponse {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> ApiResponse {
        self.send("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> ApiResponse {
        self.send("DELETE", uri, None).await
    }

    pub async fn create_league(&self, name: &str) -> i64 {
        let response = self
            .post(
                "/leagues",
                json!({
                    "name": name,
                    "season": "2024-25",
                    "start_date": "2024-08-01",
                    "end_date": "2025-05-31",
                    "status": "active"
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.id()
    }

    pub async fn create_group(&self, league_id: i64, name: &str) -> i64 {
        let response = self
            .post(&format!("/leagues/{league_id}/groups"), json!({ "name": name }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.id()
    }

    pub async fn create_team(&self, group_id: i64, name: &str) -> i64 {
        let response = self
            .post("/teams", json!({ "group_id": group_id, "name": name }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.id()
    }

    pub async fn create_player(&self, team_id: i64, first: &str, last: &str) -> i64 {
        let response = self
            .post(
                "/players",
                json!({
                    "team_id": team_id,
                    "first_name": first,
                    "last_name": last,
                    "position": "forward"
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.id()
    }

    /// Schedules a group match `day` days into September 2024
    pub async fn schedule_match(
        &self,
        league_id: i64,
        group_id: i64,
        home: i64,
        away: i64,
        day: u32,
    ) -> i64 {
        let response = self
            .post("/matches", fixture_body(league_id, group_id, home, away, day))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.id()
    }

    /// Moves a match to `status` with the given score, keeping everything else
    pub async fn set_status(
        &self,
        match_id: i64,
        status: &str,
        score: Option<(i32, i32)>,
    ) -> ApiResponse {
        let current = self.get(&format!("/matches/{match_id}")).await.body;
        let mut body = json!({
            "league_id": current["league_id"],
            "group_id": current["group_id"],
            "home_team_id": current["home_team_id"],
            "away_team_id": current["away_team_id"],
            "scheduled_at": current["scheduled_at"],
            "status": status,
        });
        if let Some((home, away)) = score {
            body["home_score"] = json!(home);
            body["away_score"] = json!(away);
        }
        self.put(&format!("/matches/{match_id}"), body).await
    }

    pub async fn record_result(&self, match_id: i64, home: i32, away: i32) {
        let response = self
            .set_status(match_id, "completed", Some((home, away)))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    }

    pub async fn log_goal(
        &self,
        match_id: i64,
        team_id: i64,
        player_id: i64,
        assist: Option<i64>,
        minute: i32,
    ) -> ApiResponse {
        self.post(
            &format!("/matches/{match_id}/events"),
            json!({
                "player_id": player_id,
                "team_id": team_id,
                "event_type": "goal",
                "minute": minute,
                "assist_player_id": assist
            }),
        )
        .await
    }

    pub async fn standings(&self, group_id: i64) -> ApiResponse {
        self.get(&format!("/groups/{group_id}/standings")).await
    }
}

pub fn fixture_body(league_id: i64, group_id: i64, home: i64, away: i64, day: u32) -> Value {
    json!({
        "league_id": league_id,
        "group_id": group_id,
        "home_team_id": home,
        "away_team_id": away,
        "scheduled_at": format!("2024-09-{day:02}T15:00:00Z"),
        "matchday": day
    })
}
