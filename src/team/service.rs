use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::TeamModel,
    repository::TeamRepository,
    types::{TeamDetailResponse, TeamRequest},
};
use crate::{
    fixture::repository::MatchRepository,
    league::{models::GroupModel, repository::LeagueRepository},
    player::repository::PlayerRepository,
    shared::{AppError, AppState},
    standings::StandingsService,
};

/// Service for team registration and maintenance
pub struct TeamService {
    league_repository: Arc<dyn LeagueRepository + Send + Sync>,
    team_repository: Arc<dyn TeamRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    standings: Arc<StandingsService>,
}

impl TeamService {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            league_repository: Arc::clone(&state.league_repository),
            team_repository: Arc::clone(&state.team_repository),
            player_repository: Arc::clone(&state.player_repository),
            match_repository: Arc::clone(&state.match_repository),
            standings: Arc::clone(&state.standings),
        }
    }

    #[instrument(skip(self, request), fields(name = %request.name, group_id = request.group_id))]
    pub async fn create_team(&self, request: TeamRequest) -> Result<TeamModel, AppError> {
        let request = request.validated()?;
        self.require_group(request.group_id).await?;
        self.ensure_unique_name(&request, None).await?;

        let team = self.team_repository.create_team(&request).await?;
        self.standings.invalidate(team.group_id).await;

        info!(team_id = team.id, "Team created");
        Ok(team)
    }

    #[instrument(skip(self))]
    pub async fn list_teams(&self, group_id: Option<i64>) -> Result<Vec<TeamModel>, AppError> {
        self.team_repository.list_teams(group_id).await
    }

    /// Team with the names of its group and league
    #[instrument(skip(self))]
    pub async fn get_team(&self, team_id: i64) -> Result<TeamDetailResponse, AppError> {
        let team = self.require_team(team_id).await?;
        let group = self.require_group(team.group_id).await?;
        let league = self
            .league_repository
            .get_league(group.league_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("League {} not found", group.league_id)))?;

        Ok(TeamDetailResponse::new(team, &group, &league))
    }

    /// Updates a team. Moving it to another group is refused once the team
    /// appears in any match.
    #[instrument(skip(self, request))]
    pub async fn update_team(
        &self,
        team_id: i64,
        request: TeamRequest,
    ) -> Result<TeamModel, AppError> {
        let request = request.validated()?;
        let existing = self.require_team(team_id).await?;
        self.require_group(request.group_id).await?;

        if existing.group_id != request.group_id
            && self.match_repository.count_matches_for_team(team_id).await? > 0
        {
            warn!(team_id, "Group change blocked by fixtures");
            return Err(AppError::Conflict(format!(
                "Team {team_id} cannot change group while it has matches"
            )));
        }
        self.ensure_unique_name(&request, Some(team_id)).await?;

        let team = self
            .team_repository
            .update_team(team_id, &request)
            .await?
            .ok_or_else(|| team_not_found(team_id))?;

        self.standings.invalidate(existing.group_id).await;
        self.standings.invalidate(team.group_id).await;

        info!(team_id, "Team updated");
        Ok(team)
    }

    /// Deletes a team and its squad. Teams referenced by matches stay.
    #[instrument(skip(self))]
    pub async fn delete_team(&self, team_id: i64) -> Result<(), AppError> {
        let team = self.require_team(team_id).await?;

        let fixtures = self.match_repository.count_matches_for_team(team_id).await?;
        if fixtures > 0 {
            warn!(team_id, fixtures, "Team delete blocked by fixtures");
            return Err(AppError::Conflict(format!(
                "Team {team_id} is referenced by {fixtures} match(es)"
            )));
        }

        let players = self
            .player_repository
            .delete_players_for_team(team_id)
            .await?;
        self.team_repository.delete_team(team_id).await?;
        self.standings.invalidate(team.group_id).await;

        info!(team_id, players_removed = players, "Team deleted");
        Ok(())
    }

    async fn ensure_unique_name(
        &self,
        request: &TeamRequest,
        exclude: Option<i64>,
    ) -> Result<(), AppError> {
        let clash = self
            .team_repository
            .list_teams(Some(request.group_id))
            .await?
            .into_iter()
            .any(|t| Some(t.id) != exclude && t.has_name(&request.name));

        if clash {
            return Err(AppError::Conflict(format!(
                "A team named '{}' already exists in group {}",
                request.name, request.group_id
            )));
        }
        Ok(())
    }

    async fn require_team(&self, team_id: i64) -> Result<TeamModel, AppError> {
        self.team_repository
            .get_team(team_id)
            .await?
            .ok_or_else(|| team_not_found(team_id))
    }

    async fn require_group(&self, group_id: i64) -> Result<GroupModel, AppError> {
        self.league_repository
            .get_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {group_id} not found")))
    }
}

fn team_not_found(team_id: i64) -> AppError {
    AppError::NotFound(format!("Team {team_id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{models::MatchStatus, types::MatchRequest};
    use crate::league::types::GroupCreateRequest;
    use crate::shared::test_utils::{league_request, team_request, AppStateBuilder};
    use chrono::Utc;

    async fn two_groups(state: &AppState) -> (i64, i64, i64) {
        let league = state
            .league_repository
            .create_league(&league_request("County League"))
            .await
            .unwrap();
        let mut ids = Vec::new();
        for name in ["North", "South"] {
            let group = state
                .league_repository
                .create_group(
                    league.id,
                    &GroupCreateRequest {
                        name: name.to_string(),
                        description: None,
                    },
                )
                .await
                .unwrap();
            ids.push(group.id);
        }
        (league.id, ids[0], ids[1])
    }

    #[tokio::test]
    async fn test_team_requires_group() {
        let state = AppStateBuilder::new().build();
        let service = TeamService::from_state(&state);

        let result = service.create_team(team_request(5, "Nomads")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_team_name_unique_within_group() {
        let state = AppStateBuilder::new().build();
        let service = TeamService::from_state(&state);
        let (_, north, south) = two_groups(&state).await;

        service.create_team(team_request(north, "Rovers")).await.unwrap();
        let clash = service.create_team(team_request(north, "  rovers ")).await;
        assert!(matches!(clash, Err(AppError::Conflict(_))));

        // same name elsewhere is fine
        service.create_team(team_request(south, "Rovers")).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_can_keep_own_name() {
        let state = AppStateBuilder::new().build();
        let service = TeamService::from_state(&state);
        let (_, north, _) = two_groups(&state).await;

        let team = service.create_team(team_request(north, "Rovers")).await.unwrap();
        let mut change = team_request(north, "Rovers");
        change.coach_name = Some("P. Smith".to_string());

        let updated = service.update_team(team.id, change).await.unwrap();
        assert_eq!(updated.coach_name.as_deref(), Some("P. Smith"));
    }

    #[tokio::test]
    async fn test_team_with_matches_is_pinned() {
        let state = AppStateBuilder::new().build();
        let service = TeamService::from_state(&state);
        let (league_id, north, south) = two_groups(&state).await;

        let a = service.create_team(team_request(north, "Rovers")).await.unwrap();
        let b = service.create_team(team_request(north, "United")).await.unwrap();
        state
            .match_repository
            .create_match(&MatchRequest {
                league_id,
                group_id: Some(north),
                home_team_id: a.id,
                away_team_id: b.id,
                scheduled_at: Utc::now(),
                venue: None,
                matchday: None,
                status: MatchStatus::Scheduled,
                home_score: None,
                away_score: None,
                home_halftime_score: None,
                away_halftime_score: None,
                attendance: None,
                notes: None,
            })
            .await
            .unwrap();

        let moved = service.update_team(a.id, team_request(south, "Rovers")).await;
        assert!(matches!(moved, Err(AppError::Conflict(_))));

        let deleted = service.delete_team(a.id).await;
        assert!(matches!(deleted, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_team_joins_group_and_league() {
        let state = AppStateBuilder::new().build();
        let service = TeamService::from_state(&state);
        let (league_id, north, _) = two_groups(&state).await;

        let team = service.create_team(team_request(north, "Rovers")).await.unwrap();
        let detail = service.get_team(team.id).await.unwrap();

        assert_eq!(detail.group_name, "North");
        assert_eq!(detail.league_id, league_id);
        assert_eq!(detail.league_name, "County League");
    }
}
