use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{GroupModel, LeagueModel},
    repository::LeagueRepository,
    types::{GroupCreateRequest, GroupResponse, LeagueDetailResponse, LeagueRequest},
};
use crate::{
    fixture::repository::MatchRepository,
    player::repository::PlayerRepository,
    shared::{AppError, AppState},
    standings::StandingsService,
    team::repository::TeamRepository,
};

/// Service for leagues and the groups inside them
pub struct LeagueService {
    league_repository: Arc<dyn LeagueRepository + Send + Sync>,
    team_repository: Arc<dyn TeamRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    standings: Arc<StandingsService>,
}

impl LeagueService {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            league_repository: Arc::clone(&state.league_repository),
            team_repository: Arc::clone(&state.team_repository),
            player_repository: Arc::clone(&state.player_repository),
            match_repository: Arc::clone(&state.match_repository),
            standings: Arc::clone(&state.standings),
        }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_league(&self, request: LeagueRequest) -> Result<LeagueModel, AppError> {
        let request = request.validated()?;
        let league = self.league_repository.create_league(&request).await?;

        info!(league_id = league.id, season = %league.season, "League created");
        Ok(league)
    }

    #[instrument(skip(self))]
    pub async fn list_leagues(&self) -> Result<Vec<LeagueModel>, AppError> {
        self.league_repository.list_leagues().await
    }

    /// League together with its groups
    #[instrument(skip(self))]
    pub async fn get_league(&self, league_id: i64) -> Result<LeagueDetailResponse, AppError> {
        let league = self.require_league(league_id).await?;
        let groups = self.league_repository.list_groups(league_id).await?;
        Ok(LeagueDetailResponse { league, groups })
    }

    #[instrument(skip(self, request))]
    pub async fn update_league(
        &self,
        league_id: i64,
        request: LeagueRequest,
    ) -> Result<LeagueModel, AppError> {
        let request = request.validated()?;
        let league = self
            .league_repository
            .update_league(league_id, &request)
            .await?
            .ok_or_else(|| league_not_found(league_id))?;

        info!(league_id, status = %league.status, "League updated");
        Ok(league)
    }

    /// Deletes a league with everything under it: matches (and their
    /// events) first, then each group's squads and teams, then the groups.
    #[instrument(skip(self))]
    pub async fn delete_league(&self, league_id: i64) -> Result<(), AppError> {
        self.require_league(league_id).await?;

        let matches = self
            .match_repository
            .delete_matches_for_league(league_id)
            .await?;
        let groups = self.league_repository.list_groups(league_id).await?;
        for group in &groups {
            self.remove_group_contents(group.id).await?;
            self.league_repository.delete_group(group.id).await?;
            self.standings.invalidate(group.id).await;
        }
        self.league_repository.delete_league(league_id).await?;

        info!(
            league_id,
            matches_removed = matches,
            groups_removed = groups.len(),
            "League deleted"
        );
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn create_group(
        &self,
        league_id: i64,
        request: GroupCreateRequest,
    ) -> Result<GroupResponse, AppError> {
        let request = request.validated()?;
        let league = self.require_league(league_id).await?;
        let group = self
            .league_repository
            .create_group(league_id, &request)
            .await?;

        info!(group_id = group.id, league_id, name = %group.name, "Group created");
        Ok(GroupResponse::new(group, &league))
    }

    #[instrument(skip(self))]
    pub async fn list_groups(&self, league_id: i64) -> Result<Vec<GroupModel>, AppError> {
        self.require_league(league_id).await?;
        self.league_repository.list_groups(league_id).await
    }

    #[instrument(skip(self))]
    pub async fn get_group(&self, group_id: i64) -> Result<GroupResponse, AppError> {
        let group = self.require_group(group_id).await?;
        let league = self.require_league(group.league_id).await?;
        Ok(GroupResponse::new(group, &league))
    }

    /// Deletes a group and its teams, unless one of them has played or is
    /// scheduled to play a match.
    #[instrument(skip(self))]
    pub async fn delete_group(&self, group_id: i64) -> Result<(), AppError> {
        self.require_group(group_id).await?;

        let teams = self.team_repository.list_teams(Some(group_id)).await?;
        for team in &teams {
            if self.match_repository.count_matches_for_team(team.id).await? > 0 {
                warn!(group_id, team_id = team.id, "Group delete blocked by fixtures");
                return Err(AppError::Conflict(format!(
                    "Group {group_id} cannot be deleted: team '{}' is referenced by matches",
                    team.name
                )));
            }
        }

        self.remove_group_contents(group_id).await?;
        self.league_repository.delete_group(group_id).await?;
        self.standings.invalidate(group_id).await;

        info!(group_id, teams_removed = teams.len(), "Group deleted");
        Ok(())
    }

    async fn remove_group_contents(&self, group_id: i64) -> Result<(), AppError> {
        for team in self.team_repository.list_teams(Some(group_id)).await? {
            let players = self
                .player_repository
                .delete_players_for_team(team.id)
                .await?;
            self.team_repository.delete_team(team.id).await?;
            debug!(team_id = team.id, players_removed = players, "Team removed");
        }
        Ok(())
    }

    async fn require_league(&self, league_id: i64) -> Result<LeagueModel, AppError> {
        self.league_repository
            .get_league(league_id)
            .await?
            .ok_or_else(|| league_not_found(league_id))
    }

    async fn require_group(&self, group_id: i64) -> Result<GroupModel, AppError> {
        self.league_repository
            .get_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {group_id} not found")))
    }
}

fn league_not_found(league_id: i64) -> AppError {
    AppError::NotFound(format!("League {league_id} not found"))
}
