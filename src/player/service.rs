use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{models::PlayerModel, repository::PlayerRepository, types::PlayerRequest};
use crate::{
    fixture::repository::MatchRepository,
    shared::{AppError, AppState},
    team::repository::TeamRepository,
};

/// Service for squad management
pub struct PlayerService {
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    team_repository: Arc<dyn TeamRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
}

impl PlayerService {
    pub fn new(
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
        team_repository: Arc<dyn TeamRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
    ) -> Self {
        Self {
            player_repository,
            team_repository,
            match_repository,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::clone(&state.player_repository),
            Arc::clone(&state.team_repository),
            Arc::clone(&state.match_repository),
        )
    }

    #[instrument(skip(self, request), fields(team_id = request.team_id))]
    pub async fn create_player(&self, request: PlayerRequest) -> Result<PlayerModel, AppError> {
        let request = request.validated()?;
        self.require_team(request.team_id).await?;
        self.ensure_free_jersey(&request, None).await?;

        let player = self.player_repository.create_player(&request).await?;

        info!(player_id = player.id, name = %player.full_name(), "Player registered");
        Ok(player)
    }

    #[instrument(skip(self))]
    pub async fn list_players(&self, team_id: Option<i64>) -> Result<Vec<PlayerModel>, AppError> {
        self.player_repository.list_players(team_id).await
    }

    #[instrument(skip(self))]
    pub async fn get_player(&self, player_id: i64) -> Result<PlayerModel, AppError> {
        self.player_repository
            .get_player(player_id)
            .await?
            .ok_or_else(|| player_not_found(player_id))
    }

    /// Updates a player. A transfer to another team is refused once the
    /// player has match events, since those record the old team.
    #[instrument(skip(self, request))]
    pub async fn update_player(
        &self,
        player_id: i64,
        request: PlayerRequest,
    ) -> Result<PlayerModel, AppError> {
        let request = request.validated()?;
        let existing = self.get_player(player_id).await?;
        self.require_team(request.team_id).await?;

        if existing.team_id != request.team_id
            && self
                .match_repository
                .count_events_for_player(player_id)
                .await?
                > 0
        {
            warn!(player_id, "Transfer blocked by match events");
            return Err(AppError::Conflict(format!(
                "Player {player_id} has match events and cannot change team"
            )));
        }
        self.ensure_free_jersey(&request, Some(player_id)).await?;

        let player = self
            .player_repository
            .update_player(player_id, &request)
            .await?
            .ok_or_else(|| player_not_found(player_id))?;

        info!(player_id, status = %player.status, "Player updated");
        Ok(player)
    }

    /// Deletes a player who is not the subject of any match event. Assists
    /// credited to the player are cleared.
    #[instrument(skip(self))]
    pub async fn delete_player(&self, player_id: i64) -> Result<(), AppError> {
        self.get_player(player_id).await?;

        let events = self
            .match_repository
            .count_events_for_player(player_id)
            .await?;
        if events > 0 {
            warn!(player_id, events, "Player delete blocked by match events");
            return Err(AppError::Conflict(format!(
                "Player {player_id} is referenced by {events} match event(s)"
            )));
        }

        let cleared = self
            .match_repository
            .clear_assists_for_player(player_id)
            .await?;
        debug!(player_id, cleared, "Assists cleared");

        self.player_repository.delete_player(player_id).await?;
        info!(player_id, "Player deleted");
        Ok(())
    }

    async fn ensure_free_jersey(
        &self,
        request: &PlayerRequest,
        exclude: Option<i64>,
    ) -> Result<(), AppError> {
        let Some(number) = request.jersey_number else {
            return Ok(());
        };

        let taken = self
            .player_repository
            .list_players(Some(request.team_id))
            .await?
            .into_iter()
            .any(|p| Some(p.id) != exclude && p.jersey_number == Some(number));

        if taken {
            return Err(AppError::Conflict(format!(
                "Jersey number {number} is already taken in team {}",
                request.team_id
            )));
        }
        Ok(())
    }

    async fn require_team(&self, team_id: i64) -> Result<(), AppError> {
        self.team_repository
            .get_team(team_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Team {team_id} not found")))
    }
}

fn player_not_found(player_id: i64) -> AppError {
    AppError::NotFound(format!("Player {player_id} not found"))
}
