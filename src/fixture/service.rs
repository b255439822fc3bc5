use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{MatchEventModel, MatchModel},
    repository::MatchRepository,
    types::{MatchDetailResponse, MatchEventRequest, MatchFilter, MatchRequest, TeamSummary},
};
use crate::{
    league::repository::LeagueRepository,
    player::repository::PlayerRepository,
    shared::{AppError, AppState},
    standings::StandingsService,
    team::{models::TeamModel, repository::TeamRepository},
};

/// Service for fixtures, results and in-match events
pub struct MatchService {
    league_repository: Arc<dyn LeagueRepository + Send + Sync>,
    team_repository: Arc<dyn TeamRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    standings: Arc<StandingsService>,
}

impl MatchService {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            league_repository: Arc::clone(&state.league_repository),
            team_repository: Arc::clone(&state.team_repository),
            player_repository: Arc::clone(&state.player_repository),
            match_repository: Arc::clone(&state.match_repository),
            standings: Arc::clone(&state.standings),
        }
    }

    #[instrument(skip(self, request), fields(home = request.home_team_id, away = request.away_team_id))]
    pub async fn create_match(&self, request: MatchRequest) -> Result<MatchModel, AppError> {
        let request = request.validated()?;
        self.check_references(&request).await?;

        let fixture = self.match_repository.create_match(&request).await?;
        if let Some(group_id) = fixture.group_id {
            self.standings.invalidate(group_id).await;
        }

        info!(match_id = fixture.id, status = %fixture.status, "Match scheduled");
        Ok(fixture)
    }

    /// Matches in kick-off order, each with both teams attached
    #[instrument(skip(self))]
    pub async fn list_matches(
        &self,
        filter: MatchFilter,
    ) -> Result<Vec<MatchDetailResponse>, AppError> {
        let (matches, teams) = futures::try_join!(
            self.match_repository.list_matches(&filter),
            self.team_repository.list_teams(None),
        )?;
        let teams: HashMap<i64, TeamModel> = teams.into_iter().map(|t| (t.id, t)).collect();

        debug!(match_count = matches.len(), "Matches loaded");

        Ok(matches
            .into_iter()
            .map(|fixture| MatchDetailResponse {
                home_team: teams.get(&fixture.home_team_id).map(TeamSummary::from),
                away_team: teams.get(&fixture.away_team_id).map(TeamSummary::from),
                fixture,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get_match(&self, match_id: i64) -> Result<MatchDetailResponse, AppError> {
        let fixture = self.require_match(match_id).await?;
        let (home, away) = futures::try_join!(
            self.team_repository.get_team(fixture.home_team_id),
            self.team_repository.get_team(fixture.away_team_id),
        )?;

        Ok(MatchDetailResponse {
            home_team: home.as_ref().map(TeamSummary::from),
            away_team: away.as_ref().map(TeamSummary::from),
            fixture,
        })
    }

    /// Updates a match, enforcing the status lifecycle. The pairing is
    /// frozen once events have been logged against it.
    #[instrument(skip(self, request))]
    pub async fn update_match(
        &self,
        match_id: i64,
        request: MatchRequest,
    ) -> Result<MatchModel, AppError> {
        let request = request.validated()?;
        let existing = self.require_match(match_id).await?;

        if !existing.status.can_transition_to(request.status) {
            warn!(match_id, from = %existing.status, to = %request.status, "Illegal status change");
            return Err(AppError::Conflict(format!(
                "Match status cannot change from {} to {}",
                existing.status, request.status
            )));
        }

        let pairing_changed = existing.home_team_id != request.home_team_id
            || existing.away_team_id != request.away_team_id;
        if pairing_changed && !self.match_repository.list_events(match_id).await?.is_empty() {
            return Err(AppError::Conflict(format!(
                "Match {match_id} has events; its teams cannot change"
            )));
        }
        self.check_references(&request).await?;

        let fixture = self
            .match_repository
            .update_match(match_id, &request)
            .await?
            .ok_or_else(|| match_not_found(match_id))?;

        for group_id in [existing.group_id, fixture.group_id].into_iter().flatten() {
            self.standings.invalidate(group_id).await;
        }

        info!(match_id, status = %fixture.status, "Match updated");
        Ok(fixture)
    }

    #[instrument(skip(self))]
    pub async fn delete_match(&self, match_id: i64) -> Result<(), AppError> {
        let fixture = self.require_match(match_id).await?;
        self.match_repository.delete_match(match_id).await?;
        if let Some(group_id) = fixture.group_id {
            self.standings.invalidate(group_id).await;
        }

        info!(match_id, "Match deleted");
        Ok(())
    }

    #[instrument(skip(self, request), fields(event_type = %request.event_type))]
    pub async fn create_event(
        &self,
        match_id: i64,
        request: MatchEventRequest,
    ) -> Result<MatchEventModel, AppError> {
        let request = request.validated()?;
        let fixture = self.require_match(match_id).await?;

        if !fixture.status.accepts_events() {
            return Err(AppError::Conflict(format!(
                "Match {match_id} is {}; events can only be logged once it has kicked off",
                fixture.status
            )));
        }
        if !fixture.involves(request.team_id) {
            return Err(AppError::Validation(format!(
                "team_id: team {} is not playing in match {match_id}",
                request.team_id
            )));
        }
        self.require_squad_member("player_id", request.player_id, request.team_id)
            .await?;
        if let Some(assist) = request.assist_player_id {
            self.require_squad_member("assist_player_id", assist, request.team_id)
                .await?;
        }

        let event = self.match_repository.create_event(match_id, &request).await?;

        info!(
            event_id = event.id,
            match_id,
            minute = event.minute,
            "Match event logged"
        );
        Ok(event)
    }

    #[instrument(skip(self))]
    pub async fn list_events(&self, match_id: i64) -> Result<Vec<MatchEventModel>, AppError> {
        self.require_match(match_id).await?;
        self.match_repository.list_events(match_id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_event(&self, event_id: i64) -> Result<(), AppError> {
        if !self.match_repository.delete_event(event_id).await? {
            return Err(AppError::NotFound(format!("Event {event_id} not found")));
        }
        info!(event_id, "Match event deleted");
        Ok(())
    }

    /// League, group and both teams must exist and agree with each other
    async fn check_references(&self, request: &MatchRequest) -> Result<(), AppError> {
        self.league_repository
            .get_league(request.league_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("League {} not found", request.league_id)))?;

        if let Some(group_id) = request.group_id {
            let group = self
                .league_repository
                .get_group(group_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Group {group_id} not found")))?;
            if group.league_id != request.league_id {
                return Err(AppError::Validation(format!(
                    "group_id: group {group_id} does not belong to league {}",
                    request.league_id
                )));
            }
        }

        let (home, away) = futures::try_join!(
            self.team_repository.get_team(request.home_team_id),
            self.team_repository.get_team(request.away_team_id),
        )?;

        for (field, team_id, team) in [
            ("home_team_id", request.home_team_id, home),
            ("away_team_id", request.away_team_id, away),
        ] {
            let team = team.ok_or_else(|| AppError::NotFound(format!("Team {team_id} not found")))?;
            self.check_team_placement(field, &team, request).await?;
        }
        Ok(())
    }

    async fn check_team_placement(
        &self,
        field: &str,
        team: &TeamModel,
        request: &MatchRequest,
    ) -> Result<(), AppError> {
        match request.group_id {
            Some(group_id) if team.group_id != group_id => Err(AppError::Validation(format!(
                "{field}: team '{}' is not in group {group_id}",
                team.name
            ))),
            Some(_) => Ok(()),
            None => {
                let league_id = self
                    .league_repository
                    .get_group(team.group_id)
                    .await?
                    .map(|g| g.league_id);
                if league_id != Some(request.league_id) {
                    return Err(AppError::Validation(format!(
                        "{field}: team '{}' does not play in league {}",
                        team.name, request.league_id
                    )));
                }
                Ok(())
            }
        }
    }

    async fn require_squad_member(
        &self,
        field: &str,
        player_id: i64,
        team_id: i64,
    ) -> Result<(), AppError> {
        let player = self
            .player_repository
            .get_player(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player {player_id} not found")))?;

        if player.team_id != team_id {
            return Err(AppError::Validation(format!(
                "{field}: player {player_id} is not registered to team {team_id}"
            )));
        }
        Ok(())
    }

    async fn require_match(&self, match_id: i64) -> Result<MatchModel, AppError> {
        self.match_repository
            .get_match(match_id)
            .await?
            .ok_or_else(|| match_not_found(match_id))
    }
}

fn match_not_found(match_id: i64) -> AppError {
    AppError::NotFound(format!("Match {match_id} not found"))
}
