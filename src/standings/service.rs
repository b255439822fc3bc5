use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use super::{
    compute_table, compute_top_scorers,
    scorers::{ScorerPlayer, ScoringEvent},
    summarize, ScorerRow, StandingsTable, StandingsTeam,
};
use crate::{
    fixture::{repository::MatchRepository, types::MatchFilter},
    league::repository::LeagueRepository,
    player::repository::PlayerRepository,
    shared::AppError,
    team::repository::TeamRepository,
};

/// Loads a group's teams and completed matches and turns them into tables
pub struct StandingsService {
    league_repository: Arc<dyn LeagueRepository + Send + Sync>,
    team_repository: Arc<dyn TeamRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    cache: Option<Arc<RwLock<TableCache>>>,
}

/// Cached tables plus a per-group generation that every invalidation bumps.
///
/// A table is only stored if its group's generation did not move while it
/// was being computed.
#[derive(Default)]
struct TableCache {
    tables: HashMap<i64, StandingsTable>,
    generations: HashMap<i64, u64>,
}

impl TableCache {
    fn generation(&self, group_id: i64) -> u64 {
        self.generations.get(&group_id).copied().unwrap_or(0)
    }
}

impl StandingsService {
    pub fn builder(
        league_repository: Arc<dyn LeagueRepository + Send + Sync>,
        team_repository: Arc<dyn TeamRepository + Send + Sync>,
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
    ) -> StandingsServiceBuilder {
        StandingsServiceBuilder {
            league_repository,
            team_repository,
            player_repository,
            match_repository,
            cache_enabled: false,
        }
    }

    pub fn caches_tables(&self) -> bool {
        self.cache.is_some()
    }

    /// Current table of a group, recomputed unless a cached copy is held
    #[instrument(skip(self))]
    pub async fn group_table(&self, group_id: i64) -> Result<StandingsTable, AppError> {
        let mut observed_generation = None;
        if let Some(cache) = &self.cache {
            let cache = cache.read().await;
            if let Some(table) = cache.tables.get(&group_id) {
                debug!(group_id, "Serving cached standings");
                return Ok(table.clone());
            }
            observed_generation = Some(cache.generation(group_id));
        }

        self.require_group(group_id).await?;

        let completed_filter = MatchFilter::completed_in_group(group_id);
        let (teams, matches) = futures::try_join!(
            self.team_repository.list_teams(Some(group_id)),
            self.match_repository.list_matches(&completed_filter),
        )?;

        let standings_teams: Vec<StandingsTeam> = teams
            .iter()
            .map(|team| StandingsTeam {
                id: team.id,
                name: team.name.clone(),
                short_name: team.short_name.clone(),
            })
            .collect();
        let completed: Vec<_> = matches.iter().map(|m| m.to_completed()).collect();

        let rows = compute_table(&standings_teams, &completed)?;
        let table = StandingsTable {
            group_id,
            summary: summarize(&rows),
            rows,
        };

        info!(
            group_id,
            teams = table.summary.teams,
            matches = table.summary.matches_played,
            "Standings computed"
        );

        if let (Some(cache), Some(observed)) = (&self.cache, observed_generation) {
            let mut cache = cache.write().await;
            if cache.generation(group_id) == observed {
                cache.tables.insert(group_id, table.clone());
            } else {
                debug!(group_id, "Group changed while computing, table not cached");
            }
        }
        Ok(table)
    }

    /// Goal and assist leaders across a group's completed matches
    #[instrument(skip(self))]
    pub async fn group_scorers(&self, group_id: i64) -> Result<Vec<ScorerRow>, AppError> {
        self.require_group(group_id).await?;

        let completed_filter = MatchFilter::completed_in_group(group_id);
        let (teams, players, matches) = futures::try_join!(
            self.team_repository.list_teams(Some(group_id)),
            self.player_repository.list_players(None),
            self.match_repository.list_matches(&completed_filter),
        )?;

        let team_ids: HashSet<i64> = teams.iter().map(|t| t.id).collect();
        let squad: Vec<ScorerPlayer> = players
            .into_iter()
            .filter(|p| team_ids.contains(&p.team_id))
            .map(|p| ScorerPlayer {
                id: p.id,
                team_id: p.team_id,
                first_name: p.first_name,
                last_name: p.last_name,
            })
            .collect();

        let match_ids: Vec<i64> = matches.iter().map(|m| m.id).collect();
        let events: Vec<ScoringEvent> = self
            .match_repository
            .list_events_for_matches(&match_ids)
            .await?
            .into_iter()
            .filter_map(|event| {
                event.event_type.scoring_kind().map(|kind| ScoringEvent {
                    match_id: event.match_id,
                    player_id: event.player_id,
                    assist_player_id: event.assist_player_id,
                    kind,
                })
            })
            .collect();

        let rows = compute_top_scorers(&squad, &events)?;
        debug!(group_id, scorers = rows.len(), "Top scorers computed");
        Ok(rows)
    }

    /// Drops the cached table of a group and discards any computation of it
    /// that is still in flight
    pub async fn invalidate(&self, group_id: i64) {
        if let Some(cache) = &self.cache {
            let mut cache = cache.write().await;
            *cache.generations.entry(group_id).or_default() += 1;
            if cache.tables.remove(&group_id).is_some() {
                debug!(group_id, "Standings cache invalidated");
            }
        }
    }

    async fn require_group(&self, group_id: i64) -> Result<(), AppError> {
        self.league_repository
            .get_group(group_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Group {group_id} not found")))
    }
}

pub struct StandingsServiceBuilder {
    league_repository: Arc<dyn LeagueRepository + Send + Sync>,
    team_repository: Arc<dyn TeamRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    cache_enabled: bool,
}

impl StandingsServiceBuilder {
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn build(self) -> StandingsService {
        StandingsService {
            league_repository: self.league_repository,
            team_repository: self.team_repository,
            player_repository: self.player_repository,
            match_repository: self.match_repository,
            cache: self
                .cache_enabled
                .then(|| Arc::new(RwLock::new(TableCache::default()))),
        }
    }
}
