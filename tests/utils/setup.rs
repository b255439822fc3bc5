use std::sync::Arc;

use axum::Router;

use league_dashboard::{
    fixture::repository::InMemoryMatchRepository,
    league::repository::InMemoryLeagueRepository,
    player::repository::InMemoryPlayerRepository,
    router,
    shared::AppState,
    team::repository::InMemoryTeamRepository,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub state: AppState,
}

pub struct TestSetupBuilder {
    standings_cache: bool,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            standings_cache: true,
        }
    }

    pub fn without_standings_cache(mut self) -> Self {
        self.standings_cache = false;
        self
    }

    pub fn build(self) -> TestSetup {
        let state = AppState::new(
            Arc::new(InMemoryLeagueRepository::new()),
            Arc::new(InMemoryTeamRepository::new()),
            Arc::new(InMemoryPlayerRepository::new()),
            Arc::new(InMemoryMatchRepository::new()),
            self.standings_cache,
        );

        TestSetup {
            app: router(state.clone()),
            state,
        }
    }
}
