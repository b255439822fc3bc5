use std::sync::Arc;

use league_dashboard::{
    config::AppConfig,
    db,
    fixture::repository::{InMemoryMatchRepository, PostgresMatchRepository},
    league::repository::{InMemoryLeagueRepository, PostgresLeagueRepository},
    player::repository::{InMemoryPlayerRepository, PostgresPlayerRepository},
    router,
    shared::AppState,
    team::repository::{InMemoryTeamRepository, PostgresTeamRepository},
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "league_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting league dashboard server");

    let config = AppConfig::from_env()?;

    let app_state = match &config.database_url {
        Some(database_url) => {
            let pool = db::connect(database_url, config.max_connections).await?;
            info!(max_connections = config.max_connections, "Using PostgreSQL store");
            AppState::new(
                Arc::new(PostgresLeagueRepository::new(pool.clone())),
                Arc::new(PostgresTeamRepository::new(pool.clone())),
                Arc::new(PostgresPlayerRepository::new(pool.clone())),
                Arc::new(PostgresMatchRepository::new(pool)),
                config.standings_cache,
            )
        }
        None => {
            warn!("DATABASE_URL not set, data is kept in memory only");
            AppState::new(
                Arc::new(InMemoryLeagueRepository::new()),
                Arc::new(InMemoryTeamRepository::new()),
                Arc::new(InMemoryPlayerRepository::new()),
                Arc::new(InMemoryMatchRepository::new()),
                config.standings_cache,
            )
        }
    };

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        standings_cache = config.standings_cache,
        "Server listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
