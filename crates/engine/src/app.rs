//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    config::{ServerConfig, StorageBackend},
    memory::{InMemoryGameRepo, InMemoryLeaderboardRepo},
    ports::{ClockPort, GameRepo, LeaderboardRepo, RepoError},
    sqlite::{SqliteGameRepo, SqliteLeaderboardRepo},
};
use crate::use_cases::{GameSaveUseCases, LeaderboardOps};

/// Main application state.
///
/// Holds the repositories and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Port traits injected directly.
pub struct Repositories {
    pub games: Arc<dyn GameRepo>,
    pub leaderboard: Arc<dyn LeaderboardRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub games: GameSaveUseCases,
    pub leaderboard: Arc<LeaderboardOps>,
}

impl App {
    pub fn new(
        games: Arc<dyn GameRepo>,
        leaderboard: Arc<dyn LeaderboardRepo>,
        clock: Arc<dyn ClockPort>,
        leaderboard_limit: u32,
    ) -> Self {
        let use_cases = UseCases {
            games: GameSaveUseCases::new(games.clone(), clock.clone()),
            leaderboard: Arc::new(LeaderboardOps::new(
                leaderboard.clone(),
                clock,
                leaderboard_limit,
            )),
        };

        Self {
            repositories: Repositories { games, leaderboard },
            use_cases,
        }
    }

    /// Application backed by in-memory repositories and the system clock.
    pub fn in_memory(leaderboard_limit: u32) -> Self {
        Self::new(
            Arc::new(InMemoryGameRepo::new()),
            Arc::new(InMemoryLeaderboardRepo::new()),
            Arc::new(SystemClock),
            leaderboard_limit,
        )
    }

    /// Build the application for the configured storage backend.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, RepoError> {
        match &config.storage {
            StorageBackend::Memory => {
                tracing::warn!("GAME_DB=memory, saves will not survive a restart");
                Ok(Self::in_memory(config.leaderboard_limit))
            }
            StorageBackend::Sqlite(path) => {
                tracing::info!(path = %path, "Opening SQLite game database");
                let games = Arc::new(SqliteGameRepo::new(path).await?);
                let leaderboard = Arc::new(SqliteLeaderboardRepo::new(path).await?);
                Ok(Self::new(
                    games,
                    leaderboard,
                    Arc::new(SystemClock),
                    config.leaderboard_limit,
                ))
            }
        }
    }
}
