//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.

pub mod game_saves;
pub mod leaderboard;

pub use game_saves::{GameSaveError, GameSaveUseCases};
pub use leaderboard::{LeaderboardError, LeaderboardOps};
