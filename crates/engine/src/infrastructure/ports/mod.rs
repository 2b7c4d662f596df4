//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Persistence (SQLite or in-memory)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;

pub use error::RepoError;
pub use repos::{GameRepo, LeaderboardRepo};
pub use testing::ClockPort;

#[cfg(test)]
pub use repos::{MockGameRepo, MockLeaderboardRepo};

#[cfg(test)]
pub use testing::MockClockPort;
