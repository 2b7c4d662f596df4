//! Application services
//!
//! Services depend on port traits, not concrete infrastructure implementations.

pub mod game_sync_service;
pub mod play_service;

pub use game_sync_service::GameSyncService;
pub use play_service::{PlayError, PlayService};
