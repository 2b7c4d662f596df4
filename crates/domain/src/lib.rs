//! LastPlanner domain: game state, Kanban rules and flag-gated progression.
//!
//! Pure types with no I/O. Both the engine (server) and the player (client)
//! depend on this crate.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod progression;
pub mod value_objects;

pub use aggregates::{GameState, GameStatePatch, DAYS_PER_WEEK};
pub use entities::{
    rank_entries, Column, Difficulty, KanbanBoard, LeaderboardEntry, MoveOutcome, Task,
};
pub use error::DomainError;
pub use ids::{BadgeId, ColumnId, LeaderboardEntryId, SaveId, SessionId, TaskId, UserId};
pub use progression::{
    acknowledge_briefing, acknowledge_intro, eligible_briefing, eligible_decisions,
    eligible_intro, record_decision, Briefing, ChapterScript, ContentGate, DayConfig, Decision,
    GateContext,
};
pub use value_objects::{flag_keys, FlagSet, Percentage, PlayerName, ResourceDelta, Resources};
