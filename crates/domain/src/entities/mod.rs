//! Domain entities - Core business objects with identity

mod kanban;
mod leaderboard;

pub use kanban::{Column, Difficulty, KanbanBoard, MoveOutcome, Task};
pub use leaderboard::{rank_entries, LeaderboardEntry};
