//! Aggregates - consistency boundaries persisted as a unit

mod game_state;

pub use game_state::{GameState, GameStatePatch, DAYS_PER_WEEK};
