//! Request bodies
//!
//! Structural checks (lengths, ranges) use `validator`; board consistency is
//! delegated to the domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::{Validate, ValidationErrors};

use lastplanner_domain::{
    BadgeId, DomainError, FlagSet, GameState, KanbanBoard, PlayerName, Resources, SessionId,
};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid request: {0}")]
    Invalid(String),
}

impl From<ValidationErrors> for RequestError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors.to_string())
    }
}

impl From<DomainError> for RequestError {
    fn from(error: DomainError) -> Self {
        Self::Invalid(error.to_string())
    }
}

/// Full overwrite of a session's save. Everything in `GameState` except the
/// server-owned `id`, `userId` and `lastPlayed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveGameRequest {
    pub session_id: SessionId,
    #[validate(length(min = 1, max = 100))]
    pub player_name: String,
    #[validate(range(min = 1))]
    pub chapter: u32,
    #[validate(range(min = 1))]
    pub week: u32,
    #[validate(range(min = 1))]
    pub day: u32,
    pub resources: Resources,
    #[serde(default)]
    pub flags: FlagSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kanban_state: Option<KanbanBoard>,
    #[serde(default)]
    pub completed_chapters: BTreeSet<u32>,
    #[serde(default)]
    pub unlocked_badges: BTreeSet<BadgeId>,
}

impl SaveGameRequest {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            session_id: state.session_id.clone(),
            player_name: state.player_name.clone(),
            chapter: state.chapter,
            week: state.week,
            day: state.day,
            resources: state.resources,
            flags: state.flags.clone(),
            kanban_state: state.kanban_state.clone(),
            completed_chapters: state.completed_chapters.clone(),
            unlocked_badges: state.unlocked_badges.clone(),
        }
    }

    /// Validate the request, including the player name rules and the board.
    pub fn check(&self) -> Result<(), RequestError> {
        self.validate()?;
        PlayerName::new(self.player_name.as_str())?;
        if let Some(board) = &self.kanban_state {
            board.validate()?;
        }
        Ok(())
    }

    /// Build the state to persist. Identity and ownership are left unset.
    pub fn into_state(self, now: DateTime<Utc>) -> GameState {
        GameState {
            id: None,
            session_id: self.session_id,
            user_id: None,
            player_name: self.player_name.trim().to_string(),
            chapter: self.chapter,
            week: self.week,
            day: self.day,
            resources: self.resources,
            flags: self.flags,
            kanban_state: self.kanban_state,
            completed_chapters: self.completed_chapters,
            unlocked_badges: self.unlocked_badges,
            last_played: now,
        }
    }
}

/// Highest score the leaderboard stores (scores are kept as signed 64-bit).
pub const MAX_SCORE: u64 = i64::MAX as u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSubmission {
    #[validate(length(min = 1, max = 100))]
    pub player_name: String,
    #[validate(range(min = 1))]
    pub chapter: u32,
    #[validate(range(max = MAX_SCORE))]
    pub score: u64,
}

impl LeaderboardSubmission {
    pub fn check(&self) -> Result<PlayerName, RequestError> {
        self.validate()?;
        Ok(PlayerName::new(self.player_name.as_str())?)
    }
}
