//! Play Service - gameplay actions on top of the sync layer
//!
//! Each action computes the new state with the pure domain rules, then hands
//! the changed fields to [`GameSyncService::update`] as a patch.

use std::sync::Arc;

use lastplanner_domain::{
    acknowledge_briefing, acknowledge_intro, record_decision, BadgeId, ColumnId, Decision,
    DomainError, GameState, GameStatePatch, PlayerName, ResourceDelta, SessionId, TaskId,
};

use super::GameSyncService;

/// Caller-facing rejections of a gameplay action.
#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    #[error("Column '{column}' is full ({current}/{limit})")]
    CapacityExceeded {
        column: String,
        current: u32,
        limit: u32,
    },
    #[error("No saved game for this session")]
    NoSavedGame,
    #[error("This game has no Kanban board")]
    NoBoard,
    #[error(transparent)]
    Domain(DomainError),
}

impl From<DomainError> for PlayError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::CapacityExceeded {
                column,
                current,
                limit,
            } => Self::CapacityExceeded {
                column,
                current,
                limit,
            },
            other => Self::Domain(other),
        }
    }
}

pub struct PlayService {
    sync: Arc<GameSyncService>,
}

impl PlayService {
    pub fn new(sync: Arc<GameSyncService>) -> Self {
        Self { sync }
    }

    pub async fn resume(&self, session_id: &SessionId) -> Result<GameState, PlayError> {
        self.sync
            .load(session_id)
            .await
            .ok_or(PlayError::NoSavedGame)
    }

    pub async fn start_new_game(&self, session_id: &SessionId, player_name: PlayerName) -> GameState {
        self.sync.new_game(session_id, player_name).await
    }

    /// Move a task on the board. A no-op move returns the state unchanged
    /// without writing.
    pub async fn move_task(
        &self,
        session_id: &SessionId,
        state: &GameState,
        task_id: &TaskId,
        target: &ColumnId,
    ) -> Result<GameState, PlayError> {
        let mut board = state.kanban_state.clone().ok_or(PlayError::NoBoard)?;
        let outcome = board.move_task(task_id, target)?;
        if !outcome.changed() {
            tracing::debug!(task_id = %task_id, ?outcome, "Move left the board unchanged");
            return Ok(state.clone());
        }

        tracing::debug!(task_id = %task_id, column = %target, "Task moved");
        Ok(self
            .sync
            .update_from(session_id, state, &GameStatePatch::kanban(board))
            .await)
    }

    pub async fn acknowledge_intro(&self, session_id: &SessionId, state: &GameState) -> GameState {
        let mut flags = state.flags.clone();
        acknowledge_intro(&mut flags, state.chapter);
        self.sync
            .update_from(session_id, state, &GameStatePatch::flags(flags))
            .await
    }

    pub async fn acknowledge_briefing(
        &self,
        session_id: &SessionId,
        state: &GameState,
    ) -> GameState {
        let mut flags = state.flags.clone();
        acknowledge_briefing(&mut flags, state.chapter, state.day);
        self.sync
            .update_from(session_id, state, &GameStatePatch::flags(flags))
            .await
    }

    /// Mark a decision as made and apply its consequences.
    pub async fn record_decision(
        &self,
        session_id: &SessionId,
        state: &GameState,
        decision: &Decision,
        delta: &ResourceDelta,
    ) -> GameState {
        let mut flags = state.flags.clone();
        record_decision(&mut flags, state.chapter, decision);
        let patch = GameStatePatch {
            flags: Some(flags),
            resources: Some(state.resources.apply(delta)),
            ..GameStatePatch::default()
        };
        self.sync.update_from(session_id, state, &patch).await
    }

    pub async fn advance_day(&self, session_id: &SessionId, state: &GameState) -> GameState {
        let mut next = state.clone();
        next.advance_day();
        self.sync
            .update_from(session_id, state, &GameStatePatch::progress_of(&next))
            .await
    }

    pub async fn complete_chapter(
        &self,
        session_id: &SessionId,
        state: &GameState,
        badge: Option<BadgeId>,
    ) -> GameState {
        let mut next = state.clone();
        next.complete_chapter();
        if let Some(badge) = badge {
            next.unlock_badge(badge);
        }
        let patch = GameStatePatch {
            unlocked_badges: Some(next.unlocked_badges.clone()),
            ..GameStatePatch::progress_of(&next)
        };
        tracing::info!(chapter = state.chapter, "Chapter complete");
        self.sync.update_from(session_id, state, &patch).await
    }

    pub async fn reset(&self, session_id: &SessionId) {
        self.sync.reset(session_id).await
    }
}
