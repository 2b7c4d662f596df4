//! Update game use case.
//!
//! Shallow-merges a patch into an existing session save. Never creates one.

use std::sync::Arc;

use lastplanner_domain::{GameState, GameStatePatch, SessionId, UserId};

use crate::infrastructure::ports::{ClockPort, GameRepo};

use super::error::GameSaveError;

pub struct UpdateGame {
    repo: Arc<dyn GameRepo>,
    clock: Arc<dyn ClockPort>,
}

impl UpdateGame {
    pub fn new(repo: Arc<dyn GameRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    pub async fn execute(
        &self,
        session_id: &SessionId,
        patch: &GameStatePatch,
        caller: Option<&UserId>,
    ) -> Result<GameState, GameSaveError> {
        patch.validate()?;

        let mut state = self
            .repo
            .get_by_session(session_id)
            .await?
            .ok_or_else(|| GameSaveError::NotFound(session_id.clone()))?;

        state.apply_patch(patch);
        state.validate()?;
        state.touch(self.clock.now());
        if let Some(user_id) = caller {
            state.user_id = Some(user_id.clone());
        }

        self.repo.save(&state).await?;
        Ok(state)
    }
}
