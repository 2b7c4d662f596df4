//! Load game use case.
//!
//! An authenticated caller gets the most recent save linked to their account,
//! so progress follows the account across devices. Without an account-linked
//! save the session-keyed record is used.

use std::sync::Arc;

use lastplanner_domain::{GameState, SessionId, UserId};

use crate::infrastructure::ports::GameRepo;

use super::error::GameSaveError;

pub struct LoadGame {
    repo: Arc<dyn GameRepo>,
}

impl LoadGame {
    pub fn new(repo: Arc<dyn GameRepo>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        session_id: &SessionId,
        caller: Option<&UserId>,
    ) -> Result<GameState, GameSaveError> {
        if let Some(user_id) = caller {
            if let Some(state) = self.repo.get_latest_for_user(user_id).await? {
                tracing::debug!(user_id = %user_id, session_id = %state.session_id, "Loaded account-linked save");
                return Ok(state);
            }
        }

        self.repo
            .get_by_session(session_id)
            .await?
            .ok_or_else(|| GameSaveError::NotFound(session_id.clone()))
    }
}
