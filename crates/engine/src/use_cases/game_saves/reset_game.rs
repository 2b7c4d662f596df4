//! Reset game use case. Deleting an absent save is not an error.

use std::sync::Arc;

use lastplanner_domain::SessionId;

use crate::infrastructure::ports::GameRepo;

use super::error::GameSaveError;

pub struct ResetGame {
    repo: Arc<dyn GameRepo>,
}

impl ResetGame {
    pub fn new(repo: Arc<dyn GameRepo>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, session_id: &SessionId) -> Result<(), GameSaveError> {
        let existed = self.repo.delete_by_session(session_id).await?;
        tracing::info!(session_id = %session_id, existed, "Reset game");
        Ok(())
    }
}
