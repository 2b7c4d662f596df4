//! Game save operation errors.

use lastplanner_domain::{DomainError, SessionId};
use lastplanner_shared::RequestError;

use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum GameSaveError {
    #[error("No saved game for session {0}")]
    NotFound(SessionId),
    #[error("Invalid game state: {0}")]
    Invalid(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<DomainError> for GameSaveError {
    fn from(error: DomainError) -> Self {
        Self::Invalid(error.to_string())
    }
}

impl From<RequestError> for GameSaveError {
    fn from(error: RequestError) -> Self {
        Self::Invalid(error.to_string())
    }
}
