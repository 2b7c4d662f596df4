//! Remote game service port
//!
//! The remote service is an optional mirror of the local save. Every call can
//! fail; callers decide how a failure degrades.

use async_trait::async_trait;

use lastplanner_domain::{GameState, GameStatePatch, SessionId};
use lastplanner_shared::{SaveGameRequest, UserProfile};

/// Remote call failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// The remote has no record for the requested session.
    #[error("No remote save found")]
    NotFound,
    /// Connection refused, timeout, or another transport failure.
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },
    /// Response body could not be decoded or failed validation.
    #[error("Invalid response: {0}")]
    Validation(String),
    #[error("Not authenticated")]
    NotAuthenticated,
}

impl SyncError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameServicePort: Send + Sync {
    /// The caller's save; `NotFound` when none exists remotely.
    async fn load(&self, session_id: &SessionId) -> Result<GameState, SyncError>;

    /// Full overwrite, creating the record when absent.
    async fn save(&self, request: &SaveGameRequest) -> Result<GameState, SyncError>;

    /// Partial update of an existing record; `NotFound` when absent.
    async fn update(
        &self,
        session_id: &SessionId,
        patch: &GameStatePatch,
    ) -> Result<GameState, SyncError>;

    /// Delete the record. Succeeds when it was already absent.
    async fn reset(&self, session_id: &SessionId) -> Result<(), SyncError>;

    /// The signed-in account; `NotAuthenticated` for anonymous callers.
    async fn profile(&self) -> Result<UserProfile, SyncError>;
}
