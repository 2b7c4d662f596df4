//! Repository port traits for persistence.

use async_trait::async_trait;
use lastplanner_domain::{GameState, LeaderboardEntry, SessionId, UserId};

use super::error::RepoError;

// =============================================================================
// Game Saves
// =============================================================================

/// One record per session id. A record may additionally be tagged with the
/// account that last wrote it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepo: Send + Sync {
    async fn get_by_session(&self, session_id: &SessionId) -> Result<Option<GameState>, RepoError>;

    /// Most recently played save tagged with this account.
    async fn get_latest_for_user(&self, user_id: &UserId) -> Result<Option<GameState>, RepoError>;

    /// Insert or replace the record keyed by `state.session_id`.
    async fn save(&self, state: &GameState) -> Result<(), RepoError>;

    /// Returns whether a record existed.
    async fn delete_by_session(&self, session_id: &SessionId) -> Result<bool, RepoError>;
}

// =============================================================================
// Leaderboard
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardRepo: Send + Sync {
    /// Best entries across all chapters, ranked.
    async fn list_top(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, RepoError>;
    async fn list_for_chapter(
        &self,
        chapter: u32,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, RepoError>;
    async fn insert(&self, entry: &LeaderboardEntry) -> Result<(), RepoError>;
    /// Returns the number of removed entries.
    async fn clear(&self) -> Result<u64, RepoError>;
}
