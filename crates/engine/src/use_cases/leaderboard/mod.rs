//! Leaderboard use cases.
//!
//! Submissions are validated, stamped with the server clock and tagged with
//! the caller's account when one is present. Listings are capped at the
//! configured limit.

use std::sync::Arc;

use lastplanner_domain::{DomainError, LeaderboardEntry, UserId};
use lastplanner_shared::{LeaderboardSubmission, RequestError};

use crate::infrastructure::ports::{ClockPort, LeaderboardRepo, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("Invalid submission: {0}")]
    Invalid(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<RequestError> for LeaderboardError {
    fn from(error: RequestError) -> Self {
        Self::Invalid(error.to_string())
    }
}

impl From<DomainError> for LeaderboardError {
    fn from(error: DomainError) -> Self {
        Self::Invalid(error.to_string())
    }
}

pub struct LeaderboardOps {
    repo: Arc<dyn LeaderboardRepo>,
    clock: Arc<dyn ClockPort>,
    limit: u32,
}

impl LeaderboardOps {
    pub fn new(repo: Arc<dyn LeaderboardRepo>, clock: Arc<dyn ClockPort>, limit: u32) -> Self {
        Self { repo, clock, limit }
    }

    pub async fn top(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.repo.list_top(self.limit).await?)
    }

    pub async fn for_chapter(&self, chapter: u32) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        if chapter == 0 {
            return Err(LeaderboardError::Invalid("Chapter must be at least 1".into()));
        }
        Ok(self.repo.list_for_chapter(chapter, self.limit).await?)
    }

    pub async fn submit(
        &self,
        submission: LeaderboardSubmission,
        caller: Option<&UserId>,
    ) -> Result<LeaderboardEntry, LeaderboardError> {
        let player_name = submission.check()?;
        let entry = LeaderboardEntry::new(
            player_name,
            submission.chapter,
            submission.score,
            self.clock.now(),
        )?
        .with_user_id(caller.cloned());

        self.repo.insert(&entry).await?;
        tracing::info!(
            chapter = entry.chapter,
            score = entry.score,
            "Leaderboard entry submitted"
        );
        Ok(entry)
    }

    /// Remove every entry. Returns how many were removed.
    pub async fn clear(&self) -> Result<u64, LeaderboardError> {
        let removed = self.repo.clear().await?;
        tracing::warn!(removed, "Leaderboard cleared");
        Ok(removed)
    }
}
