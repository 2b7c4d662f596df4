//! In-memory repositories (`GAME_DB=memory`, tests).

use async_trait::async_trait;
use dashmap::DashMap;
use lastplanner_domain::{
    rank_entries, GameState, LeaderboardEntry, LeaderboardEntryId, SessionId, UserId,
};

use crate::infrastructure::ports::{GameRepo, LeaderboardRepo, RepoError};

#[derive(Default)]
pub struct InMemoryGameRepo {
    saves: DashMap<SessionId, GameState>,
}

impl InMemoryGameRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameRepo for InMemoryGameRepo {
    async fn get_by_session(&self, session_id: &SessionId) -> Result<Option<GameState>, RepoError> {
        Ok(self.saves.get(session_id).map(|entry| entry.value().clone()))
    }

    async fn get_latest_for_user(&self, user_id: &UserId) -> Result<Option<GameState>, RepoError> {
        Ok(self
            .saves
            .iter()
            .filter(|entry| entry.user_id.as_ref() == Some(user_id))
            .max_by_key(|entry| entry.last_played)
            .map(|entry| entry.value().clone()))
    }

    async fn save(&self, state: &GameState) -> Result<(), RepoError> {
        self.saves.insert(state.session_id.clone(), state.clone());
        Ok(())
    }

    async fn delete_by_session(&self, session_id: &SessionId) -> Result<bool, RepoError> {
        Ok(self.saves.remove(session_id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryLeaderboardRepo {
    entries: DashMap<LeaderboardEntryId, LeaderboardEntry>,
}

impl InMemoryLeaderboardRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn ranked(&self, chapter: Option<u32>, limit: u32) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .entries
            .iter()
            .filter(|entry| chapter.map_or(true, |c| entry.chapter == c))
            .map(|entry| entry.value().clone())
            .collect();
        rank_entries(&mut entries);
        entries.truncate(limit as usize);
        entries
    }
}

#[async_trait]
impl LeaderboardRepo for InMemoryLeaderboardRepo {
    async fn list_top(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, RepoError> {
        Ok(self.ranked(None, limit))
    }

    async fn list_for_chapter(
        &self,
        chapter: u32,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, RepoError> {
        Ok(self.ranked(Some(chapter), limit))
    }

    async fn insert(&self, entry: &LeaderboardEntry) -> Result<(), RepoError> {
        self.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<u64, RepoError> {
        let removed = self.entries.len() as u64;
        self.entries.clear();
        Ok(removed)
    }
}
