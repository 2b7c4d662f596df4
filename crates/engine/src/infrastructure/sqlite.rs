//! SQLite-backed save and leaderboard storage.
//!
//! Saves are stored as the full `GameState` JSON, keyed by session id, with
//! `user_id` and `last_played` lifted into columns for the account lookup.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use lastplanner_domain::{
    GameState, LeaderboardEntry, LeaderboardEntryId, PlayerName, SessionId, UserId,
};

use crate::infrastructure::ports::{GameRepo, LeaderboardRepo, RepoError};

async fn connect(db_path: &str, operation: &'static str) -> Result<SqlitePool, RepoError> {
    SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await
        .map_err(|e| RepoError::database(operation, e))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// =============================================================================
// Game saves
// =============================================================================

pub struct SqliteGameRepo {
    pool: SqlitePool,
}

impl SqliteGameRepo {
    pub async fn new(db_path: &str) -> Result<Self, RepoError> {
        let pool = connect(db_path, "game_saves").await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS game_saves (
                session_id TEXT PRIMARY KEY NOT NULL,
                user_id TEXT,
                state_json TEXT NOT NULL,
                last_played TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("game_saves", e))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_game_saves_user ON game_saves (user_id, last_played)")
            .execute(&pool)
            .await
            .map_err(|e| RepoError::database("game_saves", e))?;

        Ok(Self { pool })
    }

    fn decode(row: SqliteRow) -> Result<GameState, RepoError> {
        let json: String = row
            .try_get("state_json")
            .map_err(|e| RepoError::database("game_saves", e))?;
        serde_json::from_str(&json).map_err(RepoError::serialization)
    }
}

#[async_trait]
impl GameRepo for SqliteGameRepo {
    async fn get_by_session(&self, session_id: &SessionId) -> Result<Option<GameState>, RepoError> {
        let row = sqlx::query("SELECT state_json FROM game_saves WHERE session_id = ?")
            .bind(session_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("game_saves", e))?;

        row.map(Self::decode).transpose()
    }

    async fn get_latest_for_user(&self, user_id: &UserId) -> Result<Option<GameState>, RepoError> {
        let row = sqlx::query(
            "SELECT state_json FROM game_saves WHERE user_id = ? ORDER BY last_played DESC LIMIT 1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("game_saves", e))?;

        row.map(Self::decode).transpose()
    }

    async fn save(&self, state: &GameState) -> Result<(), RepoError> {
        let json = serde_json::to_string(state).map_err(RepoError::serialization)?;

        sqlx::query(
            r#"
            INSERT INTO game_saves (session_id, user_id, state_json, last_played)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(session_id) DO UPDATE SET
                user_id = excluded.user_id,
                state_json = excluded.state_json,
                last_played = excluded.last_played
            "#,
        )
        .bind(state.session_id.as_str())
        .bind(state.user_id.as_ref().map(UserId::as_str))
        .bind(json)
        .bind(timestamp(state.last_played))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("game_saves", e))?;

        Ok(())
    }

    async fn delete_by_session(&self, session_id: &SessionId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM game_saves WHERE session_id = ?")
            .bind(session_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("game_saves", e))?;
        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Leaderboard
// =============================================================================

pub struct SqliteLeaderboardRepo {
    pool: SqlitePool,
}

impl SqliteLeaderboardRepo {
    pub async fn new(db_path: &str) -> Result<Self, RepoError> {
        let pool = connect(db_path, "leaderboard").await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leaderboard (
                id TEXT PRIMARY KEY NOT NULL,
                player_name TEXT NOT NULL,
                chapter INTEGER NOT NULL,
                score INTEGER NOT NULL,
                user_id TEXT,
                submitted_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("leaderboard", e))?;

        Ok(Self { pool })
    }

    fn decode(row: SqliteRow) -> Result<LeaderboardEntry, RepoError> {
        let column = |e: sqlx::Error| RepoError::database("leaderboard", e);

        let id: String = row.try_get("id").map_err(column)?;
        let player_name: String = row.try_get("player_name").map_err(column)?;
        let chapter: i64 = row.try_get("chapter").map_err(column)?;
        let score: i64 = row.try_get("score").map_err(column)?;
        let user_id: Option<String> = row.try_get("user_id").map_err(column)?;
        let submitted_at: String = row.try_get("submitted_at").map_err(column)?;

        Ok(LeaderboardEntry {
            id: LeaderboardEntryId::from_uuid(
                Uuid::parse_str(&id).map_err(RepoError::serialization)?,
            ),
            player_name: PlayerName::new(player_name).map_err(RepoError::serialization)?,
            chapter: u32::try_from(chapter).map_err(RepoError::serialization)?,
            score: u64::try_from(score).map_err(RepoError::serialization)?,
            user_id: user_id
                .map(UserId::new)
                .transpose()
                .map_err(RepoError::serialization)?,
            submitted_at: DateTime::parse_from_rfc3339(&submitted_at)
                .map_err(RepoError::serialization)?
                .with_timezone(&Utc),
        })
    }

    async fn fetch_ranked(
        &self,
        chapter: Option<u32>,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, RepoError> {
        let mut sql = String::from(
            "SELECT id, player_name, chapter, score, user_id, submitted_at FROM leaderboard",
        );
        if chapter.is_some() {
            sql.push_str(" WHERE chapter = ?");
        }
        sql.push_str(" ORDER BY score DESC, submitted_at ASC LIMIT ?");

        let mut query = sqlx::query(&sql);
        if let Some(chapter) = chapter {
            query = query.bind(i64::from(chapter));
        }
        let rows = query
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("leaderboard", e))?;

        rows.into_iter().map(Self::decode).collect()
    }
}

#[async_trait]
impl LeaderboardRepo for SqliteLeaderboardRepo {
    async fn list_top(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, RepoError> {
        self.fetch_ranked(None, limit).await
    }

    async fn list_for_chapter(
        &self,
        chapter: u32,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, RepoError> {
        self.fetch_ranked(Some(chapter), limit).await
    }

    async fn insert(&self, entry: &LeaderboardEntry) -> Result<(), RepoError> {
        let score = i64::try_from(entry.score).map_err(RepoError::serialization)?;

        sqlx::query(
            r#"
            INSERT INTO leaderboard (id, player_name, chapter, score, user_id, submitted_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.player_name.as_str())
        .bind(i64::from(entry.chapter))
        .bind(score)
        .bind(entry.user_id.as_ref().map(UserId::as_str))
        .bind(timestamp(entry.submitted_at))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("leaderboard", e))?;

        Ok(())
    }

    async fn clear(&self) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM leaderboard")
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("leaderboard", e))?;
        Ok(result.rows_affected())
    }
}
