//! Leaderboard entries submitted at the end of a chapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{LeaderboardEntryId, UserId};
use crate::value_objects::PlayerName;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: LeaderboardEntryId,
    pub player_name: PlayerName,
    pub chapter: u32,
    pub score: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub submitted_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    pub fn new(
        player_name: PlayerName,
        chapter: u32,
        score: u64,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if chapter == 0 {
            return Err(DomainError::validation("Chapter must be at least 1"));
        }
        Ok(Self {
            id: LeaderboardEntryId::new(),
            player_name,
            chapter,
            score,
            user_id: None,
            submitted_at,
        })
    }

    pub fn with_user_id(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }
}

/// Highest score first; ties go to the earlier submission.
pub fn rank_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.submitted_at.cmp(&b.submitted_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn entry(name: &str, score: u64, minutes: i64) -> LeaderboardEntry {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single().expect("valid date");
        LeaderboardEntry::new(
            PlayerName::new(name).expect("valid name"),
            1,
            score,
            base + Duration::minutes(minutes),
        )
        .expect("valid entry")
    }

    #[test]
    fn chapter_zero_is_rejected() {
        let name = PlayerName::new("Ana").expect("valid name");
        assert!(LeaderboardEntry::new(name, 0, 10, Utc::now()).is_err());
    }

    #[test]
    fn ranking_orders_by_score_then_submission_time() {
        let mut entries = vec![entry("late", 80, 10), entry("top", 95, 5), entry("early", 80, 1)];
        rank_entries(&mut entries);
        let names: Vec<_> = entries.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["top", "early", "late"]);
    }
}
