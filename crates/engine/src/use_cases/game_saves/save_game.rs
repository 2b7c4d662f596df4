//! Save game use case.
//!
//! Full overwrite keyed by session id. Creates the record when absent and
//! keeps the existing record id otherwise.

use std::sync::Arc;

use lastplanner_domain::{GameState, SaveId, UserId};
use lastplanner_shared::SaveGameRequest;

use crate::infrastructure::ports::{ClockPort, GameRepo};

use super::error::GameSaveError;

pub struct SaveGame {
    repo: Arc<dyn GameRepo>,
    clock: Arc<dyn ClockPort>,
}

impl SaveGame {
    pub fn new(repo: Arc<dyn GameRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    pub async fn execute(
        &self,
        request: SaveGameRequest,
        caller: Option<&UserId>,
    ) -> Result<GameState, GameSaveError> {
        request.check()?;

        let existing = self.repo.get_by_session(&request.session_id).await?;
        let (id, owner) = match existing {
            Some(existing) => (
                existing.id.filter(|id| !id.is_placeholder()).unwrap_or_default(),
                existing.user_id,
            ),
            None => (SaveId::new(), None),
        };

        let state = request
            .into_state(self.clock.now())
            .with_id(id)
            .with_user_id(caller.cloned().or(owner));

        self.repo.save(&state).await?;
        tracing::info!(session_id = %state.session_id, save_id = %id, "Saved game");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::MockGameRepo;
    use chrono::{TimeZone, Utc};
    use lastplanner_domain::{PlayerName, SessionId};

    fn request() -> SaveGameRequest {
        let state = GameState::new_game(
            SessionId::new("s-1").expect("id"),
            PlayerName::new("Alex").expect("name"),
            Utc::now(),
        );
        SaveGameRequest::from_state(&state)
    }

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).single().expect("date"),
        ))
    }

    #[tokio::test]
    async fn when_new_session_assigns_id_and_timestamp() {
        let mut repo = MockGameRepo::new();
        repo.expect_get_by_session().returning(|_| Ok(None));
        repo.expect_save().times(1).returning(|_| Ok(()));

        let clock = clock();
        let expected_time = clock.0;
        let saved = SaveGame::new(Arc::new(repo), clock)
            .execute(request(), None)
            .await
            .expect("save");

        let id = saved.id.expect("assigned id");
        assert!(!id.is_placeholder());
        assert_eq!(saved.last_played, expected_time);
        assert!(saved.user_id.is_none());
    }

    #[tokio::test]
    async fn when_overwriting_keeps_record_id_and_tags_caller() {
        let existing_id = SaveId::new();
        let existing = GameState::blank(SessionId::new("s-1").expect("id"), Utc::now())
            .with_id(existing_id);

        let mut repo = MockGameRepo::new();
        repo.expect_get_by_session()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_save()
            .withf(|state| state.user_id.as_ref().map(UserId::as_str) == Some("acct-1"))
            .times(1)
            .returning(|_| Ok(()));

        let caller = UserId::new("acct-1").expect("id");
        let saved = SaveGame::new(Arc::new(repo), clock())
            .execute(request(), Some(&caller))
            .await
            .expect("save");

        assert_eq!(saved.id, Some(existing_id));
        assert_eq!(saved.chapter, 1);
        assert_eq!(saved.player_name, "Alex");
    }

    #[tokio::test]
    async fn when_request_invalid_nothing_is_written() {
        let mut repo = MockGameRepo::new();
        repo.expect_get_by_session().never();
        repo.expect_save().never();

        let mut bad = request();
        bad.day = 0;
        let result = SaveGame::new(Arc::new(repo), clock()).execute(bad, None).await;

        assert!(matches!(result, Err(GameSaveError::Invalid(_))));
    }
}
