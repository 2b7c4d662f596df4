//! Game Sync Service - local-first persistence with a best-effort remote mirror
//!
//! Every write lands in local storage before the remote call is attempted, so
//! a remote failure never loses progress and never surfaces as an error.
//! Mutations of the same session are queued behind a per-session lock.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use lastplanner_domain::{GameState, GameStatePatch, PlayerName, SaveId, SessionId};
use lastplanner_shared::{SaveGameRequest, UserProfile};

use crate::application::local_store::LocalGameStore;
use crate::application::reconcile::{reconcile_load, reconcile_write};
use crate::ports::outbound::{ClockPort, GameServicePort, SyncError};

pub struct GameSyncService {
    remote: Arc<dyn GameServicePort>,
    local: LocalGameStore,
    clock: Arc<dyn ClockPort>,
    write_locks: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl GameSyncService {
    pub fn new(
        remote: Arc<dyn GameServicePort>,
        local: LocalGameStore,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            remote,
            local,
            clock,
            write_locks: DashMap::new(),
        }
    }

    fn write_lock(&self, session_id: &SessionId) -> Arc<Mutex<()>> {
        self.write_locks
            .entry(session_id.clone())
            .or_default()
            .value()
            .clone()
    }

    /// Remote save when reachable, otherwise whatever is held locally.
    pub async fn load(&self, session_id: &SessionId) -> Option<GameState> {
        let remote = self.remote.load(session_id).await;
        let local = match &remote {
            Ok(_) => None,
            Err(e) if e.is_not_found() => {
                tracing::debug!(session_id = %session_id, "No remote save, checking local store");
                self.local.get(session_id)
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Remote load failed, using local store");
                self.local.get(session_id)
            }
        };
        reconcile_load(remote, local)
    }

    /// Full overwrite. Returns the remote copy when the mirror succeeded.
    pub async fn save(&self, mut state: GameState) -> GameState {
        let session_id = state.session_id.clone();
        let lock = self.write_lock(&session_id);
        let _guard = lock.lock().await;

        state.touch(self.clock.now());
        if state.id.is_none() {
            state.id = Some(SaveId::placeholder());
        }
        self.local.set(&session_id, &state);

        let remote = self.remote.save(&SaveGameRequest::from_state(&state)).await;
        if let Err(e) = &remote {
            tracing::warn!(session_id = %session_id, error = %e, "Remote save failed, keeping local copy");
        }
        reconcile_write(remote, state)
    }

    /// Shallow-merge a patch into the local copy and mirror only the patch.
    pub async fn update(&self, session_id: &SessionId, patch: &GameStatePatch) -> GameState {
        self.merge_and_mirror(session_id, None, patch).await
    }

    /// Like [`update`](Self::update), but when this device holds nothing for
    /// `session_id` the patch is merged into `current`, the state the caller
    /// is already showing (possibly loaded from another device's save).
    pub async fn update_from(
        &self,
        session_id: &SessionId,
        current: &GameState,
        patch: &GameStatePatch,
    ) -> GameState {
        self.merge_and_mirror(session_id, Some(current), patch).await
    }

    async fn merge_and_mirror(
        &self,
        session_id: &SessionId,
        current: Option<&GameState>,
        patch: &GameStatePatch,
    ) -> GameState {
        let lock = self.write_lock(session_id);
        let _guard = lock.lock().await;

        let now = self.clock.now();
        let mut merged = match (self.local.get(session_id), current) {
            (Some(stored), _) => stored,
            (None, Some(current)) => {
                let mut base = current.clone();
                base.session_id = session_id.clone();
                base
            }
            (None, None) => GameState::blank(session_id.clone(), now),
        };
        merged.apply_patch(patch);
        merged.touch(now);
        self.local.set(session_id, &merged);

        let remote = self.remote.update(session_id, patch).await;
        match &remote {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!(session_id = %session_id, "Remote has no save to update, keeping local copy");
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Remote update failed, keeping local copy");
            }
        }
        reconcile_write(remote, merged)
    }

    /// Forget the session locally, then remotely when reachable.
    pub async fn reset(&self, session_id: &SessionId) {
        let lock = self.write_lock(session_id);
        let _guard = lock.lock().await;

        self.local.delete(session_id);
        if let Err(e) = self.remote.reset(session_id).await {
            tracing::warn!(session_id = %session_id, error = %e, "Remote reset failed");
        }
    }

    /// Create and save a fresh playthrough for a new character.
    pub async fn new_game(&self, session_id: &SessionId, player_name: PlayerName) -> GameState {
        let state = GameState::new_game(session_id.clone(), player_name, self.clock.now());
        tracing::info!(session_id = %session_id, "Starting new game");
        self.save(state).await
    }

    pub async fn profile(&self) -> Result<UserProfile, SyncError> {
        self.remote.profile().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::platform::InMemoryStorageProvider;
    use crate::ports::outbound::{MockClockPort, MockGameServicePort};
    use chrono::{TimeZone, Utc};
    use lastplanner_domain::{
        flag_keys, Column, ColumnId, Difficulty, FlagSet, KanbanBoard, ResourceDelta, Task, TaskId,
    };

    fn session() -> SessionId {
        SessionId::new("device-1").expect("id")
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 8, 30, 0).single().expect("date")
    }

    fn offline_remote() -> MockGameServicePort {
        let mut remote = MockGameServicePort::new();
        remote
            .expect_load()
            .returning(|_| Err(SyncError::Network("connection refused".into())));
        remote
            .expect_save()
            .returning(|_| Err(SyncError::Network("connection refused".into())));
        remote
            .expect_update()
            .returning(|_, _| Err(SyncError::Network("connection refused".into())));
        remote
            .expect_reset()
            .returning(|_| Err(SyncError::Network("connection refused".into())));
        remote
    }

    fn service(remote: MockGameServicePort) -> (GameSyncService, LocalGameStore) {
        let local = LocalGameStore::new(Arc::new(InMemoryStorageProvider::new()));
        let service = GameSyncService::new(Arc::new(remote), local.clone(), Arc::new(FixedClock(now())));
        (service, local)
    }

    fn state_at(chapter: u32, day: u32) -> GameState {
        let mut state = GameState::new_game(
            session(),
            PlayerName::new("Ana").expect("name"),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("date"),
        );
        state.chapter = chapter;
        state.day = day;
        state
    }

    #[tokio::test]
    async fn network_failure_on_load_returns_local_state() {
        let (service, local) = service(offline_remote());
        local.set(&session(), &state_at(2, 3));

        let loaded = service.load(&session()).await.expect("local state");
        assert_eq!((loaded.chapter, loaded.day), (2, 3));
    }

    #[tokio::test]
    async fn remote_state_wins_on_load() {
        let mut remote = MockGameServicePort::new();
        remote.expect_load().returning(|_| Ok(state_at(4, 1)));
        let (service, local) = service(remote);
        local.set(&session(), &state_at(2, 3));

        assert_eq!(service.load(&session()).await.map(|s| s.chapter), Some(4));
    }

    #[tokio::test]
    async fn nothing_anywhere_loads_as_none() {
        let mut remote = MockGameServicePort::new();
        remote.expect_load().returning(|_| Err(SyncError::NotFound));
        let (service, _) = service(remote);

        assert!(service.load(&session()).await.is_none());
    }

    fn with_board_and_resources(mut state: GameState) -> GameState {
        let todo = ColumnId::new("todo").expect("column id");
        let mut board = KanbanBoard::new(vec![
            Column::new(todo.clone(), "To do", 3).expect("column"),
            Column::new(ColumnId::new("done").expect("column id"), "Done", 5).expect("column"),
        ]);
        board
            .add_task(
                Task::new(
                    TaskId::new("pour-slab").expect("task id"),
                    "Pour level 2 slab",
                    "concrete",
                    Difficulty::new(3).expect("difficulty"),
                ),
                &todo,
            )
            .expect("add task");
        state.kanban_state = Some(board);
        state.apply_resources(&ResourceDelta {
            morale: -15,
            budget: -12_500,
            ..ResourceDelta::default()
        });
        state.completed_chapters.insert(1);
        state
    }

    #[tokio::test]
    async fn offline_save_then_load_returns_saved_state() {
        let (service, _) = service(offline_remote());
        let original = with_board_and_resources(state_at(2, 2));

        let saved = service.save(original.clone()).await;
        assert_eq!(saved.id, Some(SaveId::placeholder()));
        assert_eq!(saved.last_played, now());

        let loaded = service.load(&session()).await.expect("saved state");
        let mut expected = original;
        expected.id = loaded.id;
        expected.last_played = loaded.last_played;
        assert_eq!(loaded, expected);
    }

    #[tokio::test]
    async fn save_is_stamped_with_the_clock_once() {
        let mut clock = MockClockPort::new();
        clock.expect_now().times(1).returning(now);
        let local = LocalGameStore::new(Arc::new(InMemoryStorageProvider::new()));
        let service = GameSyncService::new(Arc::new(offline_remote()), local.clone(), Arc::new(clock));

        let saved = service.save(state_at(1, 1)).await;

        assert_eq!(saved.last_played, now());
        assert_eq!(local.get(&session()).map(|s| s.last_played), Some(now()));
    }

    #[tokio::test]
    async fn update_from_seeds_an_empty_device_with_the_callers_state() {
        let (service, local) = service(offline_remote());
        let mut elsewhere = state_at(3, 4);
        elsewhere.session_id = SessionId::new("laptop").expect("id");
        let patch = GameStatePatch {
            day: Some(5),
            ..GameStatePatch::default()
        };

        let merged = service.update_from(&session(), &elsewhere, &patch).await;

        assert_eq!(merged.session_id, session());
        assert_eq!((merged.chapter, merged.day), (3, 5));
        assert_eq!(merged.player_name, "Ana");
        assert_eq!(local.get(&session()), Some(merged));
        assert!(local.get(&SessionId::new("laptop").expect("id")).is_none());
    }

    #[tokio::test]
    async fn update_from_prefers_the_stored_copy() {
        let (service, local) = service(offline_remote());
        local.set(&session(), &state_at(2, 2));
        let patch = GameStatePatch {
            week: Some(2),
            ..GameStatePatch::default()
        };

        let merged = service.update_from(&session(), &state_at(7, 1), &patch).await;
        assert_eq!((merged.chapter, merged.week, merged.day), (2, 2, 2));
    }

    #[tokio::test]
    async fn successful_remote_save_is_canonical() {
        let mut remote = MockGameServicePort::new();
        remote
            .expect_save()
            .withf(|req| req.player_name == "Ana" && req.day == 2)
            .times(1)
            .returning(|_| Ok(state_at(1, 2).with_id(SaveId::new())));
        let (service, local) = service(remote);

        let saved = service.save(state_at(1, 2)).await;
        assert!(saved.id.is_some_and(|id| !id.is_placeholder()));
        // local mirror was written before the remote call
        assert_eq!(local.get(&session()).and_then(|s| s.id), Some(SaveId::placeholder()));
    }

    #[tokio::test]
    async fn offline_update_replaces_only_patched_fields() {
        let (service, local) = service(offline_remote());
        let before = state_at(1, 2);
        local.set(&session(), &before);

        let patch = GameStatePatch {
            day: Some(3),
            ..GameStatePatch::default()
        };
        let merged = service.update(&session(), &patch).await;

        let mut expected = before;
        expected.day = 3;
        expected.last_played = now();
        assert_eq!(merged, expected);
        assert_eq!(local.get(&session()), Some(expected));
    }

    #[tokio::test]
    async fn update_without_local_copy_starts_from_blank() {
        let (service, _) = service(offline_remote());
        let flags = FlagSet::new().with(flag_keys::CHARACTER_CREATED);

        let merged = service
            .update(&session(), &GameStatePatch::flags(flags.clone()))
            .await;

        assert_eq!(merged.flags, flags);
        assert_eq!((merged.chapter, merged.week, merged.day), (1, 1, 1));
        assert_eq!(merged.session_id, session());
    }

    #[tokio::test]
    async fn remote_receives_only_the_patch() {
        let patch = GameStatePatch {
            week: Some(2),
            ..GameStatePatch::default()
        };
        let expected_patch = patch.clone();
        let mut remote = MockGameServicePort::new();
        remote
            .expect_update()
            .withf(move |id, p| id.as_str() == "device-1" && p == &expected_patch)
            .times(1)
            .returning(|_, _| {
                let mut state = state_at(1, 1);
                state.week = 2;
                Ok(state)
            });
        let (service, _) = service(remote);

        assert_eq!(service.update(&session(), &patch).await.week, 2);
    }

    #[tokio::test]
    async fn reset_clears_local_even_when_remote_is_down() {
        let mut remote = MockGameServicePort::new();
        remote
            .expect_reset()
            .returning(|_| Err(SyncError::Network("timeout".into())));
        remote.expect_load().returning(|_| Err(SyncError::NotFound));
        let (service, local) = service(remote);
        local.set(&session(), &state_at(2, 3));

        service.reset(&session()).await;

        assert!(local.get(&session()).is_none());
        assert!(service.load(&session()).await.is_none());
    }

    #[tokio::test]
    async fn concurrent_updates_are_both_applied() {
        let (service, local) = service(offline_remote());
        local.set(&session(), &state_at(1, 1));
        let service = Arc::new(service);

        let day = GameStatePatch {
            day: Some(4),
            ..GameStatePatch::default()
        };
        let week = GameStatePatch {
            week: Some(3),
            ..GameStatePatch::default()
        };
        let id = session();
        tokio::join!(service.update(&id, &day), service.update(&id, &week));

        let stored = local.get(&session()).expect("stored");
        assert_eq!((stored.week, stored.day), (3, 4));
    }

    #[tokio::test]
    async fn new_game_sets_character_created() {
        let (service, _) = service(offline_remote());
        let state = service
            .new_game(&session(), PlayerName::new("Bo").expect("name"))
            .await;
        assert!(state.flags.is_set(flag_keys::CHARACTER_CREATED));
        assert_eq!(state.player_name, "Bo");
    }
}
