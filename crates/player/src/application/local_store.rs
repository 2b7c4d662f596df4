//! Local durable store
//!
//! One full `GameState` JSON record per session id, independent of whether
//! the player is signed in. Reads of unparseable records behave as misses.

use std::sync::Arc;

use lastplanner_domain::{GameState, SessionId};

use crate::ports::outbound::{storage_keys, StorageProvider};

#[derive(Clone)]
pub struct LocalGameStore {
    storage: Arc<dyn StorageProvider>,
}

impl LocalGameStore {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    pub fn get(&self, session_id: &SessionId) -> Option<GameState> {
        let raw = self.storage.load(&storage_keys::game(session_id))?;
        match serde_json::from_str::<GameState>(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Ignoring unreadable local save");
                None
            }
        }
    }

    pub fn set(&self, session_id: &SessionId, state: &GameState) {
        match serde_json::to_string(state) {
            Ok(json) => self.storage.save(&storage_keys::game(session_id), &json),
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "Failed to encode local save");
            }
        }
    }

    pub fn delete(&self, session_id: &SessionId) {
        self.storage.remove(&storage_keys::game(session_id));
    }
}
