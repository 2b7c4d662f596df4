//! Device session identifier
//!
//! Generated once per device and kept in local storage. Storage that has no
//! identifier yet is not an error: a fresh v4 UUID is created and persisted.

use std::sync::{Arc, Mutex};

use lastplanner_domain::SessionId;

use crate::ports::outbound::{storage_keys, StorageProvider};

pub struct SessionIdentity {
    storage: Arc<dyn StorageProvider>,
    /// Resolved id, so repeated calls agree even when persisting failed
    resolved: Mutex<Option<SessionId>>,
}

impl SessionIdentity {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            storage,
            resolved: Mutex::new(None),
        }
    }

    pub fn session_id(&self) -> SessionId {
        let mut resolved = self.resolved.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = resolved.as_ref() {
            return existing.clone();
        }

        let session_id = match self.storage.load(storage_keys::SESSION_ID) {
            Some(raw) => SessionId::new(raw).unwrap_or_else(|_| {
                tracing::warn!("Stored session id is blank, generating a new one");
                self.generate()
            }),
            None => self.generate(),
        };

        *resolved = Some(session_id.clone());
        session_id
    }

    fn generate(&self) -> SessionId {
        let session_id = SessionId::generate();
        self.storage.save(storage_keys::SESSION_ID, session_id.as_str());
        tracing::info!(session_id = %session_id, "Generated new device session id");
        session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::InMemoryStorageProvider;

    #[test]
    fn consecutive_calls_return_the_same_id() {
        let storage = Arc::new(InMemoryStorageProvider::new());
        let identity = SessionIdentity::new(storage.clone());

        let first = identity.session_id();
        let second = identity.session_id();

        assert_eq!(first, second);
        assert_eq!(
            storage.load(storage_keys::SESSION_ID).as_deref(),
            Some(first.as_str())
        );
    }

    #[test]
    fn persisted_id_is_reused_by_a_new_provider() {
        let storage = Arc::new(InMemoryStorageProvider::new());
        let first = SessionIdentity::new(storage.clone()).session_id();
        let again = SessionIdentity::new(storage).session_id();
        assert_eq!(first, again);
    }

    #[test]
    fn generated_id_is_a_uuid() {
        let identity = SessionIdentity::new(Arc::new(InMemoryStorageProvider::new()));
        let id = identity.session_id();
        assert_eq!(id.as_str().len(), 36);
        assert_eq!(id.as_str().matches('-').count(), 4);
    }
}
