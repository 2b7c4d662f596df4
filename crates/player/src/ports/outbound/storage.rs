//! Device-local key-value storage
//!
//! Implementations are synchronous and never fail from the caller's point of
//! view: errors are logged by the adapter and the operation becomes a no-op
//! (for writes) or a miss (for reads).

/// Key-value storage abstraction
pub trait StorageProvider: Send + Sync {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str);

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key
    fn remove(&self, key: &str);
}

/// Storage keys used by the player
pub mod storage_keys {
    use lastplanner_domain::SessionId;

    /// The device's session identifier.
    pub const SESSION_ID: &str = "lastplanner_session_id";

    const GAME_PREFIX: &str = "lastplanner_game_";

    /// Key holding the full game state JSON for one session.
    pub fn game(session_id: &SessionId) -> String {
        format!("{GAME_PREFIX}{session_id}")
    }
}
