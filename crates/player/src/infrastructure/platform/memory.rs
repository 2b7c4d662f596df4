//! In-memory storage provider, for tests and ephemeral sessions.

use dashmap::DashMap;

use crate::ports::outbound::StorageProvider;

#[derive(Default)]
pub struct InMemoryStorageProvider {
    values: DashMap<String, String>,
}

impl InMemoryStorageProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageProvider for InMemoryStorageProvider {
    fn save(&self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| value.clone())
    }

    fn remove(&self, key: &str) {
        self.values.remove(key);
    }
}
