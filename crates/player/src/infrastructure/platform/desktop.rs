//! Desktop storage provider
//!
//! Key-value pairs live in one JSON file with an in-memory copy. Every write
//! rewrites the file through a temporary sibling and a rename, so a crash
//! mid-write leaves the previous contents intact.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use directories::ProjectDirs;

use crate::ports::outbound::StorageProvider;

const FILE_NAME: &str = "storage.json";

/// File-backed storage under the platform config directory, e.g.
/// `~/.config/lastplanner/storage.json` on Linux.
pub struct DesktopStorageProvider {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl Default for DesktopStorageProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopStorageProvider {
    pub fn new() -> Self {
        let path = ProjectDirs::from("io", "lastplanner", "player")
            .map(|dirs| dirs.config_dir().join(FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(format!("lastplanner_{FILE_NAME}")));
        Self::with_path(path)
    }

    /// Storage backed by an explicit file; existing contents are loaded eagerly.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Starting with empty local storage");
                HashMap::new()
            }
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "Local storage opened");

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Mutate the entries and flush them while still holding the lock, so
    /// concurrent writers reach the disk in the order they changed memory.
    fn update(&self, change: impl FnOnce(&mut HashMap<String, String>)) {
        let mut entries = self.write();
        change(&mut entries);
        if let Err(e) = write_entries(&self.path, &entries) {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to write local storage");
        }
    }
}

fn read_entries(path: &Path) -> io::Result<HashMap<String, String>> {
    match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).map_err(io::Error::other),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(e),
    }
}

fn write_entries(path: &Path, entries: &HashMap<String, String>) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(entries).map_err(io::Error::other)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)
}

impl StorageProvider for DesktopStorageProvider {
    fn save(&self, key: &str, value: &str) {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn load(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    fn remove(&self, key: &str) {
        if !self.read().contains_key(key) {
            return;
        }
        self.update(|entries| {
            entries.remove(key);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_a_new_provider_on_the_same_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("storage.json");

        let first = DesktopStorageProvider::with_path(&path);
        first.save("k", "v");
        first.save("gone", "x");
        first.remove("gone");

        let second = DesktopStorageProvider::with_path(&path);
        assert_eq!(second.load("k").as_deref(), Some("v"));
        assert!(second.load("gone").is_none());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").expect("write");

        let storage = DesktopStorageProvider::with_path(&path);
        assert!(storage.load("anything").is_none());

        storage.save("k", "v");
        assert_eq!(
            DesktopStorageProvider::with_path(&path).load("k").as_deref(),
            Some("v")
        );
    }

    #[test]
    fn removing_a_missing_key_does_not_create_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");

        DesktopStorageProvider::with_path(&path).remove("nothing");
        assert!(!path.exists());
    }
}
