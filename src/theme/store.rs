//! Durable key-value storage for user preferences.
//!
//! The file-backed store keeps a flat TOML table in
//! `<state_dir>/preferences.toml`. Keys it does not know about are preserved
//! on write so other preferences can share the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Preferences file name inside the state directory.
pub const PREFERENCES_FILE: &str = "preferences.toml";

/// A durable string-to-string store.
pub trait PreferenceStore {
    /// Read a value. Unreadable storage reads as absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, synchronously.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// Preference store backed by a TOML file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir/preferences.toml`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(PREFERENCES_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Option<BTreeMap<String, toml::Value>> {
        let content = fs::read_to_string(&self.path).ok()?;
        match toml::from_str(&content) {
            Ok(table) => Some(table),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable preferences file");
                None
            }
        }
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_table()?
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut table = self.read_table().unwrap_or_default();
        table.insert(key.to_string(), toml::Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("failed to create preferences directory")?;
        }
        let content = toml::to_string(&table).context("failed to serialize preferences")?;
        fs::write(&self.path, content)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Volatile store, used when no home directory is available and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert_eq!(store.get("theme"), None);
    }

    #[test]
    fn file_store_persists_and_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path().join("state"));

        store.set("theme", "dark").unwrap();
        store.set("density", "compact").unwrap();
        store.set("theme", "light").unwrap();

        let reopened = FileStore::in_dir(dir.path().join("state"));
        assert_eq!(reopened.get("theme").as_deref(), Some("light"));
        assert_eq!(reopened.get("density").as_deref(), Some("compact"));
    }

    #[test]
    fn file_store_treats_garbage_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PREFERENCES_FILE), "theme = [not toml").unwrap();
        let store = FileStore::in_dir(dir.path());
        assert_eq!(store.get("theme"), None);

        // A write replaces the unreadable file.
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("theme"), None);
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }
}
