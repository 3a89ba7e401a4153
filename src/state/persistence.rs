//! Client-local key-value storage for session and preference entries.
//!
//! SYSTEM CONTEXT
//! ==============
//! Stands in for the browser's `sessionStorage` (`user`, `token`) and
//! `localStorage` (`locale`). The session store, API client and locale
//! resolver only see the [`SessionPersistence`] trait, so tests run against
//! [`MemoryPersistence`] and the CLI against [`FilePersistence`].
//!
//! TRADE-OFFS
//! ==========
//! Writes are best-effort like browser storage: a failed file write is logged
//! and the in-memory copy still reflects the new value.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serialized [`crate::state::session::Session`].
pub const USER_KEY: &str = "user";
/// Opaque bearer token.
pub const TOKEN_KEY: &str = "token";
/// Display language preference.
pub const LOCALE_KEY: &str = "locale";

/// String key-value storage capability.
pub trait SessionPersistence: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
}

/// Load a JSON value stored under `key`. Missing and unparseable entries both yield `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn SessionPersistence, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored entry is not valid JSON");
            None
        }
    }
}

/// Save a JSON value under `key`.
pub fn save_json<T: Serialize>(store: &dyn SessionPersistence, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.set(key, &raw),
        Err(e) => tracing::warn!(key, error = %e, "failed to serialize entry"),
    }
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local storage; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionPersistence for MemoryPersistence {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

// =============================================================================
// FILE
// =============================================================================

/// JSON-object file storage. The whole map is rewritten on every mutation.
#[derive(Debug)]
pub struct FilePersistence {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FilePersistence {
    /// Open (or lazily create) the storage file at `path`.
    ///
    /// A missing file starts empty. A corrupt file also starts empty and is
    /// overwritten on the next mutation.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        Self { path, entries: Mutex::new(entries) }
    }

    fn mutate(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut entries);
        if let Err(e) = write_entries(&self.path, &entries) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write storage file");
        }
    }
}

impl SessionPersistence for FilePersistence {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.mutate(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        });
    }

    fn remove(&self, key: &str) {
        self.mutate(|entries| {
            entries.remove(key);
        });
    }

    fn clear(&self) {
        self.mutate(BTreeMap::clear);
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, String> {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return BTreeMap::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt storage file");
        BTreeMap::new()
    })
}

fn write_entries(path: &Path, entries: &BTreeMap<String, String>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let raw = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, raw)
}
