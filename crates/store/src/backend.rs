//! Key-value backends.
//!
//! The original design reaches into an ambient, global key-value store.
//! Here that store is an injected capability so tests can substitute an
//! in-memory fake (or a counting/failing one) without touching global
//! state.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A backend operation failure.
///
/// Backends report faults; they never decide policy. Whether a failure is
/// fatal is up to the caller — the slot adapter treats every one of these
/// as recoverable.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing map file could not be serialized or parsed.
    #[error("map file error: {0}")]
    MapFile(String),

    /// The backend is unavailable (used by test doubles and custom
    /// backends).
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// The key-value capability a cell store is built over.
///
/// `get` returns the stored text for a key, `None` if the key was never
/// written. `set` overwrites unconditionally. Both are synchronous and
/// expected to return quickly; neither is retried.
pub trait StorageBackend: Send + Sync {
    /// Read the raw text stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Write `raw` under `key`, overwriting any previous entry.
    fn set(&self, key: &str, raw: &str) -> Result<(), BackendError>;
}

// ============================================================================
// MemoryBackend
// ============================================================================

/// An in-process backend with no durability.
///
/// The backing store for ephemeral cell stores and the natural fake for
/// tests: everything is gone when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held. Mostly useful in tests asserting
    /// how many slots a scenario created.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, raw: &str) -> Result<(), BackendError> {
        self.entries.write().insert(key.to_string(), raw.to_string());
        Ok(())
    }
}

// ============================================================================
// FileBackend
// ============================================================================

/// A durable backend persisting all entries to a single JSON map file.
///
/// The whole map is held in memory and rewritten on every `set`, which is
/// the right trade-off for UI-scale state: reads are free and a write is
/// one small file. Concurrent processes sharing the file are not
/// coordinated; last writer wins, matching the shared-name policy of cells
/// themselves.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileBackend {
    /// Open a backend at `path`, loading any existing map file.
    ///
    /// The parent directory is created if missing. A present but unreadable
    /// or malformed map file is an open error: silently starting empty
    /// would shadow (and then overwrite) data that may still be
    /// recoverable by hand.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|e| BackendError::MapFile(e.to_string()))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// The map file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), BackendError> {
        let raw =
            serde_json::to_string(entries).map_err(|e| BackendError::MapFile(e.to_string()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, raw: &str) -> Result<(), BackendError> {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), raw.to_string());
        self.flush(&entries)
    }
}
