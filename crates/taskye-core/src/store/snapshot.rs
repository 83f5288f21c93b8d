// ── Snapshot persistence port ──
//
// Each store persists its whole collection as one serialized snapshot under
// a fixed key. The port hides where snapshots live: a directory of JSON
// files for the CLI, a map in memory for tests.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::CoreError;

/// Fixed snapshot keys.
pub mod keys {
    pub const TICKETS: &str = "tickets";
    pub const SESSION: &str = "session";
    pub const USERS: &str = "users";
    pub const INVENTORY: &str = "inventory";
}

/// Load/save access to named snapshots.
pub trait SnapshotPort: Send + Sync {
    /// Raw contents for `key`, or `None` if nothing was ever saved.
    fn load(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Replace the snapshot for `key`.
    fn save(&self, key: &str, contents: &str) -> Result<(), CoreError>;

    /// Drop the snapshot for `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

// ── File-backed snapshots ────────────────────────────────────────────

/// Stores each snapshot as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSnapshots {
    dir: PathBuf,
}

impl FileSnapshots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotPort for FileSnapshots {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::storage(key, e)),
        }
    }

    /// Writes to a sibling temp file, then renames over the target so a
    /// crash never leaves a half-written snapshot.
    fn save(&self, key: &str, contents: &str) -> Result<(), CoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| CoreError::storage(key, e))?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, contents).map_err(|e| CoreError::storage(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| CoreError::storage(key, e))?;

        debug!(path = %path.display(), bytes = contents.len(), "snapshot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::storage(key, e)),
        }
    }
}

// ── In-memory snapshots ──────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemorySnapshots {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a snapshot.
    pub fn with(self, key: &str, contents: &str) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_owned(), contents.to_owned());
        }
        self
    }

    /// Current contents for `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

impl SnapshotPort for MemorySnapshots {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| CoreError::storage(key, e))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, contents: &str) -> Result<(), CoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CoreError::storage(key, e))?;
        entries.insert(key.to_owned(), contents.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CoreError::storage(key, e))?;
        entries.remove(key);
        Ok(())
    }
}

/// Memory snapshots that can be told to fail upcoming saves.
#[cfg(test)]
pub(crate) struct FailingSaves {
    pub inner: MemorySnapshots,
    remaining: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl FailingSaves {
    pub fn new(inner: MemorySnapshots) -> Self {
        Self {
            inner,
            remaining: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Make the next `n` saves fail.
    pub fn fail_next(&self, n: usize) {
        self.remaining.store(n, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl SnapshotPort for FailingSaves {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, contents: &str) -> Result<(), CoreError> {
        use std::sync::atomic::Ordering;
        let failing = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(CoreError::storage(key, "disk full"));
        }
        self.inner.save(key, contents)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.inner.remove(key)
    }
}
