use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, error};
use wizard_domain::{CompletionRecord, PersistedSnapshot};

use crate::CoreError;

/// Durable key under which the in-progress snapshot is stored.
pub const PROGRESS_KEY: &str = "study_progress";
/// Durable key under which the completion marker is stored.
pub const COMPLETION_KEY: &str = "study_completed";

/// Abstraction over durable key-value backends holding serialized records.
pub trait ProgressStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), CoreError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

impl<S: ProgressStore + ?Sized> ProgressStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        (**self).remove(key)
    }
}

impl<S: ProgressStore + ?Sized> ProgressStore for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        (**self).remove(key)
    }
}

/// Process-local store used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl ProgressStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Backends report records that are not valid UTF-8 as `InvalidData`.
fn is_undecodable(err: &CoreError) -> bool {
    matches!(err, CoreError::Io(io) if io.kind() == std::io::ErrorKind::InvalidData)
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> CoreError {
    CoreError::Storage("memory store lock poisoned".into())
}

/// Result of reading the in-progress snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotLoad {
    Missing,
    Loaded(PersistedSnapshot),
    /// The stored record could not be parsed and has been deleted.
    Discarded,
}

/// Typed access to the snapshot and completion records of a backend.
#[derive(Debug)]
pub struct PersistenceStore<S> {
    backend: S,
}

impl<S: ProgressStore> PersistenceStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn save_snapshot(&self, snapshot: &PersistedSnapshot) -> Result<(), CoreError> {
        let json = serde_json::to_string(snapshot)?;
        self.backend.write(PROGRESS_KEY, &json)
    }

    /// A record that cannot be decoded or parsed is deleted and reported as
    /// [`SnapshotLoad::Discarded`].
    pub fn load_snapshot(&self) -> Result<SnapshotLoad, CoreError> {
        let parsed = match self.backend.read(PROGRESS_KEY) {
            Ok(None) => return Ok(SnapshotLoad::Missing),
            Ok(Some(raw)) => {
                serde_json::from_str::<PersistedSnapshot>(&raw).map_err(CoreError::from)
            }
            Err(err) if is_undecodable(&err) => Err(err),
            Err(err) => return Err(err),
        };
        match parsed {
            Ok(snapshot) => Ok(SnapshotLoad::Loaded(snapshot)),
            Err(err) => {
                error!(error = %err, "discarding unreadable saved progress");
                self.backend.remove(PROGRESS_KEY)?;
                Ok(SnapshotLoad::Discarded)
            }
        }
    }

    pub fn clear_snapshot(&self) -> Result<(), CoreError> {
        self.backend.remove(PROGRESS_KEY)
    }

    pub fn mark_completed(&self, at: DateTime<Utc>) -> Result<(), CoreError> {
        let json = serde_json::to_string(&CompletionRecord::completed_at(at))?;
        self.backend.write(COMPLETION_KEY, &json)
    }

    /// An unreadable completion record counts as "not completed".
    pub fn is_completed(&self) -> Result<bool, CoreError> {
        let raw = match self.backend.read(COMPLETION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(false),
            Err(err) if is_undecodable(&err) => {
                debug!(error = %err, "ignoring undecodable completion record");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };
        match serde_json::from_str::<CompletionRecord>(&raw) {
            Ok(record) => Ok(record.completed),
            Err(err) => {
                debug!(error = %err, "ignoring unreadable completion record");
                Ok(false)
            }
        }
    }

    pub fn clear_all(&self) -> Result<(), CoreError> {
        self.backend.remove(PROGRESS_KEY)?;
        self.backend.remove(COMPLETION_KEY)
    }
}
