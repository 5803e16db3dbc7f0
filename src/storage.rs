//! Persistence for the competition state: one JSON document behind a small trait.

use crate::models::CompetitionState;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Errors from reading or writing the persisted state.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    /// State could not be encoded as JSON.
    Serialize(String),
    /// Stored document is not a valid competition state.
    Deserialize(String),
    /// Store is unusable (e.g. a poisoned lock).
    Unavailable(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "storage I/O error: {}", e),
            StorageError::Serialize(msg) => write!(f, "could not encode state: {}", msg),
            StorageError::Deserialize(msg) => write!(f, "could not decode stored state: {}", msg),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Where the competition state lives between runs.
pub trait CompetitionStore: Send + Sync {
    /// Previously saved state, or None if nothing was saved yet.
    fn load(&self) -> Result<Option<CompetitionState>, StorageError>;

    fn save(&self, state: &CompetitionState) -> Result<(), StorageError>;
}

/// Stores the state as a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CompetitionStore for JsonFileStore {
    fn load(&self) -> Result<Option<CompetitionState>, StorageError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|e| StorageError::Deserialize(e.to_string()))
    }

    fn save(&self, state: &CompetitionState) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;
        // Write next to the target, then rename, so a crash never leaves half a document.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process store. Clones share the same slot, so a test can keep a handle
/// and inspect what the manager saved.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<CompetitionState>>>,
    saves: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `state`.
    pub fn with_state(state: CompetitionState) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(state))),
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Last saved state, if any.
    pub fn saved(&self) -> Option<CompetitionState> {
        self.slot.lock().ok().and_then(|g| g.clone())
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl CompetitionStore for MemoryStore {
    fn load(&self) -> Result<Option<CompetitionState>, StorageError> {
        let guard = self
            .slot
            .lock()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, state: &CompetitionState) -> Result<(), StorageError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        *guard = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
