//! Versioned snapshots of climbing state and the stock storage backends.
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

use crate::ClimbingStorage;
use crate::constants::SNAPSHOT_SCHEMA_VERSION;
use crate::state::{AcclimatizationStatus, ClimbingState, EquipmentStatus, HealthStatus};

const fn legacy_version() -> u32 {
    SNAPSHOT_SCHEMA_VERSION
}

/// Persisted subset of [`ClimbingState`]. Weather, risks and tips are derived on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimbingSnapshot {
    // Blobs written before versioning carry no version field and share the v1 layout.
    #[serde(default = "legacy_version")]
    pub version: u32,
    pub current_altitude: f64,
    pub acclimatization_status: AcclimatizationStatus,
    pub health_status: HealthStatus,
    pub equipment_status: EquipmentStatus,
}

impl ClimbingSnapshot {
    #[must_use]
    pub fn capture(state: &ClimbingState) -> Self {
        Self {
            version: SNAPSHOT_SCHEMA_VERSION,
            current_altitude: state.current_altitude,
            acclimatization_status: state.acclimatization_status.clone(),
            health_status: state.health_status.clone(),
            equipment_status: state.equipment_status.clone(),
        }
    }

    /// Build a fresh state from the snapshot with every bounded field clamped.
    #[must_use]
    pub fn into_state(self) -> ClimbingState {
        let mut state = ClimbingState {
            current_altitude: self.current_altitude,
            acclimatization_status: self.acclimatization_status,
            health_status: self.health_status,
            equipment_status: self.equipment_status,
            ..ClimbingState::default()
        };
        state.sanitize();
        state
    }

    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized.
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    /// # Errors
    ///
    /// Returns an error for malformed JSON or a schema version this build does not know.
    pub fn from_json(blob: &str) -> Result<Self, PersistError> {
        let snapshot: Self = serde_json::from_str(blob)?;
        if snapshot.version != SNAPSHOT_SCHEMA_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_SCHEMA_VERSION,
            });
        }
        Ok(snapshot)
    }
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage backend failed: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("snapshot JSON is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("snapshot schema version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

impl PersistError {
    pub(crate) fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }
}

/// Read and decode the snapshot stored under `key`.
///
/// # Errors
///
/// Returns an error when the backend fails or the stored blob cannot be decoded.
pub fn load_snapshot<S: ClimbingStorage>(
    storage: &S,
    key: &str,
) -> Result<Option<ClimbingSnapshot>, PersistError> {
    let Some(blob) = storage.read(key).map_err(PersistError::storage)? else {
        return Ok(None);
    };
    ClimbingSnapshot::from_json(&blob).map(Some)
}

/// Encode and store a snapshot of `state` under `key`.
///
/// # Errors
///
/// Returns an error when encoding or the backend write fails.
pub fn save_snapshot<S: ClimbingStorage>(
    storage: &S,
    key: &str,
    state: &ClimbingState,
) -> Result<(), PersistError> {
    let blob = ClimbingSnapshot::capture(state).to_json()?;
    storage.write(key, &blob).map_err(PersistError::storage)
}

/// In-process storage; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.blobs.borrow().contains_key(key)
    }
}

impl ClimbingStorage for MemoryStorage {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, blob: &str) -> Result<(), Self::Error> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.blobs.borrow_mut().remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for a key; characters outside `[A-Za-z0-9_-]` become `_`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{file_stem}.json"))
    }
}

impl ClimbingStorage for FileStorage {
    type Error = io::Error;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, key: &str, blob: &str) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), blob)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}
