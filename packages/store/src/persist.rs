//! # Snapshot Persistence
//!
//! The document is serialized to a durable key-value slot on every commit
//! and rehydrated when the store opens. The snapshot carries a schema
//! version so incompatible snapshots can be discarded instead of
//! half-parsed; decoding is the one place where trust-boundary leniency
//! applies (corrupt or mismatched snapshots fall back to the default
//! document, logged, never an error).

use crate::errors::StoreError;
use cvflow_model::{Cv, Header, Meta, Section};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

/// Bump when the persisted shape changes incompatibly.
pub const STORE_VERSION: u32 = 1;

/// Default durable slot name.
pub const STORE_NAME: &str = "cvflow-store";

/// Versioned snapshot envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub meta: Meta,
    pub header: Header,
    pub sections: Vec<Arc<Section>>,
}

impl Snapshot {
    pub fn of(cv: &Cv) -> Self {
        Self {
            version: STORE_VERSION,
            meta: cv.meta.clone(),
            header: cv.header.clone(),
            sections: cv.sections.clone(),
        }
    }

    pub fn into_cv(self) -> Cv {
        Cv {
            meta: self.meta,
            header: self.header,
            sections: self.sections,
        }
    }
}

/// Durable key-value slot for snapshots. Swappable so tests run against
/// memory and production against disk (or any other backing).
pub trait SnapshotStorage {
    fn read(&self, name: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, name: &str, payload: &str) -> Result<(), StoreError>;
}

impl<T: SnapshotStorage + ?Sized> SnapshotStorage for &T {
    fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        (**self).read(name)
    }

    fn write(&self, name: &str, payload: &str) -> Result<(), StoreError> {
        (**self).write(name, payload)
    }
}

impl<T: SnapshotStorage + ?Sized> SnapshotStorage for Arc<T> {
    fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        (**self).read(name)
    }

    fn write(&self, name: &str, payload: &str) -> Result<(), StoreError> {
        (**self).write(name, payload)
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.lock().expect("storage lock").get(name).cloned())
    }

    fn write(&self, name: &str, payload: &str) -> Result<(), StoreError> {
        self.slots
            .lock()
            .expect("storage lock")
            .insert(name.to_string(), payload.to_string());
        Ok(())
    }
}

/// File-backed storage: one `<name>.json` file per slot under a directory.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl SnapshotStorage for FileStorage {
    fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.slot_path(name)) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, name: &str, payload: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.slot_path(name), payload)?;
        Ok(())
    }
}

/// Serialize and write a snapshot of `cv`.
pub fn save(storage: &impl SnapshotStorage, name: &str, cv: &Cv) -> Result<(), StoreError> {
    let payload = serde_json::to_string(&Snapshot::of(cv))?;
    storage.write(name, &payload)
}

/// Rehydrate a document, falling back to the default empty document when
/// the slot is absent, unreadable, corrupt, or version-mismatched.
pub fn load(storage: &impl SnapshotStorage, name: &str) -> Cv {
    let payload = match storage.read(name) {
        Ok(Some(payload)) => payload,
        Ok(None) => return Cv::default(),
        Err(err) => {
            tracing::warn!(%name, error = %err, "failed to read snapshot, starting empty");
            return Cv::default();
        }
    };

    match serde_json::from_str::<Snapshot>(&payload) {
        Ok(snapshot) if snapshot.version == STORE_VERSION => snapshot.into_cv(),
        Ok(snapshot) => {
            tracing::info!(
                %name,
                found = snapshot.version,
                expected = STORE_VERSION,
                "discarding version-mismatched snapshot"
            );
            Cv::default()
        }
        Err(err) => {
            tracing::warn!(%name, error = %err, "corrupt snapshot, starting empty");
            Cv::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvflow_model::sample_cv;

    #[test]
    fn test_memory_round_trip() {
        let storage = MemoryStorage::new();
        let cv = sample_cv();

        save(&storage, STORE_NAME, &cv).unwrap();
        let loaded = load(&storage, STORE_NAME);
        assert_eq!(loaded, cv);
    }

    #[test]
    fn test_missing_slot_yields_default() {
        let storage = MemoryStorage::new();
        assert_eq!(load(&storage, "nope"), Cv::default());
    }

    #[test]
    fn test_version_mismatch_discards_snapshot() {
        let storage = MemoryStorage::new();
        let cv = sample_cv();
        let mut snapshot = serde_json::to_value(Snapshot::of(&cv)).unwrap();
        snapshot["version"] = serde_json::json!(STORE_VERSION + 1);
        storage
            .write(STORE_NAME, &snapshot.to_string())
            .unwrap();

        assert_eq!(load(&storage, STORE_NAME), Cv::default());
    }

    #[test]
    fn test_corrupt_snapshot_yields_default() {
        let storage = MemoryStorage::new();
        storage.write(STORE_NAME, "{not json").unwrap();
        assert_eq!(load(&storage, STORE_NAME), Cv::default());
    }
}
