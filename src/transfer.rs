//! Explicit export and import of whole-state snapshots.
//!
//! Import validates the entire payload before touching the store: a
//! malformed file surfaces an error and leaves the state unmodified.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::Snapshot;
use crate::storage::{KeyValueStore, StorageError};
use crate::store::StateStore;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("I/O error for {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("Malformed snapshot file {0}: {1}")]
    Malformed(PathBuf, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Writes the current state to `path` as an `exportedAt` snapshot.
pub fn export_to<S: KeyValueStore>(
    store: &StateStore<S>,
    path: &Path,
) -> Result<Snapshot, TransferError> {
    let (notes, tasks) = store.snapshot_state();
    let snapshot = Snapshot::for_export(notes, tasks);
    let contents = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| TransferError::Malformed(path.to_path_buf(), e.to_string()))?;
    fs::write(path, contents).map_err(|e| TransferError::Io(path.to_path_buf(), e))?;
    Ok(snapshot)
}

/// Reads a snapshot file and replaces the whole state with its contents.
///
/// The payload is parsed and validated in full first; only then is the
/// store mutated (atomically, with the usual invalid-task filter).
pub fn import_from<S: KeyValueStore>(
    store: &StateStore<S>,
    path: &Path,
) -> Result<Snapshot, TransferError> {
    let contents =
        fs::read_to_string(path).map_err(|e| TransferError::Io(path.to_path_buf(), e))?;
    let snapshot: Snapshot = serde_json::from_str(&contents)
        .map_err(|e| TransferError::Malformed(path.to_path_buf(), e.to_string()))?;
    store.apply_snapshot(&snapshot)?;
    Ok(snapshot)
}
