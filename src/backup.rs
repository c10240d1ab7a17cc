//! Scheduled filesystem backups with bounded retention.
//!
//! The scheduler owns at most one repeating timer. Enabling while enabled
//! cancels the previous timer and starts a new one under the same lock, so
//! two timers never tick for the same store. Backups are best effort: any
//! I/O failure inside a tick is logged and suppressed, and the next tick
//! is the retry.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::models::Snapshot;
use crate::storage::KeyValueStore;
use crate::store::StateStore;

/// Default number of snapshot files kept on disk.
pub const DEFAULT_RETENTION: usize = 10;

/// Snapshot file name prefix and suffix; the part between them is derived
/// from the snapshot timestamp so lexicographic order is chronological.
const FILE_PREFIX: &str = "sidepad-";
const FILE_SUFFIX: &str = ".json";

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("I/O error for {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Snapshot writing and pruning, shared by the scheduler and its timer
/// task.
struct SnapshotWriter<S: KeyValueStore> {
    store: Arc<StateStore<S>>,
    dir: PathBuf,
    retention: usize,
}

impl<S: KeyValueStore> SnapshotWriter<S> {
    fn run_once(&self) {
        match self.try_run_once() {
            Ok(path) => tracing::debug!("backup written: {}", path.display()),
            Err(e) => tracing::warn!("backup failed: {}", e),
        }
    }

    fn try_run_once(&self) -> Result<PathBuf, BackupError> {
        let (notes, tasks) = self.store.snapshot_state();
        let snapshot = Snapshot::for_backup(notes, tasks);

        // Pre-existing directory is a non-error.
        fs::create_dir_all(&self.dir).map_err(|e| BackupError::Io(self.dir.clone(), e))?;

        let timestamp = snapshot.timestamp().unwrap_or_default();
        let path = self.dir.join(backup_file_name(timestamp));
        let contents = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&path, contents).map_err(|e| BackupError::Io(path.clone(), e))?;

        self.prune()?;
        Ok(path)
    }

    /// Deletes snapshot files beyond the retention cap, oldest first.
    fn prune(&self) -> Result<(), BackupError> {
        let mut names = list_backup_files(&self.dir)?;
        // Descending: newest first, by filename.
        names.sort_by(|a, b| b.cmp(a));
        for name in names.iter().skip(self.retention) {
            let path = self.dir.join(name);
            fs::remove_file(&path).map_err(|e| BackupError::Io(path, e))?;
        }
        Ok(())
    }
}

/// Periodically writes a [`Snapshot`] of the store to the backup directory
/// and prunes files beyond the retention cap.
pub struct BackupScheduler<S: KeyValueStore + 'static> {
    writer: Arc<SnapshotWriter<S>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<S: KeyValueStore + 'static> BackupScheduler<S> {
    pub fn new(store: Arc<StateStore<S>>, dir: PathBuf, retention: usize) -> Self {
        Self {
            writer: Arc::new(SnapshotWriter {
                store,
                dir,
                retention,
            }),
            timer: Mutex::new(None),
        }
    }

    /// Backup directory this scheduler writes into.
    pub fn dir(&self) -> &PathBuf {
        &self.writer.dir
    }

    /// Starts (or restarts) the repeating timer. Cancelling the previous
    /// timer and spawning the new one happen under one lock, so at no
    /// point are two timers ticking.
    ///
    /// Must be called within a tokio runtime.
    pub fn enable(&self, interval: Duration) {
        let mut timer = self.timer.lock().unwrap();
        if let Some(handle) = timer.take() {
            handle.abort();
        }
        let writer = Arc::clone(&self.writer);
        *timer = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                writer.run_once();
            }
        }));
        tracing::debug!("auto-backup enabled, interval {:?}", interval);
    }

    /// Cancels the pending timer. No snapshot is written after this
    /// returns.
    pub fn disable(&self) {
        let mut timer = self.timer.lock().unwrap();
        if let Some(handle) = timer.take() {
            handle.abort();
            tracing::debug!("auto-backup disabled");
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.timer.lock().unwrap().is_some()
    }

    /// Writes one snapshot and prunes old files. Failures are logged and
    /// suppressed: a failed backup never propagates to the caller, never
    /// kills the timer, and the next tick retries.
    pub fn run_once(&self) {
        self.writer.run_once();
    }

    #[cfg(test)]
    fn try_run_once(&self) -> Result<PathBuf, BackupError> {
        self.writer.try_run_once()
    }
}

impl<S: KeyValueStore + 'static> Drop for BackupScheduler<S> {
    fn drop(&mut self) {
        self.disable();
    }
}

/// Names of files in `dir` matching the snapshot naming convention.
pub fn list_backup_files(dir: &PathBuf) -> Result<Vec<String>, BackupError> {
    let entries = fs::read_dir(dir).map_err(|e| BackupError::Io(dir.clone(), e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BackupError::Io(dir.clone(), e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Derives the snapshot file name from its timestamp. Colons and dots are
/// replaced so the name is filesystem-safe on every platform while keeping
/// lexicographic order equal to chronological order.
fn backup_file_name(timestamp: &str) -> String {
    let safe = timestamp.replace([':', '.'], "-");
    format!("{FILE_PREFIX}{safe}{FILE_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use crate::storage::MemoryKeyValue;
    use tempfile::TempDir;

    fn test_scheduler(retention: usize) -> (BackupScheduler<MemoryKeyValue>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(StateStore::open(MemoryKeyValue::new()).unwrap());
        store.set_notes("some notes").unwrap();
        store.set_tasks(vec![Task::new("a task")]).unwrap();
        let scheduler =
            BackupScheduler::new(store, temp_dir.path().join("backups"), retention);
        (scheduler, temp_dir)
    }

    #[test]
    fn test_file_name_is_sortable_and_safe() {
        let name = backup_file_name("2026-08-06T12:34:56.789Z");
        assert_eq!(name, "sidepad-2026-08-06T12-34-56-789Z.json");

        let earlier = backup_file_name("2026-08-06T12:34:56.100Z");
        assert!(earlier < name);
    }

    #[test]
    fn test_run_once_writes_valid_snapshot() {
        let (scheduler, _temp) = test_scheduler(DEFAULT_RETENTION);
        let path = scheduler.try_run_once().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let snapshot: Snapshot = serde_json::from_str(&contents).unwrap();
        assert_eq!(snapshot.notes, "some notes");
        assert_eq!(snapshot.tasks.len(), 1);
        assert!(snapshot.backed_up_at.is_some());
    }

    #[test]
    fn test_run_once_creates_directory() {
        let (scheduler, _temp) = test_scheduler(DEFAULT_RETENTION);
        assert!(!scheduler.dir().exists());
        scheduler.run_once();
        assert!(scheduler.dir().exists());

        // A second run with the directory present is also fine.
        scheduler.run_once();
    }

    #[test]
    fn test_retention_keeps_ten_most_recent() {
        let (scheduler, _temp) = test_scheduler(10);
        let mut written = Vec::new();
        for _ in 0..11 {
            written.push(
                scheduler
                    .try_run_once()
                    .unwrap()
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned(),
            );
            // Millisecond timestamps need distinct instants.
            std::thread::sleep(Duration::from_millis(3));
        }

        let mut remaining = list_backup_files(scheduler.dir()).unwrap();
        assert_eq!(remaining.len(), 10);

        // The oldest write is gone; the ten most recent remain.
        remaining.sort();
        written.sort();
        assert_eq!(remaining, written[1..].to_vec());
    }

    #[test]
    fn test_failure_is_suppressed() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(StateStore::open(MemoryKeyValue::new()).unwrap());
        // A file where the backup directory should be makes every tick fail.
        let blocked = temp_dir.path().join("blocked");
        fs::write(&blocked, "file, not a directory").unwrap();
        let scheduler = BackupScheduler::new(store, blocked, DEFAULT_RETENTION);

        // Must not panic or propagate.
        scheduler.run_once();
        scheduler.run_once();
    }

    #[tokio::test]
    async fn test_enable_writes_snapshots() {
        let (scheduler, _temp) = test_scheduler(DEFAULT_RETENTION);
        scheduler.enable(Duration::from_millis(20));
        assert!(scheduler.is_enabled());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(!list_backup_files(scheduler.dir()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disable_cancels_pending_timer() {
        let (scheduler, _temp) = test_scheduler(DEFAULT_RETENTION);
        scheduler.enable(Duration::from_millis(40));
        scheduler.disable();
        assert!(!scheduler.is_enabled());

        // Well past the interval: no file may appear after disable returned.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!scheduler.dir().exists());
    }

    #[tokio::test]
    async fn test_reenable_replaces_timer() {
        let (scheduler, _temp) = test_scheduler(DEFAULT_RETENTION);
        scheduler.enable(Duration::from_millis(50));
        // Reconfigure before the first tick: the old timer must not fire.
        scheduler.enable(Duration::from_secs(3600));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(scheduler.is_enabled());
        assert!(!scheduler.dir().exists());
    }

    #[tokio::test]
    async fn test_drop_stops_timer() {
        let (scheduler, _temp) = test_scheduler(DEFAULT_RETENTION);
        let dir = scheduler.dir().clone();
        scheduler.enable(Duration::from_millis(20));
        drop(scheduler);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!dir.exists());
    }
}
