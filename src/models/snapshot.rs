//! Whole-state snapshot payload shared by backups, sync, and export.
//!
//! The JSON shape is identical everywhere; only the timestamp field name
//! records where the snapshot came from (`backedUpAt`, `syncedAt`, or
//! `exportedAt`).

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::task::Task;

/// Version tag written into every snapshot payload.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Current time as an ISO-8601 string with millisecond precision, UTC.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A timestamped, immutable copy of the notes and the task list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backed_up_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    pub notes: String,
    pub tasks: Vec<Task>,
}

impl Snapshot {
    fn stamped(notes: String, tasks: Vec<Task>) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            backed_up_at: None,
            synced_at: None,
            exported_at: None,
            notes,
            tasks,
        }
    }

    /// Snapshot written by the backup scheduler.
    pub fn for_backup(notes: String, tasks: Vec<Task>) -> Self {
        let mut snapshot = Self::stamped(notes, tasks);
        snapshot.backed_up_at = Some(now_iso());
        snapshot
    }

    /// Snapshot sent as the remote document payload.
    pub fn for_sync(notes: String, tasks: Vec<Task>) -> Self {
        let mut snapshot = Self::stamped(notes, tasks);
        snapshot.synced_at = Some(now_iso());
        snapshot
    }

    /// Snapshot written by an explicit export.
    pub fn for_export(notes: String, tasks: Vec<Task>) -> Self {
        let mut snapshot = Self::stamped(notes, tasks);
        snapshot.exported_at = Some(now_iso());
        snapshot
    }

    /// The timestamp field, whichever variant is present.
    pub fn timestamp(&self) -> Option<&str> {
        self.backed_up_at
            .as_deref()
            .or(self.synced_at.as_deref())
            .or(self.exported_at.as_deref())
    }
}
