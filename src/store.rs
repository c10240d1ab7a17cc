//! In-memory view over the two persisted values: the note text and the
//! task list.
//!
//! The store is the single source of truth; backups, sync, and the UI all
//! read and write through it. Reads return full copies of a consistent
//! state, and every write path replaces a value wholesale under one lock,
//! so a concurrent reader never observes a half-applied mutation.

use std::sync::RwLock;

use crate::models::{badge_count, pending_count, retain_valid, Snapshot, Task};
use crate::storage::{KeyValueStore, StorageError};

/// Key under which the note text is persisted.
pub const NOTES_KEY: &str = "sidepad.notes";
/// Key under which the task list is persisted (JSON array).
pub const TASKS_KEY: &str = "sidepad.tasks";

#[derive(Debug, Default)]
struct State {
    notes: String,
    tasks: Vec<Task>,
}

/// Single source of truth for the note text and the task list.
///
/// Thread-safe via an internal RwLock; share with `Arc` to hand the same
/// store to the backup scheduler and the sync engine.
pub struct StateStore<S: KeyValueStore> {
    kv: S,
    state: RwLock<State>,
}

impl<S: KeyValueStore> StateStore<S> {
    /// Opens the store, loading persisted values. Unset keys default to an
    /// empty note and an empty task list.
    pub fn open(kv: S) -> Result<Self, StorageError> {
        let notes = kv.get(NOTES_KEY)?.unwrap_or_default();
        let tasks = match kv.get(TASKS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("discarding unreadable task list: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        };
        Ok(Self {
            kv,
            state: RwLock::new(State { notes, tasks }),
        })
    }

    /// Current note text, full copy.
    pub fn notes(&self) -> String {
        self.state.read().unwrap().notes.clone()
    }

    /// Current task list, full copy.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.read().unwrap().tasks.clone()
    }

    /// Consistent (notes, tasks) pair read under one lock.
    pub fn snapshot_state(&self) -> (String, Vec<Task>) {
        let state = self.state.read().unwrap();
        (state.notes.clone(), state.tasks.clone())
    }

    /// Replaces the note text wholesale. Any string is accepted.
    pub fn set_notes(&self, text: impl Into<String>) -> Result<(), StorageError> {
        let text = text.into();
        let mut state = self.state.write().unwrap();
        self.kv.set(NOTES_KEY, &text)?;
        state.notes = text;
        Ok(())
    }

    /// Replaces the task list wholesale, silently dropping invalid tasks
    /// (empty or whitespace-only text). The filter runs on every write
    /// path, not just interactive edits.
    pub fn set_tasks(&self, tasks: Vec<Task>) -> Result<(), StorageError> {
        let tasks = retain_valid(tasks);
        let mut state = self.state.write().unwrap();
        self.persist_tasks(&tasks)?;
        state.tasks = tasks;
        Ok(())
    }

    /// Number of valid tasks not yet done.
    pub fn pending_count(&self) -> usize {
        pending_count(&self.state.read().unwrap().tasks)
    }

    /// Badge value for the host indicator; `None` when nothing is pending.
    pub fn badge_count(&self) -> Option<usize> {
        badge_count(&self.state.read().unwrap().tasks)
    }

    /// Resets note and task list in one logical step. Concurrent readers
    /// observe either the old pair or the new pair, never a mix.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        let mut state = self.state.write().unwrap();
        self.kv.set(NOTES_KEY, "")?;
        self.persist_tasks(&[])?;
        state.notes.clear();
        state.tasks.clear();
        Ok(())
    }

    /// Replaces the whole state from a snapshot (import or remote apply),
    /// atomically and with the invalid-task filter.
    pub fn apply_snapshot(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let tasks = retain_valid(snapshot.tasks.clone());
        let mut state = self.state.write().unwrap();
        self.kv.set(NOTES_KEY, &snapshot.notes)?;
        self.persist_tasks(&tasks)?;
        state.notes = snapshot.notes.clone();
        state.tasks = tasks;
        Ok(())
    }

    fn persist_tasks(&self, tasks: &[Task]) -> Result<(), StorageError> {
        // Task serialization cannot fail; the list is plain data.
        let raw = serde_json::to_string(tasks).expect("task list serializes");
        self.kv.set(TASKS_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::storage::MemoryKeyValue;

    fn open_store() -> StateStore<MemoryKeyValue> {
        StateStore::open(MemoryKeyValue::new()).unwrap()
    }

    #[test]
    fn test_defaults_when_nothing_persisted() {
        let store = open_store();
        assert_eq!(store.notes(), "");
        assert!(store.tasks().is_empty());
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn test_set_notes_roundtrip() {
        let store = open_store();
        store.set_notes("# Title\n\nbody").unwrap();
        assert_eq!(store.notes(), "# Title\n\nbody");

        // Empty string is accepted.
        store.set_notes("").unwrap();
        assert_eq!(store.notes(), "");
    }

    #[test]
    fn test_set_tasks_filters_invalid() {
        let store = open_store();
        store
            .set_tasks(vec![
                Task::new("  "),
                Task::new("Buy milk").with_priority(Priority::High),
            ])
            .unwrap();

        let tasks = store.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Buy milk");
        assert_eq!(store.pending_count(), 1);
    }

    #[test]
    fn test_set_tasks_idempotent_on_valid_subset() {
        let store = open_store();
        let input = vec![Task::new("a"), Task::new(""), Task::new("b")];
        store.set_tasks(input).unwrap();
        let once = store.tasks();

        store.set_tasks(once.clone()).unwrap();
        assert_eq!(store.tasks(), once);
    }

    #[test]
    fn test_state_survives_reopen() {
        let kv = MemoryKeyValue::new();
        {
            let store = StateStore::open(kv.clone()).unwrap();
            store.set_notes("persisted").unwrap();
            store.set_tasks(vec![Task::new("t")]).unwrap();
        }
        let reopened = StateStore::open(kv).unwrap();
        assert_eq!(reopened.notes(), "persisted");
        assert_eq!(reopened.tasks().len(), 1);
    }

    #[test]
    fn test_clear_all_resets_both() {
        let store = open_store();
        store.set_notes("notes").unwrap();
        store.set_tasks(vec![Task::new("t")]).unwrap();

        store.clear_all().unwrap();
        let (notes, tasks) = store.snapshot_state();
        assert_eq!(notes, "");
        assert!(tasks.is_empty());
        assert_eq!(store.badge_count(), None);
    }

    #[test]
    fn test_badge_count_absent_at_zero() {
        let store = open_store();
        assert_eq!(store.badge_count(), None);

        store.set_tasks(vec![Task::new("open")]).unwrap();
        assert_eq!(store.badge_count(), Some(1));

        store
            .set_tasks(vec![Task::new("open").with_done(true)])
            .unwrap();
        assert_eq!(store.badge_count(), None);
    }

    #[test]
    fn test_apply_snapshot_filters_and_replaces() {
        let store = open_store();
        store.set_notes("old").unwrap();
        store.set_tasks(vec![Task::new("old task")]).unwrap();

        let snapshot = Snapshot::for_export(
            "new".to_string(),
            vec![Task::new(""), Task::new("new task")],
        );
        store.apply_snapshot(&snapshot).unwrap();

        assert_eq!(store.notes(), "new");
        let tasks = store.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "new task");
    }

    #[test]
    fn test_unreadable_task_list_falls_back_to_empty() {
        let kv = MemoryKeyValue::new();
        kv.set(TASKS_KEY, "not json").unwrap();
        let store = StateStore::open(kv).unwrap();
        assert!(store.tasks().is_empty());
    }
}
