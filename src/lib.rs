//! Sidepad core library
//!
//! Durability and synchronization engine for a sidebar scratchpad:
//! freeform notes plus a prioritized task list, with scheduled filesystem
//! backups, create-or-update sync against one remote document, and a pure
//! text-to-markup transform. The rendering surface and the host's
//! persistence, auth, and network capabilities are external collaborators
//! behind the traits in [`storage`] and [`sync`].

pub mod backup;
pub mod config;
pub mod markup;
pub mod models;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;

pub use backup::{BackupError, BackupScheduler, DEFAULT_RETENTION};
pub use config::{Config, ConfigError};
pub use markup::render_markup;
pub use models::{
    badge_count, pending_count, retain_valid, sorted_for_display, Priority, Snapshot, Task,
    SNAPSHOT_VERSION,
};
pub use storage::{FileKeyValue, KeyValueStore, MemoryKeyValue, StorageError};
pub use store::{StateStore, NOTES_KEY, TASKS_KEY};
pub use sync::{
    HttpRemote, RemoteStore, RemoteTarget, SyncEngine, SyncError, SyncReport, TokenProvider,
};
pub use transfer::{export_to, import_from, TransferError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
