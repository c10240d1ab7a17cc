mod snapshot;
mod task;

pub use snapshot::{now_iso, Snapshot, SNAPSHOT_VERSION};
pub use task::{badge_count, pending_count, retain_valid, sorted_for_display, Priority, Task};
