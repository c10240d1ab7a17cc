//! Sync error types.

/// Errors that can occur during a sync operation.
#[derive(Debug)]
pub enum SyncError {
    /// No auth token is available. Recoverable: the caller may retry with
    /// an interactive token request, or abort with no state change.
    NotAuthenticated,
    /// The remote rejected the request; carries the server-provided
    /// message when one was present, otherwise a generic status line.
    Remote(String),
    /// Transport-level failure reaching the remote.
    Http(String),
    /// Reading or writing the persisted sync state failed.
    Storage(String),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::NotAuthenticated => {
                write!(f, "Not signed in. Run sync again to authenticate.")
            }
            SyncError::Remote(msg) => write!(f, "Sync failed: {}", msg),
            SyncError::Http(e) => write!(f, "Connection error: {}", e),
            SyncError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<crate::storage::StorageError> for SyncError {
    fn from(e: crate::storage::StorageError) -> Self {
        SyncError::Storage(e.to_string())
    }
}
