//! Remote synchronization of the scratchpad state.
//!
//! The engine reconciles the local store with exactly one remote document
//! under create-then-remember-id, update-thereafter semantics:
//!
//! 1. Obtain an auth token from the host's auth collaborator.
//! 2. With no remembered document id, create the remote document and
//!    persist the returned id before reporting success.
//! 3. With a remembered id, update that document with the same payload
//!    shape. Repeating an update with unchanged content succeeds.
//!
//! Disconnecting forgets the id only; the remote document is never
//! deleted, and the next sync creates a fresh one.

mod engine;
mod error;
mod remote;

pub use engine::{RemoteTarget, SyncEngine, SyncReport, TokenProvider, REMOTE_ID_KEY};
pub use error::SyncError;
pub use remote::{HttpRemote, RemoteStore, DOCUMENT_FILE_NAME};
