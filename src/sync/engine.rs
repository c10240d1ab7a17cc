//! The sync engine: create-or-update reconciliation against one remote
//! document.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::SyncError;
use super::remote::RemoteStore;
use crate::models::Snapshot;
use crate::storage::KeyValueStore;
use crate::store::StateStore;

/// Key under which the remote document id is persisted.
pub const REMOTE_ID_KEY: &str = "sidepad.remoteDocumentId";

/// Identity of the remote document.
///
/// An explicit two-state tag rather than an optional string: the no-remote
/// path can never be confused with an empty-string id, and the
/// create-vs-update branch is exhaustive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTarget {
    NoRemote,
    Remote(String),
}

/// Host-provided auth token acquisition.
///
/// `interactive = true` may prompt the user; `interactive = false` must
/// not. Returns `None` when no token is available. Token lifecycle
/// (refresh, revocation, persistence) is the provider's concern.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self, interactive: bool) -> Option<String>;
}

/// Outcome of a successful sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncReport {
    /// A remote document was created and its id remembered.
    Created { document_id: String },
    /// The remembered remote document was updated.
    Updated { document_id: String },
}

impl SyncReport {
    pub fn document_id(&self) -> &str {
        match self {
            SyncReport::Created { document_id } | SyncReport::Updated { document_id } => {
                document_id
            }
        }
    }
}

/// Reconciles local state with a single remote document.
///
/// Overlapping `sync` calls are not guarded here; the collaborator issuing
/// the calls is responsible for not overlapping them.
pub struct SyncEngine<S: KeyValueStore, R: RemoteStore, A: TokenProvider> {
    store: Arc<StateStore<S>>,
    kv: S,
    remote: R,
    auth: A,
}

impl<S: KeyValueStore, R: RemoteStore, A: TokenProvider> SyncEngine<S, R, A> {
    /// `kv` must share its backing with the store's key/value capability
    /// (clones of `FileKeyValue`/`MemoryKeyValue` do).
    pub fn new(store: Arc<StateStore<S>>, kv: S, remote: R, auth: A) -> Self {
        Self {
            store,
            kv,
            remote,
            auth,
        }
    }

    /// Current remote document identity.
    pub fn remote_target(&self) -> Result<RemoteTarget, SyncError> {
        match self.kv.get(REMOTE_ID_KEY)? {
            Some(id) if !id.is_empty() => Ok(RemoteTarget::Remote(id)),
            _ => Ok(RemoteTarget::NoRemote),
        }
    }

    /// Pushes the current state to the remote document.
    ///
    /// With no token available this returns [`SyncError::NotAuthenticated`]
    /// and changes nothing; the caller decides whether to retry with
    /// `interactive = true`. On the first successful create, the returned
    /// document id is persisted before success is reported.
    pub async fn sync(&self, interactive: bool) -> Result<SyncReport, SyncError> {
        let token = self
            .auth
            .token(interactive)
            .await
            .ok_or(SyncError::NotAuthenticated)?;

        let (notes, tasks) = self.store.snapshot_state();
        let payload = Snapshot::for_sync(notes, tasks);

        match self.remote_target()? {
            RemoteTarget::NoRemote => {
                let document_id = self.remote.create_document(&token, &payload).await?;
                // Persist before reporting success. A crash between the
                // remote create and this write is the one accepted window
                // of duplicate-create risk.
                self.kv.set(REMOTE_ID_KEY, &document_id)?;
                tracing::info!("created remote document {}", document_id);
                Ok(SyncReport::Created { document_id })
            }
            RemoteTarget::Remote(document_id) => {
                self.remote
                    .update_document(&token, &document_id, &payload)
                    .await?;
                tracing::debug!("updated remote document {}", document_id);
                Ok(SyncReport::Updated { document_id })
            }
        }
    }

    /// Forgets the remote document id. The remote document itself is never
    /// deleted and the auth token is untouched; the next sync will create
    /// a new document.
    ///
    /// Returns whether an id was actually cleared.
    pub fn disconnect(&self) -> Result<bool, SyncError> {
        let had_remote = matches!(self.remote_target()?, RemoteTarget::Remote(_));
        if had_remote {
            self.kv.remove(REMOTE_ID_KEY)?;
            tracing::info!("disconnected from remote document");
        }
        Ok(had_remote)
    }
}
