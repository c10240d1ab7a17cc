//! Remote document backends.
//!
//! [`RemoteStore`] is the network seam; [`HttpRemote`] talks to a document
//! service over HTTP with bearer-token auth. The snapshot payload is
//! stored as the content of a single named file within the remote
//! document.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::error::SyncError;
use crate::models::Snapshot;

/// Name of the file holding the snapshot inside the remote document.
pub const DOCUMENT_FILE_NAME: &str = "sidepad.json";

/// Timeout applied to every remote call. The observed upstream behavior
/// had none; a bounded wait is deliberate here so a dead remote cannot
/// hang a sync forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create-or-update access to the remote document service.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Creates a new remote document holding the payload; returns its id.
    async fn create_document(&self, token: &str, payload: &Snapshot)
        -> Result<String, SyncError>;

    /// Replaces the content of an existing remote document.
    async fn update_document(
        &self,
        token: &str,
        id: &str,
        payload: &Snapshot,
    ) -> Result<(), SyncError>;
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    id: String,
}

/// HTTP client for the document service.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    api_base: String,
    client: reqwest::Client,
}

impl HttpRemote {
    /// `api_base` is the service root, e.g. `https://sync.example.com`.
    pub fn new(api_base: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn documents_url(&self) -> String {
        format!("{}/documents", self.api_base)
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/documents/{}", self.api_base, id)
    }

    /// Request body: the snapshot JSON as the content of one named file.
    fn document_body(payload: &Snapshot) -> Result<serde_json::Value, SyncError> {
        let content = serde_json::to_string_pretty(payload)
            .map_err(|e| SyncError::Http(e.to_string()))?;
        Ok(json!({
            "description": "Sidepad scratchpad",
            "files": {
                DOCUMENT_FILE_NAME: { "content": content }
            }
        }))
    }

    /// Maps a non-success response to [`SyncError::Remote`], preferring
    /// the server-provided `message` field over a generic status line.
    async fn failure(response: reqwest::Response) -> SyncError {
        let status = response.status();
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            });
        match message {
            Some(msg) => SyncError::Remote(msg),
            None => SyncError::Remote(format!("Server returned status {}", status)),
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn create_document(
        &self,
        token: &str,
        payload: &Snapshot,
    ) -> Result<String, SyncError> {
        let response = self
            .client
            .post(self.documents_url())
            .header("Authorization", format!("Bearer {}", token))
            .json(&Self::document_body(payload)?)
            .send()
            .await
            .map_err(|e| SyncError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }

        let created: CreateResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Http(e.to_string()))?;
        Ok(created.id)
    }

    async fn update_document(
        &self,
        token: &str,
        id: &str,
        payload: &Snapshot,
    ) -> Result<(), SyncError> {
        let response = self
            .client
            .patch(self.document_url(id))
            .header("Authorization", format!("Bearer {}", token))
            .json(&Self::document_body(payload)?)
            .send()
            .await
            .map_err(|e| SyncError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }
        Ok(())
    }
}
