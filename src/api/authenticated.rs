//! API client bound to one access token.
//!
//! `AuthenticatedClient` wraps an `ApiClient` and supplies the stored token
//! to every call, so callers do not thread it through each upload.

use std::path::Path;
use std::sync::Arc;

use tokio::time::Instant;

use super::client::ApiClient;
use super::http::{HttpTransport, ReqwestTransport, TransportError};
use super::types::MediaId;
use super::upload_media::MediaKind;
use crate::config::ClientConfig;
use crate::error::UploadError;
use crate::media::FileChunk;

/// API client with a stored access token.
///
/// Cloning is cheap and shares the underlying transport, so its connection
/// pool is reused across clones.
pub struct AuthenticatedClient<T = ReqwestTransport> {
    inner: Arc<ApiClient<T>>,
    access_token: String,
}

impl<T> Clone for AuthenticatedClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            access_token: self.access_token.clone(),
        }
    }
}

impl AuthenticatedClient<ReqwestTransport> {
    /// Create a client backed by a reqwest transport.
    pub fn new(config: ClientConfig, access_token: String) -> Result<Self, TransportError> {
        Ok(Self::from_client(ApiClient::new(config)?, access_token))
    }
}

impl<T: HttpTransport> AuthenticatedClient<T> {
    /// Create from an existing ApiClient (for testing or custom transports).
    pub fn from_client(client: ApiClient<T>, access_token: String) -> Self {
        Self {
            inner: Arc::new(client),
            access_token,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn inner(&self) -> &ApiClient<T> {
        &self.inner
    }

    /// Chunked upload of `chunks` into `media_id`.
    pub async fn upload_large_media(
        &self,
        media_id: &str,
        file_name: &str,
        chunks: &[FileChunk],
    ) -> Result<MediaId, UploadError> {
        self.inner
            .upload_large_media(&self.access_token, media_id, file_name, chunks)
            .await
    }

    /// Chunked upload abandoned once `deadline` passes.
    pub async fn upload_large_media_with_deadline(
        &self,
        media_id: &str,
        file_name: &str,
        chunks: &[FileChunk],
        deadline: Instant,
    ) -> Result<MediaId, UploadError> {
        self.inner
            .upload_large_media_with_deadline(
                &self.access_token,
                media_id,
                file_name,
                chunks,
                deadline,
            )
            .await
    }

    /// Single-request upload of `path` into `media_id`.
    pub async fn upload_media(
        &self,
        media_id: &str,
        path: &Path,
        kind: MediaKind,
    ) -> Result<MediaId, UploadError> {
        self.inner
            .upload_media(&self.access_token, media_id, path, kind)
            .await
    }
}

impl<T> std::fmt::Debug for AuthenticatedClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
