use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
use super::status::{is_success, status_message};
use crate::config::ClientConfig;
use crate::error::UploadError;

/// API client for the Marketing API media endpoints
pub struct ApiClient<T = ReqwestTransport> {
    pub(super) transport: T,
    pub(super) config: ClientConfig,
}

impl ApiClient<ReqwestTransport> {
    /// Create a client backed by a pooled reqwest transport
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let transport =
            ReqwestTransport::new(config.request_timeout, config.user_agent.clone())?;
        Ok(Self { transport, config })
    }
}

impl<T: HttpTransport> ApiClient<T> {
    /// Create a client over a caller-supplied transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve an endpoint against the base URL.
    ///
    /// Relative endpoints keep the base path; absolute paths such as the
    /// `add_path` returned by the API replace it.
    pub(super) fn build_url(&self, endpoint: &str) -> Result<Url, UploadError> {
        self.config.base_url.join(endpoint).map_err(|e| {
            UploadError::MalformedResponse(format!("invalid endpoint {:?}: {}", endpoint, e))
        })
    }

    /// `{base}media/{media_id}/{action}`, with `media_id` encoded as one path segment.
    pub(super) fn media_url(&self, media_id: &str, action: &str) -> Result<Url, UploadError> {
        let mut url = self.build_url("media/")?;
        url.path_segments_mut()
            .map_err(|_| {
                UploadError::MalformedResponse(format!(
                    "base URL cannot carry a path: {}",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .push(media_id)
            .push(action);
        Ok(url)
    }

    /// Execute a request and fail with `RemoteRejected` on any status but 200.
    pub(super) async fn execute_checked(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, UploadError> {
        let url = request.url.clone();
        let response = self.transport.execute(request).await?;

        if !is_success(response.status) {
            debug!(
                "Request to {} rejected: {} ({})",
                url,
                response.status,
                status_message(response.status)
            );
            return Err(UploadError::remote(response.status));
        }

        Ok(response)
    }

    /// Execute a request and parse its 200 body as JSON.
    pub(super) async fn execute_json<R>(&self, request: HttpRequest) -> Result<R, UploadError>
    where
        R: DeserializeOwned,
    {
        let response = self.execute_checked(request).await?;
        serde_json::from_slice(&response.body)
            .map_err(|e| UploadError::MalformedResponse(format!("failed to parse API response: {}", e)))
    }
}

/// Validate the arguments shared by every media endpoint, in reporting order.
pub(super) fn require_token_and_media(access_token: &str, media_id: &str) -> Result<(), UploadError> {
    if access_token.trim().is_empty() {
        return Err(UploadError::missing_credential());
    }
    if media_id.trim().is_empty() {
        return Err(UploadError::invalid("Media ID is missing"));
    }
    Ok(())
}
