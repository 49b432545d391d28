//! Single-request upload for media small enough to send at once.

use std::path::Path;

use tracing::{debug, info};

use super::client::{require_token_and_media, ApiClient};
use super::http::{HttpRequest, HttpTransport};
use super::types::{FinalUploadResult, MediaId};
use super::upload_large_media::interpret_final_result;
use crate::config::format_megabytes;
use crate::error::UploadError;
use crate::media::FileChunk;

/// Kind of media sent through [`ApiClient::upload_media`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Subject to `config.max_image_size`
    Image,
    Video,
}

impl<T: HttpTransport> ApiClient<T> {
    /// Upload `path` as the content of `media_id` in one request.
    pub async fn upload_media(
        &self,
        access_token: &str,
        media_id: &str,
        path: &Path,
        kind: MediaKind,
    ) -> Result<MediaId, UploadError> {
        require_token_and_media(access_token, media_id)?;

        let file = FileChunk::whole(path);
        if kind == MediaKind::Image {
            let size = file.size().await?;
            if size > self.config.max_image_size {
                return Err(UploadError::invalid(format!(
                    "The image's max length mustn't exceed {}",
                    format_megabytes(self.config.max_image_size)
                )));
            }
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| media_id.to_string());
        let bytes = file.read().await?;
        debug!("Uploading {} bytes to media {}", bytes.len(), media_id);

        let request = HttpRequest::post(self.media_url(media_id, "upload")?)
            .bearer(access_token)
            .file("file", &file_name, bytes);
        let result: FinalUploadResult = self.execute_json(request).await?;

        let uploaded = interpret_final_result(result)?;
        info!("Media {} uploaded", uploaded);
        Ok(uploaded)
    }
}
