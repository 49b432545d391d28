//! Chunked upload for media too large for a single request.
//!
//! The protocol has three phases:
//! 1. `INIT` opens an upload session and returns the paths parts go to.
//! 2. Every part but the last is posted to `add_path`, in order.
//! 3. The last part is posted to `finalize_path` with `final=true`; its
//!    response says whether the assembled media was accepted.
//!
//! Parts are sent one at a time and never retried: any failure aborts the
//! whole upload, and the caller restarts it from scratch.

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::client::{require_token_and_media, ApiClient};
use super::http::{HttpRequest, HttpTransport, TransportError};
use super::types::{FinalUploadResult, MediaId, UploadSession};
use crate::config::format_megabytes;
use crate::error::UploadError;
use crate::media::FileChunk;

const MULTIPART_UPLOAD_ACTION: &str = "multipart-upload-v2";

impl<T: HttpTransport> ApiClient<T> {
    /// Upload `chunks` as the content of `media_id`, returning the resulting media id.
    ///
    /// Uses `config.upload_deadline` as the overall deadline when one is set.
    pub async fn upload_large_media(
        &self,
        access_token: &str,
        media_id: &str,
        file_name: &str,
        chunks: &[FileChunk],
    ) -> Result<MediaId, UploadError> {
        match self.config.upload_deadline {
            Some(limit) => {
                self.upload_large_media_with_deadline(
                    access_token,
                    media_id,
                    file_name,
                    chunks,
                    Instant::now() + limit,
                )
                .await
            }
            None => {
                self.run_large_upload(access_token, media_id, file_name, chunks)
                    .await
            }
        }
    }

    /// Same as [`upload_large_media`](Self::upload_large_media), abandoned once `deadline` passes.
    pub async fn upload_large_media_with_deadline(
        &self,
        access_token: &str,
        media_id: &str,
        file_name: &str,
        chunks: &[FileChunk],
        deadline: Instant,
    ) -> Result<MediaId, UploadError> {
        let upload = self.run_large_upload(access_token, media_id, file_name, chunks);
        match tokio::time::timeout_at(deadline, upload).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Chunked upload of media {} exceeded its deadline", media_id);
                Err(TransportError::DeadlineExceeded.into())
            }
        }
    }

    async fn run_large_upload(
        &self,
        access_token: &str,
        media_id: &str,
        file_name: &str,
        chunks: &[FileChunk],
    ) -> Result<MediaId, UploadError> {
        let total_size = self
            .validate_large_upload(access_token, media_id, file_name, chunks)
            .await?;

        info!(
            "Uploading media {} as {} ({} parts, {} bytes)",
            media_id,
            file_name,
            chunks.len(),
            total_size
        );

        let session = self
            .initiate_large_upload(access_token, media_id, file_name, total_size, chunks.len())
            .await?;
        let uploaded = self
            .send_chunks(access_token, media_id, chunks, &session)
            .await?;

        info!("Media {} uploaded", uploaded);
        Ok(uploaded)
    }

    /// Check every argument before any request is sent. Returns the total size.
    async fn validate_large_upload(
        &self,
        access_token: &str,
        media_id: &str,
        file_name: &str,
        chunks: &[FileChunk],
    ) -> Result<u64, UploadError> {
        require_token_and_media(access_token, media_id)?;
        if file_name.trim().is_empty() {
            return Err(UploadError::invalid("Media's filename is missing"));
        }
        if chunks.is_empty() {
            return Err(UploadError::invalid("Chunks file not providen"));
        }

        let limit = self.config.max_chunk_size;
        let mut total = 0u64;
        for (index, chunk) in chunks.iter().enumerate() {
            let size = chunk.size().await?;
            if size > limit {
                return Err(UploadError::invalid(format!(
                    "The chunk's n°{} max length mustn't exceed {}",
                    index + 1,
                    format_megabytes(limit)
                )));
            }
            total += size;
        }

        Ok(total)
    }

    /// Phase 1: open an upload session for `media_id`.
    pub async fn initiate_large_upload(
        &self,
        access_token: &str,
        media_id: &str,
        file_name: &str,
        total_size: u64,
        number_of_parts: usize,
    ) -> Result<UploadSession, UploadError> {
        let mut url = self.media_url(media_id, MULTIPART_UPLOAD_ACTION)?;
        url.query_pairs_mut().append_pair("action", "INIT");

        let request = HttpRequest::post(url)
            .bearer(access_token)
            .text("file_name", file_name)
            .text("file_size", total_size.to_string())
            .text("number_of_parts", number_of_parts.to_string());

        let session: UploadSession = self.execute_json(request).await?;
        debug!("Upload session {} opened for media {}", session.upload_id, media_id);
        Ok(session)
    }

    /// Phase 2: post `chunks` in order, the last one to the finalize path.
    pub async fn send_chunks(
        &self,
        access_token: &str,
        media_id: &str,
        chunks: &[FileChunk],
        session: &UploadSession,
    ) -> Result<MediaId, UploadError> {
        let Some((last, rest)) = chunks.split_last() else {
            return Err(UploadError::invalid("Chunks file not providen"));
        };

        for (index, chunk) in rest.iter().enumerate() {
            let request = self
                .part_request(access_token, &session.add_path, session, chunk, index + 1)
                .await?;
            self.execute_checked(request).await?;
            debug!("Media {}: part {}/{} sent", media_id, index + 1, chunks.len());
        }

        let request = self
            .part_request(access_token, &session.finalize_path, session, last, chunks.len())
            .await?
            .text("final", "true");
        let result: FinalUploadResult = self.execute_json(request).await?;
        debug!(
            "Media {}: finalize answered request_status={}",
            media_id, result.request_status
        );

        interpret_final_result(result)
    }

    async fn part_request(
        &self,
        access_token: &str,
        path: &str,
        session: &UploadSession,
        chunk: &FileChunk,
        part_number: usize,
    ) -> Result<HttpRequest, UploadError> {
        let url = self.build_url(path)?;
        let bytes = chunk.read().await?;
        // the file may have grown since validation
        let limit = self.config.max_chunk_size;
        if bytes.len() as u64 > limit {
            return Err(UploadError::invalid(format!(
                "The chunk's n°{} max length mustn't exceed {}",
                part_number,
                format_megabytes(limit)
            )));
        }
        let part_name = chunk
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("part-{}", part_number));

        Ok(HttpRequest::post(url)
            .bearer(access_token)
            .file("file", &part_name, bytes)
            .text("part_number", part_number.to_string())
            .text("upload_id", session.upload_id.as_str()))
    }
}

/// Phase 3: turn a finalize response into the uploaded media id.
///
/// Any `request_status` other than success is an [`UploadError::UploadFailed`],
/// whatever else the body contains.
pub fn interpret_final_result(result: FinalUploadResult) -> Result<MediaId, UploadError> {
    if !result.is_success() {
        warn!(
            "Upload rejected after finalize: request_status={}",
            result.request_status
        );
        return Err(UploadError::UploadFailed);
    }

    result
        .media_id()
        .map(ToOwned::to_owned)
        .ok_or_else(|| UploadError::MalformedResponse("upload succeeded without a media id".to_string()))
}
