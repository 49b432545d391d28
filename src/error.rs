//! Error types surfaced by the media upload endpoints.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::TransportError;

/// Code attached to [`UploadError::UploadFailed`]. It is never a real HTTP status.
pub const UPLOAD_FAILED_CODE: i32 = -1;

/// Every way an upload call can fail.
///
/// The variants separate "could not reach the API" (`TransportFailure`),
/// "the API answered with a non-200 status" (`RemoteRejected`) and
/// "the API accepted the parts but declared the assembled media invalid"
/// (`UploadFailed`).
#[derive(Debug, Error)]
pub enum UploadError {
    /// No access token was supplied.
    #[error("{0}")]
    MissingCredential(String),

    /// An argument or a chunk failed validation. Raised before any request is sent.
    #[error("{0}")]
    InvalidArgument(String),

    /// The request could not be executed (DNS, connect, timeout, deadline).
    #[error("transport failure: {0}")]
    TransportFailure(#[from] TransportError),

    /// The API answered with a status other than 200.
    #[error("{message}")]
    RemoteRejected { status: u16, message: String },

    /// The finalize step answered 200 but reported the upload as failed.
    #[error("Upload large media failed")]
    UploadFailed,

    /// A 200 response whose body does not match the documented shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A local chunk file could not be inspected or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UploadError {
    /// Numeric code for programmatic branching.
    ///
    /// `RemoteRejected` carries its HTTP status, `UploadFailed` carries
    /// [`UPLOAD_FAILED_CODE`]. Other variants have no code.
    pub fn code(&self) -> Option<i32> {
        match self {
            UploadError::RemoteRejected { status, .. } => Some(i32::from(*status)),
            UploadError::UploadFailed => Some(UPLOAD_FAILED_CODE),
            _ => None,
        }
    }

    pub(crate) fn missing_credential() -> Self {
        UploadError::MissingCredential("The OAuthAccessToken must to be given".to_string())
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        UploadError::InvalidArgument(message.into())
    }

    pub(crate) fn remote(status: u16) -> Self {
        UploadError::RemoteRejected {
            status,
            message: crate::api::status_message(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_failed_code_and_message() {
        let err = UploadError::UploadFailed;
        assert_eq!(err.to_string(), "Upload large media failed");
        assert_eq!(err.code(), Some(-1));
    }

    #[test]
    fn test_remote_rejected_uses_status_table() {
        let err = UploadError::remote(429);
        assert_eq!(err.to_string(), "Too Many Requests / Rate limit reached");
        assert_eq!(err.code(), Some(429));
    }

    #[test]
    fn test_validation_errors_have_no_code() {
        assert_eq!(UploadError::missing_credential().code(), None);
        assert_eq!(UploadError::invalid("Media ID is missing").code(), None);
    }
}
