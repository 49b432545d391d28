//! API response envelopes for the media upload endpoints.
//!
//! Unknown fields are ignored: the platform adds keys to these payloads
//! over time and older clients must keep parsing them.

use serde::Deserialize;

/// Identifier of an uploaded media object.
pub type MediaId = String;

/// `request_status` value reported on success.
pub const REQUEST_STATUS_SUCCESS: &str = "success";

/// Upload session returned by the chunked upload `INIT` call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadSession {
    pub upload_id: String,
    /// Path every part except the last is posted to.
    pub add_path: String,
    /// Path the last part is posted to.
    pub finalize_path: String,
}

/// Media envelope nested in a successful upload response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub download_link: Option<String>,
}

/// Terminal response of a finalize call or a single-request upload.
#[derive(Debug, Clone, Deserialize)]
pub struct FinalUploadResult {
    pub request_status: String,
    #[serde(default)]
    pub result: Option<MediaResult>,
    /// Some deployments put the id at the top level instead of under `result`.
    #[serde(default)]
    pub id: Option<String>,
}

impl FinalUploadResult {
    pub fn is_success(&self) -> bool {
        self.request_status
            .eq_ignore_ascii_case(REQUEST_STATUS_SUCCESS)
    }

    /// The media id, preferring `result.id` over the top-level `id`.
    pub fn media_id(&self) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|result| result.id.as_deref())
            .or(self.id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ignores_unknown_fields() {
        let json = r#"{
            "request_status": "SUCCESS",
            "request_id": "5e8f",
            "upload_id": "u-42",
            "add_path": "/us/v1/media/m/multipart-upload-v2?action=ADD",
            "finalize_path": "/us/v1/media/m/multipart-upload-v2?action=FINALIZE",
            "expires_at": "2026-01-01T00:00:00Z"
        }"#;
        let session: UploadSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.upload_id, "u-42");
        assert!(session.add_path.ends_with("action=ADD"));
        assert!(session.finalize_path.ends_with("action=FINALIZE"));
    }

    #[test]
    fn test_session_requires_paths() {
        let json = r#"{"upload_id": "u-42"}"#;
        assert!(serde_json::from_str::<UploadSession>(json).is_err());
    }

    #[test]
    fn test_final_result_nested_id() {
        let json = r#"{
            "request_status": "SUCCESS",
            "result": {"id": "7536bbc5-0074-4dc4-b654-5ba9cd9f9441", "download_link": "https://x"}
        }"#;
        let result: FinalUploadResult = serde_json::from_str(json).unwrap();
        assert!(result.is_success());
        assert_eq!(result.media_id(), Some("7536bbc5-0074-4dc4-b654-5ba9cd9f9441"));
    }

    #[test]
    fn test_final_result_top_level_id() {
        let json = r#"{"request_status": "success", "id": "X"}"#;
        let result: FinalUploadResult = serde_json::from_str(json).unwrap();
        assert!(result.is_success());
        assert_eq!(result.media_id(), Some("X"));
    }

    #[test]
    fn test_final_result_failure_status() {
        let json = r#"{"request_status": "ERROR", "id": "X"}"#;
        let result: FinalUploadResult = serde_json::from_str(json).unwrap();
        assert!(!result.is_success());
    }
}
