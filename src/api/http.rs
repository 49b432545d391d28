//! HTTP execution seam.
//!
//! Endpoints build an [`HttpRequest`] and hand it to an [`HttpTransport`]. The
//! production transport is [`ReqwestTransport`]; tests substitute a recording
//! fake so request sequences can be asserted without a server.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// Failure to execute a request at all, as opposed to a non-200 answer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("deadline exceeded before the upload completed")]
    DeadlineExceeded,
}

/// Value of one multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

/// One named multipart field. Fields are sent in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

/// A request ready to be executed by a transport.
#[derive(Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub bearer_token: Option<String>,
    pub request_id: String,
    pub form: Vec<FormField>,
}

impl HttpRequest {
    pub fn post(url: Url) -> Self {
        Self {
            method: Method::POST,
            url,
            bearer_token: None,
            request_id: Uuid::new_v4().to_string(),
            form: Vec::new(),
        }
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.form.push(FormField {
            name: name.to_string(),
            value: FormValue::Text(value.into()),
        });
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        self.form.push(FormField {
            name: name.to_string(),
            value: FormValue::File {
                file_name: file_name.to_string(),
                bytes,
            },
        });
        self
    }

    /// Value of a text field, if present.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.form.iter().find_map(|field| match &field.value {
            FormValue::Text(value) if field.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Bytes of a file field, if present.
    pub fn file_field(&self, name: &str) -> Option<&[u8]> {
        self.form.iter().find_map(|field| match &field.value {
            FormValue::File { bytes, .. } if field.name == name => Some(bytes.as_slice()),
            _ => None,
        })
    }
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_id", &self.request_id)
            .field("form", &self.form)
            .finish()
    }
}

/// Status and raw body of an executed request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Executes requests. Implementations must not retry: a failed part aborts the upload.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`HttpTransport`] backed by a pooled `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    user_agent: String,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: String) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, user_agent })
    }

    fn build_form(fields: Vec<FormField>) -> Form {
        fields.into_iter().fold(Form::new(), |form, field| match field.value {
            FormValue::Text(value) => form.text(field.name, value),
            FormValue::File { file_name, bytes } => {
                form.part(field.name, Part::bytes(bytes).file_name(file_name))
            }
        })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("=== API Request ===");
        debug!("{} {}", request.method, request.url);
        debug!("Request ID: {}", request.request_id);

        let mut builder = self
            .client
            .request(request.method, request.url)
            .header("User-Agent", &self.user_agent)
            .header("x-request-id", &request.request_id);

        if let Some(token) = request.bearer_token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if !request.form.is_empty() {
            builder = builder.multipart(Self::build_form(request.form));
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!("=== API Response ===");
        debug!("Status: {}", status);

        Ok(HttpResponse { status, body })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_keeps_field_order() {
        let url = Url::parse("https://adsapi.snapchat.com/v1/media/m/upload").unwrap();
        let request = HttpRequest::post(url)
            .bearer("token")
            .text("upload_id", "u-1")
            .file("file", "clip.mp4", vec![1, 2, 3])
            .text("part_number", "1");

        let names: Vec<&str> = request.form.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["upload_id", "file", "part_number"]);
        assert_eq!(request.text_field("part_number"), Some("1"));
        assert_eq!(request.text_field("file"), None);
        assert_eq!(request.file_field("file"), Some(&[1u8, 2, 3][..]));
        assert_eq!(request.bearer_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_request_debug_redacts_token() {
        let url = Url::parse("https://adsapi.snapchat.com/v1/").unwrap();
        let request = HttpRequest::post(url).bearer("secret-token-123");

        let debug_str = format!("{:?}", request);
        assert!(!debug_str.contains("secret-token-123"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let url = Url::parse("https://adsapi.snapchat.com/v1/").unwrap();
        let a = HttpRequest::post(url.clone());
        let b = HttpRequest::post(url);
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_debug_omits_client_internals() {
        let transport =
            ReqwestTransport::new(Duration::from_secs(5), "snapads-rust/test".to_string()).unwrap();
        let debug_str = format!("{:?}", transport);
        assert!(debug_str.contains("snapads-rust/test"));
    }
}
