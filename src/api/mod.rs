//! Client for the Snapchat Marketing API media endpoints.
//!
//! Requests go through the [`HttpTransport`] seam; every non-200 status is
//! interpreted by [`status_message`].

mod authenticated;
mod client;
mod http;
mod status;
mod types;
mod upload_large_media;
mod upload_media;

#[cfg(test)]
mod testing;

pub use authenticated::AuthenticatedClient;
pub use client::ApiClient;
pub use http::{
    FormField, FormValue, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
    TransportError,
};
pub use status::{is_success, status_message, HTTP_OK};
pub use types::{FinalUploadResult, MediaId, MediaResult, UploadSession, REQUEST_STATUS_SUCCESS};
pub use upload_large_media::interpret_final_result;
pub use upload_media::MediaKind;
