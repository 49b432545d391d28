//! Snapchat Marketing API client.
//!
//! The interesting part is [`ApiClient::upload_large_media`](api::ApiClient::upload_large_media),
//! which drives the chunked media upload: open a session, post each part in
//! order, then interpret the finalize response.

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod media;

pub use api::{ApiClient, AuthenticatedClient, MediaId, MediaKind};
pub use config::ClientConfig;
pub use error::UploadError;
pub use media::{split_file, FileChunk};
