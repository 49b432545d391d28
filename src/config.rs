//! Client configuration.
//!
//! Defaults mirror the limits the Marketing API documented at the time of
//! writing. Every value can be overridden from the environment, so a change on
//! the platform side does not require a new release.

use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// Default API root. Paths such as `media/{id}/upload` are joined onto it.
pub const DEFAULT_BASE_URL: &str = "https://adsapi.snapchat.com/v1/";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Largest part accepted by the chunked upload (31.8 MB)
pub const DEFAULT_MAX_CHUNK_SIZE: u64 = 31_800_000;

/// Largest image accepted by the single-request upload (5 MB)
pub const DEFAULT_MAX_IMAGE_SIZE: u64 = 5_000_000;

pub const BASE_URL_ENV: &str = "SNAPADS_BASE_URL";
pub const TIMEOUT_ENV: &str = "SNAPADS_TIMEOUT_SECS";
pub const USER_AGENT_ENV: &str = "SNAPADS_USER_AGENT";
pub const MAX_CHUNK_ENV: &str = "SNAPADS_MAX_CHUNK_BYTES";
pub const MAX_IMAGE_ENV: &str = "SNAPADS_MAX_IMAGE_BYTES";
pub const UPLOAD_DEADLINE_ENV: &str = "SNAPADS_UPLOAD_DEADLINE_SECS";

/// Crate version (from Cargo.toml)
const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

fn default_user_agent() -> String {
    format!("snapads-rust/{}", DEFAULT_VERSION)
}

/// Settings shared by every request an [`ApiClient`](crate::api::ApiClient) sends.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Upper bound, in bytes, for each part of a chunked upload.
    pub max_chunk_size: u64,
    /// Upper bound, in bytes, for an image sent in a single request.
    pub max_image_size: u64,
    /// Overall deadline for one chunked upload, all phases included.
    pub upload_deadline: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            upload_deadline: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with any `SNAPADS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(BASE_URL_ENV) {
            config.base_url = parse_base_url(&raw)?;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            config.request_timeout = Duration::from_secs(parse_u64(TIMEOUT_ENV, &raw)?);
        }
        if let Some(raw) = lookup(USER_AGENT_ENV) {
            config.user_agent = raw;
        }
        if let Some(raw) = lookup(MAX_CHUNK_ENV) {
            config.max_chunk_size = parse_u64(MAX_CHUNK_ENV, &raw)?;
        }
        if let Some(raw) = lookup(MAX_IMAGE_ENV) {
            config.max_image_size = parse_u64(MAX_IMAGE_ENV, &raw)?;
        }
        if let Some(raw) = lookup(UPLOAD_DEADLINE_ENV) {
            config.upload_deadline = Some(Duration::from_secs(parse_u64(UPLOAD_DEADLINE_ENV, &raw)?));
        }

        Ok(config)
    }
}

/// Parse a base URL, adding the trailing slash `Url::join` needs to keep the last segment.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).with_context(|| format!("Invalid base URL: {}", raw))
}

fn parse_u64(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, raw))
}

/// Render a byte count in decimal megabytes, e.g. `31.8 MB`.
///
/// Counts that are not a whole number of hundredths of a megabyte are shown
/// in bytes, so the rendered limit is never rounded.
pub fn format_megabytes(bytes: u64) -> String {
    if bytes % 10_000 != 0 {
        return format!("{} bytes", bytes);
    }

    let whole = bytes / 1_000_000;
    let hundredths = (bytes % 1_000_000) / 10_000;
    match hundredths {
        0 => format!("{} MB", whole),
        h if h % 10 == 0 => format!("{}.{} MB", whole, h / 10),
        h => format!("{}.{:02} MB", whole, h),
    }
}
