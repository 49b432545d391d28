//! Stored access token for the command-line client.
//!
//! The token is obtained elsewhere (the Business Manager OAuth app) and
//! handed to `snapads token set`. It lives in `~/.snapads/credentials.json`
//! unless a custom directory is given.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Environment variable that overrides the stored token
pub const ACCESS_TOKEN_ENV: &str = "SNAPADS_ACCESS_TOKEN";

const CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCredentials {
    access_token: String,
}

/// Where the token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    File,
}

/// Persists the caller's access token.
pub struct CredentialStore {
    credentials_path: PathBuf,
}

impl CredentialStore {
    /// Create a store under `config_dir`, defaulting to `~/.snapads`.
    pub fn new(config_dir: Option<PathBuf>) -> Result<Self> {
        let base_dir = match config_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".snapads"),
        };

        std::fs::create_dir_all(&base_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", base_dir))?;

        Ok(Self {
            credentials_path: base_dir.join(CREDENTIALS_FILE),
        })
    }

    pub fn credentials_path(&self) -> &PathBuf {
        &self.credentials_path
    }

    /// The token to use, with `SNAPADS_ACCESS_TOKEN` taking priority over the file.
    pub fn access_token(&self) -> Result<Option<(String, TokenSource)>> {
        self.resolve(std::env::var(ACCESS_TOKEN_ENV).ok())
    }

    fn resolve(&self, env_token: Option<String>) -> Result<Option<(String, TokenSource)>> {
        if let Some(token) = env_token.filter(|t| !t.trim().is_empty()) {
            debug!("Using access token from {}", ACCESS_TOKEN_ENV);
            return Ok(Some((token, TokenSource::Environment)));
        }

        if !self.credentials_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.credentials_path).with_context(|| {
            format!("Failed to read credentials file: {:?}", self.credentials_path)
        })?;

        match serde_json::from_str::<StoredCredentials>(&content) {
            Ok(stored) if !stored.access_token.is_empty() => {
                Ok(Some((stored.access_token, TokenSource::File)))
            }
            Ok(_) => {
                warn!("Credentials file holds an empty token");
                Ok(None)
            }
            Err(e) => {
                warn!("Failed to parse credentials file: {}", e);
                Ok(None)
            }
        }
    }

    /// Store `access_token`, replacing any previous one.
    pub fn save(&self, access_token: &str) -> Result<()> {
        let stored = StoredCredentials {
            access_token: access_token.to_string(),
        };
        let content =
            serde_json::to_string_pretty(&stored).context("Failed to serialize credentials")?;

        std::fs::write(&self.credentials_path, content).with_context(|| {
            format!("Failed to write credentials file: {:?}", self.credentials_path)
        })?;

        info!("Access token saved");
        debug!("Credentials saved to {:?}", self.credentials_path);
        Ok(())
    }

    /// Forget the stored token.
    pub fn clear(&self) -> Result<()> {
        if self.credentials_path.exists() {
            std::fs::remove_file(&self.credentials_path).with_context(|| {
                format!("Failed to remove credentials file: {:?}", self.credentials_path)
            })?;
        }

        info!("Access token removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_store() {
        let tmp = tempdir().unwrap();
        let store = CredentialStore::new(Some(tmp.path().to_path_buf())).unwrap();
        assert!(store.resolve(None).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempdir().unwrap();
        let store = CredentialStore::new(Some(tmp.path().to_path_buf())).unwrap();

        store.save("stored-token").unwrap();

        let (token, source) = store.resolve(None).unwrap().unwrap();
        assert_eq!(token, "stored-token");
        assert_eq!(source, TokenSource::File);
    }

    #[test]
    fn test_environment_takes_priority() {
        let tmp = tempdir().unwrap();
        let store = CredentialStore::new(Some(tmp.path().to_path_buf())).unwrap();
        store.save("stored-token").unwrap();

        let (token, source) = store.resolve(Some("env-token".to_string())).unwrap().unwrap();
        assert_eq!(token, "env-token");
        assert_eq!(source, TokenSource::Environment);

        // blank values fall through to the file
        let (token, _) = store.resolve(Some("  ".to_string())).unwrap().unwrap();
        assert_eq!(token, "stored-token");
    }

    #[test]
    fn test_clear() {
        let tmp = tempdir().unwrap();
        let store = CredentialStore::new(Some(tmp.path().to_path_buf())).unwrap();

        store.save("stored-token").unwrap();
        assert!(store.credentials_path().exists());

        store.clear().unwrap();
        assert!(!store.credentials_path().exists());
        assert!(store.resolve(None).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let tmp = tempdir().unwrap();
        let store = CredentialStore::new(Some(tmp.path().to_path_buf())).unwrap();
        std::fs::write(store.credentials_path(), "not json").unwrap();

        assert!(store.resolve(None).unwrap().is_none());
    }
}
