// Configuration: where the client sends requests and which access token it
// presents. Values come from the environment, with the token optionally
// persisted in the user's home directory between CLI sessions.

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_UPLOAD_URL: &str = "https://upload.gyazo.com/api/upload";
pub const DEFAULT_API_URL: &str = "https://api.gyazo.com/api";

pub const ACCESS_TOKEN_VAR: &str = "GYAZO_ACCESS_TOKEN";
pub const UPLOAD_URL_VAR: &str = "GYAZO_UPLOAD_URL";
pub const API_URL_VAR: &str = "GYAZO_API_URL";

const TOKEN_FILE: &str = ".gyazo_token";

/// Access token plus the two endpoints: the upload URL and the base URL
/// under which `/images` lives.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub access_token: String,
    pub upload_url: String,
    pub api_url: String,
}

// Keep the token out of debug output and logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_token", &"<redacted>")
            .field("upload_url", &self.upload_url)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl ClientConfig {
    /// Config for the public service with the given token.
    pub fn new(access_token: impl Into<String>) -> Self {
        ClientConfig {
            access_token: access_token.into(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = access_token.into();
        self
    }

    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = trim_base(url.into());
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = trim_base(url.into());
        self
    }

    /// Same config with trailing slashes removed from both endpoints, so
    /// struct literals behave like the `with_*` setters.
    pub fn normalized(mut self) -> Self {
        self.upload_url = trim_base(self.upload_url);
        self.api_url = trim_base(self.api_url);
        self
    }

    /// Read `GYAZO_ACCESS_TOKEN`, `GYAZO_UPLOAD_URL` and `GYAZO_API_URL`.
    /// Without the token variable the persisted token file is used.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), load_token().ok())
    }

    /// Build a config from an arbitrary variable source; `persisted` is the
    /// fallback token when the source has none.
    pub fn from_lookup<F>(lookup: F, persisted: Option<String>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(ACCESS_TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| persisted.filter(|t| !t.is_empty()))
            .with_context(|| {
                format!(
                    "No access token: set {} or save one to ~/{}",
                    ACCESS_TOKEN_VAR, TOKEN_FILE
                )
            })?;

        let mut config = ClientConfig::new(token);
        if let Some(url) = lookup(UPLOAD_URL_VAR).filter(|u| !u.is_empty()) {
            config = config.with_upload_url(url);
        }
        if let Some(url) = lookup(API_URL_VAR).filter(|u| !u.is_empty()) {
            config = config.with_api_url(url);
        }
        Ok(config)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Location of the persisted token file.
pub fn token_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(TOKEN_FILE)
}

/// Persist token into a file in the user's home directory.
pub fn persist_token(token: &str) -> Result<()> {
    let path = token_path();
    std::fs::write(&path, token.trim())
        .with_context(|| format!("Failed to write token to {}", path.display()))?;
    tracing::debug!("Saved access token to {}", path.display());
    Ok(())
}

/// Load token from the user's home directory file.
pub fn load_token() -> Result<String> {
    let path = token_path();
    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read token from {}", path.display()))?;
    Ok(data.trim().to_string())
}
