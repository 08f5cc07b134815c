//! Client configuration.
//!
//! Defaults point at the production API. Override the base URL via
//! `HYPER_BASE_URL` or `with_base_url` to target a staging host or a local
//! mock server.

use url::Url;

/// Production API root. Every request path is appended to this.
pub const DEFAULT_BASE_URL: &str = "https://api.hyper.co/v6";

/// Connection settings for the Hyper API.
///
/// Custom `Debug` implementation redacts the `api_key` field.
#[derive(Clone)]
pub struct HyperConfig {
    /// API root without a trailing slash.
    pub base_url: String,
    /// Business API key, sent as a bearer token.
    pub api_key: String,
}

impl std::fmt::Debug for HyperConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HyperConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `HYPER_API_KEY` (required)
    /// - `HYPER_BASE_URL` (default: `https://api.hyper.co/v6`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("HYPER_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let config = Self::new(api_key);
        match std::env::var("HYPER_BASE_URL") {
            Ok(raw) => config.with_base_url(&raw),
            Err(_) => Ok(config),
        }
    }

    /// Replace the API root. The URL must be absolute; a trailing slash is
    /// dropped so paths can be appended verbatim.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl(raw.to_string(), e.to_string()))?;
        self.base_url = raw.trim_end_matches('/').to_string();
        Ok(self)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("HYPER_API_KEY environment variable is required")]
    MissingApiKey,
    #[error("invalid base URL {0:?}: {1}")]
    InvalidBaseUrl(String, String),
}
