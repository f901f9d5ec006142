//! Configuration management for the client.

use std::env;
use std::time::Duration;
use swimtime_engine::Locale;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the club backend (without the `/api` suffix)
    pub api_url: String,
    /// Bearer token for the backend
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Language for exported documents
    pub locale: Locale,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = var("SWIMTIME_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| "http://localhost:8000".to_string());

        let token = var("SWIMTIME_TOKEN").filter(|t| !t.trim().is_empty());

        let timeout = var("SWIMTIME_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let locale = match var("SWIMTIME_LOCALE") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidLocale(raw.clone()))?,
            None => Locale::default(),
        };

        Ok(Self {
            api_url,
            token,
            timeout,
            locale,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SWIMTIME_TIMEOUT_SECS value")]
    InvalidTimeout,

    #[error("Invalid SWIMTIME_LOCALE value: {0}")]
    InvalidLocale(String),
}
