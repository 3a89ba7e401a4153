//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STATE_DIR: &str = ".petatwork";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base URL '{0}': expected http:// or https://")]
    InvalidApiUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeouts: Timeouts,
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Build a config for `api_url` with default timeouts and state dir.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] when the URL has no http(s) scheme.
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_api_url(api_url)?,
            timeouts: Timeouts::default(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `PETATWORK_API_URL`: default `http://localhost:8000/api`
    /// - `PETATWORK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `PETATWORK_CONNECT_TIMEOUT_SECS`: default 10
    /// - `PETATWORK_STATE_DIR`: default `.petatwork`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] for a malformed base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("PETATWORK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeouts = Timeouts {
            request_secs: env_parse_u64("PETATWORK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("PETATWORK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let state_dir = std::env::var("PETATWORK_STATE_DIR").map_or_else(|_| PathBuf::from(DEFAULT_STATE_DIR), PathBuf::from);

        Ok(Self { api_url: normalize_api_url(&raw_url)?, timeouts, state_dir })
    }

    /// Browser `sessionStorage` equivalent: holds `user` and `token`.
    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }

    /// Browser `localStorage` equivalent: holds long-lived preferences.
    #[must_use]
    pub fn preferences_file(&self) -> PathBuf {
        self.state_dir.join("preferences.json")
    }
}

pub(crate) fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).map_or(default, |v| v.trim().parse::<u64>().unwrap_or(default))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
