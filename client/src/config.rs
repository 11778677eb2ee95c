//! Client configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:10010";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REFRESH_HOLD_MS: u64 = 500;

/// Errors produced while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL is not an `http://` or `https://` URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The author name is empty.
    #[error("username must not be empty")]
    EmptyUsername,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Store origin without a trailing slash, e.g. `http://127.0.0.1:10010`.
    pub base_url: String,
    /// Author name strokes are submitted under.
    pub username: String,
    pub timeouts: Timeouts,
    /// How long the refresh gate stays closed after a refresh finishes.
    pub refresh_hold: Duration,
}

impl ClientConfig {
    /// Config with defaults for everything but the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for non-HTTP URLs.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            username: canvas::consts::DEFAULT_USERNAME.to_owned(),
            timeouts: Timeouts::default(),
            refresh_hold: Duration::from_millis(DEFAULT_REFRESH_HOLD_MS),
        })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `LEDGERDRAW_BASE_URL`: default `http://127.0.0.1:10010`
    /// - `LEDGERDRAW_USERNAME`: default `MainUser`
    /// - `LEDGERDRAW_REQUEST_TIMEOUT_SECS`: default 30
    /// - `LEDGERDRAW_CONNECT_TIMEOUT_SECS`: default 10
    /// - `LEDGERDRAW_REFRESH_HOLD_MS`: default 500
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is present but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reading from an arbitrary source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is present but unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("LEDGERDRAW_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let mut config = Self::new(&base_url)?;

        if let Some(username) = lookup("LEDGERDRAW_USERNAME") {
            config = config.with_username(&username)?;
        }
        config.timeouts = Timeouts {
            request_secs: parse_u64(&lookup, "LEDGERDRAW_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(&lookup, "LEDGERDRAW_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        config.refresh_hold =
            Duration::from_millis(parse_u64(&lookup, "LEDGERDRAW_REFRESH_HOLD_MS", DEFAULT_REFRESH_HOLD_MS));
        Ok(config)
    }

    /// Replace the author name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyUsername`] for a blank name.
    pub fn with_username(mut self, username: &str) -> Result<Self, ConfigError> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        self.username = trimmed.to_owned();
        Ok(self)
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = ["http://", "https://"]
        .iter()
        .any(|scheme| trimmed.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
    if !has_host {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
