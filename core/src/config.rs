//! Client configuration.
//!
//! Defaults point at the public amphibians service. `from_env` lets a host
//! override them with `AMPHIBIANS_BASE_URL` and `AMPHIBIANS_TIMEOUT_SECS`.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://android-kotlin-fun-mars-server.appspot.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const BASE_URL_ENV: &str = "AMPHIBIANS_BASE_URL";
pub const TIMEOUT_ENV: &str = "AMPHIBIANS_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Build a config for `base_url` with the default timeout.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: validate_base_url(base_url)?,
            ..Self::default()
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Use `base_url` as given; only the timeout comes from the environment.
    pub fn from_env_with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Self::from_lookup_with_base_url(base_url, |key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`. Unset or
    /// blank variables fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = validate_base_url(&raw)?;
        }
        if let Some(timeout) = timeout_from_lookup(&lookup)? {
            config.timeout = timeout;
        }

        Ok(config)
    }

    /// Same as `from_env_with_base_url`; `BASE_URL_ENV` is never consulted.
    pub fn from_lookup_with_base_url(
        base_url: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::with_base_url(base_url)?;
        if let Some(timeout) = timeout_from_lookup(&lookup)? {
            config.timeout = timeout;
        }
        Ok(config)
    }
}

fn timeout_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidTimeout(raw));
    }
    Ok(Some(Duration::from_secs(secs)))
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match host {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_string())),
    }
}
