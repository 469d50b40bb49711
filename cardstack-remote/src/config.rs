//! Client configuration.

use cardstack_kanban::UserId;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A configuration value that could not be used
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL did not parse or used an unsupported scheme
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Configuration for [`ItemsClient`](crate::ItemsClient).
///
/// Defaults: 30 second timeout, 3 retries with a 1 second base delay and
/// exponential backoff, no bearer token. A client without a token can only
/// fail; set one before issuing calls.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Root of the item service, e.g. `https://api.example.com`
    pub base_url: Url,
    /// Bearer token presented on every request
    pub token: Option<String>,
    /// The user whose items the client operates on
    pub user_id: UserId,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the first attempt, for transient failures only
    pub max_retries: u32,
    /// First retry delay; doubles on each subsequent retry
    pub retry_delay: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl RemoteConfig {
    /// Create a configuration for a service root and user
    pub fn new(base_url: &str, user_id: impl Into<UserId>) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ConfigError::InvalidBaseUrl {
                    url: base_url.to_string(),
                    reason: format!("unsupported scheme: {scheme}"),
                });
            }
        }

        Ok(Self {
            base_url: parsed,
            token: None,
            user_id: user_id.into(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            user_agent: concat!("cardstack/", env!("CARGO_PKG_VERSION")).to_string(),
        })
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry budget and base delay
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_base_url() {
        let config = RemoteConfig::new("https://api.example.com", "user-1").unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com/");
        assert!(config.token.is_none());
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_rejects_bad_scheme() {
        let err = RemoteConfig::new("ftp://api.example.com", "user-1").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_rejects_unparseable_url() {
        assert!(RemoteConfig::new("not a url", "user-1").is_err());
    }
}
