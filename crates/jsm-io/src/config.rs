//! HTTP agent configuration.
//!
//! Defaults target a local server. Override via environment variables or
//! explicit construction.

use url::Url;
use zeroize::Zeroizing;

const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for [`HttpAgent`](crate::HttpAgent).
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct AgentConfig {
    /// Base URL relative link hrefs are resolved against.
    pub base_url: Url,
    /// Bearer token sent with every request, if any.
    pub api_token: Option<Zeroizing<String>>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Times an idempotent request is resent after a transport error.
    pub max_retries: u32,
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl AgentConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `JSM_BASE_URL` (default: `http://127.0.0.1:8080`)
    /// - `JSM_API_TOKEN` (optional)
    /// - `JSM_TIMEOUT_SECS` (default: 30)
    /// - `JSM_MAX_RETRIES` (default: 3)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_url("JSM_BASE_URL", "http://127.0.0.1:8080")?,
            api_token: std::env::var("JSM_API_TOKEN").ok().map(Zeroizing::new),
            timeout_secs: std::env::var("JSM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            max_retries: std::env::var("JSM_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_RETRIES),
        })
    }

    /// A configuration for a server on localhost (for testing).
    pub fn local(port: u16) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(&format!("http://127.0.0.1:{port}"))
                .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?,
            api_token: None,
            timeout_secs: 5,
            max_retries: 0,
        })
    }

    /// A configuration for `base_url`, with the default timeout.
    pub fn for_base(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(base_url)
                .map_err(|e| ConfigError::InvalidUrl(base_url.to_string(), e.to_string()))?,
            api_token: None,
            timeout_secs: 30,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Zeroizing::new(token.into()));
        self
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("API token contains characters not allowed in a header")]
    InvalidToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_builds_valid_config() {
        let cfg = AgentConfig::local(9000).unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.max_retries, 0);
        assert!(cfg.api_token.is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = AgentConfig::local(9000).unwrap().with_token("s3cret");
        let rendered = format!("{cfg:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("JSM_NONEXISTENT_VAR_12345", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("JSM_TEST_BAD_URL", "not a url");
        let result = env_url("JSM_TEST_BAD_URL", "https://example.com");
        std::env::remove_var("JSM_TEST_BAD_URL");
        assert!(matches!(result, Err(ConfigError::InvalidUrl(..))));
    }

    #[test]
    fn for_base_retries_by_default() {
        let cfg = AgentConfig::for_base("http://api.test/").unwrap();
        assert_eq!(cfg.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(cfg.with_max_retries(1).max_retries, 1);
    }

    #[test]
    fn for_base_rejects_relative_url() {
        assert!(AgentConfig::for_base("/api").is_err());
    }
}
