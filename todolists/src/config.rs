//! Configuration management for the todolist client.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

/// Default location of the remote todolist service
pub const DEFAULT_API_URL: &str = "https://social-network.samuraijs.com/api/1.1";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Remote service configuration
    pub api: ApiConfig,
    /// Local client configuration
    pub client: ClientConfig,
}

/// Remote service configuration
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL, without the trailing slash
    pub base_url: String,
    /// Value of the `API-KEY` header
    pub api_key: Option<String>,
    /// Bearer token for the `Authorization` header
    pub auth_token: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Local client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Log level (trace, debug, info, warn, error) or a full `EnvFilter` directive
    pub log_level: String,
    /// How long to wait for a command to settle
    pub settle_timeout: Duration,
    /// Graceful shutdown timeout
    pub shutdown_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = |key: &str, default: u64| {
            Duration::from_secs(
                lookup(key)
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(default),
            )
        };
        let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        Self {
            api: ApiConfig {
                base_url: non_empty("TODOLISTS_API_URL")
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                api_key: non_empty("TODOLISTS_API_KEY"),
                auth_token: non_empty("TODOLISTS_AUTH_TOKEN"),
                request_timeout: secs("TODOLISTS_REQUEST_TIMEOUT", 10),
            },
            client: ClientConfig {
                log_level: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
                settle_timeout: secs("TODOLISTS_SETTLE_TIMEOUT", 15),
                shutdown_timeout: secs("TODOLISTS_SHUTDOWN_TIMEOUT", 5),
            },
        }
    }
}
