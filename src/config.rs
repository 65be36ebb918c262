//! Configuration management for DeepRelay
//!
//! Configuration is loaded from environment variables once at startup.

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Default upstream chat-completions endpoint
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.deepinfra.com/v1/openai/chat/completions";

/// Which authorizer guards the `/v1` routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Every request is admitted
    None,
    /// `Authorization: Bearer <TOKEN>` must match the configured token
    Bearer,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Fixed upstream chat-completions URL
    pub upstream_url: String,
    /// Optional bound on a whole outbound exchange, body included
    pub upstream_timeout: Option<Duration>,
    /// Bound on each read from the upstream, reset by every chunk
    pub upstream_read_timeout: Duration,
    /// Bound on connection setup (DNS, TCP, TLS)
    pub upstream_connect_timeout: Duration,

    /// Token sourced from `TOKEN`
    pub token: Option<String>,
    /// Authorization strategy
    pub auth_mode: AuthMode,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let token = lookup("TOKEN").filter(|t| !t.is_empty());

        let auth_mode = match var("RELAY_AUTH", "none").to_ascii_lowercase().as_str() {
            "none" => AuthMode::None,
            "bearer" => AuthMode::Bearer,
            other => bail!("Invalid RELAY_AUTH '{}': expected 'none' or 'bearer'", other),
        };
        if auth_mode == AuthMode::Bearer && token.is_none() {
            bail!("RELAY_AUTH=bearer requires TOKEN to be set");
        }

        let log_format = match var("RELAY_LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            host: var("RELAY_HOST", "0.0.0.0"),
            port: var("RELAY_PORT", "8000")
                .parse()
                .context("Invalid RELAY_PORT")?,

            upstream_url: var("UPSTREAM_URL", DEFAULT_UPSTREAM_URL),
            upstream_timeout: match var("UPSTREAM_TIMEOUT_SECONDS", "0")
                .parse::<u64>()
                .context("Invalid UPSTREAM_TIMEOUT_SECONDS")?
            {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            upstream_read_timeout: Duration::from_secs(
                var("UPSTREAM_READ_TIMEOUT_SECONDS", "300")
                    .parse()
                    .context("Invalid UPSTREAM_READ_TIMEOUT_SECONDS")?,
            ),
            upstream_connect_timeout: Duration::from_secs(
                var("UPSTREAM_CONNECT_TIMEOUT_SECONDS", "10")
                    .parse()
                    .context("Invalid UPSTREAM_CONNECT_TIMEOUT_SECONDS")?,
            ),

            token,
            auth_mode,
            log_format,
        })
    }

    /// Configuration pointing at a given upstream, with defaults elsewhere
    ///
    /// Intended for tests only: it binds to an ephemeral port, uses short
    /// timeouts and ignores the environment.
    pub fn for_upstream(upstream_url: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            upstream_url: upstream_url.into(),
            upstream_timeout: None,
            upstream_read_timeout: Duration::from_secs(30),
            upstream_connect_timeout: Duration::from_secs(5),
            token: None,
            auth_mode: AuthMode::None,
            log_format: LogFormat::Text,
        }
    }
}
