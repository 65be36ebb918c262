//! DeepRelay - streaming pass-through relay
//!
//! Republishes a single chat-completion upstream under an OpenAI-compatible
//! surface: a static model listing and a chat-completions route whose body is
//! forwarded verbatim and whose response is streamed back unmodified.

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod streaming;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::catalog::{ModelCatalog, ModelDescriptor};
pub use crate::config::{AuthMode, Config};
pub use crate::middleware::{AllowAll, AuthDecision, Authorizer, BearerTokenAuthorizer};
pub use crate::proxy::{Relay, UpstreamClient, UpstreamHeaderSet};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    /// Catalog and upstream, read-only after startup
    pub relay: Relay,
    /// Strategy guarding the `/v1` routes
    pub authorizer: Arc<dyn Authorizer>,
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling
        let http_client = UpstreamClient::build_http_client(&config)?;

        let upstream = UpstreamClient::new(
            http_client,
            config.upstream_url.clone(),
            UpstreamHeaderSet::deepinfra_web()?,
        );
        let relay = Relay::new(ModelCatalog::deepinfra(), upstream);

        let authorizer: Arc<dyn Authorizer> = match (config.auth_mode, config.token.as_deref()) {
            (AuthMode::Bearer, Some(token)) => Arc::new(BearerTokenAuthorizer::new(token)),
            (AuthMode::Bearer, None) => anyhow::bail!("Bearer authorization requires TOKEN"),
            (AuthMode::None, _) => Arc::new(AllowAll),
        };

        Ok(Self::from_parts(config, relay, authorizer))
    }

    /// Assemble state from already-built components
    pub fn from_parts(config: Config, relay: Relay, authorizer: Arc<dyn Authorizer>) -> Self {
        Self {
            config,
            relay,
            authorizer,
            start_time: Instant::now(),
        }
    }
}
