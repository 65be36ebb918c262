//! Authorization middleware
//!
//! The check applied to `/v1` routes is an [`Authorizer`] held in the
//! application state. The default admits everything; the bearer-token
//! strategy compares the presented token against the configured one.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

use crate::{error::AppError, routes::metrics::record_auth_denied, AppState};

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Deny(String),
}

/// Pluggable authorization strategy
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Name for logging
    fn name(&self) -> &'static str;

    /// Decide whether a request with these headers may proceed
    async fn authorize(&self, headers: &HeaderMap) -> AuthDecision;
}

/// Admits every request
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

#[async_trait]
impl Authorizer for AllowAll {
    fn name(&self) -> &'static str {
        "allow-all"
    }

    async fn authorize(&self, _headers: &HeaderMap) -> AuthDecision {
        AuthDecision::Allow
    }
}

/// Requires `Authorization: Bearer <token>` with the configured token
pub struct BearerTokenAuthorizer {
    token_digest: [u8; 32],
}

impl BearerTokenAuthorizer {
    pub fn new(token: &str) -> Self {
        Self {
            token_digest: digest(token),
        }
    }
}

#[async_trait]
impl Authorizer for BearerTokenAuthorizer {
    fn name(&self) -> &'static str {
        "bearer-token"
    }

    async fn authorize(&self, headers: &HeaderMap) -> AuthDecision {
        let Some(auth_header) = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        else {
            return AuthDecision::Deny("Authorization header required".to_string());
        };

        let Some(token) = extract_bearer_token(auth_header) else {
            return AuthDecision::Deny("Expected a Bearer token".to_string());
        };

        let presented = digest(token);
        if presented == self.token_digest {
            AuthDecision::Allow
        } else {
            debug!(fingerprint = %fingerprint(&presented), "Bearer token mismatch");
            AuthDecision::Deny("Invalid token".to_string())
        }
    }
}

/// Extract the Authorization header and return the bearer token
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

fn digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

/// Short hex prefix of a token digest, safe to log
fn fingerprint(digest: &[u8; 32]) -> String {
    hex::encode(&digest[..4])
}

/// Authorization middleware
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match state.authorizer.authorize(request.headers()).await {
        AuthDecision::Allow => Ok(next.run(request).await),
        AuthDecision::Deny(reason) => {
            warn!(authorizer = state.authorizer.name(), reason = %reason, "Request denied");
            record_auth_denied();
            Err(AppError::Unauthorized(reason))
        }
    }
}
