//! Upstream client
//!
//! Issues the single outbound POST per forwarded request.

use axum::http::{HeaderValue, StatusCode};
use reqwest::header::CONTENT_TYPE;
use bytes::Bytes;
use tracing::{debug, error, instrument};

use crate::{
    config::Config,
    error::AppResult,
    proxy::headers::UpstreamHeaderSet,
    streaming::ByteStream,
};

/// Upstream response once its headers have arrived
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: ByteStream,
}

/// Client for the fixed upstream endpoint
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    url: String,
    headers: UpstreamHeaderSet,
}

impl UpstreamClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>, headers: UpstreamHeaderSet) -> Self {
        Self {
            client,
            url: url.into(),
            headers,
        }
    }

    /// Build the shared HTTP client with the configured bounds
    ///
    /// The read timeout restarts with every chunk, so a long but live stream
    /// is never cut. The total timeout applies only when configured.
    pub fn build_http_client(config: &Config) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .connect_timeout(config.upstream_connect_timeout)
            .read_timeout(config.upstream_read_timeout);

        if let Some(total) = config.upstream_timeout {
            builder = builder.timeout(total);
        }

        builder.build()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &UpstreamHeaderSet {
        &self.headers
    }

    /// POST an already validated JSON `body` upstream, byte for byte, and
    /// return as soon as response headers arrive
    #[instrument(skip(self, body), fields(url = %self.url, body_len = body.len()))]
    pub async fn post_json(&self, body: Bytes) -> AppResult<UpstreamResponse> {
        let response = self
            .client
            .post(&self.url)
            .headers(self.headers.as_header_map().clone())
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to reach upstream");
                e
            })?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        debug!(status = %status, content_type = ?content_type, "Received upstream headers");

        Ok(UpstreamResponse {
            status,
            content_type,
            body: Box::pin(response.bytes_stream()),
        })
    }
}
