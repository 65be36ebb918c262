//! The relay
//!
//! Serves the static model catalog and forwards chat-completion bodies to the
//! fixed upstream, streaming the upstream response back as it arrives.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Response};
use bytes::Bytes;
use serde::de::IgnoredAny;

use crate::{
    catalog::{ModelCatalog, ModelDescriptor},
    error::{AppError, AppResult},
    proxy::upstream::{UpstreamClient, UpstreamResponse},
    streaming::RelayStream,
};

/// Stateless request forwarder
///
/// Holds only read-only data fixed at startup, so one instance serves all
/// concurrent requests without coordination.
#[derive(Clone)]
pub struct Relay {
    catalog: Arc<ModelCatalog>,
    upstream: UpstreamClient,
}

impl Relay {
    pub fn new(catalog: ModelCatalog, upstream: UpstreamClient) -> Self {
        Self {
            catalog: Arc::new(catalog),
            upstream,
        }
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    /// The full catalog, identical for every caller
    pub fn list_models(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn get_model(&self, model_id: &str) -> AppResult<&ModelDescriptor> {
        self.catalog
            .get(model_id)
            .ok_or_else(|| AppError::NotFound(format!("model '{}'", model_id)))
    }

    /// Forward an opaque JSON body upstream and stream the reply back
    ///
    /// The body is parsed only to reject malformed input before any network
    /// call; the original bytes are what goes upstream, so number precision
    /// and key order survive. Upstream status and content type are mirrored,
    /// whatever the status.
    pub async fn forward_chat_completion(&self, body: &Bytes) -> AppResult<Response<Body>> {
        serde_json::from_slice::<IgnoredAny>(body)?;
        let upstream = self.upstream.post_json(body.clone()).await?;
        Ok(Self::mirror(upstream))
    }

    fn mirror(upstream: UpstreamResponse) -> Response<Body> {
        let content_type = upstream
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));

        let mut response = Response::new(Body::from_stream(RelayStream::new(upstream.body)));
        *response.status_mut() = upstream.status;
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        response
    }
}
