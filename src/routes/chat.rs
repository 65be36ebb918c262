//! Chat completions endpoint
//!
//! OpenAI-compatible route. The body is handed to the relay as raw bytes so
//! that neither the inbound content type nor the payload schema is enforced.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, response::Response};
use bytes::Bytes;
use tracing::{error, info};

use crate::{
    error::AppError,
    routes::metrics::{record_request, record_upstream_error, record_upstream_latency},
    AppState,
};

const ROUTE: &str = "/v1/chat/completions";

/// Forward a chat completion request and stream the upstream reply
pub async fn chat_completions(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let start_time = Instant::now();
    info!(body_len = body.len(), "Forwarding chat completion");

    match state.relay.forward_chat_completion(&body).await {
        Ok(response) => {
            let latency = start_time.elapsed().as_secs_f64();
            record_upstream_latency(latency);
            record_request(ROUTE, response.status().as_u16());
            info!(
                status = %response.status(),
                latency_ms = %format!("{:.2}", latency * 1000.0),
                "Upstream responded, streaming body"
            );
            Ok(response)
        }
        Err(e) => {
            if let AppError::UpstreamTransport(ref cause) = e {
                error!(error = %cause, timeout = cause.is_timeout(), "Upstream unreachable");
                record_upstream_error();
            } else {
                info!(error = %e, "Rejected chat completion request");
            }
            record_request(ROUTE, e.status_code().as_u16());
            Err(e)
        }
    }
}
