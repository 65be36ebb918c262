//! Prometheus metrics endpoint
//!
//! Exposes relay metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "relay_requests_total",
        "Total number of requests handled, by route and status"
    );
    metrics::describe_histogram!(
        "relay_upstream_latency_seconds",
        "Time until upstream response headers arrived"
    );
    metrics::describe_counter!(
        "relay_upstream_errors_total",
        "Upstream transport failures"
    );
    metrics::describe_counter!(
        "relay_auth_denied_total",
        "Requests rejected by the authorizer"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a handled request
pub fn record_request(route: &str, status: u16) {
    metrics::counter!(
        "relay_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record time to upstream headers
pub fn record_upstream_latency(duration_secs: f64) {
    metrics::histogram!("relay_upstream_latency_seconds").record(duration_secs);
}

pub fn record_upstream_error() {
    metrics::counter!("relay_upstream_errors_total").increment(1);
}

pub fn record_auth_denied() {
    metrics::counter!("relay_auth_denied_total").increment(1);
}
