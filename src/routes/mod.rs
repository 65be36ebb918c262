//! HTTP routes for DeepRelay
//!
//! This module defines all HTTP endpoints exposed by the relay.

pub mod chat;
pub mod health;
pub mod metrics;
pub mod models;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{middleware::auth::auth_middleware, AppState};

/// Permissive CORS that still allows credentials
///
/// Wildcards cannot be combined with credentials, so origin, method and
/// headers are mirrored from the preflight request instead.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        // Bodies are opaque and may be large (long contexts, inline images)
        .route(
            "/v1/chat/completions",
            post(chat::chat_completions).layer(DefaultBodyLimit::disable()),
        )
        .route("/v1/models", get(models::list_models))
        .route("/v1/models/*model_id", get(models::get_model))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Public routes (health checks, metrics) - no auth required
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    // No compression layer: upstream bytes must reach the caller untouched
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
