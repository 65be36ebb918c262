//! Models endpoint
//!
//! Serves the static catalog. Request body, headers and query are ignored.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    catalog::{ModelCatalog, ModelDescriptor},
    error::AppResult,
    routes::metrics::record_request,
    AppState,
};

const MODEL_ROUTE: &str = "/v1/models/*model_id";

/// List available models
pub async fn list_models(
    State(state): State<Arc<AppState>>,
) -> AppResult<(StatusCode, Json<ModelCatalog>)> {
    record_request("/v1/models", StatusCode::OK.as_u16());
    Ok((StatusCode::OK, Json(state.relay.list_models().clone())))
}

/// Get a single model by id
pub async fn get_model(
    State(state): State<Arc<AppState>>,
    Path(model_id): Path<String>,
) -> AppResult<(StatusCode, Json<ModelDescriptor>)> {
    match state.relay.get_model(&model_id) {
        Ok(model) => {
            record_request(MODEL_ROUTE, StatusCode::OK.as_u16());
            Ok((StatusCode::OK, Json(model.clone())))
        }
        Err(e) => {
            record_request(MODEL_ROUTE, e.status_code().as_u16());
            Err(e)
        }
    }
}
