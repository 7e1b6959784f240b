use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use bloodbank_infra::BloodBankService;

use crate::app::errors;

pub async fn health(Extension(service): Extension<Arc<BloodBankService>>) -> Response {
    match service.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}

pub async fn dashboard(Extension(service): Extension<Arc<BloodBankService>>) -> Response {
    match service.dashboard().await {
        Ok(dashboard) => Json(dashboard).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn stats(Extension(service): Extension<Arc<BloodBankService>>) -> Response {
    match service.stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
