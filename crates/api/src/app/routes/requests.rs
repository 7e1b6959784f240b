use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};

use bloodbank_core::BloodRequestId;
use bloodbank_infra::BloodBankService;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_requests).post(create_request))
        .route("/:id", get(get_request).delete(delete_request))
        .route("/:id/status", put(set_request_status))
}

pub async fn create_request(
    Extension(service): Extension<Arc<BloodBankService>>,
    body: Result<Json<dto::CreateBloodRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(r) => return errors::rejection_to_response(r),
    };
    let new = match body.into_new() {
        Ok(n) => n,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.create_request(new).await {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_request(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(id): Path<String>,
) -> Response {
    let id: BloodRequestId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.get_request(id).await {
        Ok(request) => Json(request).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Move a request through its lifecycle. Inventory is not debited.
pub async fn set_request_status(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(id): Path<String>,
    body: Result<Json<dto::SetStatusRequest>, JsonRejection>,
) -> Response {
    let id: BloodRequestId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(r) => return errors::rejection_to_response(r),
    };

    match service.set_request_status(id, &body.status).await {
        Ok(request) => Json(request).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_request(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(id): Path<String>,
) -> Response {
    let id: BloodRequestId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.delete_request(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_requests(
    Extension(service): Extension<Arc<BloodBankService>>,
    query: Result<Query<dto::StatusQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(r) => return errors::query_rejection_to_response(r),
    };

    match service
        .list_requests(query.status.as_deref(), query.page())
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
