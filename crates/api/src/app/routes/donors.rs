use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use bloodbank_core::DonorId;
use bloodbank_infra::BloodBankService;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_donors).post(create_donor))
        .route("/:id", get(get_donor).put(update_donor).delete(delete_donor))
}

pub async fn create_donor(
    Extension(service): Extension<Arc<BloodBankService>>,
    body: Result<Json<dto::DonorRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(r) => return errors::rejection_to_response(r),
    };
    let details = match body.into_details() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.create_donor(details).await {
        Ok(donor) => (StatusCode::CREATED, Json(donor)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_donor(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(id): Path<String>,
) -> Response {
    let id: DonorId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.get_donor(id).await {
        Ok(donor) => Json(donor).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_donor(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(id): Path<String>,
    body: Result<Json<dto::DonorRequest>, JsonRejection>,
) -> Response {
    let id: DonorId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(r) => return errors::rejection_to_response(r),
    };
    let details = match body.into_details() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.update_donor(id, details).await {
        Ok(donor) => Json(donor).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_donor(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(id): Path<String>,
) -> Response {
    let id: DonorId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.delete_donor(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_donors(
    Extension(service): Extension<Arc<BloodBankService>>,
    query: Result<Query<dto::SearchQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(r) => return errors::query_rejection_to_response(r),
    };

    match service
        .list_donors(query.search.as_deref(), query.page())
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
