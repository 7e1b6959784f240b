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

use bloodbank_core::DonationId;
use bloodbank_infra::BloodBankService;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_donations).post(record_donation))
        .route(
            "/:id",
            get(get_donation).put(update_donation).delete(delete_donation),
        )
}

/// Record a donation; credits the donor's blood group in inventory.
pub async fn record_donation(
    Extension(service): Extension<Arc<BloodBankService>>,
    body: Result<Json<dto::DonationRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(r) => return errors::rejection_to_response(r),
    };
    let details = match body.into_details() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.record_donation(details).await {
        Ok(donation) => (StatusCode::CREATED, Json(donation)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_donation(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(id): Path<String>,
) -> Response {
    let id: DonationId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.get_donation(id).await {
        Ok(donation) => Json(donation).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_donation(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(id): Path<String>,
    body: Result<Json<dto::DonationRequest>, JsonRejection>,
) -> Response {
    let id: DonationId = match errors::parse_id(&id) {
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

    match service.update_donation(id, details).await {
        Ok(donation) => Json(donation).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_donation(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(id): Path<String>,
) -> Response {
    let id: DonationId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.delete_donation(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_donations(
    Extension(service): Extension<Arc<BloodBankService>>,
    query: Result<Query<dto::SearchQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(r) => return errors::query_rejection_to_response(r),
    };

    match service
        .list_donations(query.search.as_deref(), query.page())
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
