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

use bloodbank_core::RecipientId;
use bloodbank_infra::BloodBankService;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_recipients).post(create_recipient))
        .route("/:id", get(get_recipient).put(update_recipient).delete(delete_recipient))
}

pub async fn create_recipient(
    Extension(service): Extension<Arc<BloodBankService>>,
    body: Result<Json<dto::RecipientRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(r) => return errors::rejection_to_response(r),
    };
    let details = match body.into_details() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.create_recipient(details).await {
        Ok(recipient) => (StatusCode::CREATED, Json(recipient)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_recipient(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(id): Path<String>,
) -> Response {
    let id: RecipientId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.get_recipient(id).await {
        Ok(recipient) => Json(recipient).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_recipient(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(id): Path<String>,
    body: Result<Json<dto::RecipientRequest>, JsonRejection>,
) -> Response {
    let id: RecipientId = match errors::parse_id(&id) {
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

    match service.update_recipient(id, details).await {
        Ok(recipient) => Json(recipient).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_recipient(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(id): Path<String>,
) -> Response {
    let id: RecipientId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.delete_recipient(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_recipients(
    Extension(service): Extension<Arc<BloodBankService>>,
    query: Result<Query<dto::SearchQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(r) => return errors::query_rejection_to_response(r),
    };

    match service
        .list_recipients(query.search.as_deref(), query.page())
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
