use std::str::FromStr;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use bloodbank_core::DomainError;
use bloodbank_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Database(e) => {
            tracing::error!(error = %e, "store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "the data store could not complete the request",
            )
        }
        err @ ServiceError::Decode { .. } => {
            tracing::error!(error = %err, "stored row could not be decoded");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    let message = err.to_string();
    match err {
        DomainError::Validation { field, .. } => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "validation_error",
                "message": message,
                "field": field,
            })),
        )
            .into_response(),
        DomainError::NotFound { .. } => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", message),
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn rejection_to_response(rejection: JsonRejection) -> Response {
    json_error(rejection.status(), "invalid_body", rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> Response {
    json_error(rejection.status(), "invalid_query", rejection.body_text())
}

/// Parse a path identifier, answering 400 `invalid_id` on failure.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse()
        .map_err(|e: DomainError| json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}
