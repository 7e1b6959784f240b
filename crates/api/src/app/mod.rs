//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs and their mapping to domain payloads
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use bloodbank_infra::BloodBankService;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(service: Arc<BloodBankService>) -> Router {
    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::request_log))
            .layer(Extension(service)),
    )
}
