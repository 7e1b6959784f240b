use axum::{routing::get, Router};

pub mod donations;
pub mod donors;
pub mod inventory;
pub mod recipients;
pub mod requests;
pub mod system;

/// Router for every endpoint; the service is supplied as an `Extension`.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/dashboard", get(system::dashboard))
        .route("/api/stats", get(system::stats))
        .nest("/donors", donors::router())
        .nest("/recipients", recipients::router())
        .nest("/donations", donations::router())
        .nest("/requests", requests::router())
        .nest("/inventory", inventory::router())
}
