use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use bloodbank_core::BloodGroup;
use bloodbank_infra::BloodBankService;
use bloodbank_inventory::InventorySnapshot;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_inventory))
        .route("/adjust", post(adjust_inventory))
        .route("/:group", get(get_units))
}

/// Persisted rows plus the all-groups view.
pub async fn list_inventory(Extension(service): Extension<Arc<BloodBankService>>) -> Response {
    let rows = match service.inventory_rows().await {
        Ok(rows) => rows,
        Err(e) => return errors::service_error_to_response(e),
    };
    let snapshot = InventorySnapshot::from_rows(&rows);

    Json(json!({
        "items": rows,
        "units": snapshot,
        "total_units": snapshot.total_units(),
    }))
    .into_response()
}

pub async fn get_units(
    Extension(service): Extension<Arc<BloodBankService>>,
    Path(group): Path<String>,
) -> Response {
    let blood_group: BloodGroup = match group.parse() {
        Ok(g) => g,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.inventory_units(blood_group).await {
        Ok(units) => Json(json!({
            "blood_group": blood_group,
            "total_units": units,
        }))
        .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn adjust_inventory(
    Extension(service): Extension<Arc<BloodBankService>>,
    body: Result<Json<dto::AdjustInventoryRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(r) => return errors::rejection_to_response(r),
    };
    let blood_group = match body.blood_group() {
        Ok(g) => g,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.adjust_inventory(blood_group, body.delta_units).await {
        Ok(row) => Json(row).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
