// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;
use tracing::debug;

use crate::web::types::{DataResponse, HealthData};

pub async fn health_handler() -> Json<DataResponse<HealthData>> {
    debug!("Health check");
    Json(DataResponse::success(
        "Service is healthy",
        HealthData {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    ))
}
