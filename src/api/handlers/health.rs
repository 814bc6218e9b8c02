//! Health check endpoint

use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub boxes_loaded: usize,
    pub hubs_loaded: usize,
    pub carriers: Vec<String>,
}

/// GET /health - Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let engine = &state.engine;

    let response = HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        boxes_loaded: engine.catalog().len(),
        hubs_loaded: engine.router().table().hubs().len(),
        carriers: engine.registry().codes().to_vec(),
    };

    HttpResponse::Ok().json(response)
}
