//! Registered carriers and their service levels

use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ServiceLevel;
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct CarrierInfo {
    pub code: String,
    pub name: String,
    pub service_levels: Vec<ServiceLevel>,
    /// Remaining requests in the carrier's rate limit window, if known
    pub rate_limit_remaining: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct CarriersListResponse {
    pub success: bool,
    pub data: Vec<CarrierInfo>,
}

/// GET /api/v1/carriers - List registered carriers
#[utoipa::path(
    get,
    path = "/api/v1/carriers",
    tag = "carriers",
    responses(
        (status = 200, description = "Registered carriers", body = CarriersListResponse)
    )
)]
pub async fn list_carriers(state: web::Data<AppState>) -> HttpResponse {
    let registry = state.engine.registry();

    let data = registry
        .codes()
        .iter()
        .filter_map(|code| registry.get(code))
        .map(|gateway| CarrierInfo {
            code: gateway.code().to_string(),
            name: gateway.name().to_string(),
            service_levels: gateway.service_levels(),
            rate_limit_remaining: gateway.rate_limit_remaining(),
        })
        .collect();

    HttpResponse::Ok().json(CarriersListResponse { success: true, data })
}
