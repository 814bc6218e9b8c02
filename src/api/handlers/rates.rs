//! Packing plan and rate shopping endpoints

use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Serialize;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::api::error::{engine_error_response, error_response, ErrorResponse};
use crate::domain::ShipmentRequest;
use crate::engine::QuoteResponse;
use crate::packing::PackingDecision;
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct RatesResponse {
    pub success: bool,
    pub data: QuoteResponse,
}

#[derive(Serialize, ToSchema)]
pub struct PackingPlanResponse {
    pub success: bool,
    pub data: Vec<PackingDecision>,
}

/// POST /api/v1/rates - Pack, route and rate-shop a shipment
#[utoipa::path(
    post,
    path = "/api/v1/rates",
    tag = "rates",
    request_body = ShipmentRequest,
    responses(
        (status = 200, description = "Quotes (possibly partial, see `failures`)", body = RatesResponse),
        (status = 400, description = "Invalid package or service code", body = ErrorResponse),
        (status = 503, description = "No carrier produced a rate", body = ErrorResponse)
    )
)]
pub async fn shop_rates(state: web::Data<AppState>, body: web::Json<ShipmentRequest>) -> HttpResponse {
    let request = body.into_inner();

    match state.engine.quote(&request).await {
        Ok(response) => {
            info!(
                quotes = response.quotes.len(),
                partial = response.partial,
                elapsed_ms = response.elapsed_ms,
                "Rates returned"
            );
            HttpResponse::Ok().json(RatesResponse {
                success: true,
                data: response,
            })
        }
        Err(e) => {
            error!(error = %e, "Rate shopping failed");
            engine_error_response(&e)
        }
    }
}

/// POST /api/v1/packages/plan - Packing decisions without quoting
#[utoipa::path(
    post,
    path = "/api/v1/packages/plan",
    tag = "rates",
    request_body = ShipmentRequest,
    responses(
        (status = 200, description = "One packing decision per item", body = PackingPlanResponse),
        (status = 400, description = "Invalid package", body = ErrorResponse)
    )
)]
pub async fn plan_packages(state: web::Data<AppState>, body: web::Json<ShipmentRequest>) -> HttpResponse {
    if let Err(e) = body.validate() {
        return error_response(StatusCode::BAD_REQUEST, "INVALID_PACKAGE", e.to_string());
    }

    HttpResponse::Ok().json(PackingPlanResponse {
        success: true,
        data: state.engine.plan_packages(&body),
    })
}
