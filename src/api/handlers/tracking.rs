//! Tracking endpoint

use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::api::error::{engine_error_response, ErrorResponse};
use crate::domain::{TrackingEvent, TrackingStatus};
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct TrackingData {
    pub carrier: String,
    pub tracking_number: String,
    /// Status of the most recent event, absent before the first scan
    pub status: Option<TrackingStatus>,
    /// Scan events, oldest first
    pub events: Vec<TrackingEvent>,
}

#[derive(Serialize, ToSchema)]
pub struct TrackingResponse {
    pub success: bool,
    pub data: TrackingData,
}

/// GET /api/v1/tracking/{carrier}/{tracking_number} - Scan history
#[utoipa::path(
    get,
    path = "/api/v1/tracking/{carrier}/{tracking_number}",
    tag = "tracking",
    params(
        ("carrier" = String, Path, description = "Carrier code (e.g., 'fedex')"),
        ("tracking_number" = String, Path, description = "Carrier tracking number")
    ),
    responses(
        (status = 200, description = "Tracking events", body = TrackingResponse),
        (status = 404, description = "Unknown carrier or tracking number", body = ErrorResponse),
        (status = 422, description = "Carrier rejected the lookup", body = ErrorResponse),
        (status = 503, description = "Carrier unavailable", body = ErrorResponse)
    )
)]
pub async fn track_shipment(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (carrier, tracking_number) = path.into_inner();

    match state.engine.track(&carrier, &tracking_number).await {
        Ok(events) => HttpResponse::Ok().json(TrackingResponse {
            success: true,
            data: TrackingData {
                status: events.last().map(|e| e.status.clone()),
                carrier,
                tracking_number,
                events,
            },
        }),
        Err(e) => {
            warn!(carrier = %carrier, tracking_number = %tracking_number, error = %e, "Tracking failed");
            engine_error_response(&e)
        }
    }
}
