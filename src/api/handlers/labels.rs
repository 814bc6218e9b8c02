//! Label purchase endpoint

use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::api::error::{engine_error_response, ErrorResponse};
use crate::domain::Label;
use crate::engine::LabelOrder;
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct LabelResponse {
    pub success: bool,
    pub data: Label,
}

/// POST /api/v1/labels - Buy a label for a chosen carrier service
///
/// Issued once and never retried by the service; on a transient failure the
/// caller decides whether to try again.
#[utoipa::path(
    post,
    path = "/api/v1/labels",
    tag = "labels",
    request_body = LabelOrder,
    responses(
        (status = 201, description = "Label created", body = LabelResponse),
        (status = 400, description = "Invalid package", body = ErrorResponse),
        (status = 404, description = "Unknown carrier", body = ErrorResponse),
        (status = 422, description = "Address or label rejected by the carrier", body = ErrorResponse),
        (status = 502, description = "Carrier authentication failed", body = ErrorResponse),
        (status = 503, description = "Carrier unavailable", body = ErrorResponse)
    )
)]
pub async fn create_label(state: web::Data<AppState>, body: web::Json<LabelOrder>) -> HttpResponse {
    let order = body.into_inner();

    match state.engine.create_label(&order).await {
        Ok(label) => {
            info!(
                carrier = %label.carrier,
                tracking_number = %label.tracking_number,
                "Label issued"
            );
            HttpResponse::Created().json(LabelResponse {
                success: true,
                data: label,
            })
        }
        Err(e) => {
            error!(carrier = %order.carrier, service_code = %order.service_code, error = %e, "Label purchase failed");
            engine_error_response(&e)
        }
    }
}
