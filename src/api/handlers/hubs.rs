//! Hub table and routing endpoints

use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::routing::Hub;
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct HubsListResponse {
    pub success: bool,
    pub data: Vec<Hub>,
    pub fallback_hub_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct ResolvedHub {
    pub region: String,
    pub hub: Hub,
    /// True when no hub lists the region and the fallback was used
    pub fallback: bool,
}

#[derive(Serialize, ToSchema)]
pub struct HubResolveResponse {
    pub success: bool,
    pub data: ResolvedHub,
}

/// GET /api/v1/hubs - List processing hubs
#[utoipa::path(
    get,
    path = "/api/v1/hubs",
    tag = "hubs",
    responses(
        (status = 200, description = "Hub table", body = HubsListResponse)
    )
)]
pub async fn list_hubs(state: web::Data<AppState>) -> HttpResponse {
    let table = state.engine.router().table();

    HttpResponse::Ok().json(HubsListResponse {
        success: true,
        data: table.hubs().to_vec(),
        fallback_hub_id: table.fallback().id.clone(),
    })
}

/// GET /api/v1/hubs/resolve/{region} - Hub serving a destination region
#[utoipa::path(
    get,
    path = "/api/v1/hubs/resolve/{region}",
    tag = "hubs",
    params(
        ("region" = String, Path, description = "Destination state/region code (e.g., 'TX')")
    ),
    responses(
        (status = 200, description = "Resolved hub (never fails)", body = HubResolveResponse)
    )
)]
pub async fn resolve_hub(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let region = path.into_inner();
    let hub = state.engine.router().resolve_hub(&region);
    let fallback = !hub.serves(region.trim());

    info!(region = %region, hub_id = %hub.id, fallback, "Resolved hub");

    HttpResponse::Ok().json(HubResolveResponse {
        success: true,
        data: ResolvedHub {
            region,
            hub: hub.clone(),
            fallback,
        },
    })
}
