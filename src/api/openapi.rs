//! OpenAPI 3.0 specification definition

use utoipa::OpenApi;

use crate::api::error::{ApiError, ErrorResponse};
use crate::api::handlers::{
    health::HealthResponse,
    boxes::{
        BoxesListResponse, BoxResponse, FitRequest, FitResponse, FitResult, ProductTypesResponse,
    },
    hubs::{HubsListResponse, HubResolveResponse, ResolvedHub},
    carriers::{CarrierInfo, CarriersListResponse},
    rates::{PackingPlanResponse, RatesResponse},
    labels::LabelResponse,
    tracking::{TrackingData, TrackingResponse},
};
use crate::domain::{
    Address, BoxCategory, Dimensions, ItemSpec, Label, LabelArtifact, RateQuote, ServiceLevel,
    ShipmentRequest, ShippingBox, TrackingEvent, TrackingStatus,
};
use crate::engine::{LabelOrder, QuoteResponse};
use crate::packing::PackingDecision;
use crate::rating::{FailureReason, ServiceFailure};
use crate::routing::Hub;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ship-Engine API",
        version = "1.0.0",
        description = "Shipping decision engine: box fitting, hub routing, concurrent rate shopping, labels and tracking",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Current server")
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "boxes", description = "Box catalog and fitting"),
        (name = "hubs", description = "Processing hub routing"),
        (name = "carriers", description = "Registered carriers"),
        (name = "rates", description = "Packing plans and rate shopping"),
        (name = "labels", description = "Label purchase"),
        (name = "tracking", description = "Shipment tracking")
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::boxes::list_boxes,
        crate::api::handlers::boxes::get_box,
        crate::api::handlers::boxes::fit_item,
        crate::api::handlers::boxes::recommend_boxes,
        crate::api::handlers::boxes::list_product_types,
        crate::api::handlers::hubs::list_hubs,
        crate::api::handlers::hubs::resolve_hub,
        crate::api::handlers::carriers::list_carriers,
        crate::api::handlers::rates::shop_rates,
        crate::api::handlers::rates::plan_packages,
        crate::api::handlers::labels::create_label,
        crate::api::handlers::tracking::track_shipment,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            ApiError,
            HealthResponse,
            // Boxes
            BoxesListResponse,
            BoxResponse,
            FitRequest,
            FitResult,
            FitResponse,
            ProductTypesResponse,
            // Hubs
            HubsListResponse,
            HubResolveResponse,
            ResolvedHub,
            // Carriers
            CarrierInfo,
            CarriersListResponse,
            // Rates, labels, tracking
            RatesResponse,
            PackingPlanResponse,
            QuoteResponse,
            ServiceFailure,
            FailureReason,
            LabelOrder,
            LabelResponse,
            TrackingData,
            TrackingResponse,
            // Domain schemas
            Address,
            ItemSpec,
            ShipmentRequest,
            Dimensions,
            BoxCategory,
            ShippingBox,
            PackingDecision,
            Hub,
            ServiceLevel,
            RateQuote,
            Label,
            LabelArtifact,
            TrackingEvent,
            TrackingStatus,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/health",
            "/api/v1/boxes/fit",
            "/api/v1/hubs/resolve/{region}",
            "/api/v1/carriers",
            "/api/v1/packages/plan",
            "/api/v1/rates",
            "/api/v1/labels",
            "/api/v1/tracking/{carrier}/{tracking_number}",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }
}
