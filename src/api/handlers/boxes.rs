//! Box catalog and fitting endpoints

use actix_web::{http::StatusCode, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::api::error::{error_response, ErrorResponse};
use crate::domain::{BoxCategory, Dimensions, ShippingBox};
use crate::packing::{find_smallest_box, find_suitable_boxes, is_poster_like};
use crate::AppState;

/// Query parameters for listing boxes
#[derive(Debug, Deserialize, IntoParams)]
pub struct BoxesQuery {
    /// Filter by category (envelope, pak, small, medium, large, xlarge, tube, international, custom)
    pub category: Option<String>,
}

/// Query parameters for product type recommendations
#[derive(Debug, Deserialize, IntoParams)]
pub struct RecommendQuery {
    /// Product type tag (e.g., "posters", "apparel")
    pub product_type: String,
    /// Item weight in pounds
    #[serde(default)]
    pub weight: f64,
}

/// Request body for a fit check
#[derive(Debug, Deserialize, ToSchema)]
pub struct FitRequest {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Item weight in pounds
    pub weight: f64,
}

#[derive(Serialize, ToSchema)]
pub struct BoxesListResponse {
    pub success: bool,
    pub data: Vec<ShippingBox>,
    pub count: usize,
}

#[derive(Serialize, ToSchema)]
pub struct BoxResponse {
    pub success: bool,
    pub data: ShippingBox,
}

#[derive(Serialize, ToSchema)]
pub struct FitResult {
    /// Every box the item fits in, catalog order
    pub suitable: Vec<ShippingBox>,
    /// Smallest suitable box by volume
    pub smallest: Option<ShippingBox>,
    pub poster_like: bool,
}

#[derive(Serialize, ToSchema)]
pub struct FitResponse {
    pub success: bool,
    pub data: FitResult,
}

#[derive(Serialize, ToSchema)]
pub struct ProductTypesResponse {
    pub success: bool,
    pub data: Vec<String>,
}

fn list_response(boxes: Vec<&ShippingBox>) -> HttpResponse {
    let data: Vec<ShippingBox> = boxes.into_iter().cloned().collect();
    HttpResponse::Ok().json(BoxesListResponse {
        success: true,
        count: data.len(),
        data,
    })
}

/// GET /api/v1/boxes - List catalog boxes
#[utoipa::path(
    get,
    path = "/api/v1/boxes",
    tag = "boxes",
    params(BoxesQuery),
    responses(
        (status = 200, description = "Catalog boxes", body = BoxesListResponse),
        (status = 400, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn list_boxes(state: web::Data<AppState>, query: web::Query<BoxesQuery>) -> HttpResponse {
    let catalog = state.engine.catalog();

    match query.category.as_deref() {
        None => list_response(catalog.all().iter().collect()),
        Some(raw) => match BoxCategory::parse(raw) {
            Some(category) => list_response(catalog.by_category(category)),
            None => error_response(
                StatusCode::BAD_REQUEST,
                "INVALID_CATEGORY",
                format!("Unknown box category '{}'", raw),
            ),
        },
    }
}

/// GET /api/v1/boxes/{box_id} - Get one box
#[utoipa::path(
    get,
    path = "/api/v1/boxes/{box_id}",
    tag = "boxes",
    params(
        ("box_id" = String, Path, description = "Box identifier (e.g., 'fedex_medium_box_m1')")
    ),
    responses(
        (status = 200, description = "Box details", body = BoxResponse),
        (status = 404, description = "Box not found", body = ErrorResponse)
    )
)]
pub async fn get_box(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let box_id = path.into_inner();

    match state.engine.catalog().get(&box_id) {
        Some(found) => HttpResponse::Ok().json(BoxResponse {
            success: true,
            data: found.clone(),
        }),
        None => error_response(
            StatusCode::NOT_FOUND,
            "BOX_NOT_FOUND",
            format!("Box '{}' does not exist", box_id),
        ),
    }
}

/// POST /api/v1/boxes/fit - Find the boxes an item fits in
#[utoipa::path(
    post,
    path = "/api/v1/boxes/fit",
    tag = "boxes",
    request_body = FitRequest,
    responses(
        (status = 200, description = "Fit result (empty when nothing fits)", body = FitResponse),
        (status = 400, description = "Invalid item", body = ErrorResponse)
    )
)]
pub async fn fit_item(state: web::Data<AppState>, body: web::Json<FitRequest>) -> HttpResponse {
    let dims = Dimensions::new(body.length, body.width, body.height);
    if !dims.is_valid() || !(body.weight.is_finite() && body.weight > 0.0) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_PACKAGE",
            "Dimensions and weight must be positive numbers",
        );
    }

    let catalog = state.engine.catalog();
    let suitable = find_suitable_boxes(catalog, body.length, body.width, body.height, body.weight);
    let smallest = find_smallest_box(catalog, body.length, body.width, body.height, body.weight);

    debug!(suitable = suitable.len(), smallest = ?smallest.map(|b| &b.id), "Fit check");

    HttpResponse::Ok().json(FitResponse {
        success: true,
        data: FitResult {
            smallest: smallest.cloned(),
            suitable: suitable.into_iter().cloned().collect(),
            poster_like: is_poster_like(body.length, body.width, body.height),
        },
    })
}

/// GET /api/v1/boxes/recommend - Boxes tagged for a product type
#[utoipa::path(
    get,
    path = "/api/v1/boxes/recommend",
    tag = "boxes",
    params(RecommendQuery),
    responses(
        (status = 200, description = "Recommended boxes", body = BoxesListResponse)
    )
)]
pub async fn recommend_boxes(state: web::Data<AppState>, query: web::Query<RecommendQuery>) -> HttpResponse {
    list_response(
        state
            .engine
            .catalog()
            .recommend_for_product_type(&query.product_type, query.weight),
    )
}

/// GET /api/v1/boxes/product-types - Product type tags known to the catalog
#[utoipa::path(
    get,
    path = "/api/v1/boxes/product-types",
    tag = "boxes",
    responses(
        (status = 200, description = "Product type tags", body = ProductTypesResponse)
    )
)]
pub async fn list_product_types(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ProductTypesResponse {
        success: true,
        data: state.engine.catalog().product_types(),
    })
}
