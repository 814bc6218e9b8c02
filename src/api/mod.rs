//! API module - HTTP routes and handlers

pub mod error;
pub mod handlers;
pub mod openapi;

use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::openapi::ApiDoc;

/// Configure all API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(
                web::scope("/boxes")
                    // More specific routes first
                    .route("/fit", web::post().to(handlers::boxes::fit_item))
                    .route("/recommend", web::get().to(handlers::boxes::recommend_boxes))
                    .route("/product-types", web::get().to(handlers::boxes::list_product_types))
                    // General routes
                    .route("", web::get().to(handlers::boxes::list_boxes))
                    .route("/{box_id}", web::get().to(handlers::boxes::get_box))
            )
            .service(
                web::scope("/hubs")
                    .route("", web::get().to(handlers::hubs::list_hubs))
                    .route("/resolve/{region}", web::get().to(handlers::hubs::resolve_hub))
            )
            .route("/carriers", web::get().to(handlers::carriers::list_carriers))
            .route("/packages/plan", web::post().to(handlers::rates::plan_packages))
            .route("/rates", web::post().to(handlers::rates::shop_rates))
            .route("/labels", web::post().to(handlers::labels::create_label))
            .route(
                "/tracking/{carrier}/{tracking_number}",
                web::get().to(handlers::tracking::track_shipment),
            )
    )
    .route("/health", web::get().to(handlers::health::health_check))
    // Swagger UI and OpenAPI document
    .service(
        SwaggerUi::new("/swagger-ui/{_:.*}")
            .url("/api-docs/openapi.json", ApiDoc::openapi())
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carriers::{CarrierRegistry, SandboxCarrier};
    use crate::catalog::BoxCatalog;
    use crate::config::Settings;
    use crate::engine::ShippingEngine;
    use crate::routing::{HubTable, CENTRAL_HUB_ID};
    use crate::AppState;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn app_state() -> web::Data<AppState> {
        let settings = Settings::default();
        let registry = CarrierRegistry::new().with(Arc::new(SandboxCarrier::new()));
        let engine = ShippingEngine::new(
            Arc::new(BoxCatalog::standard()),
            Arc::new(HubTable::standard()),
            Arc::new(registry),
            &settings.shipping,
        );
        web::Data::new(AppState::new(Arc::new(engine)))
    }

    fn address(region: &str) -> Value {
        json!({
            "street_lines": ["20 Harbor Rd"],
            "city": "Somewhere",
            "region_code": region,
            "postal_code": "75063"
        })
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["carriers"], json!(["sandbox"]));
        assert!(body["boxes_loaded"].as_u64().unwrap() > 0);
    }

    #[actix_web::test]
    async fn test_box_routes() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/api/v1/boxes/fedex_tube").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["category"], "tube");

        let req = test::TestRequest::get().uri("/api/v1/boxes/no_such_box").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/v1/boxes?category=crate").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_fit() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/boxes/fit")
            .set_json(json!({ "length": 10.0, "width": 8.0, "height": 2.0, "weight": 3.0 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["smallest"]["id"], "fedex_small_box_s2");
        assert_eq!(body["data"]["poster_like"], false);

        let req = test::TestRequest::post()
            .uri("/api/v1/boxes/fit")
            .set_json(json!({ "length": 100.0, "width": 100.0, "height": 100.0, "weight": 3.0 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["data"]["smallest"].is_null());
        assert_eq!(body["data"]["suitable"], json!([]));

        let req = test::TestRequest::post()
            .uri("/api/v1/boxes/fit")
            .set_json(json!({ "length": 10.0, "width": 8.0, "height": 2.0, "weight": -1.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_resolve_hub() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/api/v1/hubs/resolve/tx").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["hub"]["id"], "5751");
        assert_eq!(body["data"]["fallback"], false);

        let req = test::TestRequest::get().uri("/api/v1/hubs/resolve/PR").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["hub"]["id"], CENTRAL_HUB_ID);
        assert_eq!(body["data"]["fallback"], true);
    }

    #[actix_web::test]
    async fn test_rates() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/rates")
            .set_json(json!({
                "origin": address("TN"),
                "destination": address("TX"),
                "items": [{ "weight": 3.0, "dimensions": { "length": 10.0, "width": 8.0, "height": 2.0 } }]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["quotes"].as_array().unwrap().len(), 3);
        assert_eq!(body["data"]["partial"], false);
        assert_eq!(body["data"]["hub"]["id"], "5751");
    }

    #[actix_web::test]
    async fn test_rates_invalid_package() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/rates")
            .set_json(json!({
                "origin": address("TN"),
                "destination": address("TX"),
                "items": []
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_PACKAGE");
    }

    #[actix_web::test]
    async fn test_label_then_track() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/labels")
            .set_json(json!({
                "origin": address("TN"),
                "destination": address("CA"),
                "items": [{ "weight": 1.0 }],
                "carrier": "sandbox",
                "service_code": "SANDBOX_GROUND"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        let tracking_number = body["data"]["tracking_number"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/tracking/sandbox/{}", tracking_number))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "label_created");
        assert_eq!(body["data"]["events"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_tracking_errors() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/api/v1/tracking/sandbox/UNKNOWN1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "TRACKING_NOT_FOUND");

        let req = test::TestRequest::get().uri("/api/v1/tracking/ups/1Z999").to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "UNKNOWN_CARRIER");
    }
}
