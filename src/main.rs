//! Ship-Engine
//!
//! Shipping decision service using Rust + Actix-Web: box fitting, hub
//! routing, concurrent rate shopping, labels and tracking.

use actix_web::{web, App, HttpServer, middleware};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

use ship_engine::api;
use ship_engine::carriers::CarrierRegistry;
use ship_engine::catalog::BoxCatalog;
use ship_engine::config::Settings;
use ship_engine::engine::ShippingEngine;
use ship_engine::routing::HubTable;
use ship_engine::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ship_engine=info".parse()?)
                .add_directive("actix_web=info".parse()?)
        )
        .json()
        .init();

    // Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    info!(
        "Starting Ship-Engine v{} on {}",
        env!("CARGO_PKG_VERSION"),
        bind_addr
    );

    // Static tables, loaded once
    let catalog = match &settings.shipping.box_catalog_path {
        Some(path) => BoxCatalog::from_json_file(path)
            .with_context(|| format!("Failed to load box catalog from {}", path.display()))?,
        None => BoxCatalog::standard(),
    };
    let hubs = match &settings.shipping.hub_table_path {
        Some(path) => HubTable::from_json_file(path)
            .with_context(|| format!("Failed to load hub table from {}", path.display()))?,
        None => HubTable::standard(),
    };
    info!(boxes = catalog.len(), hubs = hubs.hubs().len(), "Tables loaded");

    let registry = CarrierRegistry::from_settings(&settings.carriers)
        .context("Failed to initialize carriers")?;
    if registry.is_empty() {
        tracing::warn!("No carriers registered; rate requests will fail with NO_RATES_AVAILABLE");
    }

    let engine = Arc::new(ShippingEngine::new(
        Arc::new(catalog),
        Arc::new(hubs),
        Arc::new(registry),
        &settings.shipping,
    ));

    let workers = settings.server.workers.unwrap_or_else(|| num_cpus::get() * 2);

    // Create shared application state
    let app_state = web::Data::new(AppState::new(engine));

    // Configure and start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("X-Service", "ship-engine"))
                    .add(("X-Version", env!("CARGO_PKG_VERSION")))
            )
            // Routes
            .configure(api::configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
