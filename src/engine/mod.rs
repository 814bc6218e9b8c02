//! Shipping decision engine
//!
//! Ties the box catalog, packing selector, hub router and carrier
//! registry together:
//! - Packing items into catalog boxes (or custom parcels)
//! - Resolving the processing hub for hub-based services
//! - Concurrent rate shopping under a shared deadline
//! - Label purchase and tracking routed to the right carrier

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::carriers::{CarrierError, CarrierGateway, CarrierRegistry, LabelRequest, RateRequest};
use crate::catalog::BoxCatalog;
use crate::config::ShippingSettings;
use crate::domain::{
    Address, ItemSpec, Label, Package, PackageError, RateQuote, ServiceLevel, ShipmentRequest, TrackingEvent,
};
use crate::packing::{PackingDecision, PackingOptions, PackingSelector};
use crate::rating::{RateShopError, RateShopper, ServiceFailure};
use crate::routing::{Hub, HubRouter, HubTable};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid package: {0}")]
    InvalidPackage(#[from] PackageError),

    #[error("Unknown carrier: {0}")]
    UnknownCarrier(String),

    #[error("No registered service level matches {0:?}")]
    UnknownService(Vec<String>),

    #[error(transparent)]
    RateShop(#[from] RateShopError),

    #[error(transparent)]
    Carrier(#[from] CarrierError),
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Quotes for one shipment together with the decisions behind them
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuoteResponse {
    /// Quotes in completion order
    pub quotes: Vec<RateQuote>,

    /// One packing decision per requested item
    pub packages: Vec<PackingDecision>,

    /// Hub resolved for hub-based service levels
    pub hub: Option<Hub>,

    /// Service levels that produced no quote
    pub failures: Vec<ServiceFailure>,

    pub partial: bool,
    pub cheapest: Option<RateQuote>,
    pub fastest: Option<RateQuote>,
    pub elapsed_ms: u64,
}

/// Label purchase for a chosen carrier service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LabelOrder {
    pub origin: Address,
    pub destination: Address,
    pub items: Vec<ItemSpec>,

    #[serde(default)]
    pub product_type: Option<String>,

    /// Carrier code (e.g., "fedex")
    pub carrier: String,

    /// Service code from a previous quote
    pub service_code: String,
}

// ============================================================================
// Engine
// ============================================================================

/// Facade over packing, routing, rate shopping, labels and tracking
#[derive(Debug, Clone)]
pub struct ShippingEngine {
    packing: PackingSelector,
    router: HubRouter,
    registry: Arc<CarrierRegistry>,
    shopper: RateShopper,
}

impl ShippingEngine {
    /// Create an engine from injected tables and carriers
    ///
    /// # Arguments
    /// * `catalog` - Box catalog used for packing
    /// * `hubs` - Hub table used for hub-based services
    /// * `registry` - Carriers available for quoting and labels
    /// * `settings` - Deadline, retry and packing behaviour
    pub fn new(
        catalog: Arc<BoxCatalog>,
        hubs: Arc<HubTable>,
        registry: Arc<CarrierRegistry>,
        settings: &ShippingSettings,
    ) -> Self {
        let packing = PackingSelector::new(catalog).with_options(PackingOptions {
            prefer_tube_for_posters: settings.prefer_tube_for_posters,
        });
        let shopper = RateShopper::new(registry.clone(), settings.rate_deadline())
            .with_retries(settings.max_retries, settings.initial_backoff());

        ShippingEngine {
            packing,
            router: HubRouter::new(hubs),
            registry,
            shopper,
        }
    }

    pub fn catalog(&self) -> &BoxCatalog {
        self.packing.catalog()
    }

    pub fn router(&self) -> &HubRouter {
        &self.router
    }

    pub fn registry(&self) -> &CarrierRegistry {
        &self.registry
    }

    /// Choose a container for every item in the request
    pub fn plan_packages(&self, request: &ShipmentRequest) -> Vec<PackingDecision> {
        self.packing.plan(&request.items, request.product_type.as_deref())
    }

    fn build_packages(
        &self,
        items: &[ItemSpec],
        product_type: Option<&str>,
    ) -> Result<(Vec<PackingDecision>, Vec<Package>), EngineError> {
        if items.is_empty() {
            return Err(PackageError::NoItems.into());
        }
        items.iter().try_for_each(ItemSpec::validate)?;

        let decisions = self.packing.plan(items, product_type);
        let packages = decisions
            .iter()
            .zip(items)
            .map(|(decision, item)| decision.to_package(item.declared_value_cents))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((decisions, packages))
    }

    /// Service levels to shop: the request's explicit codes, or everything registered
    fn select_levels(&self, service_codes: Option<&[String]>) -> Result<Vec<ServiceLevel>, EngineError> {
        let all = self.registry.service_levels();
        let Some(codes) = service_codes else {
            return Ok(all);
        };

        let selected: Vec<ServiceLevel> = all
            .into_iter()
            .filter(|level| codes.iter().any(|c| c.eq_ignore_ascii_case(&level.service_code)))
            .collect();

        let unmatched: Vec<&String> = codes
            .iter()
            .filter(|c| !selected.iter().any(|l| l.service_code.eq_ignore_ascii_case(c)))
            .collect();
        if !unmatched.is_empty() {
            warn!(unmatched = ?unmatched, "Requested service codes not offered by any carrier");
        }

        if selected.is_empty() {
            return Err(EngineError::UnknownService(codes.to_vec()));
        }
        Ok(selected)
    }

    /// Pack, route and rate-shop a shipment
    #[instrument(skip(self, request), fields(items = request.items.len(), destination = %request.destination.region_code))]
    pub async fn quote(&self, request: &ShipmentRequest) -> Result<QuoteResponse, EngineError> {
        let (decisions, packages) = self.build_packages(&request.items, request.product_type.as_deref())?;
        let levels = self.select_levels(request.service_codes.as_deref())?;

        let hub = levels
            .iter()
            .any(|l| l.hub_based)
            .then(|| self.router.resolve_hub(&request.destination.region_code).clone());

        let rate_request = RateRequest::new(request.origin.clone(), request.destination.clone(), packages);
        let outcome = self
            .shopper
            .shop(&rate_request, &levels, hub.as_ref().map(|h| h.id.as_str()))
            .await?;

        Ok(QuoteResponse {
            partial: outcome.is_partial(),
            cheapest: outcome.cheapest().cloned(),
            fastest: outcome.fastest().cloned(),
            elapsed_ms: outcome.elapsed_ms,
            quotes: outcome.quotes,
            failures: outcome.failures,
            packages: decisions,
            hub,
        })
    }

    fn gateway(&self, carrier: &str) -> Result<Arc<dyn CarrierGateway>, EngineError> {
        self.registry
            .get(carrier)
            .ok_or_else(|| EngineError::UnknownCarrier(carrier.to_string()))
    }

    /// Buy a label; a single carrier call, never retried
    #[instrument(skip(self, order), fields(carrier = %order.carrier, service_code = %order.service_code))]
    pub async fn create_label(&self, order: &LabelOrder) -> Result<Label, EngineError> {
        let gateway = self.gateway(&order.carrier)?;
        let (_, packages) = self.build_packages(&order.items, order.product_type.as_deref())?;

        let hub_based = gateway
            .service_levels()
            .iter()
            .any(|l| l.hub_based && l.service_code.eq_ignore_ascii_case(&order.service_code));
        let hub_id = hub_based.then(|| self.router.resolve_hub(&order.destination.region_code).id.clone());

        let request = LabelRequest {
            origin: order.origin.clone(),
            destination: order.destination.clone(),
            packages,
            service_code: order.service_code.clone(),
            hub_id,
        };

        match gateway.create_label(&request).await {
            Ok(label) => {
                info!(tracking_number = %label.tracking_number, cost_cents = label.cost_cents, "Label created");
                Ok(label)
            }
            Err(err) => {
                warn!(error = %err, "Label creation failed");
                Err(err.into())
            }
        }
    }

    /// Scan history for a tracking number, oldest first
    #[instrument(skip(self))]
    pub async fn track(&self, carrier: &str, tracking_number: &str) -> Result<Vec<TrackingEvent>, EngineError> {
        let gateway = self.gateway(carrier)?;
        let events = gateway.track(tracking_number).await.map_err(|err| {
            warn!(error = %err, "Tracking lookup failed");
            err
        })?;

        info!(events = events.len(), "Tracking retrieved");
        Ok(events)
    }
}
