//! Carrier registry
//!
//! Maps carrier codes to gateway instances. Built once at startup from
//! settings and shared read-only afterwards.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::CarriersSettings;
use crate::domain::ServiceLevel;
use super::fedex::{self, FedexGateway};
use super::sandbox::SandboxCarrier;
use super::traits::{CarrierCredentials, CarrierGateway, CarrierResult};

/// Registered carrier gateways, in registration order
#[derive(Default, Clone)]
pub struct CarrierRegistry {
    carriers: HashMap<String, Arc<dyn CarrierGateway>>,
    order: Vec<String>,
}

impl CarrierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gateway, replacing any previous one with the same code
    pub fn register(&mut self, gateway: Arc<dyn CarrierGateway>) {
        let code = gateway.code().to_lowercase();
        if self.carriers.insert(code.clone(), gateway).is_none() {
            self.order.push(code);
        }
    }

    /// Builder-style `register`
    pub fn with(mut self, gateway: Arc<dyn CarrierGateway>) -> Self {
        self.register(gateway);
        self
    }

    pub fn get(&self, code: &str) -> Option<Arc<dyn CarrierGateway>> {
        self.carriers.get(&code.to_lowercase()).cloned()
    }

    pub fn codes(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Every service level offered by every registered carrier
    pub fn service_levels(&self) -> Vec<ServiceLevel> {
        self.order
            .iter()
            .filter_map(|code| self.carriers.get(code))
            .flat_map(|gateway| gateway.service_levels())
            .collect()
    }

    /// Create all enabled carriers
    ///
    /// FedEx is registered only when its credentials are present in the
    /// environment (`FEDEX_ACCESS_TOKEN`, `FEDEX_ACCOUNT_NUMBER`).
    pub fn from_settings(settings: &CarriersSettings) -> CarrierResult<Self> {
        let mut registry = CarrierRegistry::new();

        if settings.fedex.enabled {
            let credentials = CarrierCredentials::from_env(fedex::CARRIER_CODE);
            if credentials.is_configured() {
                let gateway = FedexGateway::new(
                    credentials,
                    settings.fedex.base_url.clone(),
                    settings.fedex.rate_limit_per_minute,
                    Duration::from_secs(settings.fedex.timeout_secs),
                )?;
                registry.register(Arc::new(gateway));
            } else {
                warn!("FedEx enabled but credentials are missing; carrier not registered");
            }
        }

        if settings.sandbox.enabled {
            warn!("Sandbox carrier enabled; quotes use fixed test prices");
            registry.register(Arc::new(
                SandboxCarrier::new().with_label_capacity(settings.sandbox.max_labels),
            ));
        }

        info!(carriers = ?registry.codes(), "Carrier registry initialized");
        Ok(registry)
    }
}

impl std::fmt::Debug for CarrierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierRegistry").field("carriers", &self.order).finish()
    }
}
