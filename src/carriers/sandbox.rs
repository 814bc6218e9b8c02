//! In-process sandbox carrier
//!
//! A deterministic carrier used for local development and tests. Prices
//! come from a fixed table, latency and failures can be injected per
//! service, and created labels are kept in memory so they can be tracked.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use crate::carriers::traits::{CarrierError, CarrierGateway, CarrierResult, LabelRequest, RateRequest};
use crate::domain::{
    Address, Label, LabelArtifact, RateQuote, ServiceLevel, TrackingEvent, TrackingStatus,
};

pub const SANDBOX_CODE: &str = "sandbox";

struct SandboxService {
    code: &'static str,
    name: &'static str,
    base_cents: i64,
    per_lb_cents: i64,
    transit_days: u32,
    guaranteed: bool,
    hub_based: bool,
}

const SERVICES: &[SandboxService] = &[
    SandboxService { code: "SANDBOX_EXPRESS", name: "Sandbox Express", base_cents: 2450, per_lb_cents: 310, transit_days: 1, guaranteed: true, hub_based: false },
    SandboxService { code: "SANDBOX_GROUND", name: "Sandbox Ground", base_cents: 925, per_lb_cents: 85, transit_days: 4, guaranteed: false, hub_based: false },
    SandboxService { code: "SANDBOX_ECONOMY", name: "Sandbox Economy", base_cents: 640, per_lb_cents: 55, transit_days: 6, guaranteed: false, hub_based: true },
];

const RESIDENTIAL_SURCHARGE_CENTS: i64 = 450;

/// Labels remembered for tracking before the oldest are dropped
pub const DEFAULT_LABEL_CAPACITY: usize = 10_000;

/// What a failure injection does to calls for one service
#[derive(Debug, Clone)]
enum Injected {
    /// Fail every call
    Always(CarrierError),
    /// Fail the next `remaining` calls with a transient error
    Flaky { remaining: u32 },
}

/// Label kept for tracking
#[derive(Debug, Clone)]
struct ShipmentRecord {
    service_code: String,
    created_at: DateTime<Utc>,
    origin: String,
    destination: String,
}

/// Created labels, evicted oldest first once `capacity` is reached
#[derive(Debug)]
struct LabelStore {
    records: HashMap<String, ShipmentRecord>,
    order: VecDeque<String>,
    capacity: usize,
}

impl LabelStore {
    fn new(capacity: usize) -> Self {
        LabelStore {
            records: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn insert(&mut self, tracking_number: String, record: ShipmentRecord) {
        while self.order.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.records.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(tracking_number.clone());
        self.records.insert(tracking_number, record);
    }

    fn get(&self, tracking_number: &str) -> Option<&ShipmentRecord> {
        self.records.get(tracking_number)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Deterministic in-memory carrier
pub struct SandboxCarrier {
    code: String,
    name: String,
    latency: HashMap<String, Duration>,
    injected: Mutex<HashMap<String, Injected>>,
    labels: RwLock<LabelStore>,
    sequence: AtomicU64,
}

impl SandboxCarrier {
    pub fn new() -> Self {
        Self::with_code(SANDBOX_CODE, "Sandbox Carrier")
    }

    /// Sandbox under another carrier code, useful for multi-carrier setups
    pub fn with_code(code: &str, name: &str) -> Self {
        SandboxCarrier {
            code: code.to_string(),
            name: name.to_string(),
            latency: HashMap::new(),
            injected: Mutex::new(HashMap::new()),
            labels: RwLock::new(LabelStore::new(DEFAULT_LABEL_CAPACITY)),
            sequence: AtomicU64::new(1),
        }
    }

    /// Keep at most `capacity` labels trackable
    pub fn with_label_capacity(self, capacity: usize) -> Self {
        *self.labels.write() = LabelStore::new(capacity);
        self
    }

    /// Number of labels currently trackable
    pub fn stored_labels(&self) -> usize {
        self.labels.read().len()
    }

    /// Delay every rate call for `service_code`
    pub fn with_latency(mut self, service_code: &str, latency: Duration) -> Self {
        self.latency.insert(service_code.to_uppercase(), latency);
        self
    }

    /// Fail every rate and label call for `service_code`
    pub fn with_failure(self, service_code: &str, error: CarrierError) -> Self {
        self.injected
            .lock()
            .insert(service_code.to_uppercase(), Injected::Always(error));
        self
    }

    /// Fail the next `times` calls for `service_code` with a transient error
    pub fn with_flaky(self, service_code: &str, times: u32) -> Self {
        self.injected
            .lock()
            .insert(service_code.to_uppercase(), Injected::Flaky { remaining: times });
        self
    }

    fn service(code: &str) -> CarrierResult<&'static SandboxService> {
        SERVICES
            .iter()
            .find(|s| s.code.eq_ignore_ascii_case(code))
            .ok_or_else(|| CarrierError::UnsupportedService(code.to_string()))
    }

    fn check_injected(&self, service_code: &str) -> CarrierResult<()> {
        let mut injected = self.injected.lock();
        match injected.get_mut(service_code) {
            Some(Injected::Always(err)) => Err(err.clone()),
            Some(Injected::Flaky { remaining }) if *remaining > 0 => {
                *remaining -= 1;
                Err(CarrierError::Transient(format!("{} temporarily unavailable", service_code)))
            }
            _ => Ok(()),
        }
    }

    fn price(service: &SandboxService, weight: f64, destination: &Address) -> i64 {
        let billable_lbs = weight.ceil().max(1.0) as i64;
        let surcharge = if destination.residential { RESIDENTIAL_SURCHARGE_CENTS } else { 0 };
        service.base_cents + service.per_lb_cents * billable_lbs + surcharge
    }

    fn quote(&self, service: &SandboxService, request: &RateRequest) -> RateQuote {
        RateQuote {
            carrier: self.code.clone(),
            service_code: service.code.to_string(),
            service_name: service.name.to_string(),
            amount_cents: Self::price(service, request.total_weight(), &request.destination),
            currency: "USD".to_string(),
            estimated_days: service.transit_days,
            guaranteed: service.guaranteed,
            hub_id: if service.hub_based { request.hub_id.clone() } else { None },
        }
    }

    fn next_tracking_number(&self) -> String {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}{:010}", self.code.to_uppercase(), n)
    }
}

impl Default for SandboxCarrier {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(address: &Address) -> String {
    format!("{}, {}", address.city, address.normalized_region())
}

#[async_trait]
impl CarrierGateway for SandboxCarrier {
    fn code(&self) -> &str {
        &self.code
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn service_levels(&self) -> Vec<ServiceLevel> {
        SERVICES
            .iter()
            .map(|s| {
                let level = ServiceLevel::new(&self.code, s.code, s.name);
                if s.hub_based {
                    level.hub_based()
                } else {
                    level
                }
            })
            .collect()
    }

    async fn get_rates(&self, request: &RateRequest) -> CarrierResult<Vec<RateQuote>> {
        let selected: Vec<&SandboxService> = match request.service_code.as_deref() {
            Some(code) => vec![Self::service(code)?],
            None => SERVICES.iter().collect(),
        };

        let delay = selected
            .iter()
            .filter_map(|s| self.latency.get(s.code))
            .max()
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut quotes = Vec::with_capacity(selected.len());
        for service in selected {
            match self.check_injected(service.code) {
                Ok(()) => quotes.push(self.quote(service, request)),
                Err(err) if request.service_code.is_some() => return Err(err),
                Err(err) => debug!(service = service.code, error = %err, "Sandbox service omitted"),
            }
        }

        Ok(quotes)
    }

    async fn create_label(&self, request: &LabelRequest) -> CarrierResult<Label> {
        let service = Self::service(&request.service_code)?;
        self.check_injected(service.code)?;

        if request.packages.is_empty() {
            return Err(CarrierError::LabelRejected("Shipment has no packages".to_string()));
        }
        if request.destination.postal_code.trim().is_empty() {
            return Err(CarrierError::InvalidAddress("Destination postal code is required".to_string()));
        }

        let weight: f64 = request.packages.iter().map(|p| p.weight()).sum();
        let tracking_number = self.next_tracking_number();

        self.labels.write().insert(
            tracking_number.clone(),
            ShipmentRecord {
                service_code: service.code.to_string(),
                created_at: Utc::now(),
                origin: describe(&request.origin),
                destination: describe(&request.destination),
            },
        );

        info!(carrier = %self.code, tracking_number = %tracking_number, "Sandbox label created");

        Ok(Label {
            artifact: LabelArtifact::Url {
                url: format!("https://labels.sandbox.invalid/{}.pdf", tracking_number),
            },
            tracking_number,
            carrier: self.code.clone(),
            service_code: service.code.to_string(),
            cost_cents: Self::price(service, weight, &request.destination),
            currency: "USD".to_string(),
        })
    }

    async fn track(&self, tracking_number: &str) -> CarrierResult<Vec<TrackingEvent>> {
        let record = self
            .labels
            .read()
            .get(tracking_number)
            .cloned()
            .ok_or_else(|| CarrierError::NotFound(tracking_number.to_string()))?;

        Ok(vec![TrackingEvent {
            timestamp: record.created_at,
            location: record.origin,
            status: TrackingStatus::LabelCreated,
            description: format!(
                "Shipment information sent ({} to {})",
                record.service_code, record.destination
            ),
        }])
    }
}
