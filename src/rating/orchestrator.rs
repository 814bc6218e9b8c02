//! Concurrent rate shopping
//!
//! One task per service level, all bounded by a single shared deadline.
//! Branches that fail or miss the deadline are dropped from the quotes and
//! reported in `RateShopOutcome::failures`; only a round with no quotes at
//! all is an error.

use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::carriers::{CarrierError, CarrierGateway, CarrierRegistry, RateRequest};
use crate::domain::{RateQuote, ServiceLevel};

// ============================================================================
// Outcome Types
// ============================================================================

/// Why a service level produced no quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Still outstanding when the shared deadline passed
    TimedOut,
    /// The carrier answered with an error
    Carrier,
    /// No gateway registered for the level's carrier
    UnknownCarrier,
    /// The branch panicked
    Panicked,
}

/// One service level that did not contribute a quote
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ServiceFailure {
    pub carrier: String,
    pub service_code: String,
    pub reason: FailureReason,
    pub message: String,
}

impl ServiceFailure {
    fn new(level: &ServiceLevel, reason: FailureReason, message: impl Into<String>) -> Self {
        ServiceFailure {
            carrier: level.carrier.clone(),
            service_code: level.service_code.clone(),
            reason,
            message: message.into(),
        }
    }
}

/// Result of one rate-shopping round with at least one quote
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RateShopOutcome {
    /// Quotes in completion order (unsorted)
    pub quotes: Vec<RateQuote>,
    pub failures: Vec<ServiceFailure>,
    pub elapsed_ms: u64,
}

impl RateShopOutcome {
    /// Some requested service levels are missing from the quotes
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn cheapest(&self) -> Option<&RateQuote> {
        self.quotes.iter().min_by_key(|q| q.amount_cents)
    }

    /// Fewest transit days, cheaper first on ties
    pub fn fastest(&self) -> Option<&RateQuote> {
        self.quotes.iter().min_by_key(|q| (q.estimated_days, q.amount_cents))
    }
}

#[derive(Debug, Error)]
pub enum RateShopError {
    #[error("No rates available from {attempted} service level(s)")]
    NoRatesAvailable {
        attempted: usize,
        failures: Vec<ServiceFailure>,
    },
}

// ============================================================================
// Rate Shopper
// ============================================================================

/// Fans a rate request out across service levels under one deadline
#[derive(Debug, Clone)]
pub struct RateShopper {
    registry: Arc<CarrierRegistry>,
    deadline: Duration,
    max_retries: u32,
    initial_backoff: Duration,
}

type BranchResult = (usize, Result<Result<Vec<RateQuote>, CarrierError>, String>);

impl RateShopper {
    /// # Arguments
    /// * `registry` - Carriers to route service levels to
    /// * `deadline` - Shared budget for the whole round
    pub fn new(registry: Arc<CarrierRegistry>, deadline: Duration) -> Self {
        RateShopper {
            registry,
            deadline,
            max_retries: 0,
            initial_backoff: Duration::from_millis(200),
        }
    }

    /// Retry transient failures up to `max_retries` times per branch
    pub fn with_retries(mut self, max_retries: u32, initial_backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.initial_backoff = initial_backoff;
        self
    }

    /// Quote every service level concurrently
    ///
    /// # Arguments
    /// * `request` - Shipment to quote; its `service_code` and `hub_id` are
    ///   replaced per branch
    /// * `levels` - Service levels to shop
    /// * `hub_id` - Hub passed to hub-based levels only
    #[instrument(skip(self, request, levels), fields(services = levels.len()))]
    pub async fn shop(
        &self,
        request: &RateRequest,
        levels: &[ServiceLevel],
        hub_id: Option<&str>,
    ) -> Result<RateShopOutcome, RateShopError> {
        let started = Instant::now();
        let deadline = started + self.deadline;

        let mut done = vec![false; levels.len()];
        let mut quotes = Vec::new();
        let mut failures = Vec::new();
        let mut set: JoinSet<BranchResult> = JoinSet::new();

        for (idx, level) in levels.iter().enumerate() {
            let Some(gateway) = self.registry.get(&level.carrier) else {
                done[idx] = true;
                failures.push(ServiceFailure::new(
                    level,
                    FailureReason::UnknownCarrier,
                    format!("No carrier registered for '{}'", level.carrier),
                ));
                continue;
            };

            let hub = if level.hub_based { hub_id.map(str::to_string) } else { None };
            let branch_request = request.for_service(&level.service_code, hub);
            let max_retries = self.max_retries;
            let backoff = self.initial_backoff;

            set.spawn(async move {
                let result = AssertUnwindSafe(quote_with_retry(
                    gateway,
                    branch_request,
                    max_retries,
                    backoff,
                    deadline,
                ))
                .catch_unwind()
                .await
                .map_err(panic_message);
                (idx, result)
            });
        }

        loop {
            match tokio::time::timeout_at(deadline, set.join_next()).await {
                Ok(Some(Ok((idx, result)))) => {
                    done[idx] = true;
                    let level = &levels[idx];
                    match result {
                        Ok(Ok(branch_quotes)) if !branch_quotes.is_empty() => {
                            debug!(carrier = %level.carrier, service_code = %level.service_code, "Quote received");
                            quotes.extend(branch_quotes);
                        }
                        Ok(Ok(_)) => failures.push(ServiceFailure::new(
                            level,
                            FailureReason::Carrier,
                            "Carrier returned no rate for this service",
                        )),
                        Ok(Err(err)) => {
                            failures.push(ServiceFailure::new(level, FailureReason::Carrier, err.to_string()))
                        }
                        Err(panic) => failures.push(ServiceFailure::new(level, FailureReason::Panicked, panic)),
                    }
                }
                Ok(Some(Err(join_err))) => {
                    warn!(error = %join_err, "Rate branch ended abnormally");
                }
                Ok(None) => break,
                Err(_) => {
                    set.abort_all();
                    break;
                }
            }
        }

        for (idx, level) in levels.iter().enumerate() {
            if !done[idx] {
                failures.push(ServiceFailure::new(
                    level,
                    FailureReason::TimedOut,
                    format!("No answer within {} ms", self.deadline.as_millis()),
                ));
            }
        }

        for failure in &failures {
            warn!(
                carrier = %failure.carrier,
                service_code = %failure.service_code,
                reason = ?failure.reason,
                message = %failure.message,
                "Service level dropped from rate shop"
            );
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;

        if quotes.is_empty() {
            warn!(attempted = levels.len(), elapsed_ms, "No rates available");
            return Err(RateShopError::NoRatesAvailable {
                attempted: levels.len(),
                failures,
            });
        }

        info!(
            quotes = quotes.len(),
            failed = failures.len(),
            elapsed_ms,
            "Rate shop complete"
        );

        Ok(RateShopOutcome {
            quotes,
            failures,
            elapsed_ms,
        })
    }
}

/// Call the gateway, retrying retryable errors with exponential backoff
/// while the next attempt can still start before the deadline
async fn quote_with_retry(
    gateway: Arc<dyn CarrierGateway>,
    request: RateRequest,
    max_retries: u32,
    initial_backoff: Duration,
    deadline: Instant,
) -> Result<Vec<RateQuote>, CarrierError> {
    let mut attempt: u32 = 0;
    loop {
        match gateway.get_rates(&request).await {
            Ok(quotes) => return Ok(quotes),
            Err(err) if err.is_retryable() && attempt < max_retries => {
                let mut backoff = initial_backoff.saturating_mul(2u32.saturating_pow(attempt));
                if let CarrierError::RateLimited { retry_after_secs } = err {
                    backoff = backoff.max(Duration::from_secs(retry_after_secs));
                }
                if Instant::now() + backoff >= deadline {
                    return Err(err);
                }

                attempt += 1;
                warn!(
                    carrier = gateway.code(),
                    service_code = ?request.service_code,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "Retrying rate request"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(err) => return Err(err),
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "rate branch panicked".to_string())
}
