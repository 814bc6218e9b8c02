//! Carrier gateway trait definitions
//!
//! Every carrier integration implements `CarrierGateway`, translating the
//! normalized request types into carrier calls and carrier responses back
//! into `RateQuote`, `Label` and `TrackingEvent`. The orchestrator and the
//! engine are written against this trait only.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Address, Label, Package, RateQuote, ServiceLevel, TrackingEvent};

// ============================================================================
// Error Types
// ============================================================================

/// Per-call carrier failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CarrierError {
    #[error("Carrier authentication failed: {0}")]
    AuthFailed(String),

    #[error("Address rejected by carrier: {0}")]
    InvalidAddress(String),

    #[error("Transient carrier failure: {0}")]
    Transient(String),

    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Label creation rejected: {0}")]
    LabelRejected(String),

    #[error("Request rejected by carrier: {0}")]
    Rejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported service: {0}")]
    UnsupportedService(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Carrier not configured: {0}")]
    NotConfigured(String),
}

impl CarrierError {
    /// Eligible for caller-level retry with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, CarrierError::Transient(_) | CarrierError::RateLimited { .. })
    }
}

impl From<reqwest::Error> for CarrierError {
    fn from(err: reqwest::Error) -> Self {
        CarrierError::Transient(err.to_string())
    }
}

/// Result type for carrier operations
pub type CarrierResult<T> = Result<T, CarrierError>;

// ============================================================================
// Credentials
// ============================================================================

/// Opaque carrier credentials handed in at construction time
#[derive(Debug, Clone, Default)]
pub struct CarrierCredentials {
    /// OAuth bearer token (obtained outside this crate)
    pub access_token: Option<String>,

    /// Shipper account number
    pub account_number: Option<String>,
}

impl CarrierCredentials {
    /// Read `<CARRIER>_ACCESS_TOKEN` and `<CARRIER>_ACCOUNT_NUMBER`
    pub fn from_env(carrier_code: &str) -> Self {
        let prefix = carrier_code.to_uppercase();
        CarrierCredentials {
            access_token: std::env::var(format!("{}_ACCESS_TOKEN", prefix)).ok(),
            account_number: std::env::var(format!("{}_ACCOUNT_NUMBER", prefix)).ok(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.access_token.is_some() && self.account_number.is_some()
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Normalized rate request
#[derive(Debug, Clone)]
pub struct RateRequest {
    pub origin: Address,
    pub destination: Address,
    pub packages: Vec<Package>,

    /// Restrict to one service code; all services when `None`
    pub service_code: Option<String>,

    /// Processing hub for hub-based services
    pub hub_id: Option<String>,
}

impl RateRequest {
    pub fn new(origin: Address, destination: Address, packages: Vec<Package>) -> Self {
        RateRequest {
            origin,
            destination,
            packages,
            service_code: None,
            hub_id: None,
        }
    }

    /// Copy of this request narrowed to one service level
    pub fn for_service(&self, service_code: &str, hub_id: Option<String>) -> Self {
        RateRequest {
            service_code: Some(service_code.to_string()),
            hub_id,
            ..self.clone()
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.packages.iter().map(Package::weight).sum()
    }
}

/// Normalized label purchase request
#[derive(Debug, Clone)]
pub struct LabelRequest {
    pub origin: Address,
    pub destination: Address,
    pub packages: Vec<Package>,
    pub service_code: String,
    pub hub_id: Option<String>,
}

// ============================================================================
// Carrier Gateway Trait
// ============================================================================

/// Capability set every carrier integration provides
#[async_trait]
pub trait CarrierGateway: Send + Sync {
    /// Carrier code (e.g., "fedex")
    fn code(&self) -> &str;

    /// Display name (e.g., "FedEx")
    fn name(&self) -> &str;

    /// Service levels this carrier can be shopped for
    fn service_levels(&self) -> Vec<ServiceLevel>;

    /// Quote the applicable service levels for a shipment
    ///
    /// Failures are per call: authentication, address rejection, or transient.
    async fn get_rates(&self, request: &RateRequest) -> CarrierResult<Vec<RateQuote>>;

    /// Purchase a label. Never retried: the carrier may already have
    /// reserved a tracking number.
    async fn create_label(&self, request: &LabelRequest) -> CarrierResult<Label>;

    /// Scan history for a tracking number, oldest first
    async fn track(&self, tracking_number: &str) -> CarrierResult<Vec<TrackingEvent>>;

    /// Remaining requests in the current rate limit window, if known
    fn rate_limit_remaining(&self) -> Option<u32> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(CarrierError::Transient("503".to_string()).is_retryable());
        assert!(CarrierError::RateLimited { retry_after_secs: 5 }.is_retryable());
        assert!(!CarrierError::AuthFailed("bad token".to_string()).is_retryable());
        assert!(!CarrierError::InvalidAddress("zip".to_string()).is_retryable());
        assert!(!CarrierError::LabelRejected("dup".to_string()).is_retryable());
    }

    #[test]
    fn test_credentials_default() {
        let creds = CarrierCredentials::default();
        assert!(!creds.is_configured());

        let creds = CarrierCredentials {
            access_token: Some("token".to_string()),
            account_number: None,
        };
        assert!(!creds.is_configured());
    }
}
