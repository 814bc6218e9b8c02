//! Normalized cross-carrier results
//!
//! Every carrier gateway maps its wire responses into these types, so the
//! rest of the engine never sees carrier-specific shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Service Level
// ============================================================================

/// A named carrier offering (ground, overnight, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct ServiceLevel {
    /// Carrier code (e.g., "fedex")
    pub carrier: String,

    /// Carrier service code (e.g., "FEDEX_GROUND")
    pub service_code: String,

    /// Display name
    pub display_name: String,

    /// First delivered to a regional hub for last-mile handoff
    #[serde(default)]
    pub hub_based: bool,
}

impl ServiceLevel {
    pub fn new(carrier: &str, service_code: &str, display_name: &str) -> Self {
        ServiceLevel {
            carrier: carrier.to_string(),
            service_code: service_code.to_string(),
            display_name: display_name.to_string(),
            hub_based: false,
        }
    }

    pub fn hub_based(mut self) -> Self {
        self.hub_based = true;
        self
    }
}

// ============================================================================
// Rate Quote
// ============================================================================

/// One priced offer for a (carrier, service) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateQuote {
    pub carrier: String,
    pub service_code: String,
    pub service_name: String,

    /// Total charge in minor units
    pub amount_cents: i64,

    /// ISO 4217 currency code
    pub currency: String,

    /// Estimated transit days
    pub estimated_days: u32,

    /// Carrier guarantees the delivery date
    pub guaranteed: bool,

    /// Hub the quote was priced against, for hub-based services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_id: Option<String>,
}

// ============================================================================
// Label
// ============================================================================

/// Opaque handle to the printable label document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelArtifact {
    /// Document hosted by the carrier
    Url { url: String },
    /// Document returned inline (base64 encoded)
    Inline { format: String, data: String },
}

/// A purchased shipping label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Label {
    pub tracking_number: String,
    pub carrier: String,
    pub service_code: String,
    pub artifact: LabelArtifact,

    /// Charged amount in minor units
    pub cost_cents: i64,

    pub currency: String,
}

// ============================================================================
// Tracking
// ============================================================================

/// Normalized tracking status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    LabelCreated,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
    Exception,
    /// Carrier status with no normalized equivalent, kept verbatim
    Other(String),
}

impl TrackingStatus {
    /// Map a whole carrier status code or status name (case-insensitive).
    /// Anything else is kept as `Other`.
    pub fn from_carrier(code: &str) -> Self {
        let raw = code.trim();
        let normalized = raw.to_ascii_uppercase().replace([' ', '-'], "_");

        match normalized.as_str() {
            "OC" | "LABEL_CREATED" | "SHIPMENT_INFORMATION_SENT" => TrackingStatus::LabelCreated,
            "PU" | "PICKED_UP" => TrackingStatus::PickedUp,
            "IT" | "AR" | "AF" | "DP" | "IN_TRANSIT" => TrackingStatus::InTransit,
            "OD" | "OUT_FOR_DELIVERY" => TrackingStatus::OutForDelivery,
            "DL" | "DELIVERED" => TrackingStatus::Delivered,
            "DE" | "SE" | "DY" | "EXCEPTION" | "DELAY" => TrackingStatus::Exception,
            _ => TrackingStatus::Other(raw.to_string()),
        }
    }

    pub fn is_other(&self) -> bool {
        matches!(self, TrackingStatus::Other(_))
    }
}

impl std::fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingStatus::LabelCreated => write!(f, "label_created"),
            TrackingStatus::PickedUp => write!(f, "picked_up"),
            TrackingStatus::InTransit => write!(f, "in_transit"),
            TrackingStatus::OutForDelivery => write!(f, "out_for_delivery"),
            TrackingStatus::Delivered => write!(f, "delivered"),
            TrackingStatus::Exception => write!(f, "exception"),
            TrackingStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// One scan event for a tracking number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrackingEvent {
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub status: TrackingStatus,

    /// Carrier's own wording for the event
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_status_from_codes() {
        assert_eq!(TrackingStatus::from_carrier("DL"), TrackingStatus::Delivered);
        assert_eq!(TrackingStatus::from_carrier("od"), TrackingStatus::OutForDelivery);
        assert_eq!(TrackingStatus::from_carrier("Picked up"), TrackingStatus::PickedUp);
        assert_eq!(TrackingStatus::from_carrier(" in-transit "), TrackingStatus::InTransit);
        assert_eq!(TrackingStatus::from_carrier("Shipment information sent"), TrackingStatus::LabelCreated);
        assert_eq!(TrackingStatus::from_carrier("DE"), TrackingStatus::Exception);
    }

    #[test]
    fn test_tracking_status_keeps_unmatched_text() {
        assert_eq!(
            TrackingStatus::from_carrier("Not delivered"),
            TrackingStatus::Other("Not delivered".to_string())
        );
        assert_eq!(
            TrackingStatus::from_carrier("Delivery exception cleared"),
            TrackingStatus::Other("Delivery exception cleared".to_string())
        );
        assert!(TrackingStatus::from_carrier("??").is_other());
        assert_eq!(TrackingStatus::from_carrier("Hold at location").to_string(), "Hold at location");

        let json = serde_json::to_value(TrackingStatus::Other("HL".to_string())).unwrap();
        assert_eq!(json["other"], "HL");
        assert_eq!(serde_json::to_value(TrackingStatus::Delivered).unwrap(), "delivered");
    }

    #[test]
    fn test_label_artifact_serialization() {
        let artifact = LabelArtifact::Url { url: "https://labels.example/1.pdf".to_string() };
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["kind"], "url");
        assert_eq!(json["url"], "https://labels.example/1.pdf");
    }

    #[test]
    fn test_service_level_builder() {
        let level = ServiceLevel::new("fedex", "FEDEX_GROUND_ECONOMY", "Ground Economy").hub_based();
        assert!(level.hub_based);
        assert_eq!(level.carrier, "fedex");
    }
}
