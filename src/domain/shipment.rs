//! Shipment request value types
//!
//! Addresses, items and packages are constructed per request and never
//! mutated afterwards. Persisting them is the caller's concern.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::boxes::{Dimensions, CUSTOM_PACKAGING};

/// Package validation errors
#[derive(Debug, Error, PartialEq)]
pub enum PackageError {
    #[error("Package weight must be greater than zero, got {0}")]
    NonPositiveWeight(f64),

    #[error("Package dimensions must be positive: {0}x{1}x{2}")]
    InvalidDimensions(f64, f64, f64),

    #[error("Shipment has no items")]
    NoItems,
}

// ============================================================================
// Address
// ============================================================================

/// Postal address used as both origin and destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    /// Street lines (1-3)
    pub street_lines: Vec<String>,

    pub city: String,

    /// State / province code (e.g., "TX")
    pub region_code: String,

    pub postal_code: String,

    /// ISO 3166-1 alpha-2 country code
    #[serde(default = "default_country")]
    pub country_code: String,

    /// Residential delivery flag
    #[serde(default)]
    pub residential: bool,
}

fn default_country() -> String {
    "US".to_string()
}

impl Address {
    /// Region code normalized for routing lookups
    pub fn normalized_region(&self) -> String {
        self.region_code.trim().to_uppercase()
    }
}

// ============================================================================
// Package
// ============================================================================

/// A parcel ready to be rated or labelled
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Package {
    weight: f64,
    dimensions: Option<Dimensions>,
    declared_value_cents: i64,
    packaging_type: String,
}

impl Package {
    /// Build a validated package (gross weight in pounds)
    pub fn new(
        weight: f64,
        dimensions: Option<Dimensions>,
        declared_value_cents: i64,
    ) -> Result<Self, PackageError> {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(PackageError::NonPositiveWeight(weight));
        }
        if let Some(dims) = dimensions {
            if !dims.is_valid() {
                return Err(PackageError::InvalidDimensions(dims.length, dims.width, dims.height));
            }
        }

        Ok(Package {
            weight,
            dimensions,
            declared_value_cents: declared_value_cents.max(0),
            packaging_type: CUSTOM_PACKAGING.to_string(),
        })
    }

    /// Set the carrier packaging code (defaults to customer packaging)
    pub fn with_packaging_type(mut self, packaging_type: impl Into<String>) -> Self {
        self.packaging_type = packaging_type.into();
        self
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn dimensions(&self) -> Option<&Dimensions> {
        self.dimensions.as_ref()
    }

    pub fn declared_value_cents(&self) -> i64 {
        self.declared_value_cents
    }

    pub fn packaging_type(&self) -> &str {
        &self.packaging_type
    }
}

// ============================================================================
// Inbound request
// ============================================================================

/// An item to be shipped, before a container has been chosen
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemSpec {
    /// Net item weight in pounds
    pub weight: f64,

    /// Item dimensions in inches, if known
    #[serde(default)]
    pub dimensions: Option<Dimensions>,

    /// Declared value in cents
    #[serde(default)]
    pub declared_value_cents: i64,
}

impl ItemSpec {
    pub fn validate(&self) -> Result<(), PackageError> {
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(PackageError::NonPositiveWeight(self.weight));
        }
        match self.dimensions {
            Some(d) if !d.is_valid() => Err(PackageError::InvalidDimensions(d.length, d.width, d.height)),
            _ => Ok(()),
        }
    }
}

/// Shipment request handed in by checkout/fulfillment flows
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShipmentRequest {
    pub origin: Address,
    pub destination: Address,
    pub items: Vec<ItemSpec>,

    /// Optional product type tag for box recommendation (e.g., "posters")
    #[serde(default)]
    pub product_type: Option<String>,

    /// Restrict shopping to these service codes (all registered levels if absent)
    #[serde(default)]
    pub service_codes: Option<Vec<String>>,
}

impl ShipmentRequest {
    pub fn validate(&self) -> Result<(), PackageError> {
        if self.items.is_empty() {
            return Err(PackageError::NoItems);
        }
        self.items.iter().try_for_each(ItemSpec::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_rejects_non_positive_weight() {
        assert_eq!(Package::new(0.0, None, 0), Err(PackageError::NonPositiveWeight(0.0)));
        assert!(Package::new(-1.0, None, 0).is_err());
        assert!(Package::new(f64::NAN, None, 0).is_err());
    }

    #[test]
    fn test_package_rejects_bad_dimensions() {
        let dims = Dimensions::new(10.0, 0.0, 2.0);
        assert!(matches!(
            Package::new(1.0, Some(dims), 0),
            Err(PackageError::InvalidDimensions(..))
        ));
    }

    #[test]
    fn test_package_defaults() {
        let pkg = Package::new(2.5, None, -100).unwrap();
        assert_eq!(pkg.weight(), 2.5);
        assert_eq!(pkg.declared_value_cents(), 0);
        assert_eq!(pkg.packaging_type(), CUSTOM_PACKAGING);

        let pkg = pkg.with_packaging_type("FEDEX_PAK");
        assert_eq!(pkg.packaging_type(), "FEDEX_PAK");
    }

    #[test]
    fn test_address_deserialize_defaults() {
        let address: Address = serde_json::from_value(serde_json::json!({
            "street_lines": ["1 Main St"],
            "city": "Austin",
            "region_code": " tx ",
            "postal_code": "78701"
        }))
        .unwrap();

        assert_eq!(address.country_code, "US");
        assert!(!address.residential);
        assert_eq!(address.normalized_region(), "TX");
    }

    #[test]
    fn test_request_requires_items() {
        let address = Address {
            street_lines: vec![],
            city: "Austin".to_string(),
            region_code: "TX".to_string(),
            postal_code: "78701".to_string(),
            country_code: "US".to_string(),
            residential: false,
        };
        let request = ShipmentRequest {
            origin: address.clone(),
            destination: address,
            items: vec![],
            product_type: None,
            service_codes: None,
        };
        assert_eq!(request.validate(), Err(PackageError::NoItems));
    }
}
