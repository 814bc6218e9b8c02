//! Shipping container reference types
//!
//! A `ShippingBox` is immutable catalog data: created once when the catalog is
//! loaded and only ever read afterwards.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Packaging type code for non-catalog parcels
pub const CUSTOM_PACKAGING: &str = "YOUR_PACKAGING";

// ============================================================================
// Box Category
// ============================================================================

/// Container category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BoxCategory {
    Envelope,
    Pak,
    Small,
    Medium,
    Large,
    Xlarge,
    Tube,
    International,
    Custom,
}

impl BoxCategory {
    /// Parse a category tag (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "envelope" => Some(BoxCategory::Envelope),
            "pak" => Some(BoxCategory::Pak),
            "small" => Some(BoxCategory::Small),
            "medium" => Some(BoxCategory::Medium),
            "large" => Some(BoxCategory::Large),
            "xlarge" | "extra_large" | "x-large" => Some(BoxCategory::Xlarge),
            "tube" => Some(BoxCategory::Tube),
            "international" | "intl" => Some(BoxCategory::International),
            "custom" => Some(BoxCategory::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoxCategory::Envelope => "envelope",
            BoxCategory::Pak => "pak",
            BoxCategory::Small => "small",
            BoxCategory::Medium => "medium",
            BoxCategory::Large => "large",
            BoxCategory::Xlarge => "xlarge",
            BoxCategory::Tube => "tube",
            BoxCategory::International => "international",
            BoxCategory::Custom => "custom",
        }
    }
}

impl std::fmt::Display for BoxCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Dimensions
// ============================================================================

/// Length/width/height in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Dimensions { length, width, height }
    }

    /// The three dimensions ordered largest first
    pub fn sorted_desc(&self) -> [f64; 3] {
        let mut dims = [self.length, self.width, self.height];
        dims.sort_by(|a, b| b.total_cmp(a));
        dims
    }

    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Rotation-invariant containment: sorted dims compared termwise
    pub fn fits_within(&self, outer: &Dimensions) -> bool {
        let inner = self.sorted_desc();
        let outer = outer.sorted_desc();
        inner.iter().zip(outer.iter()).all(|(i, o)| i <= o)
    }

    /// All three dimensions are finite and strictly positive
    pub fn is_valid(&self) -> bool {
        [self.length, self.width, self.height]
            .iter()
            .all(|d| d.is_finite() && *d > 0.0)
    }
}

// ============================================================================
// Shipping Box
// ============================================================================

/// A container from the box catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShippingBox {
    /// Catalog identifier (e.g., "fedex_small_box_s1")
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Category tag
    pub category: BoxCategory,

    /// Interior length in inches
    pub length: f64,

    /// Interior width in inches
    pub width: f64,

    /// Interior height in inches
    pub height: f64,

    /// Maximum gross weight in pounds (contents + tare)
    pub max_weight: f64,

    /// Empty box weight in pounds
    pub tare_weight: f64,

    /// Eligible for discounted flat-rate pricing
    pub flat_rate_eligible: bool,

    /// Carrier packaging type code (e.g., "FEDEX_SMALL_BOX")
    pub packaging_type: String,

    /// Product-affinity tags (e.g., "business-cards", "posters")
    #[serde(default)]
    pub product_tags: Vec<String>,
}

impl ShippingBox {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.length, self.width, self.height)
    }

    pub fn volume(&self) -> f64 {
        self.dimensions().volume()
    }

    /// Weight capacity check: contents plus tare must not exceed the limit
    pub fn can_carry(&self, weight: f64) -> bool {
        weight + self.tare_weight <= self.max_weight
    }

    /// Both the capacity and the rotation-invariant containment checks hold
    pub fn is_suitable_for(&self, item: &Dimensions, weight: f64) -> bool {
        self.can_carry(weight) && item.fits_within(&self.dimensions())
    }

    /// Case-insensitive product tag match
    pub fn has_tag(&self, tag: &str) -> bool {
        self.product_tags.iter().any(|t| t.eq_ignore_ascii_case(tag.trim()))
    }
}
