//! Packing selector
//!
//! Pure, synchronous container selection against an injected `BoxCatalog`.
//! A box is suitable when the item plus tare stays within the box's weight
//! limit and the item's sorted dimensions fit termwise inside the box's
//! sorted dimensions (any axis rotation).
//!
//! "No fit" is a normal outcome, not an error: callers fall back to a
//! custom, non-catalog parcel rather than forcing a box.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

use crate::catalog::BoxCatalog;
use crate::domain::{BoxCategory, Dimensions, ItemSpec, Package, PackageError, ShippingBox};

/// Minimum longest side (inches) for the poster heuristic
pub const POSTER_MIN_LENGTH: f64 = 24.0;

/// Every catalog box that can hold the item under some rotation
pub fn find_suitable_boxes<'a>(
    catalog: &'a BoxCatalog,
    length: f64,
    width: f64,
    height: f64,
    weight: f64,
) -> Vec<&'a ShippingBox> {
    let item = Dimensions::new(length, width, height);
    catalog
        .all()
        .iter()
        .filter(|b| b.is_suitable_for(&item, weight))
        .collect()
}

/// Minimum-volume suitable box, `None` when nothing fits
///
/// Ties keep the earlier catalog entry.
pub fn find_smallest_box<'a>(
    catalog: &'a BoxCatalog,
    length: f64,
    width: f64,
    height: f64,
    weight: f64,
) -> Option<&'a ShippingBox> {
    smallest(find_suitable_boxes(catalog, length, width, height, weight))
}

/// Longest side is at least 24in and at least double the second longest
pub fn is_poster_like(length: f64, width: f64, height: f64) -> bool {
    let [longest, second, _] = Dimensions::new(length, width, height).sorted_desc();
    longest >= POSTER_MIN_LENGTH && longest >= 2.0 * second
}

fn smallest<'a>(boxes: impl IntoIterator<Item = &'a ShippingBox>) -> Option<&'a ShippingBox> {
    boxes.into_iter().fold(None, |best: Option<&ShippingBox>, b| match best {
        Some(current) if current.volume() <= b.volume() => Some(current),
        _ => Some(b),
    })
}

// ============================================================================
// Packing Decisions
// ============================================================================

/// Outcome of choosing a container for one item
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PackingDecision {
    /// Item goes into a catalog box
    Catalog {
        container: ShippingBox,
        item_weight: f64,
    },
    /// No catalog box fits; ship in customer packaging
    Custom {
        dimensions: Option<Dimensions>,
        weight: f64,
    },
}

impl PackingDecision {
    pub fn is_custom(&self) -> bool {
        matches!(self, PackingDecision::Custom { .. })
    }

    pub fn container(&self) -> Option<&ShippingBox> {
        match self {
            PackingDecision::Catalog { container, .. } => Some(container),
            PackingDecision::Custom { .. } => None,
        }
    }

    /// Gross weight: item plus tare for catalog boxes
    pub fn gross_weight(&self) -> f64 {
        match self {
            PackingDecision::Catalog { container, item_weight } => item_weight + container.tare_weight,
            PackingDecision::Custom { weight, .. } => *weight,
        }
    }

    /// Build the parcel the carrier will rate
    pub fn to_package(&self, declared_value_cents: i64) -> Result<Package, PackageError> {
        match self {
            PackingDecision::Catalog { container, .. } => {
                Package::new(self.gross_weight(), Some(container.dimensions()), declared_value_cents)
                    .map(|p| p.with_packaging_type(container.packaging_type.clone()))
            }
            PackingDecision::Custom { dimensions, weight } => {
                Package::new(*weight, *dimensions, declared_value_cents)
            }
        }
    }
}

// ============================================================================
// Packing Selector
// ============================================================================

/// Selection knobs
#[derive(Debug, Clone)]
pub struct PackingOptions {
    /// Bias poster-like items toward tube packaging when a tube fits
    pub prefer_tube_for_posters: bool,
}

impl Default for PackingOptions {
    fn default() -> Self {
        PackingOptions {
            prefer_tube_for_posters: true,
        }
    }
}

/// Chooses containers for shipment items
#[derive(Debug, Clone)]
pub struct PackingSelector {
    catalog: Arc<BoxCatalog>,
    options: PackingOptions,
}

impl PackingSelector {
    pub fn new(catalog: Arc<BoxCatalog>) -> Self {
        PackingSelector {
            catalog,
            options: PackingOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PackingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn catalog(&self) -> &BoxCatalog {
        &self.catalog
    }

    /// Pick a container for a single item
    pub fn select(&self, item: &ItemSpec, product_type: Option<&str>) -> PackingDecision {
        let decision = match item.dimensions {
            Some(dims) => self.select_by_dimensions(&dims, item.weight),
            None => self.select_by_product_type(product_type, item.weight),
        };

        debug!(
            weight = item.weight,
            container = decision.container().map(|b| b.id.as_str()).unwrap_or("custom"),
            "Packing decision"
        );
        decision
    }

    /// Pick containers for every item, one parcel per item
    pub fn plan(&self, items: &[ItemSpec], product_type: Option<&str>) -> Vec<PackingDecision> {
        items.iter().map(|item| self.select(item, product_type)).collect()
    }

    fn select_by_dimensions(&self, dims: &Dimensions, weight: f64) -> PackingDecision {
        let suitable = find_suitable_boxes(&self.catalog, dims.length, dims.width, dims.height, weight);

        let tube = if self.options.prefer_tube_for_posters
            && is_poster_like(dims.length, dims.width, dims.height)
        {
            smallest(suitable.iter().copied().filter(|b| b.category == BoxCategory::Tube))
        } else {
            None
        };

        match tube.or_else(|| smallest(suitable.iter().copied())) {
            Some(container) => PackingDecision::Catalog {
                container: container.clone(),
                item_weight: weight,
            },
            None => PackingDecision::Custom {
                dimensions: Some(*dims),
                weight,
            },
        }
    }

    fn select_by_product_type(&self, product_type: Option<&str>, weight: f64) -> PackingDecision {
        let recommended = product_type.and_then(|tag| {
            smallest(
                self.catalog
                    .recommend_for_product_type(tag, weight)
                    .into_iter()
                    .filter(|b| b.can_carry(weight)),
            )
        });

        match recommended {
            Some(container) => PackingDecision::Catalog {
                container: container.clone(),
                item_weight: weight,
            },
            None => PackingDecision::Custom {
                dimensions: None,
                weight,
            },
        }
    }
}
