//! Box catalog
//!
//! Read-only mapping from box id to `ShippingBox`. Built once at startup and
//! injected into the packing selector and the engine; tests build their own
//! smaller tables with `BoxCatalog::new`.
//!
//! Product-type recommendations are keyword tags, not a dimensional
//! optimization. Treat them as a heuristic.

mod data;

use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::domain::{BoxCategory, ShippingBox};

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Duplicate box id: {0}")]
    DuplicateId(String),

    #[error("Box {id} has invalid dimensions or weight limits")]
    InvalidBox { id: String },

    #[error("Failed to read box catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable box catalog
#[derive(Debug, Clone)]
pub struct BoxCatalog {
    boxes: Vec<ShippingBox>,
    by_id: HashMap<String, usize>,
}

impl BoxCatalog {
    /// Build a catalog from explicit boxes (order is preserved)
    pub fn new(boxes: Vec<ShippingBox>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(boxes.len());

        for (idx, b) in boxes.iter().enumerate() {
            let valid = b.dimensions().is_valid()
                && b.max_weight.is_finite()
                && b.tare_weight >= 0.0
                && b.tare_weight < b.max_weight;
            if !valid {
                return Err(CatalogError::InvalidBox { id: b.id.clone() });
            }
            if by_id.insert(b.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(b.id.clone()));
            }
        }

        Ok(BoxCatalog { boxes, by_id })
    }

    /// The built-in container table
    pub fn standard() -> Self {
        let boxes = data::standard_boxes();
        let by_id = boxes
            .iter()
            .enumerate()
            .map(|(idx, b)| (b.id.clone(), idx))
            .collect();
        BoxCatalog { boxes, by_id }
    }

    /// Load a replacement table from a JSON array of boxes
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let boxes: Vec<ShippingBox> = serde_json::from_str(&content)?;
        let catalog = Self::new(boxes)?;

        info!(path = %path.display(), boxes = catalog.len(), "Loaded box catalog");
        Ok(catalog)
    }

    /// Every box, in catalog order
    pub fn all(&self) -> &[ShippingBox] {
        &self.boxes
    }

    pub fn get(&self, id: &str) -> Option<&ShippingBox> {
        self.by_id.get(id).map(|&idx| &self.boxes[idx])
    }

    pub fn by_category(&self, category: BoxCategory) -> Vec<&ShippingBox> {
        self.boxes.iter().filter(|b| b.category == category).collect()
    }

    /// Boxes tagged for a product type that can carry `weight`
    ///
    /// Filters on `max_weight >= weight`; tare is not considered here, the
    /// packing selector applies the full capacity check.
    pub fn recommend_for_product_type(&self, product_type: &str, weight: f64) -> Vec<&ShippingBox> {
        self.boxes
            .iter()
            .filter(|b| b.has_tag(product_type) && b.max_weight >= weight)
            .collect()
    }

    /// Distinct product tags, sorted
    pub fn product_types(&self) -> Vec<String> {
        let tags: HashSet<String> = self
            .boxes
            .iter()
            .flat_map(|b| b.product_tags.iter().map(|t| t.to_lowercase()))
            .collect();
        let mut tags: Vec<String> = tags.into_iter().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl Default for BoxCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
