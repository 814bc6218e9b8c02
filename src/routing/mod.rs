//! Hub routing
//!
//! Maps a destination region code to the regional processing hub used by
//! hub-based (discount last-mile) services. The coverage table is a static
//! state list, not a distance computation, so the result is a heuristic and
//! carries no optimality guarantee.
//!
//! Lookup is a linear scan: the table holds a few dozen entries and is built
//! once at startup.

mod hubs;

pub use hubs::CENTRAL_HUB_ID;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use utoipa::ToSchema;

/// Hub table errors
#[derive(Debug, Error)]
pub enum HubTableError {
    #[error("Fallback hub {0} is not in the hub table")]
    FallbackMissing(String),

    #[error("Duplicate hub id: {0}")]
    DuplicateId(String),

    #[error("Failed to read hub table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A regional processing hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Hub {
    pub id: String,
    pub name: String,
    pub city: String,

    /// Region code where the hub is located
    pub region: String,

    /// Destination region codes this hub serves
    pub served_regions: Vec<String>,
}

impl Hub {
    pub fn serves(&self, region: &str) -> bool {
        self.served_regions.iter().any(|r| r.eq_ignore_ascii_case(region))
    }
}

/// On-disk shape of a replacement hub table
#[derive(Debug, Deserialize)]
struct HubTableFile {
    fallback_hub_id: String,
    hubs: Vec<Hub>,
}

/// Immutable hub coverage table with a guaranteed fallback member
#[derive(Debug, Clone)]
pub struct HubTable {
    hubs: Vec<Hub>,
    fallback: usize,
}

impl HubTable {
    /// Build a table; the fallback id must name one of the hubs
    pub fn new(hubs: Vec<Hub>, fallback_hub_id: &str) -> Result<Self, HubTableError> {
        let mut seen = HashSet::with_capacity(hubs.len());
        for hub in &hubs {
            if !seen.insert(hub.id.as_str()) {
                return Err(HubTableError::DuplicateId(hub.id.clone()));
            }
        }

        let fallback = hubs
            .iter()
            .position(|h| h.id == fallback_hub_id)
            .ok_or_else(|| HubTableError::FallbackMissing(fallback_hub_id.to_string()))?;

        Ok(HubTable { hubs, fallback })
    }

    /// The built-in coverage table, falling back to the central hub
    pub fn standard() -> Self {
        let hubs = hubs::standard_hubs();
        let fallback = hubs
            .iter()
            .position(|h| h.id == CENTRAL_HUB_ID)
            .unwrap_or(0);
        HubTable { hubs, fallback }
    }

    /// Load a replacement table from JSON (`{"fallback_hub_id", "hubs"}`)
    pub fn from_json_file(path: &Path) -> Result<Self, HubTableError> {
        let content = std::fs::read_to_string(path).map_err(|source| HubTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: HubTableFile = serde_json::from_str(&content)?;
        let table = Self::new(file.hubs, &file.fallback_hub_id)?;

        info!(path = %path.display(), hubs = table.hubs.len(), "Loaded hub table");
        Ok(table)
    }

    pub fn hubs(&self) -> &[Hub] {
        &self.hubs
    }

    pub fn get(&self, id: &str) -> Option<&Hub> {
        self.hubs.iter().find(|h| h.id == id)
    }

    pub fn fallback(&self) -> &Hub {
        &self.hubs[self.fallback]
    }
}

impl Default for HubTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Resolves destination regions to hubs
#[derive(Debug, Clone)]
pub struct HubRouter {
    table: Arc<HubTable>,
}

impl HubRouter {
    pub fn new(table: Arc<HubTable>) -> Self {
        HubRouter { table }
    }

    pub fn table(&self) -> &HubTable {
        &self.table
    }

    /// First hub serving the region, else the fallback hub. Never fails.
    pub fn resolve_hub(&self, destination_region: &str) -> &Hub {
        let region = destination_region.trim();

        match self.table.hubs.iter().find(|h| h.serves(region)) {
            Some(hub) => hub,
            None => {
                let fallback = self.table.fallback();
                debug!(region = %region, hub_id = %fallback.id, "No hub coverage, using fallback hub");
                fallback
            }
        }
    }
}
