//! Ship-Engine
//!
//! Shipping decision engine: picks the smallest box an item fits in,
//! routes hub-based services to a regional processing hub, shops rates
//! across carriers concurrently under one deadline, and buys and tracks
//! labels.

pub mod api;
pub mod carriers;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod packing;
pub mod rating;
pub mod routing;

use std::sync::Arc;
use std::time::Instant;

use crate::engine::ShippingEngine;

/// Application state shared across all handlers
pub struct AppState {
    pub engine: Arc<ShippingEngine>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(engine: Arc<ShippingEngine>) -> Self {
        AppState {
            engine,
            started_at: Instant::now(),
        }
    }
}
