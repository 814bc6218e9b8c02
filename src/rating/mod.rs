//! Rate shopping across carriers and service levels

pub mod orchestrator;

pub use orchestrator::{FailureReason, RateShopError, RateShopOutcome, RateShopper, ServiceFailure};
