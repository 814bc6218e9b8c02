//! Carrier integration module
//!
//! A unified interface over shipping carriers. Rate shopping, label
//! purchase and tracking are all written against `CarrierGateway`.
//!
//! # Architecture
//!
//! ```text
//!              ┌────────────────────────┐
//!              │ CarrierGateway Trait   │
//!              └───────────┬────────────┘
//!                          │
//!            ┌─────────────┴─────────────┐
//!            │                           │
//!      ┌─────┴─────┐              ┌──────┴──────┐
//!      │   FedEx   │              │   Sandbox   │
//!      └───────────┘              └─────────────┘
//! ```

pub mod traits;
pub mod http_client;
pub mod fedex;
pub mod sandbox;
pub mod registry;

// Re-export commonly used types
pub use traits::{
    CarrierGateway,
    CarrierError,
    CarrierResult,
    CarrierCredentials,
    RateRequest,
    LabelRequest,
};
pub use http_client::RateLimitedClient;
pub use fedex::FedexGateway;
pub use sandbox::SandboxCarrier;
pub use registry::CarrierRegistry;
