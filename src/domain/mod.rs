//! Domain types and models

pub mod boxes;
pub mod rates;
pub mod shipment;

pub use boxes::{BoxCategory, Dimensions, ShippingBox, CUSTOM_PACKAGING};
pub use rates::{Label, LabelArtifact, RateQuote, ServiceLevel, TrackingEvent, TrackingStatus};
pub use shipment::{Address, ItemSpec, Package, PackageError, ShipmentRequest};
