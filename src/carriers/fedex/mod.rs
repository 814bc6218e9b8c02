//! FedEx carrier integration

pub mod client;
pub mod mapper;
pub mod models;
pub mod services;

pub use client::{FedexGateway, DEFAULT_BASE_URL};
pub use services::{CARRIER_CODE, GROUND_ECONOMY};
