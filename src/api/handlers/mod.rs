//! HTTP request handlers

pub mod health;
pub mod boxes;
pub mod hubs;
pub mod carriers;
pub mod rates;
pub mod labels;
pub mod tracking;
