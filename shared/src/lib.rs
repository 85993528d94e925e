//! Shared types and domain logic for the Plant Monitoring Platform
//!
//! This crate contains the sensor/species vocabulary, input validation
//! helpers, and the forecast engine shared between the backend and any
//! future frontend components.

pub mod forecast;
pub mod types;
pub mod validation;

pub use types::*;
