//! HTTP request handlers for the Plant Monitoring Platform

pub mod auth;
pub mod plant;
pub mod reading;
pub mod sensor;
pub mod species;

pub use auth::*;
pub use plant::*;
pub use reading::*;
pub use sensor::*;
pub use species::*;
