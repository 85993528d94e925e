//! Business logic services for the Plant Monitoring Platform

pub mod auth;
pub mod plant;
pub mod prediction;
pub mod reading;
pub mod sensor;
pub mod species;

pub use auth::AuthService;
pub use plant::PlantService;
pub use prediction::PredictionService;
pub use reading::ReadingService;
pub use sensor::SensorService;
pub use species::SpeciesService;
