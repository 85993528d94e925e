//! Request middleware for the Plant Monitoring Platform

pub mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
