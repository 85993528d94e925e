//! Route definitions for the Plant Monitoring Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - species catalogue
        .nest("/species", species_routes())
        // Protected routes - plant management
        .nest("/plants", plant_routes())
        // Protected routes - sensor management
        .nest("/sensors", sensor_routes())
        // Protected routes - reading ingestion
        .nest("/readings", reading_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Species catalogue routes (protected)
fn species_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_species).post(handlers::create_species))
        .route("/:species_id", get(handlers::get_species))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Plant management routes (protected)
fn plant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_plants).post(handlers::create_plant))
        .route(
            "/:plant_id",
            get(handlers::get_plant)
                .put(handlers::update_plant)
                .delete(handlers::delete_plant),
        )
        .route("/:plant_id/status", get(handlers::get_plant_status))
        .route("/:plant_id/predictions", get(handlers::get_plant_predictions))
        .route(
            "/:plant_id/sensors",
            get(handlers::list_plant_sensors).post(handlers::register_sensor),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Sensor management routes (protected)
fn sensor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:sensor_id",
            get(handlers::get_sensor)
                .put(handlers::update_sensor)
                .delete(handlers::delete_sensor),
        )
        .route("/:sensor_id/logs", get(handlers::get_sensor_logs))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reading ingestion routes (protected)
fn reading_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::ingest_readings))
        .route_layer(middleware::from_fn(auth_middleware))
}
