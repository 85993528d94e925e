//! Sensor HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::reading::ReadingService;
use crate::services::sensor::{CreateSensorInput, SensorService, UpdateSensorInput};
use crate::AppState;

/// Default trailing window for sensor log queries
const DEFAULT_LOG_WINDOW_HOURS: i64 = 72;

#[derive(Debug, Deserialize)]
pub struct LogWindowQuery {
    pub hours: Option<i64>,
}

/// List sensors attached to a plant
pub async fn list_plant_sensors(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(plant_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = SensorService::new(state.db.clone());

    match service.list_for_plant(current_user.0.user_id, plant_id).await {
        Ok(sensors) => (
            StatusCode::OK,
            Json(serde_json::json!({ "sensors": sensors })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Register a sensor on a plant
pub async fn register_sensor(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(plant_id): Path<Uuid>,
    Json(input): Json<CreateSensorInput>,
) -> impl IntoResponse {
    let service = SensorService::new(state.db.clone());

    match service
        .register_sensor(current_user.0.user_id, plant_id, input)
        .await
    {
        Ok(sensor) => (StatusCode::CREATED, Json(sensor)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a sensor
pub async fn get_sensor(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(sensor_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = SensorService::new(state.db.clone());

    match service.get_sensor(current_user.0.user_id, sensor_id).await {
        Ok(sensor) => (StatusCode::OK, Json(sensor)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a sensor's name or location
pub async fn update_sensor(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(sensor_id): Path<Uuid>,
    Json(input): Json<UpdateSensorInput>,
) -> impl IntoResponse {
    let service = SensorService::new(state.db.clone());

    match service
        .update_sensor(current_user.0.user_id, sensor_id, input)
        .await
    {
        Ok(sensor) => (StatusCode::OK, Json(sensor)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Remove a sensor and its logs
pub async fn delete_sensor(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(sensor_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = SensorService::new(state.db.clone());

    match service.delete_sensor(current_user.0.user_id, sensor_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Logs for a sensor over a trailing window
pub async fn get_sensor_logs(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(sensor_id): Path<Uuid>,
    Query(query): Query<LogWindowQuery>,
) -> impl IntoResponse {
    let service = ReadingService::new(state.db.clone());
    let hours = query.hours.unwrap_or(DEFAULT_LOG_WINDOW_HOURS);

    match service
        .logs_for_window(current_user.0.user_id, sensor_id, hours)
        .await
    {
        Ok(logs) => (StatusCode::OK, Json(serde_json::json!({ "logs": logs }))).into_response(),
        Err(e) => e.into_response(),
    }
}
