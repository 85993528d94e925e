//! Plant management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::plant::{CreatePlantInput, PlantService, UpdatePlantInput};
use crate::services::PredictionService;
use crate::AppState;

/// List all plants owned by the current user
pub async fn list_plants(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> impl IntoResponse {
    let service = PlantService::new(state.db.clone());

    match service.list_plants(current_user.0.user_id).await {
        Ok(plants) => (
            StatusCode::OK,
            Json(serde_json::json!({ "plants": plants })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific plant with its species configuration
pub async fn get_plant(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(plant_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PlantService::new(state.db.clone());

    match service.get_plant(current_user.0.user_id, plant_id).await {
        Ok(plant) => (StatusCode::OK, Json(plant)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a new plant
pub async fn create_plant(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(input): Json<CreatePlantInput>,
) -> impl IntoResponse {
    let service = PlantService::new(state.db.clone());

    match service.create_plant(current_user.0.user_id, input).await {
        Ok(plant) => (StatusCode::CREATED, Json(plant)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a plant
pub async fn update_plant(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(plant_id): Path<Uuid>,
    Json(input): Json<UpdatePlantInput>,
) -> impl IntoResponse {
    let service = PlantService::new(state.db.clone());

    match service
        .update_plant(current_user.0.user_id, plant_id, input)
        .await
    {
        Ok(plant) => (StatusCode::OK, Json(plant)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a plant
pub async fn delete_plant(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(plant_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PlantService::new(state.db.clone());

    match service.delete_plant(current_user.0.user_id, plant_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Latest reading per sensor kind for a plant
pub async fn get_plant_status(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(plant_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PlantService::new(state.db.clone());

    match service.latest_status(current_user.0.user_id, plant_id).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Forecasts and action recommendations for a plant's sensors
pub async fn get_plant_predictions(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(plant_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PredictionService::new(state.db.clone());

    match service
        .predictions_for_plant(current_user.0.user_id, plant_id)
        .await
    {
        Ok(predictions) => (StatusCode::OK, Json(predictions)).into_response(),
        Err(e) => e.into_response(),
    }
}
