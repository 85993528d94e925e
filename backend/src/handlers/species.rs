//! Species catalogue HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::species::{CreateSpeciesInput, SpeciesService};
use crate::AppState;

/// List all known species
pub async fn list_species(State(state): State<AppState>) -> impl IntoResponse {
    let service = SpeciesService::new(state.db.clone());

    match service.list_species().await {
        Ok(species) => (
            StatusCode::OK,
            Json(serde_json::json!({ "species": species })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a species with its ideal conditions
pub async fn get_species(
    State(state): State<AppState>,
    Path(species_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = SpeciesService::new(state.db.clone());

    match service.get_species(species_id).await {
        Ok(species) => (StatusCode::OK, Json(species)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a new species
pub async fn create_species(
    State(state): State<AppState>,
    Json(input): Json<CreateSpeciesInput>,
) -> impl IntoResponse {
    let service = SpeciesService::new(state.db.clone());

    match service.create_species(input).await {
        Ok(species) => (StatusCode::CREATED, Json(species)).into_response(),
        Err(e) => e.into_response(),
    }
}
