//! Reading ingestion HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};

use crate::middleware::CurrentUser;
use crate::services::reading::{IngestInput, ReadingService};
use crate::AppState;

/// Ingest a batch of readings from a registered device
pub async fn ingest_readings(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(input): Json<IngestInput>,
) -> impl IntoResponse {
    let service = ReadingService::new(state.db.clone());

    match service.ingest(current_user.0.user_id, input).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}
