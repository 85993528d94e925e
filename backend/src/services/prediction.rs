//! Prediction fan-out service
//!
//! Runs the forecast engine once per forecastable sensor of a plant, against
//! a single wall-clock instant, and assembles the per-kind result map served
//! by the predictions endpoint.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::plant::PlantService;
use crate::services::reading::ReadingService;
use crate::services::sensor::SensorService;
use shared::forecast::{forecast_at, Prediction, Reading};
use shared::types::SensorKind;

/// Trailing window of readings fed to the forecast engine
const FORECAST_WINDOW_DAYS: i64 = 3;

/// Prediction service
#[derive(Clone)]
pub struct PredictionService {
    db: PgPool,
}

/// Forecast for one sensor of a plant
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorPrediction {
    pub sensor_id: Uuid,
    pub sensor_name: String,
    pub kind: SensorKind,
    #[serde(flatten)]
    pub prediction: Prediction,
}

/// All predictions for a plant
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantPredictions {
    pub plant_id: Uuid,
    pub plant_name: String,
    pub predictions: Vec<SensorPrediction>,
    pub generated_at: DateTime<Utc>,
}

impl PredictionService {
    /// Create a new PredictionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compute forecasts for every forecastable sensor of a plant
    ///
    /// Sensors whose kind the engine cannot act on, or whose kind has no
    /// configured ideal range for the species, are skipped. "Now" is read
    /// once and shared by every sensor's forecast so the whole response is
    /// internally consistent.
    pub async fn predictions_for_plant(
        &self,
        owner_id: Uuid,
        plant_id: Uuid,
    ) -> AppResult<PlantPredictions> {
        let plant_service = PlantService::new(self.db.clone());
        let sensor_service = SensorService::new(self.db.clone());
        let reading_service = ReadingService::new(self.db.clone());

        let plant = plant_service.get_plant(owner_id, plant_id).await?;
        let conditions = plant.species.ideal_conditions;

        let sensors = sensor_service.list_for_plant(owner_id, plant_id).await?;

        let now = Utc::now();
        let cutoff = now - Duration::days(FORECAST_WINDOW_DAYS);

        let mut predictions = Vec::new();
        for sensor in sensors {
            if !sensor.kind.is_forecastable() {
                continue;
            }
            let Some(range) = conditions.range_for(sensor.kind) else {
                continue;
            };

            let logs = reading_service.logs_since(sensor.id, cutoff).await?;
            let readings: Vec<Reading> = logs
                .iter()
                .map(|log| Reading::new(log.recorded_at, log.value))
                .collect();

            let prediction = forecast_at(&readings, range, sensor.kind, &sensor.name, now);

            predictions.push(SensorPrediction {
                sensor_id: sensor.id,
                sensor_name: sensor.name,
                kind: sensor.kind,
                prediction,
            });
        }

        Ok(PlantPredictions {
            plant_id,
            plant_name: plant.plant.nickname,
            predictions,
            generated_at: now,
        })
    }
}
