//! Sensor log ingestion and querying
//!
//! The append-only time series behind status and predictions. Devices report
//! by hardware device ID; queries are owner-scoped through the plant.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Reading service for the sensor log time series
#[derive(Clone)]
pub struct ReadingService {
    db: PgPool,
}

/// One stored sensor log entry
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SensorLog {
    pub id: Uuid,
    pub sensor_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub value: f64,
}

/// One reported reading in an ingest batch
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingInput {
    /// Defaults to ingest time when the device does not timestamp readings
    pub recorded_at: Option<DateTime<Utc>>,
    pub value: f64,
}

/// Input for ingesting a batch of readings from one device
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestInput {
    pub device_id: String,
    pub readings: Vec<ReadingInput>,
}

/// Result of an ingest call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub sensor_id: Uuid,
    pub inserted: usize,
}

impl ReadingService {
    /// Create a new ReadingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Ingest a batch of readings reported by a device
    ///
    /// The device must be registered on a plant owned by the caller.
    pub async fn ingest(&self, owner_id: Uuid, input: IngestInput) -> AppResult<IngestResponse> {
        if input.readings.is_empty() {
            return Err(AppError::ValidationError(
                "At least one reading is required".to_string(),
            ));
        }
        for reading in &input.readings {
            if !reading.value.is_finite() {
                return Err(AppError::ValidationError(
                    "Reading values must be finite numbers".to_string(),
                ));
            }
        }

        let sensor_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT s.id
            FROM sensors s
            JOIN plants p ON p.id = s.plant_id
            WHERE s.device_id = $1 AND p.owner_id = $2
            "#,
        )
        .bind(&input.device_id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sensor".to_string()))?;

        let now = Utc::now();
        let mut tx = self.db.begin().await?;
        let inserted = input.readings.len();

        for reading in &input.readings {
            sqlx::query("INSERT INTO sensor_logs (sensor_id, recorded_at, value) VALUES ($1, $2, $3)")
                .bind(sensor_id)
                .bind(reading.recorded_at.unwrap_or(now))
                .bind(reading.value)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Ingested {} readings for sensor {}", inserted, sensor_id);

        Ok(IngestResponse {
            sensor_id,
            inserted,
        })
    }

    /// Logs for a sensor over a trailing window, oldest first
    ///
    /// Chronological order is part of the contract with the forecast engine.
    pub async fn logs_for_window(
        &self,
        owner_id: Uuid,
        sensor_id: Uuid,
        window_hours: i64,
    ) -> AppResult<Vec<SensorLog>> {
        let sensor_owned = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM sensors s
                JOIN plants p ON p.id = s.plant_id
                WHERE s.id = $1 AND p.owner_id = $2
            )
            "#,
        )
        .bind(sensor_id)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await?;

        if !sensor_owned {
            return Err(AppError::NotFound("Sensor".to_string()));
        }

        let cutoff = Utc::now() - Duration::hours(window_hours);

        let logs = sqlx::query_as::<_, SensorLog>(
            r#"
            SELECT id, sensor_id, recorded_at, value
            FROM sensor_logs
            WHERE sensor_id = $1 AND recorded_at >= $2
            ORDER BY recorded_at
            "#,
        )
        .bind(sensor_id)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    /// Logs for a sensor since an explicit cutoff, oldest first
    ///
    /// Used by the prediction fan-out, which fixes "now" once per call.
    pub async fn logs_since(
        &self,
        sensor_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<SensorLog>> {
        let logs = sqlx::query_as::<_, SensorLog>(
            r#"
            SELECT id, sensor_id, recorded_at, value
            FROM sensor_logs
            WHERE sensor_id = $1 AND recorded_at >= $2
            ORDER BY recorded_at
            "#,
        )
        .bind(sensor_id)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }
}
