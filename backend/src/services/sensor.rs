//! Sensor management service
//!
//! Sensors are registered by hardware device ID and attached to one plant.
//! Ownership is always resolved through the plant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::types::SensorKind;
use shared::validation::validate_device_id;

/// Sensor service for managing registered sensors
#[derive(Clone)]
pub struct SensorService {
    db: PgPool,
}

/// Sensor record as stored (kind as text)
#[derive(Debug, Clone, FromRow)]
pub struct SensorRow {
    pub id: Uuid,
    pub device_id: String,
    pub plant_id: Uuid,
    pub name: String,
    pub kind: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sensor as exposed over the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: Uuid,
    pub device_id: String,
    pub plant_id: Uuid,
    pub name: String,
    pub kind: SensorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SensorRow> for Sensor {
    type Error = AppError;

    fn try_from(row: SensorRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse::<SensorKind>()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Sensor {
            id: row.id,
            device_id: row.device_id,
            plant_id: row.plant_id,
            name: row.name,
            kind,
            location: row.location,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Input for registering a sensor on a plant
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSensorInput {
    pub device_id: String,
    pub name: String,
    pub kind: SensorKind,
    pub location: Option<String>,
}

/// Input for updating a sensor
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSensorInput {
    pub name: Option<String>,
    pub location: Option<String>,
}

impl SensorService {
    /// Create a new SensorService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a sensor on a plant owned by the caller
    pub async fn register_sensor(
        &self,
        owner_id: Uuid,
        plant_id: Uuid,
        input: CreateSensorInput,
    ) -> AppResult<Sensor> {
        if let Err(message) = validate_device_id(&input.device_id) {
            return Err(AppError::Validation {
                field: "deviceId".to_string(),
                message: message.to_string(),
            });
        }
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Sensor name must not be empty".to_string(),
            });
        }

        let plant_owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM plants WHERE id = $1 AND owner_id = $2)",
        )
        .bind(plant_id)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await?;

        if !plant_owned {
            return Err(AppError::NotFound("Plant".to_string()));
        }

        let device_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sensors WHERE device_id = $1)",
        )
        .bind(&input.device_id)
        .fetch_one(&self.db)
        .await?;

        if device_taken {
            return Err(AppError::DuplicateEntry("device ID".to_string()));
        }

        let row = sqlx::query_as::<_, SensorRow>(
            r#"
            INSERT INTO sensors (device_id, plant_id, name, kind, location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, device_id, plant_id, name, kind, location, created_at, updated_at
            "#,
        )
        .bind(&input.device_id)
        .bind(plant_id)
        .bind(input.name.trim())
        .bind(input.kind.as_str())
        .bind(&input.location)
        .fetch_one(&self.db)
        .await?;

        tracing::info!("Registered sensor {} on plant {}", row.id, plant_id);

        row.try_into()
    }

    /// List sensors attached to a plant owned by the caller
    pub async fn list_for_plant(&self, owner_id: Uuid, plant_id: Uuid) -> AppResult<Vec<Sensor>> {
        let plant_owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM plants WHERE id = $1 AND owner_id = $2)",
        )
        .bind(plant_id)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await?;

        if !plant_owned {
            return Err(AppError::NotFound("Plant".to_string()));
        }

        let rows = sqlx::query_as::<_, SensorRow>(
            r#"
            SELECT id, device_id, plant_id, name, kind, location, created_at, updated_at
            FROM sensors
            WHERE plant_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(plant_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Sensor::try_from).collect()
    }

    /// Get a sensor owned (through its plant) by the caller
    pub async fn get_sensor(&self, owner_id: Uuid, sensor_id: Uuid) -> AppResult<Sensor> {
        let row = sqlx::query_as::<_, SensorRow>(
            r#"
            SELECT s.id, s.device_id, s.plant_id, s.name, s.kind, s.location,
                   s.created_at, s.updated_at
            FROM sensors s
            JOIN plants p ON p.id = s.plant_id
            WHERE s.id = $1 AND p.owner_id = $2
            "#,
        )
        .bind(sensor_id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sensor".to_string()))?;

        row.try_into()
    }

    /// Update a sensor's name or location
    pub async fn update_sensor(
        &self,
        owner_id: Uuid,
        sensor_id: Uuid,
        input: UpdateSensorInput,
    ) -> AppResult<Sensor> {
        if let Some(name) = &input.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation {
                    field: "name".to_string(),
                    message: "Sensor name must not be empty".to_string(),
                });
            }
        }

        let updated = sqlx::query(
            r#"
            UPDATE sensors
            SET name = COALESCE($1, name),
                location = COALESCE($2, location),
                updated_at = NOW()
            FROM plants p
            WHERE sensors.id = $3 AND sensors.plant_id = p.id AND p.owner_id = $4
            "#,
        )
        .bind(input.name.as_deref().map(str::trim))
        .bind(&input.location)
        .bind(sensor_id)
        .bind(owner_id)
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Sensor".to_string()));
        }

        self.get_sensor(owner_id, sensor_id).await
    }

    /// Remove a sensor and (via cascade) its logs
    pub async fn delete_sensor(&self, owner_id: Uuid, sensor_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM sensors
            USING plants p
            WHERE sensors.id = $1 AND sensors.plant_id = p.id AND p.owner_id = $2
            "#,
        )
        .bind(sensor_id)
        .bind(owner_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Sensor".to_string()));
        }

        tracing::info!("Deleted sensor {}", sensor_id);

        Ok(())
    }
}
