//! Plant management service
//!
//! Plants belong to a single owner; every lookup is owner-scoped.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::species::{Species, SpeciesRow};

/// Plant service for managing monitored plants
#[derive(Clone)]
pub struct PlantService {
    db: PgPool,
}

/// Plant record
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub species_id: Uuid,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Plant together with its species configuration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantWithSpecies {
    #[serde(flatten)]
    pub plant: Plant,
    pub species: Species,
}

/// Input for creating a plant
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlantInput {
    pub nickname: String,
    pub species_id: Uuid,
}

/// Input for updating a plant
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlantInput {
    pub nickname: Option<String>,
    pub species_id: Option<Uuid>,
}

/// Latest reading of one sensor kind
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestReading {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// Current status of a plant: latest value per sensor kind
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantStatus {
    pub status: HashMap<String, LatestReading>,
    /// Most recent timestamp across all readings, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Joined row for the latest-status query
#[derive(Debug, FromRow)]
struct LatestStatusRow {
    kind: String,
    value: f64,
    recorded_at: DateTime<Utc>,
}

impl PlantService {
    /// Create a new PlantService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a plant for the owner
    pub async fn create_plant(
        &self,
        owner_id: Uuid,
        input: CreatePlantInput,
    ) -> AppResult<PlantWithSpecies> {
        if input.nickname.trim().is_empty() {
            return Err(AppError::Validation {
                field: "nickname".to_string(),
                message: "Please give the plant a name".to_string(),
            });
        }

        let species_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM plant_species WHERE id = $1)")
                .bind(input.species_id)
                .fetch_one(&self.db)
                .await?;

        if !species_exists {
            return Err(AppError::NotFound("Species".to_string()));
        }

        let plant = sqlx::query_as::<_, Plant>(
            r#"
            INSERT INTO plants (owner_id, species_id, nickname)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, species_id, nickname, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(input.species_id)
        .bind(input.nickname.trim())
        .fetch_one(&self.db)
        .await?;

        tracing::info!("Created plant {} for owner {}", plant.id, owner_id);

        self.get_plant(owner_id, plant.id).await
    }

    /// List all plants owned by the caller, with their species
    pub async fn list_plants(&self, owner_id: Uuid) -> AppResult<Vec<PlantWithSpecies>> {
        let plants = sqlx::query_as::<_, Plant>(
            r#"
            SELECT id, owner_id, species_id, nickname, created_at, updated_at
            FROM plants
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        let mut result = Vec::with_capacity(plants.len());
        for plant in plants {
            let species = self.species_for(plant.species_id).await?;
            result.push(PlantWithSpecies { plant, species });
        }

        Ok(result)
    }

    /// Get a plant owned by the caller, with its species
    pub async fn get_plant(&self, owner_id: Uuid, plant_id: Uuid) -> AppResult<PlantWithSpecies> {
        let plant = sqlx::query_as::<_, Plant>(
            r#"
            SELECT id, owner_id, species_id, nickname, created_at, updated_at
            FROM plants
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(plant_id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Plant".to_string()))?;

        let species = self.species_for(plant.species_id).await?;

        Ok(PlantWithSpecies { plant, species })
    }

    /// Update a plant's nickname or species
    pub async fn update_plant(
        &self,
        owner_id: Uuid,
        plant_id: Uuid,
        input: UpdatePlantInput,
    ) -> AppResult<PlantWithSpecies> {
        if let Some(nickname) = &input.nickname {
            if nickname.trim().is_empty() {
                return Err(AppError::Validation {
                    field: "nickname".to_string(),
                    message: "Please give the plant a name".to_string(),
                });
            }
        }

        if let Some(species_id) = input.species_id {
            let species_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM plant_species WHERE id = $1)",
            )
            .bind(species_id)
            .fetch_one(&self.db)
            .await?;

            if !species_exists {
                return Err(AppError::NotFound("Species".to_string()));
            }
        }

        let updated = sqlx::query(
            r#"
            UPDATE plants
            SET nickname = COALESCE($1, nickname),
                species_id = COALESCE($2, species_id),
                updated_at = NOW()
            WHERE id = $3 AND owner_id = $4
            "#,
        )
        .bind(input.nickname.as_deref().map(str::trim))
        .bind(input.species_id)
        .bind(plant_id)
        .bind(owner_id)
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Plant".to_string()));
        }

        self.get_plant(owner_id, plant_id).await
    }

    /// Delete a plant and (via cascade) its sensors and logs
    pub async fn delete_plant(&self, owner_id: Uuid, plant_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM plants WHERE id = $1 AND owner_id = $2")
            .bind(plant_id)
            .bind(owner_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Plant".to_string()));
        }

        tracing::info!("Deleted plant {} for owner {}", plant_id, owner_id);

        Ok(())
    }

    /// Latest reading per sensor kind for a plant
    ///
    /// When several sensors share a kind, the most recent reading wins.
    pub async fn latest_status(&self, owner_id: Uuid, plant_id: Uuid) -> AppResult<PlantStatus> {
        // Ownership check doubles as existence check
        self.get_plant(owner_id, plant_id).await?;

        let rows = sqlx::query_as::<_, LatestStatusRow>(
            r#"
            SELECT DISTINCT ON (s.id) s.kind, l.value, l.recorded_at
            FROM sensors s
            JOIN sensor_logs l ON l.sensor_id = s.id
            WHERE s.plant_id = $1
            ORDER BY s.id, l.recorded_at DESC
            "#,
        )
        .bind(plant_id)
        .fetch_all(&self.db)
        .await?;

        let mut status: HashMap<String, LatestReading> = HashMap::new();
        for row in rows {
            let candidate = LatestReading {
                value: row.value,
                timestamp: row.recorded_at,
            };
            match status.get(&row.kind) {
                Some(existing) if existing.timestamp >= candidate.timestamp => {}
                _ => {
                    status.insert(row.kind, candidate);
                }
            }
        }

        let timestamp = status.values().map(|r| r.timestamp).max();

        Ok(PlantStatus { status, timestamp })
    }

    async fn species_for(&self, species_id: Uuid) -> AppResult<Species> {
        let row = sqlx::query_as::<_, SpeciesRow>(
            r#"
            SELECT id, name, description, temperature_min, temperature_max,
                   air_moisture_min, air_moisture_max, ground_moisture_min, ground_moisture_max,
                   created_at
            FROM plant_species
            WHERE id = $1
            "#,
        )
        .bind(species_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Species".to_string()))?;

        Ok(row.into())
    }
}
