//! Plant species catalogue service
//!
//! Species carry the ideal-condition ranges the forecast engine classifies
//! readings against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::types::{IdealConditions, IdealRange};
use shared::validation::validate_ideal_range;

/// Species service for managing the species catalogue
#[derive(Clone)]
pub struct SpeciesService {
    db: PgPool,
}

/// Species record as stored (flat range columns)
#[derive(Debug, Clone, FromRow)]
pub struct SpeciesRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub air_moisture_min: f64,
    pub air_moisture_max: f64,
    pub ground_moisture_min: f64,
    pub ground_moisture_max: f64,
    pub created_at: DateTime<Utc>,
}

/// Species as exposed over the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ideal_conditions: IdealConditions,
    pub created_at: DateTime<Utc>,
}

impl From<SpeciesRow> for Species {
    fn from(row: SpeciesRow) -> Self {
        Species {
            id: row.id,
            name: row.name,
            description: row.description,
            ideal_conditions: IdealConditions {
                temperature: IdealRange::new(row.temperature_min, row.temperature_max),
                air_moisture: IdealRange::new(row.air_moisture_min, row.air_moisture_max),
                ground_moisture: IdealRange::new(row.ground_moisture_min, row.ground_moisture_max),
            },
            created_at: row.created_at,
        }
    }
}

/// Input for creating a species
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpeciesInput {
    pub name: String,
    pub description: Option<String>,
    pub ideal_conditions: IdealConditions,
}

impl SpeciesService {
    /// Create a new SpeciesService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a species with its ideal conditions
    pub async fn create_species(&self, input: CreateSpeciesInput) -> AppResult<Species> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Species name must not be empty".to_string(),
            });
        }

        let conditions = input.ideal_conditions;
        for (field, range) in [
            ("idealConditions.temperature", conditions.temperature),
            ("idealConditions.airMoisture", conditions.air_moisture),
            ("idealConditions.groundMoisture", conditions.ground_moisture),
        ] {
            if let Err(message) = validate_ideal_range(&range) {
                return Err(AppError::Validation {
                    field: field.to_string(),
                    message: message.to_string(),
                });
            }
        }

        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM plant_species WHERE name = $1")
                .bind(input.name.trim())
                .fetch_one(&self.db)
                .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("species name".to_string()));
        }

        let row = sqlx::query_as::<_, SpeciesRow>(
            r#"
            INSERT INTO plant_species (
                name, description, temperature_min, temperature_max,
                air_moisture_min, air_moisture_max, ground_moisture_min, ground_moisture_max
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, description, temperature_min, temperature_max,
                      air_moisture_min, air_moisture_max, ground_moisture_min, ground_moisture_max,
                      created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(conditions.temperature.min)
        .bind(conditions.temperature.max)
        .bind(conditions.air_moisture.min)
        .bind(conditions.air_moisture.max)
        .bind(conditions.ground_moisture.min)
        .bind(conditions.ground_moisture.max)
        .fetch_one(&self.db)
        .await?;

        tracing::info!("Created species {} ({})", row.name, row.id);

        Ok(row.into())
    }

    /// List all species, alphabetically
    pub async fn list_species(&self) -> AppResult<Vec<Species>> {
        let rows = sqlx::query_as::<_, SpeciesRow>(
            r#"
            SELECT id, name, description, temperature_min, temperature_max,
                   air_moisture_min, air_moisture_max, ground_moisture_min, ground_moisture_max,
                   created_at
            FROM plant_species
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Species::from).collect())
    }

    /// Get a species by ID
    pub async fn get_species(&self, species_id: Uuid) -> AppResult<Species> {
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
