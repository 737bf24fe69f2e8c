//! Prediction store
//!
//! Durable record of prediction results keyed by plot. Writes are upserts
//! with merge semantics: keys present in the new mapping overwrite stored
//! ones, keys absent from it are kept.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;

pub type Fields = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Could not encode fields: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored fields for plot {plot_id} are not a JSON object")]
    Corrupt { plot_id: String },
}

/// A stored prediction record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredPrediction {
    pub plot_id: String,
    pub fields: Fields,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait PredictionStore: Send + Sync {
    /// Create the record for `plot_id` or merge `fields` into it
    async fn upsert(&self, plot_id: &str, fields: Fields) -> Result<(), StoreError>;

    async fn fetch(&self, plot_id: &str) -> Result<Option<StoredPrediction>, StoreError>;

    /// Short name reported by the health check
    fn backend_name(&self) -> &'static str;
}

/// PostgreSQL store, one jsonb row per plot
#[derive(Clone)]
pub struct PgPredictionStore {
    db: PgPool,
}

#[derive(sqlx::FromRow)]
struct PredictionRow {
    plot_id: String,
    fields: sqlx::types::Json<Value>,
    updated_at: DateTime<Utc>,
}

impl PgPredictionStore {
    /// Create a new PgPredictionStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PredictionStore for PgPredictionStore {
    async fn upsert(&self, plot_id: &str, fields: Fields) -> Result<(), StoreError> {
        // `||` on jsonb merges top-level keys, right side wins
        sqlx::query(
            r#"
            INSERT INTO plot_predictions (plot_id, fields, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (plot_id) DO UPDATE SET
                fields = plot_predictions.fields || EXCLUDED.fields,
                updated_at = NOW()
            "#,
        )
        .bind(plot_id)
        .bind(sqlx::types::Json(Value::Object(fields)))
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn fetch(&self, plot_id: &str) -> Result<Option<StoredPrediction>, StoreError> {
        let row = sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT plot_id, fields, updated_at
            FROM plot_predictions
            WHERE plot_id = $1
            "#,
        )
        .bind(plot_id)
        .fetch_optional(&self.db)
        .await?;

        row.map(|row| match row.fields.0 {
            Value::Object(fields) => Ok(StoredPrediction {
                plot_id: row.plot_id,
                fields,
                updated_at: row.updated_at,
            }),
            _ => Err(StoreError::Corrupt {
                plot_id: row.plot_id,
            }),
        })
        .transpose()
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// Process-local store for development and tests
#[derive(Default)]
pub struct InMemoryPredictionStore {
    records: RwLock<HashMap<String, StoredPrediction>>,
}

impl InMemoryPredictionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PredictionStore for InMemoryPredictionStore {
    async fn upsert(&self, plot_id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let now = Utc::now();
        match records.entry(plot_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                record.fields.extend(fields);
                record.updated_at = now;
            }
            Entry::Vacant(entry) => {
                entry.insert(StoredPrediction {
                    plot_id: plot_id.to_string(),
                    fields,
                    updated_at: now,
                });
            }
        }
        Ok(())
    }

    async fn fetch(&self, plot_id: &str) -> Result<Option<StoredPrediction>, StoreError> {
        Ok(self.records.read().await.get(plot_id).cloned())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
