//! Model metrics model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Offline evaluation figures for one model version, written once at
/// startup and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ModelMetrics {
    pub id: i32,
    pub model_version: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub trained_at: DateTime<Utc>,
    pub dataset_size: i32,
    pub notes: Option<String>,
}

impl ModelMetrics {
    /// Insert the evaluation row for `version` if it is not there yet.
    /// Startup calls this every time, so reruns must not duplicate it.
    pub async fn seed(pool: &PgPool, version: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO model_metrics
                (model_version, accuracy, "precision", recall, f1_score, dataset_size, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (model_version) DO NOTHING
            "#,
        )
        .bind(version)
        .bind(0.852)
        .bind(0.830)
        .bind(0.810)
        .bind(0.820)
        .bind(7043_i32)
        .bind("Random Forest model trained on Telco dataset")
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_version(
        pool: &PgPool,
        version: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ModelMetrics>(
            "SELECT * FROM model_metrics WHERE model_version = $1",
        )
        .bind(version)
        .fetch_optional(pool)
        .await
    }
}
