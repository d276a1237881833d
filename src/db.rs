//! Database module - PostgreSQL connection and schema

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::models::metrics::ModelMetrics;

/// Create database connection pool. Connections are established on first
/// use, so startup does not block on an unreachable database; the health
/// endpoint reports it as degraded instead.
pub fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(database_url)
}

/// Apply the schema and seed the metrics row for the active model version.
pub async fn init(pool: &PgPool, model_version: &str) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    ModelMetrics::seed(pool, model_version).await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Cheap connectivity probe for the health endpoint.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Prediction log (append-only)
CREATE TABLE IF NOT EXISTS prediction_logs (
    id BIGSERIAL PRIMARY KEY,
    prediction_id VARCHAR(50) NOT NULL UNIQUE,
    gender VARCHAR(10) NOT NULL,
    senior_citizen INTEGER NOT NULL,
    partner VARCHAR(10) NOT NULL,
    dependents VARCHAR(10) NOT NULL,
    tenure INTEGER NOT NULL,
    phone_service VARCHAR(10) NOT NULL,
    multiple_lines VARCHAR(30) NOT NULL,
    internet_service VARCHAR(30) NOT NULL,
    online_security VARCHAR(30) NOT NULL,
    online_backup VARCHAR(30) NOT NULL,
    device_protection VARCHAR(30) NOT NULL,
    tech_support VARCHAR(30) NOT NULL,
    streaming_tv VARCHAR(30) NOT NULL,
    streaming_movies VARCHAR(30) NOT NULL,
    contract VARCHAR(30) NOT NULL,
    paperless_billing VARCHAR(10) NOT NULL,
    payment_method VARCHAR(50) NOT NULL,
    monthly_charges DOUBLE PRECISION NOT NULL,
    total_charges DOUBLE PRECISION NOT NULL,
    churn_prediction VARCHAR(10) NOT NULL,
    churn_probability DOUBLE PRECISION NOT NULL,
    risk_level VARCHAR(10) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    model_version VARCHAR(20) NOT NULL DEFAULT '1.0'
);

-- Offline evaluation figures, one row per model version
CREATE TABLE IF NOT EXISTS model_metrics (
    id SERIAL PRIMARY KEY,
    model_version VARCHAR(20) NOT NULL UNIQUE,
    accuracy DOUBLE PRECISION NOT NULL,
    "precision" DOUBLE PRECISION NOT NULL,
    recall DOUBLE PRECISION NOT NULL,
    f1_score DOUBLE PRECISION NOT NULL,
    trained_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    dataset_size INTEGER NOT NULL,
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_prediction_logs_created_at ON prediction_logs(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_prediction_logs_risk_level ON prediction_logs(risk_level);
CREATE INDEX IF NOT EXISTS idx_prediction_logs_prediction_id ON prediction_logs(prediction_id);
"#;
