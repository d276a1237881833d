//! Prediction result and log models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Row};

use crate::ml::risk::RiskLevel;
use crate::models::customer::CustomerRecord;

/// What `POST /predict` returns. `customer_id` is the prediction identifier
/// handed back to the caller; the same value keys the persisted log row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub customer_id: String,
    pub churn_prediction: String,
    pub churn_probability: f64,
    pub risk_level: RiskLevel,
    pub timestamp: DateTime<Utc>,
}

/// One row of the append-only prediction log: the full input profile plus
/// the outcome and a model-version tag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PredictionLog {
    pub id: i64,
    pub prediction_id: String,
    pub gender: String,
    pub senior_citizen: i32,
    pub partner: String,
    pub dependents: String,
    pub tenure: i32,
    pub phone_service: String,
    pub multiple_lines: String,
    pub internet_service: String,
    pub online_security: String,
    pub online_backup: String,
    pub device_protection: String,
    pub tech_support: String,
    pub streaming_tv: String,
    pub streaming_movies: String,
    pub contract: String,
    pub paperless_billing: String,
    pub payment_method: String,
    pub monthly_charges: f64,
    pub total_charges: f64,
    pub churn_prediction: String,
    pub churn_probability: f64,
    pub risk_level: String,
    pub created_at: DateTime<Utc>,
    pub model_version: String,
}

impl PredictionLog {
    pub async fn insert(
        pool: &PgPool,
        result: &PredictionResult,
        record: &CustomerRecord,
        model_version: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO prediction_logs (
                prediction_id,
                gender, senior_citizen, partner, dependents, tenure,
                phone_service, multiple_lines, internet_service,
                online_security, online_backup, device_protection,
                tech_support, streaming_tv, streaming_movies,
                contract, paperless_billing, payment_method,
                monthly_charges, total_charges,
                churn_prediction, churn_probability, risk_level,
                created_at, model_version
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25
            )
            "#,
        )
        .bind(&result.customer_id)
        .bind(&record.gender)
        .bind(record.senior_citizen as i32)
        .bind(&record.partner)
        .bind(&record.dependents)
        .bind(record.tenure as i32)
        .bind(&record.phone_service)
        .bind(&record.multiple_lines)
        .bind(&record.internet_service)
        .bind(&record.online_security)
        .bind(&record.online_backup)
        .bind(&record.device_protection)
        .bind(&record.tech_support)
        .bind(&record.streaming_tv)
        .bind(&record.streaming_movies)
        .bind(&record.contract)
        .bind(&record.paperless_billing)
        .bind(&record.payment_method)
        .bind(record.monthly_charges)
        .bind(record.total_charges)
        .bind(&result.churn_prediction)
        .bind(result.churn_probability)
        .bind(result.risk_level.as_str())
        .bind(result.timestamp)
        .bind(model_version)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Most recent entries, newest first.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PredictionLog>(
            r#"
            SELECT * FROM prediction_logs
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

/// Logged predictions broken down by risk bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskDistribution {
    #[serde(rename = "Low")]
    pub low: i64,
    #[serde(rename = "Medium")]
    pub medium: i64,
    #[serde(rename = "High")]
    pub high: i64,
}

/// Aggregates over the prediction log, served by `GET /stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionStats {
    pub total_predictions: i64,
    pub churn_yes: i64,
    pub churn_no: i64,
    pub churn_rate: f64,
    pub average_probability: f64,
    pub risk_distribution: RiskDistribution,
}

impl PredictionStats {
    /// Assemble the aggregate view from query output. An empty log yields
    /// zero counts and a zero churn rate rather than a division error.
    pub fn from_parts(
        total: i64,
        churned: i64,
        average_probability: Option<f64>,
        buckets: &[(String, i64)],
    ) -> Self {
        let mut distribution = RiskDistribution::default();
        for (level, count) in buckets {
            match level.as_str() {
                "Low" => distribution.low = *count,
                "Medium" => distribution.medium = *count,
                "High" => distribution.high = *count,
                other => tracing::warn!(risk_level = other, "unexpected bucket in log"),
            }
        }
        let churn_rate = if total > 0 {
            churned as f64 / total as f64
        } else {
            0.0
        };
        Self {
            total_predictions: total,
            churn_yes: churned,
            churn_no: total - churned,
            churn_rate,
            average_probability: average_probability.unwrap_or(0.0),
            risk_distribution: distribution,
        }
    }

    pub async fn compute(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let totals = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE churn_prediction = 'Yes') AS churned,
                AVG(churn_probability) AS average_probability
            FROM prediction_logs
            "#,
        )
        .fetch_one(pool)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT risk_level, COUNT(*) AS count
            FROM prediction_logs
            GROUP BY risk_level
            "#,
        )
        .fetch_all(pool)
        .await?;

        let buckets: Vec<(String, i64)> = rows
            .into_iter()
            .map(|r| (r.get::<String, _>("risk_level"), r.get::<i64, _>("count")))
            .collect();

        Ok(Self::from_parts(
            totals.get::<i64, _>("total"),
            totals.get::<i64, _>("churned"),
            totals.get::<Option<f64>, _>("average_probability"),
            &buckets,
        ))
    }
}
