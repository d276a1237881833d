//! Prediction pipeline
//!
//! Ties the stages together for one request: encode the profile, run the
//! forest, bucket the probability, stamp an identifier, then append the log
//! row when persistence is available. The log write is strictly best-effort;
//! its outcome is reported alongside the result instead of failing the call.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::ml::artifacts::ArtifactStore;
use crate::ml::encoder::{self, EncodeError};
use crate::ml::forest::InferenceError;
use crate::ml::risk::RiskLevel;
use crate::models::customer::CustomerRecord;
use crate::models::prediction::{PredictionLog, PredictionResult};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Whether the log row for a prediction landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    /// Row written to the prediction log.
    Recorded,
    /// No database configured, nothing to write.
    Disabled,
    /// Write attempted and failed; the prediction still stands.
    Failed,
}

/// A finished prediction plus the fate of its log row.
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub result: PredictionResult,
    pub log: LogStatus,
}

/// The serving pipeline. Construct once at startup from a loaded artifact
/// set; cloning shares the artifacts.
#[derive(Debug, Clone)]
pub struct ChurnPredictor {
    artifacts: Arc<ArtifactStore>,
}

impl ChurnPredictor {
    pub fn new(artifacts: ArtifactStore) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn model_version(&self) -> &str {
        &self.artifacts.forest.version
    }

    /// Run the full pipeline for one validated profile. The probability is
    /// rounded to three decimals before bucketing, so the reported risk
    /// level always agrees with the reported probability.
    pub fn predict(&self, record: &CustomerRecord) -> Result<PredictionResult, PredictError> {
        let vector = encoder::encode(record, &self.artifacts)?;
        let (label, probability) = self.artifacts.forest.predict(vector.as_slice())?;
        let churn_probability = round3(probability);
        Ok(PredictionResult {
            customer_id: new_prediction_id(),
            churn_prediction: if label == 1 { "Yes" } else { "No" }.to_string(),
            churn_probability,
            risk_level: RiskLevel::from_probability(churn_probability),
            timestamp: Utc::now(),
        })
    }

    /// Predict, then append the log row when a pool is supplied. A failed
    /// write is reported in the outcome, never as a pipeline error.
    pub async fn predict_and_log(
        &self,
        record: &CustomerRecord,
        pool: Option<&PgPool>,
    ) -> Result<PredictionOutcome, PredictError> {
        let result = self.predict(record)?;
        let log = match pool {
            None => LogStatus::Disabled,
            Some(pool) => {
                match PredictionLog::insert(pool, &result, record, self.model_version()).await {
                    Ok(()) => LogStatus::Recorded,
                    Err(err) => {
                        warn!(
                            prediction_id = %result.customer_id,
                            error = %err,
                            "failed to persist prediction"
                        );
                        LogStatus::Failed
                    }
                }
            }
        };
        Ok(PredictionOutcome { result, log })
    }
}

/// Collision-resistant identifier in the `pred_xxxxxxxx` form callers
/// already key on.
fn new_prediction_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("pred_{}", &id[..8])
}

fn round3(probability: f64) -> f64 {
    (probability * 1000.0).round() / 1000.0
}
