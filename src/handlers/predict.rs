//! Prediction handler

use axum::{extract::State, Json};
use validator::Validate;

use crate::models::customer::CustomerRecord;
use crate::models::prediction::PredictionResult;
use crate::{AppResult, AppState};

/// Score one customer profile. Validation failures come back as 422 before
/// the pipeline runs; a failed log write is reported in the logs only, the
/// caller still receives the prediction.
pub async fn predict(
    State(state): State<AppState>,
    Json(record): Json<CustomerRecord>,
) -> AppResult<Json<PredictionResult>> {
    record.validate()?;

    let outcome = state
        .predictor
        .predict_and_log(&record, state.pool.as_ref())
        .await?;

    tracing::info!(
        prediction_id = %outcome.result.customer_id,
        churn = %outcome.result.churn_prediction,
        probability = outcome.result.churn_probability,
        risk = %outcome.result.risk_level,
        log = ?outcome.log,
        "prediction served"
    );

    Ok(Json(outcome.result))
}
