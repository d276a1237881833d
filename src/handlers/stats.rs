//! Prediction log handlers

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::models::prediction::{PredictionLog, PredictionStats};
use crate::{AppError, AppResult, AppState};

const DEFAULT_HISTORY_LIMIT: i64 = 10;
const MAX_HISTORY_LIMIT: i64 = 100;

/// Aggregates over every logged prediction.
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<PredictionStats>> {
    let pool = state.pool.as_ref().ok_or(AppError::PersistenceDisabled)?;
    Ok(Json(PredictionStats::compute(pool).await?))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

fn effective_limit(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT)
}

/// Most recent log entries, newest first.
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<Vec<PredictionLog>>> {
    let pool = state.pool.as_ref().ok_or(AppError::PersistenceDisabled)?;
    let limit = effective_limit(params.limit);
    Ok(Json(PredictionLog::recent(pool, limit).await?))
}
