//! Model info handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::models::metrics::ModelMetrics;
use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub model_version: String,
    pub number_of_features: usize,
    pub features: Vec<String>,
    pub encoders: Vec<String>,
    pub metrics: Option<ModelMetrics>,
}

/// Describe the loaded model: type, version, feature schema and, when the
/// metrics table is reachable, its offline evaluation figures.
pub async fn model_info(State(state): State<AppState>) -> AppResult<Json<ModelInfo>> {
    let artifacts = state.predictor.artifacts();
    let version = state.predictor.model_version();

    let metrics = match &state.pool {
        None => None,
        Some(pool) => match ModelMetrics::find_by_version(pool, version).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(error = %err, "could not read model metrics");
                None
            }
        },
    };

    Ok(Json(ModelInfo {
        model_type: artifacts.forest.model_type.clone(),
        model_version: version.to_string(),
        number_of_features: artifacts.n_features(),
        features: artifacts.feature_names.clone(),
        encoders: artifacts.encoders.keys().cloned().collect(),
        metrics,
    }))
}
