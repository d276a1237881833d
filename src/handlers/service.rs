//! Service descriptor and health handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{db, AppState};

/// Service descriptor served at the root path.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Customer Churn Prediction API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "predict": "/predict",
            "stats": "/stats",
            "history": "/history",
            "model_info": "/model-info"
        }
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub database: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Liveness plus a persistence probe. The service stays "healthy" without a
/// configured database; only an unreachable one degrades it.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.pool {
        None => "disabled",
        Some(pool) => match db::ping(pool).await {
            Ok(()) => "connected",
            Err(err) => {
                tracing::warn!(error = %err, "health probe could not reach the database");
                "unreachable"
            }
        },
    };

    Json(HealthResponse {
        status: if database == "unreachable" {
            "degraded"
        } else {
            "healthy"
        },
        model_loaded: true,
        database,
        timestamp: Utc::now(),
    })
}
