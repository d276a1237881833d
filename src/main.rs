//! Customer churn prediction server
//!
//! Serves a pretrained churn classifier over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌──────────────┐
//! │ validate │──►│  encode  │──►│  forest   │──►│ risk bucket  │──► response
//! │ (422)    │   │ + scale  │   │ inference │   │ Low/Med/High │
//! └──────────┘   └──────────┘   └───────────┘   └──────┬───────┘
//!                                                      │ best effort
//!                                                      ▼
//!                                               ┌─────────────┐
//!                                               │ PostgreSQL  │
//!                                               │ predict log │
//!                                               └─────────────┘
//! ```
//!
//! The model artifacts (tree ensemble, scaler, feature order, encoder
//! tables) are JSON exports of an offline training run, loaded once at
//! startup. The database is optional: without `DATABASE_URL` the service
//! still predicts, it just cannot log, and `/stats` and `/history` answer
//! with 503.

mod config;
mod db;
mod error;
mod handlers;
mod ml;
mod models;

use std::net::SocketAddr;
use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::ml::artifacts::ArtifactStore;
use crate::ml::predictor::ChurnPredictor;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "churn_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Churn prediction server starting...");

    // Load model artifacts; startup fails if any are missing or inconsistent
    let artifacts = ArtifactStore::load(Path::new(&config.model_dir))
        .expect("Failed to load model artifacts");
    tracing::info!(
        model_type = %artifacts.forest.model_type,
        model_version = %artifacts.forest.version,
        features = artifacts.n_features(),
        "Model artifacts loaded"
    );
    let predictor = ChurnPredictor::new(artifacts);

    // Optional persistence
    let pool = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).expect("Invalid DATABASE_URL");
            if let Err(err) = db::init(&pool, predictor.model_version()).await {
                tracing::warn!(
                    error = %err,
                    "database init failed, prediction logging unavailable until it is fixed"
                );
            }
            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, running without prediction logging");
            None
        }
    };

    // Build application state
    let state = AppState { predictor, pool };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: ChurnPredictor,
    pub pool: Option<sqlx::PgPool>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::service::root))
        .route("/health", get(handlers::service::health))
        .route("/predict", post(handlers::predict::predict))
        .route("/stats", get(handlers::stats::stats))
        .route("/history", get(handlers::stats::history))
        .route("/model-info", get(handlers::model_info::model_info))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
