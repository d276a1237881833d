//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL. Absent means the service runs without
    /// persistence: predictions are served but not logged.
    pub database_url: Option<String>,

    /// Server port
    pub port: u16,

    /// Directory holding the exported model artifacts
    pub model_dir: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok(),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            model_dir: env::var("MODEL_DIR").unwrap_or_else(|_| "models".to_string()),
        }
    }
}
