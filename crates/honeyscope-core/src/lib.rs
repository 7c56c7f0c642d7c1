//! Shared domain types and environment configuration for honeyscope.

mod app_config;
mod config;
mod products;
mod summaries;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{ProductRow, Review};
pub use summaries::{Score, SummaryDocument};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
