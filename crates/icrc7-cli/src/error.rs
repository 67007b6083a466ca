//! CLI error types

use icrc7_client::{ClientError, IdentityError};
use icrc7_scenario::{AssetFetchError, ScenarioError};
use thiserror::Error;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Identity error for {actor}: {source}")]
    Identity {
        actor: String,
        #[source]
        source: IdentityError,
    },

    #[error(transparent)]
    Asset(#[from] AssetFetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(e: config::ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
