//! Scenario error types

use icrc7_client::{ClientError, IdentityError};
use thiserror::Error;

/// Fatal scenario errors.
///
/// Ledger rejections and asset fetch failures are not errors here; they are
/// reported as step outcomes and the run continues.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Ledger could not be reached or replied with garbage
    #[error("Transport error: {0}")]
    Transport(#[from] ClientError),

    /// Seed phrase did not yield an identity
    #[error("Identity derivation failed for {actor}: {source}")]
    Identity {
        actor: String,
        #[source]
        source: IdentityError,
    },

    #[error("Unknown actor: {0}")]
    UnknownActor(String),

    #[error("Duplicate actor: {0}")]
    DuplicateActor(String),

    #[error("No actors registered")]
    EmptyRegistry,
}

/// Result type for scenario operations
pub type ScenarioResult<T> = Result<T, ScenarioError>;
