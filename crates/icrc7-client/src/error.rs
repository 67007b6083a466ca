//! Client error types

use thiserror::Error;

/// Transport-level failures reaching the ledger.
///
/// Ledger rejections are not errors at this level: they arrive as the `Err`
/// arm of a successful call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Agent failed to reach or authenticate with the replica
    #[error("Agent error: {0}")]
    Agent(#[from] ic_agent::AgentError),

    /// Reply could not be decoded as the expected candid type
    #[error("Malformed response from {method}: {source}")]
    Decode {
        method: String,
        #[source]
        source: candid::Error,
    },

    /// Arguments could not be candid-encoded
    #[error("Failed to encode arguments for {method}: {source}")]
    Encode {
        method: String,
        #[source]
        source: candid::Error,
    },

    /// Call did not complete within the configured timeout
    #[error("Call to {method} timed out after {seconds}s")]
    Timeout { method: String, seconds: u64 },

    /// Identity could not produce a caller principal
    #[error("Identity error: {0}")]
    Identity(String),

    /// Canister id could not be resolved
    #[error("Invalid canister id: {0}")]
    CanisterId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Seed-phrase identity derivation failures
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid seed phrase: {0}")]
    InvalidSeedPhrase(String),

    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Cannot compute principal: {0}")]
    Principal(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
