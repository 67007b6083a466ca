//! Ledger rejection types
//!
//! These are the `Err` arms of the ledger's call results. They are business
//! rule rejections returned by the canister, not transport failures.

use crate::TokenId;
use candid::{CandidType, Deserialize, Nat};
use thiserror::Error;

/// The discriminant of a ledger rejection, used for reporting.
pub trait Rejection: std::error::Error {
    /// Variant name as it appears on the wire
    fn discriminant(&self) -> &'static str;
}

/// Rejections returned by `icrc7_transfer`
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("caller is not authorized to transfer tokens {token_ids:?}")]
    Unauthorized { token_ids: Vec<TokenId> },

    #[error("created_at_time is too old")]
    TooOld,

    #[error("created_at_time is ahead of ledger time {ledger_time}")]
    CreatedInFuture { ledger_time: u64 },

    #[error("duplicate of transaction {duplicate_of}")]
    Duplicate { duplicate_of: Nat },

    #[error("ledger is temporarily unavailable")]
    TemporarilyUnavailable,

    #[error("error {error_code}: {message}")]
    GenericError { error_code: Nat, message: String },
}

impl Rejection for TransferError {
    fn discriminant(&self) -> &'static str {
        match self {
            TransferError::Unauthorized { .. } => "Unauthorized",
            TransferError::TooOld => "TooOld",
            TransferError::CreatedInFuture { .. } => "CreatedInFuture",
            TransferError::Duplicate { .. } => "Duplicate",
            TransferError::TemporarilyUnavailable => "TemporarilyUnavailable",
            TransferError::GenericError { .. } => "GenericError",
        }
    }
}

/// Rejections returned by `icrc7_approve`
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq, Eq, Error)]
pub enum ApprovalError {
    #[error("caller is not authorized to approve tokens {token_ids:?}")]
    Unauthorized { token_ids: Vec<TokenId> },

    #[error("created_at_time is too old")]
    TooOld,

    #[error("ledger is temporarily unavailable")]
    TemporarilyUnavailable,

    #[error("error {error_code}: {message}")]
    GenericError { error_code: Nat, message: String },
}

impl Rejection for ApprovalError {
    fn discriminant(&self) -> &'static str {
        match self {
            ApprovalError::Unauthorized { .. } => "Unauthorized",
            ApprovalError::TooOld => "TooOld",
            ApprovalError::TemporarilyUnavailable => "TemporarilyUnavailable",
            ApprovalError::GenericError { .. } => "GenericError",
        }
    }
}

/// Rejections returned by `mint`
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq, Eq, Error)]
pub enum MintError {
    #[error("supply cap reached")]
    SupplyCapOverflow,

    #[error("caller is not the minting authority")]
    Unauthorized,

    #[error("token id already exists")]
    TokenIdAlreadyExist,

    #[error("token id is below the collection minimum")]
    TokenIdMinimumLimit,

    #[error("error {error_code}: {message}")]
    GenericError { error_code: Nat, message: String },
}

impl Rejection for MintError {
    fn discriminant(&self) -> &'static str {
        match self {
            MintError::SupplyCapOverflow => "SupplyCapOverflow",
            MintError::Unauthorized => "Unauthorized",
            MintError::TokenIdAlreadyExist => "TokenIdAlreadyExist",
            MintError::TokenIdMinimumLimit => "TokenIdMinimumLimit",
            MintError::GenericError { .. } => "GenericError",
        }
    }
}

/// Rejections returned by the account and ownership queries
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("caller is not authorized")]
    Unauthorized,

    #[error("token id does not exist")]
    InvalidTokenId,

    #[error("asset not found")]
    AssetNotFound,

    #[error("ledger is temporarily unavailable")]
    TemporarilyUnavailable,

    #[error("error {error_code}: {message}")]
    GenericError { error_code: Nat, message: String },
}

impl Rejection for CallError {
    fn discriminant(&self) -> &'static str {
        match self {
            CallError::Unauthorized => "Unauthorized",
            CallError::InvalidTokenId => "InvalidTokenId",
            CallError::AssetNotFound => "AssetNotFound",
            CallError::TemporarilyUnavailable => "TemporarilyUnavailable",
            CallError::GenericError { .. } => "GenericError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallResult;

    #[test]
    fn test_discriminants() {
        let e = TransferError::Unauthorized {
            token_ids: vec![Nat::from(1u64)],
        };
        assert_eq!(e.discriminant(), "Unauthorized");
        assert_eq!(MintError::TokenIdAlreadyExist.discriminant(), "TokenIdAlreadyExist");
        assert_eq!(CallError::InvalidTokenId.discriminant(), "InvalidTokenId");
        assert_eq!(ApprovalError::TooOld.discriminant(), "TooOld");
    }

    #[test]
    fn test_err_arm_decodes_from_wire_variant() {
        let sent: CallResult<Nat, TransferError> = Err(TransferError::Unauthorized {
            token_ids: vec![Nat::from(1u64)],
        });
        let bytes = candid::encode_one(&sent).unwrap();
        let received: CallResult<Nat, TransferError> = candid::decode_one(&bytes).unwrap();
        assert_eq!(received, sent);
    }

    #[test]
    fn test_generic_error_message() {
        let e = CallError::GenericError {
            error_code: Nat::from(7u64),
            message: "boom".into(),
        };
        assert_eq!(e.to_string(), "error 7: boom");
    }
}
