//! ICRC-7 Types - Candid wire types for non-fungible token ledgers
//!
//! These types mirror the call interface of an ICRC-7 ledger canister and are
//! shared by the ledger clients and the scenario runner.
//!
//! ## Key Concepts
//!
//! - **Account**: An owner principal plus an optional subaccount
//! - **TokenId**: A natural number identifying one token in the collection
//! - **Metadata**: Ordered `(key, value)` pairs attached to a token at mint time
//! - **CallResult**: The `Ok`/`Err` variant returned by mutating and some query calls
//! - **Rejection**: The discriminant of an `Err` arm, used for reporting

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod account;
pub mod args;
pub mod error;
pub mod metadata;

pub use account::{Account, Subaccount};
pub use args::{ApprovalArgs, TransferArgs};
pub use error::{ApprovalError, CallError, MintError, Rejection, TransferError};
pub use metadata::{CollectionMetadata, MetadataValue, TokenMetadata};

pub use candid::{Nat, Principal};

/// Identifier of a token within the collection.
pub type TokenId = Nat;

/// Identifier returned by a successful transfer or approval.
pub type TransactionId = Nat;

/// Two-armed response shape returned by the ledger.
///
/// Candid encodes `Result<T, E>` as `variant { Ok : T; Err : E }`, so this is
/// the wire type itself rather than an adapter over it.
pub type CallResult<T, E> = std::result::Result<T, E>;
