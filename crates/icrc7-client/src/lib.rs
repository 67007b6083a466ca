//! ICRC-7 Client - Typed bindings to an ICRC-7 ledger
//!
//! - [`LedgerClient`]: the ledger call contract, bound to one caller
//! - [`ReplicaConnector`]: clients backed by `ic-agent` against a replica
//! - [`InMemoryLedger`]: a single-process ledger with the same contract
//! - [`SeedIdentity`]: secp256k1 identities derived from seed phrases

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod identity;
pub mod ledger;
pub mod memory;
pub mod replica;

pub use error::{ClientError, ClientResult, IdentityError};
pub use identity::{SeedIdentity, DERIVATION_PATH};
pub use ledger::{LedgerClient, LedgerConnector};
pub use memory::{InMemoryClient, InMemoryLedger};
pub use replica::{resolve_canister_id, AgentLedgerClient, ReplicaConnector, DEFAULT_HOST};
