//! Ledger client traits
//!
//! A `LedgerClient` is a typed binding to one ledger, bound to one caller
//! identity. A `LedgerConnector` produces clients for identities.

use crate::error::ClientResult;
use async_trait::async_trait;
use candid::Principal;
use ic_agent::Identity;
use icrc7_types::{
    Account, ApprovalArgs, ApprovalError, CallError, CallResult, CollectionMetadata, MintError,
    Nat, TokenId, TokenMetadata, TransactionId, TransferArgs, TransferError,
};
use std::sync::Arc;

/// Typed call interface of an ICRC-7 ledger.
///
/// Every method returns `Err(ClientError)` only for transport failures.
/// Ledger rejections are carried in the inner `CallResult`.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Principal of the identity this client calls as
    fn caller(&self) -> Principal;

    /// Collection metadata record
    async fn collection_metadata(&self) -> ClientResult<CollectionMetadata>;

    async fn name(&self) -> ClientResult<String>;

    async fn symbol(&self) -> ClientResult<String>;

    async fn description(&self) -> ClientResult<Option<String>>;

    async fn image(&self) -> ClientResult<Option<String>>;

    async fn total_supply(&self) -> ClientResult<Nat>;

    /// Current owner of a token
    async fn owner_of(&self, token_id: &TokenId) -> ClientResult<CallResult<Account, CallError>>;

    /// Number of tokens held by an account
    async fn balance_of(&self, account: &Account) -> ClientResult<CallResult<Nat, CallError>>;

    /// Token ids held by an account
    async fn tokens_of(
        &self,
        account: &Account,
    ) -> ClientResult<CallResult<Vec<TokenId>, CallError>>;

    /// Mint a new token to `to`
    async fn mint(
        &self,
        to: &Account,
        token_id: &TokenId,
        metadata: TokenMetadata,
    ) -> ClientResult<CallResult<TokenId, MintError>>;

    /// Transfer tokens
    async fn transfer(
        &self,
        args: TransferArgs,
    ) -> ClientResult<CallResult<TransactionId, TransferError>>;

    /// Approve a spender
    async fn approve(
        &self,
        args: ApprovalArgs,
    ) -> ClientResult<CallResult<TransactionId, ApprovalError>>;
}

/// Binds identities to ledger clients
#[async_trait]
pub trait LedgerConnector: Send + Sync {
    /// Human-readable target, for logs
    fn endpoint(&self) -> String;

    /// Produce a client that signs calls with `identity`
    async fn connect(&self, identity: Arc<dyn Identity>) -> ClientResult<Arc<dyn LedgerClient>>;
}
