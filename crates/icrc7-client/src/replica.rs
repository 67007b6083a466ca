//! Replica-backed ledger client
//!
//! Calls a deployed ICRC-7 canister through `ic-agent`. Queries go through
//! the query endpoint, mutations are submitted as update calls and polled
//! until the replica certifies a reply.

use crate::error::{ClientError, ClientResult};
use crate::ledger::{LedgerClient, LedgerConnector};
use async_trait::async_trait;
use candid::{CandidType, Principal};
use ic_agent::{Agent, Identity};
use icrc7_types::{
    Account, ApprovalArgs, ApprovalError, CallError, CallResult, CollectionMetadata, MintError,
    Nat, TokenId, TokenMetadata, TransactionId, TransferArgs, TransferError,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Default local replica address used by `dfx start`
pub const DEFAULT_HOST: &str = "http://127.0.0.1:4943";

/// Builds agent-backed clients for one canister
#[derive(Debug, Clone)]
pub struct ReplicaConnector {
    host: String,
    canister_id: Principal,
    fetch_root_key: bool,
    call_timeout: Duration,
}

impl ReplicaConnector {
    pub fn new(host: &str, canister_id: Principal) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            canister_id,
            fetch_root_key: true,
            call_timeout: Duration::from_secs(60),
        }
    }

    /// Fetch the replica root key before the first call.
    ///
    /// Required for local replicas; must be off against mainnet.
    pub fn fetch_root_key(mut self, fetch: bool) -> Self {
        self.fetch_root_key = fetch;
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

#[async_trait]
impl LedgerConnector for ReplicaConnector {
    fn endpoint(&self) -> String {
        format!("{} ({})", self.host, self.canister_id)
    }

    async fn connect(&self, identity: Arc<dyn Identity>) -> ClientResult<Arc<dyn LedgerClient>> {
        let agent = Agent::builder()
            .with_url(self.host.clone())
            .with_arc_identity(identity)
            .build()?;

        if self.fetch_root_key {
            agent.fetch_root_key().await?;
        }

        let caller = agent.get_principal().map_err(ClientError::Identity)?;
        tracing::debug!(caller = %caller, host = %self.host, "Connected agent");

        Ok(Arc::new(AgentLedgerClient {
            agent,
            canister_id: self.canister_id,
            caller,
            call_timeout: self.call_timeout,
        }))
    }
}

/// Ledger client signing with one agent identity
pub struct AgentLedgerClient {
    agent: Agent,
    canister_id: Principal,
    caller: Principal,
    call_timeout: Duration,
}

impl AgentLedgerClient {
    async fn query<R: CandidType + DeserializeOwned>(
        &self,
        method: &str,
        arg: Vec<u8>,
    ) -> ClientResult<R> {
        tracing::debug!(method, canister_id = %self.canister_id, "Query call");
        let call = self
            .agent
            .query(&self.canister_id, method)
            .with_arg(arg)
            .call();
        let reply = self.bounded(method, call).await??;
        decode(method, &reply)
    }

    async fn update<R: CandidType + DeserializeOwned>(
        &self,
        method: &str,
        arg: Vec<u8>,
    ) -> ClientResult<R> {
        tracing::debug!(method, canister_id = %self.canister_id, "Update call");
        let call = self
            .agent
            .update(&self.canister_id, method)
            .with_arg(arg)
            .call_and_wait();
        let reply = self.bounded(method, call).await??;
        decode(method, &reply)
    }

    async fn bounded<F: Future>(&self, method: &str, call: F) -> ClientResult<F::Output> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| ClientError::Timeout {
                method: method.to_string(),
                seconds: self.call_timeout.as_secs(),
            })
    }
}

fn encode<T: candid::utils::ArgumentEncoder>(method: &str, args: T) -> ClientResult<Vec<u8>> {
    candid::encode_args(args).map_err(|source| ClientError::Encode {
        method: method.to_string(),
        source,
    })
}

fn decode<R: CandidType + DeserializeOwned>(method: &str, reply: &[u8]) -> ClientResult<R> {
    candid::decode_one(reply).map_err(|source| ClientError::Decode {
        method: method.to_string(),
        source,
    })
}

#[async_trait]
impl LedgerClient for AgentLedgerClient {
    fn caller(&self) -> Principal {
        self.caller
    }

    async fn collection_metadata(&self) -> ClientResult<CollectionMetadata> {
        let method = "icrc7_collection_metadata";
        self.query(method, encode(method, ())?).await
    }

    async fn name(&self) -> ClientResult<String> {
        let method = "icrc7_name";
        self.query(method, encode(method, ())?).await
    }

    async fn symbol(&self) -> ClientResult<String> {
        let method = "icrc7_symbol";
        self.query(method, encode(method, ())?).await
    }

    async fn description(&self) -> ClientResult<Option<String>> {
        let method = "icrc7_description";
        self.query(method, encode(method, ())?).await
    }

    async fn image(&self) -> ClientResult<Option<String>> {
        let method = "icrc7_image";
        self.query(method, encode(method, ())?).await
    }

    async fn total_supply(&self) -> ClientResult<Nat> {
        let method = "icrc7_total_supply";
        self.query(method, encode(method, ())?).await
    }

    async fn owner_of(&self, token_id: &TokenId) -> ClientResult<CallResult<Account, CallError>> {
        let method = "icrc7_owner_of";
        self.query(method, encode(method, (token_id,))?).await
    }

    async fn balance_of(&self, account: &Account) -> ClientResult<CallResult<Nat, CallError>> {
        let method = "icrc7_balance_of";
        self.query(method, encode(method, (account,))?).await
    }

    async fn tokens_of(
        &self,
        account: &Account,
    ) -> ClientResult<CallResult<Vec<TokenId>, CallError>> {
        let method = "icrc7_tokens_of";
        self.query(method, encode(method, (account,))?).await
    }

    async fn mint(
        &self,
        to: &Account,
        token_id: &TokenId,
        metadata: TokenMetadata,
    ) -> ClientResult<CallResult<TokenId, MintError>> {
        let method = "mint";
        self.update(method, encode(method, (to, token_id, metadata))?)
            .await
    }

    async fn transfer(
        &self,
        args: TransferArgs,
    ) -> ClientResult<CallResult<TransactionId, TransferError>> {
        let method = "icrc7_transfer";
        self.update(method, encode(method, (args,))?).await
    }

    async fn approve(
        &self,
        args: ApprovalArgs,
    ) -> ClientResult<CallResult<TransactionId, ApprovalError>> {
        let method = "icrc7_approve";
        self.update(method, encode(method, (args,))?).await
    }
}

/// Resolve the ledger canister id.
///
/// An explicit id wins. Otherwise the id is read from a dfx
/// `canister_ids.json` file shaped `{ "<canister>": { "<network>": "<id>" } }`.
pub fn resolve_canister_id(
    explicit: Option<&str>,
    canister_ids_path: &Path,
    canister_name: &str,
    network: &str,
) -> ClientResult<Principal> {
    if let Some(text) = explicit {
        return Principal::from_text(text)
            .map_err(|e| ClientError::CanisterId(format!("{}: {}", text, e)));
    }

    let raw = std::fs::read_to_string(canister_ids_path)?;
    let ids: HashMap<String, HashMap<String, String>> = serde_json::from_str(&raw)?;

    let text = ids
        .get(canister_name)
        .and_then(|networks| networks.get(network))
        .ok_or_else(|| {
            ClientError::CanisterId(format!(
                "no '{}' entry for network '{}' in {}",
                canister_name,
                network,
                canister_ids_path.display()
            ))
        })?;

    Principal::from_text(text).map_err(|e| ClientError::CanisterId(format!("{}: {}", text, e)))
}
