//! In-memory ICRC-7 ledger
//!
//! A single-process ledger with the same call contract as a deployed
//! canister. Suitable for tests and offline dry runs of a scenario; it keeps
//! no state across processes.
//!
//! Rules enforced:
//! - only the minter may mint, and token ids are unique
//! - a transfer out of another account needs an unexpired approval
//! - transfers are atomic unless `is_atomic = Some(false)`
//! - a transfer clears the approvals on every token it moves

use crate::error::{ClientError, ClientResult};
use crate::ledger::{LedgerClient, LedgerConnector};
use async_trait::async_trait;
use candid::Principal;
use ic_agent::Identity;
use icrc7_types::{
    Account, ApprovalArgs, ApprovalError, CallError, CallResult, CollectionMetadata, MintError,
    Nat, TokenId, TokenMetadata, TransactionId, TransferArgs, TransferError,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// How far `created_at_time` may lag ledger time (24 hours).
const TX_WINDOW_NANOS: u64 = 24 * 60 * 60 * 1_000_000_000;

/// Allowed clock drift between caller and ledger (2 minutes).
const PERMITTED_DRIFT_NANOS: u64 = 2 * 60 * 1_000_000_000;

#[derive(Debug, Clone)]
struct TokenRecord {
    owner: Account,
    metadata: TokenMetadata,
}

#[derive(Debug, Clone)]
struct Approval {
    spender: Account,
    expires_at: Option<u64>,
}

#[derive(Debug)]
struct LedgerState {
    name: String,
    symbol: String,
    description: Option<String>,
    image: Option<String>,
    supply_cap: Option<Nat>,
    tokens: BTreeMap<TokenId, TokenRecord>,
    approvals: BTreeMap<TokenId, Vec<Approval>>,
    next_tx: u64,
}

impl LedgerState {
    fn next_tx(&mut self) -> TransactionId {
        let id = self.next_tx;
        self.next_tx += 1;
        Nat::from(id)
    }

    fn owned_by(&self, account: &Account) -> Vec<TokenId> {
        self.tokens
            .iter()
            .filter(|(_, record)| record.owner.same_as(account))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn is_approved(&self, token_id: &TokenId, spender: &Account, now: u64) -> bool {
        self.approvals
            .get(token_id)
            .map(|approvals| {
                approvals.iter().any(|a| {
                    a.spender.same_as(spender) && a.expires_at.map(|t| t > now).unwrap_or(true)
                })
            })
            .unwrap_or(false)
    }
}

/// Shared in-memory ledger; clones observe the same state.
#[derive(Clone)]
pub struct InMemoryLedger {
    minter: Principal,
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
    /// Create an empty collection minted by `minter`
    pub fn new(minter: Principal) -> Self {
        Self {
            minter,
            state: Arc::new(Mutex::new(LedgerState {
                name: "ICRC-7 Test Collection".to_string(),
                symbol: "ICRC7".to_string(),
                description: Some("In-memory ICRC-7 collection".to_string()),
                image: None,
                supply_cap: None,
                tokens: BTreeMap::new(),
                approvals: BTreeMap::new(),
                next_tx: 1,
            })),
        }
    }

    /// Replace the collection name and symbol
    pub async fn set_collection(&self, name: &str, symbol: &str, description: Option<&str>) {
        let mut state = self.state.lock().await;
        state.name = name.to_string();
        state.symbol = symbol.to_string();
        state.description = description.map(str::to_string);
    }

    pub async fn set_supply_cap(&self, cap: Option<Nat>) {
        self.state.lock().await.supply_cap = cap;
    }

    /// Client calling as `caller`
    pub fn client_for(&self, caller: Principal) -> InMemoryClient {
        InMemoryClient {
            ledger: self.clone(),
            caller,
        }
    }

    /// Metadata stored for a token
    pub async fn token_metadata(&self, token_id: &TokenId) -> Option<TokenMetadata> {
        let state = self.state.lock().await;
        state.tokens.get(token_id).map(|r| r.metadata.clone())
    }
}

#[async_trait]
impl LedgerConnector for InMemoryLedger {
    fn endpoint(&self) -> String {
        "in-memory ledger".to_string()
    }

    async fn connect(&self, identity: Arc<dyn Identity>) -> ClientResult<Arc<dyn LedgerClient>> {
        let caller = identity.sender().map_err(ClientError::Identity)?;
        Ok(Arc::new(self.client_for(caller)))
    }
}

/// In-memory ledger client bound to one caller
#[derive(Clone)]
pub struct InMemoryClient {
    ledger: InMemoryLedger,
    caller: Principal,
}

fn now_nanos() -> u64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .map(|n| n.max(0) as u64)
        .unwrap_or(0)
}

/// Check `created_at_time` against the deduplication window.
fn check_created_at(created_at: Option<u64>, now: u64) -> Result<(), TransferError> {
    match created_at {
        Some(t) if t.saturating_add(TX_WINDOW_NANOS + PERMITTED_DRIFT_NANOS) < now => {
            Err(TransferError::TooOld)
        }
        Some(t) if t > now.saturating_add(PERMITTED_DRIFT_NANOS) => {
            Err(TransferError::CreatedInFuture { ledger_time: now })
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl LedgerClient for InMemoryClient {
    fn caller(&self) -> Principal {
        self.caller
    }

    async fn collection_metadata(&self) -> ClientResult<CollectionMetadata> {
        let state = self.ledger.state.lock().await;
        Ok(CollectionMetadata {
            name: state.name.clone(),
            symbol: state.symbol.clone(),
            description: state.description.clone(),
            total_supply: Nat::from(state.tokens.len() as u64),
            image: state.image.clone(),
            supply_cap: state.supply_cap.clone(),
        })
    }

    async fn name(&self) -> ClientResult<String> {
        Ok(self.ledger.state.lock().await.name.clone())
    }

    async fn symbol(&self) -> ClientResult<String> {
        Ok(self.ledger.state.lock().await.symbol.clone())
    }

    async fn description(&self) -> ClientResult<Option<String>> {
        Ok(self.ledger.state.lock().await.description.clone())
    }

    async fn image(&self) -> ClientResult<Option<String>> {
        Ok(self.ledger.state.lock().await.image.clone())
    }

    async fn total_supply(&self) -> ClientResult<Nat> {
        Ok(Nat::from(self.ledger.state.lock().await.tokens.len() as u64))
    }

    async fn owner_of(&self, token_id: &TokenId) -> ClientResult<CallResult<Account, CallError>> {
        let state = self.ledger.state.lock().await;
        Ok(state
            .tokens
            .get(token_id)
            .map(|r| r.owner.clone())
            .ok_or(CallError::InvalidTokenId))
    }

    async fn balance_of(&self, account: &Account) -> ClientResult<CallResult<Nat, CallError>> {
        let state = self.ledger.state.lock().await;
        Ok(Ok(Nat::from(state.owned_by(account).len() as u64)))
    }

    async fn tokens_of(
        &self,
        account: &Account,
    ) -> ClientResult<CallResult<Vec<TokenId>, CallError>> {
        let state = self.ledger.state.lock().await;
        Ok(Ok(state.owned_by(account)))
    }

    async fn mint(
        &self,
        to: &Account,
        token_id: &TokenId,
        metadata: TokenMetadata,
    ) -> ClientResult<CallResult<TokenId, MintError>> {
        let mut state = self.ledger.state.lock().await;

        if self.caller != self.ledger.minter {
            return Ok(Err(MintError::Unauthorized));
        }
        if state.tokens.contains_key(token_id) {
            return Ok(Err(MintError::TokenIdAlreadyExist));
        }
        if let Some(cap) = &state.supply_cap {
            if Nat::from(state.tokens.len() as u64) >= *cap {
                return Ok(Err(MintError::SupplyCapOverflow));
            }
        }

        state.tokens.insert(
            token_id.clone(),
            TokenRecord {
                owner: to.normalized(),
                metadata,
            },
        );
        tracing::debug!(token_id = %token_id, owner = %to, "Minted token");
        Ok(Ok(token_id.clone()))
    }

    async fn transfer(
        &self,
        args: TransferArgs,
    ) -> ClientResult<CallResult<TransactionId, TransferError>> {
        let now = now_nanos();
        let mut state = self.ledger.state.lock().await;

        if let Err(e) = check_created_at(args.created_at_time, now) {
            return Ok(Err(e));
        }
        if args.token_ids.is_empty() {
            return Ok(Err(TransferError::GenericError {
                error_code: Nat::from(0u64),
                message: "no token ids".to_string(),
            }));
        }

        let spender = Account {
            owner: self.caller,
            subaccount: args.spender_subaccount.clone(),
        };
        let from = args.from.clone().unwrap_or_else(|| spender.clone());
        let acting_for_self = from.owner == self.caller;

        let (allowed, denied): (Vec<TokenId>, Vec<TokenId>) =
            args.token_ids.iter().cloned().partition(|id| {
                let owned = state
                    .tokens
                    .get(id)
                    .map(|r| r.owner.same_as(&from))
                    .unwrap_or(false);
                owned && (acting_for_self || state.is_approved(id, &spender, now))
            });

        let atomic = args.is_atomic.unwrap_or(true);
        if allowed.is_empty() || (atomic && !denied.is_empty()) {
            return Ok(Err(TransferError::Unauthorized { token_ids: denied }));
        }

        let to = args.to.normalized();
        for id in &allowed {
            if let Some(record) = state.tokens.get_mut(id) {
                record.owner = to.clone();
            }
            state.approvals.remove(id);
        }

        let tx = state.next_tx();
        tracing::debug!(tx = %tx, from = %from, to = %to, moved = allowed.len(), "Transferred tokens");
        Ok(Ok(tx))
    }

    async fn approve(
        &self,
        args: ApprovalArgs,
    ) -> ClientResult<CallResult<TransactionId, ApprovalError>> {
        let now = now_nanos();
        let mut state = self.ledger.state.lock().await;

        if let Err(TransferError::TooOld) = check_created_at(args.created_at_time, now) {
            return Ok(Err(ApprovalError::TooOld));
        }
        if args.expires_at.map(|t| t <= now).unwrap_or(false) {
            return Ok(Err(ApprovalError::GenericError {
                error_code: Nat::from(1u64),
                message: "approval expiry is in the past".to_string(),
            }));
        }

        let owner = Account {
            owner: self.caller,
            subaccount: args.from_subaccount.clone(),
        };
        let token_ids = match &args.token_ids {
            Some(ids) => ids.clone(),
            None => state.owned_by(&owner),
        };

        let denied: Vec<TokenId> = token_ids
            .iter()
            .filter(|id| {
                !state
                    .tokens
                    .get(*id)
                    .map(|r| r.owner.same_as(&owner))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        if token_ids.is_empty() || !denied.is_empty() {
            return Ok(Err(ApprovalError::Unauthorized { token_ids: denied }));
        }

        for id in token_ids {
            let approvals = state.approvals.entry(id).or_default();
            approvals.retain(|a| !a.spender.same_as(&args.spender));
            approvals.push(Approval {
                spender: args.spender.normalized(),
                expires_at: args.expires_at,
            });
        }

        let tx = state.next_tx();
        tracing::debug!(tx = %tx, owner = %owner, spender = %args.spender, "Approved spender");
        Ok(Ok(tx))
    }
}
