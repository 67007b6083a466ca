//! End-to-end runs of the demo scenario against the in-memory ledger

use async_trait::async_trait;
use ic_agent::Identity;
use icrc7_client::{ClientError, ClientResult, InMemoryLedger, LedgerClient, LedgerConnector, SeedIdentity};
use icrc7_scenario::{
    demo_scenario, ActorRegistry, DemoCast, MetadataBuilder, Mutation, Query, ScenarioError,
    ScenarioRunner, Step, StepOutcome, StepStatus, DEFAULT_CAST,
};
use icrc7_types::{
    Account, ApprovalArgs, ApprovalError, CallError, CallResult, CollectionMetadata, MintError,
    Nat, Principal, TokenId, TokenMetadata, TransactionId, TransferArgs, TransferError,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn minter() -> Principal {
    SeedIdentity::from_seed_phrase(DEFAULT_CAST[0].1)
        .unwrap()
        .principal()
}

async fn runner_on(connector: &dyn LedgerConnector, metadata: MetadataBuilder) -> ScenarioRunner {
    let actors = ActorRegistry::register_all(DEFAULT_CAST, connector)
        .await
        .unwrap();
    ScenarioRunner::new(Arc::new(actors), "Desmond", metadata).unwrap()
}

fn owner_line(outcomes: &[StepOutcome], token_id: u64) -> Vec<String> {
    outcomes
        .iter()
        .filter(|o| o.label == format!("owner_of({})", token_id))
        .map(|o| o.to_string())
        .collect()
}

#[tokio::test]
async fn test_demo_runs_clean_on_conforming_ledger() {
    let ledger = InMemoryLedger::new(minter());
    let runner = runner_on(&ledger, MetadataBuilder::without_image().unwrap()).await;

    let mut outcomes = Vec::new();
    let summary = runner
        .run_scenario(demo_scenario(&DemoCast::default()), |o| outcomes.push(o.clone()))
        .await
        .unwrap();

    assert!(summary.passed(), "failures: {:?}", summary.assertion_failures);
    assert_eq!(summary.committed, 8);
    assert_eq!(summary.rejected, 3);
    assert_eq!(summary.skipped, 0);

    assert_eq!(
        owner_line(&outcomes, 1),
        vec![
            "Owner of token 1 is Bob",
            "Owner of token 1 is Chloe",
            "Owner of token 1 is Desmond",
        ]
    );
    assert_eq!(
        owner_line(&outcomes, 2),
        vec!["Owner of token 2 is Bob", "Owner of token 2 is Chloe"]
    );

    let last_tokens = outcomes
        .iter()
        .rev()
        .find(|o| o.label == "tokens_of(Chloe)")
        .unwrap();
    assert_eq!(last_tokens.to_string(), "Tokens of Chloe: [2, 3, 4]");
}

#[tokio::test]
async fn test_rejected_transfer_leaves_owner_unchanged() {
    let ledger = InMemoryLedger::new(minter());
    let runner = runner_on(&ledger, MetadataBuilder::without_image().unwrap()).await;

    let steps = vec![
        Step::expect_ok("Alice", Mutation::mint("Bob", 1)),
        Step::expect_ok("Bob", Mutation::transfer_from("Bob", "Chloe", &[1])),
        Step::expect_rejection("Bob", Mutation::transfer_from("Bob", "Desmond", &[1])),
        Step::query(Query::owner_of(1)),
    ];
    let mut outcomes = Vec::new();
    let summary = runner
        .run_scenario(steps, |o| outcomes.push(o.clone()))
        .await
        .unwrap();

    assert!(summary.passed());
    assert!(matches!(
        &outcomes[2].status,
        StepStatus::Rejected { reason, .. } if reason == "Unauthorized"
    ));
    assert_eq!(outcomes[3].to_string(), "Owner of token 1 is Chloe");
}

#[tokio::test]
async fn test_misbehaving_ledger_is_flagged() {
    // A ledger where Alice is not the minter refuses every mint.
    let ledger = InMemoryLedger::new(Principal::anonymous());
    let runner = runner_on(&ledger, MetadataBuilder::without_image().unwrap()).await;

    let summary = runner
        .run_scenario(demo_scenario(&DemoCast::default()), |_| {})
        .await
        .unwrap();

    assert!(!summary.passed());
    assert_eq!(summary.committed, 0);
    assert!(summary
        .assertion_failures
        .iter()
        .any(|f| f.starts_with("Alice mints token 1 to Bob")));
}

#[tokio::test]
async fn test_image_fetch_failure_skips_mints_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let metadata = MetadataBuilder::new(
        Some(format!("{}/logo.svg", server.uri())),
        Duration::from_secs(5),
    )
    .unwrap();
    let ledger = InMemoryLedger::new(minter());
    let runner = runner_on(&ledger, metadata).await;

    let summary = runner
        .run_scenario(demo_scenario(&DemoCast::default()), |_| {})
        .await
        .unwrap();

    assert_eq!(summary.skipped, 4);
    assert_eq!(summary.committed, 0);
    assert!(summary.queries > 0);
    assert!(!summary.passed());
}

#[tokio::test]
async fn test_image_is_embedded_in_minted_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"<svg/>".to_vec()))
        .mount(&server)
        .await;

    let metadata = MetadataBuilder::new(
        Some(format!("{}/logo.svg", server.uri())),
        Duration::from_secs(5),
    )
    .unwrap();
    let ledger = InMemoryLedger::new(minter());
    let runner = runner_on(&ledger, metadata).await;

    runner
        .run_step(Step::expect_ok("Alice", Mutation::mint("Bob", 3)))
        .await
        .unwrap();

    let stored = ledger.token_metadata(&Nat::from(3u64)).await.unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].1.as_text(), Some("Test Name 3"));
    assert_eq!(stored[2].1, icrc7_scenario::encode_image(b"<svg/>"));
}

/// Delegates to the in-memory ledger but times out every transfer.
struct StalledTransfers {
    ledger: InMemoryLedger,
}

struct StalledClient {
    inner: Arc<dyn LedgerClient>,
}

#[async_trait]
impl LedgerConnector for StalledTransfers {
    fn endpoint(&self) -> String {
        "stalled ledger".to_string()
    }

    async fn connect(&self, identity: Arc<dyn Identity>) -> ClientResult<Arc<dyn LedgerClient>> {
        let inner = self.ledger.connect(identity).await?;
        Ok(Arc::new(StalledClient { inner }))
    }
}

#[async_trait]
impl LedgerClient for StalledClient {
    fn caller(&self) -> Principal {
        self.inner.caller()
    }

    async fn collection_metadata(&self) -> ClientResult<CollectionMetadata> {
        self.inner.collection_metadata().await
    }

    async fn name(&self) -> ClientResult<String> {
        self.inner.name().await
    }

    async fn symbol(&self) -> ClientResult<String> {
        self.inner.symbol().await
    }

    async fn description(&self) -> ClientResult<Option<String>> {
        self.inner.description().await
    }

    async fn image(&self) -> ClientResult<Option<String>> {
        self.inner.image().await
    }

    async fn total_supply(&self) -> ClientResult<Nat> {
        self.inner.total_supply().await
    }

    async fn owner_of(&self, token_id: &TokenId) -> ClientResult<CallResult<Account, CallError>> {
        self.inner.owner_of(token_id).await
    }

    async fn balance_of(&self, account: &Account) -> ClientResult<CallResult<Nat, CallError>> {
        self.inner.balance_of(account).await
    }

    async fn tokens_of(
        &self,
        account: &Account,
    ) -> ClientResult<CallResult<Vec<TokenId>, CallError>> {
        self.inner.tokens_of(account).await
    }

    async fn mint(
        &self,
        to: &Account,
        token_id: &TokenId,
        metadata: TokenMetadata,
    ) -> ClientResult<CallResult<TokenId, MintError>> {
        self.inner.mint(to, token_id, metadata).await
    }

    async fn transfer(
        &self,
        _args: TransferArgs,
    ) -> ClientResult<CallResult<TransactionId, TransferError>> {
        Err(ClientError::Timeout {
            method: "icrc7_transfer".to_string(),
            seconds: 60,
        })
    }

    async fn approve(
        &self,
        args: ApprovalArgs,
    ) -> ClientResult<CallResult<TransactionId, ApprovalError>> {
        self.inner.approve(args).await
    }
}

#[tokio::test]
async fn test_transport_failure_aborts_run() {
    let connector = StalledTransfers {
        ledger: InMemoryLedger::new(minter()),
    };
    let runner = runner_on(&connector, MetadataBuilder::without_image().unwrap()).await;

    let mut seen = Vec::new();
    let err = runner
        .run_scenario(demo_scenario(&DemoCast::default()), |o| seen.push(o.label.clone()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ScenarioError::Transport(ClientError::Timeout { .. })
    ));
    assert!(seen.iter().any(|label| label == "Alice mints token 4 to Chloe"));
    assert!(!seen.iter().any(|label| label.starts_with("Bob transfers")));
}
