//! Scenario runner
//!
//! Executes steps strictly in order against the ledger. Each step's outcome is
//! interpreted from the two-armed `CallResult` the ledger returns:
//!
//! - `Ok(id)` commits the step
//! - `Err(rejection)` is reported with its discriminant and the run continues
//! - a transport failure aborts the run
//!
//! Ownership is never cached; every check re-queries the ledger.

use crate::actor::{Actor, ActorRegistry, NOBODY};
use crate::error::ScenarioResult;
use crate::metadata::MetadataBuilder;
use crate::outcome::{Observation, ScenarioSummary, StepOutcome, StepStatus};
use crate::step::{Check, Mutation, Query, Step};
use futures_util::stream::{self, Stream, StreamExt};
use icrc7_types::{ApprovalArgs, CallResult, Nat, Rejection, TransferArgs};
use std::sync::Arc;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Drives a scenario against one ledger
#[derive(Debug)]
pub struct ScenarioRunner {
    actors: Arc<ActorRegistry>,
    observer: String,
    metadata: MetadataBuilder,
}

impl ScenarioRunner {
    /// Create a runner issuing all queries and checks as `observer`.
    pub fn new(
        actors: Arc<ActorRegistry>,
        observer: &str,
        metadata: MetadataBuilder,
    ) -> ScenarioResult<Self> {
        actors.get(observer)?;
        Ok(Self {
            actors,
            observer: observer.to_string(),
            metadata,
        })
    }

    fn observer(&self) -> ScenarioResult<&Actor> {
        self.actors.get(&self.observer)
    }

    /// Run one step.
    ///
    /// Ledger rejections and skipped mints are outcomes; only transport
    /// failures and unknown actor names are errors.
    pub async fn run_step(&self, step: Step) -> ScenarioResult<StepOutcome> {
        let label = step.label();
        match step {
            Step::Section(_) => Ok(StepOutcome::new(label, StepStatus::Section)),
            Step::Query(query) => {
                let observation = self.observe(query).await?;
                Ok(StepOutcome::new(label, StepStatus::Observed(observation)))
            }
            Step::Mutate {
                actor,
                call,
                expect_success,
            } => {
                let caller = self.actors.get(&actor)?;
                let status = self.mutate(caller, call).await?;
                let outcome = judge(StepOutcome::new(label, status), expect_success);
                log_mutation(&outcome);
                Ok(outcome)
            }
            Step::Check(check) => self.check(label, check).await,
        }
    }

    /// Lazily run `steps` in order.
    ///
    /// The stream ends after the first fatal error, which is yielded as its
    /// last item. It cannot be restarted.
    pub fn run_all(
        &self,
        steps: Vec<Step>,
    ) -> impl Stream<Item = ScenarioResult<StepOutcome>> + '_ {
        stream::unfold(
            (steps.into_iter(), false),
            move |(mut steps, halted)| async move {
                if halted {
                    return None;
                }
                let step = steps.next()?;
                let outcome = self.run_step(step).await;
                if let Err(e) = &outcome {
                    tracing::error!(error = %e, "Scenario aborted");
                }
                let halted = outcome.is_err();
                Some((outcome, (steps, halted)))
            },
        )
    }

    /// Run every step, handing each outcome to `on_outcome` as it completes.
    pub async fn run_scenario<F>(
        &self,
        steps: Vec<Step>,
        mut on_outcome: F,
    ) -> ScenarioResult<ScenarioSummary>
    where
        F: FnMut(&StepOutcome),
    {
        let outcomes = self.run_all(steps);
        futures_util::pin_mut!(outcomes);

        let mut summary = ScenarioSummary::default();
        while let Some(outcome) = outcomes.next().await {
            let outcome = outcome?;
            on_outcome(&outcome);
            summary.record(&outcome);
        }

        tracing::info!(
            steps = summary.steps,
            committed = summary.committed,
            rejected = summary.rejected,
            failures = summary.assertion_failures.len(),
            "Scenario finished"
        );
        Ok(summary)
    }

    async fn observe(&self, query: Query) -> ScenarioResult<Observation> {
        let client = self.observer()?.client();
        let observation = match query {
            Query::CollectionMetadata => Observation::Collection(client.collection_metadata().await?),
            Query::Name => Observation::Name(client.name().await?),
            Query::Symbol => Observation::Symbol(client.symbol().await?),
            Query::Description => Observation::Description(client.description().await?),
            Query::Image => Observation::Image(client.image().await?),
            Query::TotalSupply => Observation::TotalSupply(client.total_supply().await?),
            Query::OwnerOf { token_id } => {
                let owner = client
                    .owner_of(&Nat::from(token_id))
                    .await?
                    .map(|account| self.actors.display_account(&account))
                    .map_err(|e| reason(&e));
                Observation::Owner { token_id, owner }
            }
            Query::BalanceOf { actor } => {
                let account = self.actors.get(&actor)?.account();
                let balance = client.balance_of(&account).await?.map_err(|e| reason(&e));
                Observation::Balance { actor, balance }
            }
            Query::TokensOf { actor } => {
                let account = self.actors.get(&actor)?.account();
                let tokens = client.tokens_of(&account).await?.map_err(|e| reason(&e));
                Observation::Tokens { actor, tokens }
            }
        };
        Ok(observation)
    }

    async fn mutate(&self, caller: &Actor, call: Mutation) -> ScenarioResult<StepStatus> {
        let client = caller.client();
        match call {
            Mutation::Mint { to, token_id } => {
                let to = self.actors.get(&to)?.account();
                let token_id = Nat::from(token_id);
                let metadata = match self.metadata.build(&token_id).await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        tracing::warn!(token_id = %token_id, error = %e, "Skipping mint, metadata unavailable");
                        return Ok(StepStatus::Skipped {
                            reason: e.to_string(),
                        });
                    }
                };
                Ok(interpret(client.mint(&to, &token_id, metadata).await?))
            }
            Mutation::Transfer {
                from,
                to,
                token_ids,
            } => {
                let to = self.actors.get(&to)?.account();
                let mut args = TransferArgs::new(to, nats(&token_ids)).created_at(now_nanos());
                if let Some(from) = from {
                    args = args.from_account(self.actors.get(&from)?.account());
                }
                Ok(interpret(client.transfer(args).await?))
            }
            Mutation::Approve {
                spender,
                token_ids,
                expires_in_secs,
            } => {
                let spender = self.actors.get(&spender)?.account();
                let now = now_nanos();
                let mut args = ApprovalArgs::new(spender, nats(&token_ids)).created_at(now);
                if let Some(secs) = expires_in_secs {
                    args = args.expires_at(now.saturating_add(secs.saturating_mul(NANOS_PER_SEC)));
                }
                Ok(interpret(client.approve(args).await?))
            }
        }
    }

    async fn check(&self, label: String, check: Check) -> ScenarioResult<StepOutcome> {
        let client = self.observer()?.client();
        match check {
            Check::OwnerIs { token_id, actor } => {
                let expected = self.actors.get(&actor)?.account();
                let owner = client.owner_of(&Nat::from(token_id)).await?;
                let outcome = match owner {
                    Ok(owner) if owner.same_as(&expected) => checked(
                        label,
                        format!("token {} belongs to {}", token_id, actor),
                    ),
                    Ok(owner) => {
                        let shown = self.actors.display_account(&owner);
                        checked(label, format!("token {} belongs to {}", token_id, shown))
                            .with_assertion(format!("expected {}, ledger reports {}", actor, shown))
                    }
                    Err(e) => checked(label, format!("token {} belongs to {}", token_id, NOBODY))
                        .with_assertion(format!(
                            "expected {}, owner query rejected with {}",
                            actor,
                            e.discriminant()
                        )),
                };
                Ok(outcome)
            }
            Check::BalanceMatchesTokens { actor } => {
                let account = self.actors.get(&actor)?.account();
                let balance = client.balance_of(&account).await?;
                let tokens = client.tokens_of(&account).await?;
                let outcome = match (balance, tokens) {
                    (Ok(balance), Ok(tokens)) => {
                        let outcome = checked(
                            label,
                            format!(
                                "balance of {} is {}, holding {} tokens",
                                actor,
                                balance.0,
                                tokens.len()
                            ),
                        );
                        if balance == Nat::from(tokens.len() as u64) {
                            outcome
                        } else {
                            outcome.with_assertion("balance does not match token count")
                        }
                    }
                    (Err(e), _) | (_, Err(e)) => {
                        checked(label, format!("balance of {} unavailable", actor))
                            .with_assertion(format!("query rejected with {}", e.discriminant()))
                    }
                };
                Ok(outcome)
            }
        }
    }
}

fn checked(label: String, detail: String) -> StepOutcome {
    StepOutcome::new(label, StepStatus::Checked { detail })
}

/// Map a ledger response onto a step status.
fn interpret<E: Rejection>(result: CallResult<Nat, E>) -> StepStatus {
    match result {
        Ok(id) => StepStatus::Committed { id },
        Err(rejection) => StepStatus::Rejected {
            reason: reason(&rejection),
            detail: rejection.to_string(),
        },
    }
}

fn reason<E: Rejection>(rejection: &E) -> String {
    rejection.discriminant().to_string()
}

/// Flag outcomes that contradict the step's expectation.
fn judge(outcome: StepOutcome, expect_success: bool) -> StepOutcome {
    let message = match (&outcome.status, expect_success) {
        (StepStatus::Rejected { reason, .. }, true) => {
            Some(format!("expected success, ledger rejected with {}", reason))
        }
        (StepStatus::Committed { id }, false) => {
            Some(format!("expected rejection, ledger committed id {}", id.0))
        }
        _ => None,
    };
    match message {
        Some(message) => outcome.with_assertion(message),
        None => outcome,
    }
}

fn log_mutation(outcome: &StepOutcome) {
    match &outcome.status {
        StepStatus::Committed { id } => {
            tracing::info!(step = %outcome.label, id = %id, "Mutation committed")
        }
        StepStatus::Rejected { reason, .. } => {
            tracing::warn!(step = %outcome.label, reason = %reason, "Mutation rejected")
        }
        _ => {}
    }
    if let Some(message) = &outcome.assertion {
        tracing::warn!(step = %outcome.label, message = %message, "Assertion failed");
    }
}

fn nats(token_ids: &[u64]) -> Vec<Nat> {
    token_ids.iter().copied().map(Nat::from).collect()
}

fn now_nanos() -> u64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .map(|n| n.max(0) as u64)
        .unwrap_or(0)
}
