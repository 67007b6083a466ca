//! Step outcomes and run summaries

use crate::actor::NOBODY;
use icrc7_types::{CollectionMetadata, Nat};
use std::fmt;

/// Result of running one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Step label, as produced by `Step::label`
    pub label: String,
    pub status: StepStatus,
    /// Set when the ledger disagreed with the step's expectation
    pub assertion: Option<String>,
}

impl StepOutcome {
    pub fn new(label: impl Into<String>, status: StepStatus) -> Self {
        Self {
            label: label.into(),
            status,
            assertion: None,
        }
    }

    pub fn with_assertion(mut self, message: impl Into<String>) -> Self {
        self.assertion = Some(message.into());
        self
    }

    pub fn is_assertion_failure(&self) -> bool {
        self.assertion.is_some()
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            StepStatus::Section => write!(f, "== {} ==", self.label)?,
            StepStatus::Observed(observation) => write!(f, "{}", observation)?,
            status => write!(f, "{}: {}", self.label, status)?,
        }
        if let Some(message) = &self.assertion {
            write!(f, " (assertion failed: {})", message)?;
        }
        Ok(())
    }
}

/// What happened when a step ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Section,

    /// Query result
    Observed(Observation),

    /// Mutation accepted; `id` is the returned token or transaction id
    Committed { id: Nat },

    /// Mutation rejected by the ledger
    Rejected { reason: String, detail: String },

    /// Step not attempted
    Skipped { reason: String },

    /// Check passed or failed; see `StepOutcome::assertion`
    Checked { detail: String },
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Section => write!(f, "section"),
            StepStatus::Observed(observation) => write!(f, "{}", observation),
            StepStatus::Committed { id } => write!(f, "ok, id {}", id.0),
            StepStatus::Rejected { reason, detail } => {
                write!(f, "rejected with {} ({})", reason, detail)
            }
            StepStatus::Skipped { reason } => write!(f, "skipped: {}", reason),
            StepStatus::Checked { detail } => write!(f, "{}", detail),
        }
    }
}

/// Query results with principals resolved to actor names.
///
/// `Err` holds the rejection discriminant of a rejected query. A rejected
/// owner query is shown as owned by nobody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    Collection(CollectionMetadata),
    Name(String),
    Symbol(String),
    Description(Option<String>),
    Image(Option<String>),
    TotalSupply(Nat),
    Owner {
        token_id: u64,
        owner: Result<String, String>,
    },
    Balance {
        actor: String,
        balance: Result<Nat, String>,
    },
    Tokens {
        actor: String,
        tokens: Result<Vec<Nat>, String>,
    },
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("none")
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observation::Collection(meta) => {
                write!(
                    f,
                    "Collection metadata: name {}, symbol {}, description {}, total supply {}, image {}",
                    meta.name,
                    meta.symbol,
                    or_none(&meta.description),
                    meta.total_supply.0,
                    or_none(&meta.image),
                )?;
                if let Some(cap) = &meta.supply_cap {
                    write!(f, ", supply cap {}", cap.0)?;
                }
                Ok(())
            }
            Observation::Name(name) => write!(f, "Collection name: {}", name),
            Observation::Symbol(symbol) => write!(f, "Collection symbol: {}", symbol),
            Observation::Description(description) => {
                write!(f, "Collection description: {}", or_none(description))
            }
            Observation::Image(image) => write!(f, "Collection image: {}", or_none(image)),
            Observation::TotalSupply(supply) => write!(f, "Total supply is {}", supply.0),
            Observation::Owner { token_id, owner } => match owner {
                Ok(name) => write!(f, "Owner of token {} is {}", token_id, name),
                Err(reason) => write!(f, "Owner of token {} is {} ({})", token_id, NOBODY, reason),
            },
            Observation::Balance { actor, balance } => match balance {
                Ok(n) => write!(f, "Balance of {} is {}", actor, n.0),
                Err(reason) => write!(f, "Balance of {} unavailable: {}", actor, reason),
            },
            Observation::Tokens { actor, tokens } => match tokens {
                Ok(ids) => {
                    let ids = ids
                        .iter()
                        .map(|id| id.0.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "Tokens of {}: [{}]", actor, ids)
                }
                Err(reason) => write!(f, "Tokens of {} unavailable: {}", actor, reason),
            },
        }
    }
}

/// Counts over a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub steps: usize,
    pub queries: usize,
    pub committed: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub checks: usize,
    /// `label: message` for every failed expectation, in run order
    pub assertion_failures: Vec<String>,
}

impl ScenarioSummary {
    pub fn record(&mut self, outcome: &StepOutcome) {
        match &outcome.status {
            StepStatus::Section => return,
            StepStatus::Observed(_) => self.queries += 1,
            StepStatus::Committed { .. } => self.committed += 1,
            StepStatus::Rejected { .. } => self.rejected += 1,
            StepStatus::Skipped { .. } => self.skipped += 1,
            StepStatus::Checked { .. } => self.checks += 1,
        }
        self.steps += 1;
        if let Some(message) = &outcome.assertion {
            self.assertion_failures
                .push(format!("{}: {}", outcome.label, message));
        }
    }

    /// No expectation was violated
    pub fn passed(&self) -> bool {
        self.assertion_failures.is_empty()
    }
}

impl fmt::Display for ScenarioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} steps: {} queries, {} committed, {} rejected, {} skipped, {} checks, {} assertion failures",
            self.steps,
            self.queries,
            self.committed,
            self.rejected,
            self.skipped,
            self.checks,
            self.assertion_failures.len()
        )
    }
}
