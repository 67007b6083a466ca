//! Scenario steps
//!
//! A scenario is a declarative list of steps. Actors are referenced by name
//! and resolved against the registry when the step runs. Steps deserialize
//! from JSON or TOML so scenarios can live outside the binary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of work in a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Titled banner separating parts of a scenario
    Section(String),

    /// Read-only call issued by the observer actor
    Query(Query),

    /// Ledger mutation issued by `actor`, expected to succeed or be rejected
    Mutate {
        actor: String,
        call: Mutation,
        expect_success: bool,
    },

    /// Re-query the ledger and compare against an expected state
    Check(Check),
}

impl Step {
    pub fn section(title: impl Into<String>) -> Self {
        Step::Section(title.into())
    }

    pub fn query(query: Query) -> Self {
        Step::Query(query)
    }

    /// Mutation expected to commit
    pub fn expect_ok(actor: impl Into<String>, call: Mutation) -> Self {
        Step::Mutate {
            actor: actor.into(),
            call,
            expect_success: true,
        }
    }

    /// Mutation expected to be rejected by the ledger
    pub fn expect_rejection(actor: impl Into<String>, call: Mutation) -> Self {
        Step::Mutate {
            actor: actor.into(),
            call,
            expect_success: false,
        }
    }

    pub fn check(check: Check) -> Self {
        Step::Check(check)
    }

    /// Short human-readable description
    pub fn label(&self) -> String {
        match self {
            Step::Section(title) => title.clone(),
            Step::Query(query) => query.to_string(),
            Step::Mutate { actor, call, .. } => format!("{} {}", actor, call),
            Step::Check(check) => check.to_string(),
        }
    }
}

/// Read-only ledger calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Query {
    CollectionMetadata,
    Name,
    Symbol,
    Description,
    Image,
    TotalSupply,
    OwnerOf { token_id: u64 },
    BalanceOf { actor: String },
    TokensOf { actor: String },
}

impl Query {
    pub fn owner_of(token_id: u64) -> Self {
        Query::OwnerOf { token_id }
    }

    pub fn balance_of(actor: impl Into<String>) -> Self {
        Query::BalanceOf {
            actor: actor.into(),
        }
    }

    pub fn tokens_of(actor: impl Into<String>) -> Self {
        Query::TokensOf {
            actor: actor.into(),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::CollectionMetadata => write!(f, "collection_metadata"),
            Query::Name => write!(f, "name"),
            Query::Symbol => write!(f, "symbol"),
            Query::Description => write!(f, "description"),
            Query::Image => write!(f, "image"),
            Query::TotalSupply => write!(f, "total_supply"),
            Query::OwnerOf { token_id } => write!(f, "owner_of({})", token_id),
            Query::BalanceOf { actor } => write!(f, "balance_of({})", actor),
            Query::TokensOf { actor } => write!(f, "tokens_of({})", actor),
        }
    }
}

/// Ledger mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Mutation {
    /// Mint `token_id` to `to` with generated metadata
    Mint { to: String, token_id: u64 },

    /// Transfer tokens to `to`; `from: None` transfers from the caller
    Transfer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        to: String,
        token_ids: Vec<u64>,
    },

    /// Approve `spender` for tokens held by the caller
    Approve {
        spender: String,
        token_ids: Vec<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expires_in_secs: Option<u64>,
    },
}

impl Mutation {
    pub fn mint(to: impl Into<String>, token_id: u64) -> Self {
        Mutation::Mint {
            to: to.into(),
            token_id,
        }
    }

    /// Transfer naming the source account explicitly
    pub fn transfer_from(from: impl Into<String>, to: impl Into<String>, token_ids: &[u64]) -> Self {
        Mutation::Transfer {
            from: Some(from.into()),
            to: to.into(),
            token_ids: token_ids.to_vec(),
        }
    }

    /// Transfer from the caller's own account
    pub fn transfer(to: impl Into<String>, token_ids: &[u64]) -> Self {
        Mutation::Transfer {
            from: None,
            to: to.into(),
            token_ids: token_ids.to_vec(),
        }
    }

    pub fn approve(spender: impl Into<String>, token_ids: &[u64]) -> Self {
        Mutation::Approve {
            spender: spender.into(),
            token_ids: token_ids.to_vec(),
            expires_in_secs: None,
        }
    }
}

fn ids(token_ids: &[u64]) -> String {
    token_ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Mint { to, token_id } => write!(f, "mints token {} to {}", token_id, to),
            Mutation::Transfer {
                from: Some(from),
                to,
                token_ids,
            } => write!(f, "transfers [{}] from {} to {}", ids(token_ids), from, to),
            Mutation::Transfer {
                from: None,
                to,
                token_ids,
            } => write!(f, "transfers [{}] to {}", ids(token_ids), to),
            Mutation::Approve {
                spender, token_ids, ..
            } => write!(f, "approves {} for [{}]", spender, ids(token_ids)),
        }
    }
}

/// Expected ledger state, verified by re-querying
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// `owner_of(token_id)` is the default account of `actor`
    OwnerIs { token_id: u64, actor: String },

    /// `balance_of(actor)` equals the length of `tokens_of(actor)`
    BalanceMatchesTokens { actor: String },
}

impl Check {
    pub fn owner_is(token_id: u64, actor: impl Into<String>) -> Self {
        Check::OwnerIs {
            token_id,
            actor: actor.into(),
        }
    }

    pub fn balance_matches_tokens(actor: impl Into<String>) -> Self {
        Check::BalanceMatchesTokens {
            actor: actor.into(),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::OwnerIs { token_id, actor } => {
                write!(f, "check owner_of({}) is {}", token_id, actor)
            }
            Check::BalanceMatchesTokens { actor } => {
                write!(f, "check balance_of({}) matches tokens_of({})", actor, actor)
            }
        }
    }
}

/// A scenario as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioFile {
    pub steps: Vec<Step>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Step::section("Mint").label(), "Mint");
        assert_eq!(Step::query(Query::owner_of(3)).label(), "owner_of(3)");
        assert_eq!(
            Step::expect_ok("Bob", Mutation::transfer_from("Bob", "Chloe", &[1])).label(),
            "Bob transfers [1] from Bob to Chloe"
        );
        assert_eq!(
            Step::expect_ok("Bob", Mutation::transfer("Chloe", &[1, 2])).label(),
            "Bob transfers [1,2] to Chloe"
        );
        assert_eq!(
            Step::expect_ok("Chloe", Mutation::approve("Bob", &[1])).label(),
            "Chloe approves Bob for [1]"
        );
        assert_eq!(
            Step::check(Check::owner_is(1, "Chloe")).label(),
            "check owner_of(1) is Chloe"
        );
    }

    #[test]
    fn test_expectation_constructors() {
        let ok = Step::expect_ok("Alice", Mutation::mint("Bob", 1));
        let rejected = Step::expect_rejection("Alice", Mutation::mint("Bob", 1));
        assert!(matches!(ok, Step::Mutate { expect_success: true, .. }));
        assert!(matches!(
            rejected,
            Step::Mutate {
                expect_success: false,
                ..
            }
        ));
    }

    #[test]
    fn test_steps_from_json() {
        let json = r#"{
            "steps": [
                { "section": "Transfers" },
                { "query": { "method": "owner_of", "token_id": 1 } },
                { "query": { "method": "total_supply" } },
                { "mutate": {
                    "actor": "Bob",
                    "call": { "method": "transfer", "to": "Chloe", "token_ids": [1] },
                    "expect_success": true
                } },
                { "check": { "kind": "owner_is", "token_id": 1, "actor": "Chloe" } }
            ]
        }"#;

        let file: ScenarioFile = serde_json::from_str(json).unwrap();
        assert_eq!(
            file.steps,
            vec![
                Step::section("Transfers"),
                Step::query(Query::owner_of(1)),
                Step::query(Query::TotalSupply),
                Step::expect_ok("Bob", Mutation::transfer("Chloe", &[1])),
                Step::check(Check::owner_is(1, "Chloe")),
            ]
        );
    }

    #[test]
    fn test_approve_expiry_defaults_to_none() {
        let json = r#"{ "method": "approve", "spender": "Bob", "token_ids": [1] }"#;
        let call: Mutation = serde_json::from_str(json).unwrap();
        assert_eq!(call, Mutation::approve("Bob", &[1]));
    }
}
