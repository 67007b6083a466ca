//! Built-in demo scenario
//!
//! Mints four tokens, moves them between holders, and exercises approvals
//! including the transfers a ledger must refuse.

use crate::step::{Check, Mutation, Query, Step};
use serde::{Deserialize, Serialize};

/// Actor names and seed phrases of the demo cast, in registration order.
///
/// The first actor deploys and owns the collection.
pub const DEFAULT_CAST: [(&str, &str); 4] = [
    (
        "Alice",
        "mother head idle deer harbor more clinic great shock faculty remove usual auto cheap hip omit future sleep remember sting admit chicken vendor shoe",
    ),
    (
        "Bob",
        "van mule skill beyond bread close fruit bench frame trade flight three elevator release pizza meadow message present stock act tenant morning tragic harsh",
    ),
    (
        "Chloe",
        "fantasy damp hockey item gallery action orient lonely husband broccoli worth rain door special limb tool ticket step crop honey siren bubble heavy pizza",
    ),
    (
        "Desmond",
        "act snow enable use valid green razor learn gap subway child finger fit search smile oxygen corn hollow fever tired use rack goat cluster",
    ),
];

/// Roles in the demo scenario, by actor name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoCast {
    /// Collection owner; the only actor allowed to mint
    pub minter: String,
    /// Receives tokens 1 and 2, later approved as spender
    pub holder: String,
    /// Receives tokens 3 and 4, then 1 and 2 from the holder
    pub recipient: String,
    /// Holds nothing; attempts an unapproved transfer
    pub outsider: String,
}

impl Default for DemoCast {
    fn default() -> Self {
        Self {
            minter: "Alice".to_string(),
            holder: "Bob".to_string(),
            recipient: "Chloe".to_string(),
            outsider: "Desmond".to_string(),
        }
    }
}

impl DemoCast {
    fn holders(&self) -> [&str; 3] {
        [
            self.holder.as_str(),
            self.recipient.as_str(),
            self.outsider.as_str(),
        ]
    }
}

/// Balance and token queries for every holder, each followed by a consistency
/// check. The minter holds nothing but is checked too.
fn holdings(cast: &DemoCast, steps: &mut Vec<Step>) {
    for actor in cast.holders() {
        steps.push(Step::query(Query::balance_of(actor)));
        steps.push(Step::query(Query::tokens_of(actor)));
        steps.push(Step::check(Check::balance_matches_tokens(actor)));
    }
    steps.push(Step::check(Check::balance_matches_tokens(cast.minter.as_str())));
}

/// The demo as a list of steps.
pub fn demo_scenario(cast: &DemoCast) -> Vec<Step> {
    let DemoCast {
        minter,
        holder,
        recipient,
        outsider,
    } = cast;
    let mut steps = Vec::new();

    steps.push(Step::section("Collection"));
    steps.extend([
        Step::query(Query::CollectionMetadata),
        Step::query(Query::Name),
        Step::query(Query::Symbol),
        Step::query(Query::Description),
        Step::query(Query::TotalSupply),
        Step::query(Query::Image),
    ]);

    steps.push(Step::section("Mint"));
    for (token_id, to) in [(1, holder), (2, holder), (3, recipient), (4, recipient)] {
        steps.push(Step::expect_ok(minter.as_str(), Mutation::mint(to.as_str(), token_id)));
    }
    steps.push(Step::query(Query::TotalSupply));
    for token_id in 1..=4 {
        steps.push(Step::query(Query::owner_of(token_id)));
    }
    for (token_id, owner) in [(1, holder), (2, holder), (3, recipient), (4, recipient)] {
        steps.push(Step::check(Check::owner_is(token_id, owner.as_str())));
    }
    holdings(cast, &mut steps);

    steps.push(Step::section(format!(
        "Transfer token 1 from {} to {}",
        holder, recipient
    )));
    steps.push(Step::expect_ok(
        holder.as_str(),
        Mutation::transfer_from(holder.as_str(), recipient.as_str(), &[1]),
    ));
    steps.push(Step::query(Query::owner_of(1)));
    steps.push(Step::check(Check::owner_is(1, recipient.as_str())));
    holdings(cast, &mut steps);

    steps.push(Step::section(format!(
        "Transfer token 2 from {} to {} without naming the source",
        holder, recipient
    )));
    steps.push(Step::expect_ok(
        holder.as_str(),
        Mutation::transfer(recipient.as_str(), &[2]),
    ));
    steps.push(Step::query(Query::owner_of(2)));
    steps.push(Step::check(Check::owner_is(2, recipient.as_str())));
    holdings(cast, &mut steps);

    steps.push(Step::section(format!(
        "{} no longer holds token 1",
        holder
    )));
    steps.push(Step::expect_rejection(
        holder.as_str(),
        Mutation::transfer(outsider.as_str(), &[1]),
    ));
    steps.push(Step::expect_rejection(
        holder.as_str(),
        Mutation::transfer_from(holder.as_str(), outsider.as_str(), &[1]),
    ));
    steps.push(Step::check(Check::owner_is(1, recipient.as_str())));
    holdings(cast, &mut steps);

    steps.push(Step::section(format!(
        "{} approves {} for token 1",
        recipient, holder
    )));
    steps.push(Step::expect_ok(
        recipient.as_str(),
        Mutation::approve(holder.as_str(), &[1]),
    ));
    steps.push(Step::check(Check::owner_is(1, recipient.as_str())));

    steps.push(Step::section(format!(
        "{} is not approved for token 1",
        outsider
    )));
    steps.push(Step::expect_rejection(
        outsider.as_str(),
        Mutation::transfer_from(recipient.as_str(), outsider.as_str(), &[1]),
    ));
    steps.push(Step::check(Check::owner_is(1, recipient.as_str())));
    holdings(cast, &mut steps);

    steps.push(Step::section(format!(
        "{} transfers token 1 from {} to {} as approved spender",
        holder, recipient, outsider
    )));
    steps.push(Step::expect_ok(
        holder.as_str(),
        Mutation::transfer_from(recipient.as_str(), outsider.as_str(), &[1]),
    ));
    steps.push(Step::query(Query::owner_of(1)));
    steps.push(Step::check(Check::owner_is(1, outsider.as_str())));
    holdings(cast, &mut steps);

    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mutations(steps: &[Step]) -> Vec<(String, Mutation, bool)> {
        steps
            .iter()
            .filter_map(|step| match step {
                Step::Mutate {
                    actor,
                    call,
                    expect_success,
                } => Some((actor.clone(), call.clone(), *expect_success)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_demo_mutation_order() {
        let steps = demo_scenario(&DemoCast::default());
        let calls = mutations(&steps);

        let expected = vec![
            ("Alice", Mutation::mint("Bob", 1), true),
            ("Alice", Mutation::mint("Bob", 2), true),
            ("Alice", Mutation::mint("Chloe", 3), true),
            ("Alice", Mutation::mint("Chloe", 4), true),
            ("Bob", Mutation::transfer_from("Bob", "Chloe", &[1]), true),
            ("Bob", Mutation::transfer("Chloe", &[2]), true),
            ("Bob", Mutation::transfer("Desmond", &[1]), false),
            ("Bob", Mutation::transfer_from("Bob", "Desmond", &[1]), false),
            ("Chloe", Mutation::approve("Bob", &[1]), true),
            ("Desmond", Mutation::transfer_from("Chloe", "Desmond", &[1]), false),
            ("Bob", Mutation::transfer_from("Chloe", "Desmond", &[1]), true),
        ];
        let expected: Vec<_> = expected
            .into_iter()
            .map(|(actor, call, ok)| (actor.to_string(), call, ok))
            .collect();

        assert_eq!(calls, expected);
    }

    #[test]
    fn test_every_mutation_is_followed_by_a_check() {
        let steps = demo_scenario(&DemoCast::default());
        for (index, step) in steps.iter().enumerate() {
            if matches!(step, Step::Mutate { .. }) {
                let rest = &steps[index + 1..];
                assert!(
                    rest.iter().any(|s| matches!(s, Step::Check(_))),
                    "no check after step {}",
                    step.label()
                );
            }
        }
    }

    #[test]
    fn test_every_actor_gets_a_balance_check() {
        let steps = demo_scenario(&DemoCast::default());
        for name in ["Alice", "Bob", "Chloe", "Desmond"] {
            assert!(
                steps.contains(&Step::check(Check::balance_matches_tokens(name))),
                "no balance check for {}",
                name
            );
        }
    }

    #[test]
    fn test_cast_renaming() {
        let cast = DemoCast {
            minter: "Minter".into(),
            holder: "H".into(),
            recipient: "R".into(),
            outsider: "O".into(),
        };
        let steps = demo_scenario(&cast);
        let calls = mutations(&steps);
        assert!(calls.iter().all(|(actor, _, _)| ["Minter", "H", "R", "O"].contains(&actor.as_str())));
        assert!(!steps.iter().any(|s| s.label().contains("Alice")));
    }

    #[test]
    fn test_default_cast_names() {
        let names: Vec<_> = DEFAULT_CAST.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["Alice", "Bob", "Chloe", "Desmond"]);
    }
}
