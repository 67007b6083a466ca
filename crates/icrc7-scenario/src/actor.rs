//! Actors and the actor registry
//!
//! An actor is a named participant bound to one seed-phrase identity and one
//! ledger client. The registry is built once at startup and never changes.

use crate::error::{ScenarioError, ScenarioResult};
use icrc7_client::{LedgerClient, LedgerConnector, SeedIdentity};
use icrc7_types::{Account, Principal};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name shown for an owner the ledger refused to report
pub const NOBODY: &str = "nobody";

/// A named participant in a scenario
#[derive(Clone)]
pub struct Actor {
    name: String,
    identity: SeedIdentity,
    client: Arc<dyn LedgerClient>,
}

impl Actor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn principal(&self) -> Principal {
        self.identity.principal()
    }

    /// Default account of this actor
    pub fn account(&self) -> Account {
        Account::new(self.principal())
    }

    /// Ledger client signing as this actor
    pub fn client(&self) -> &dyn LedgerClient {
        self.client.as_ref()
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.name)
            .field("principal", &self.principal().to_text())
            .finish_non_exhaustive()
    }
}

/// Derive an actor's identity from its seed phrase and bind a ledger client.
pub async fn register_actor(
    name: &str,
    seed_phrase: &str,
    connector: &dyn LedgerConnector,
) -> ScenarioResult<Actor> {
    let identity =
        SeedIdentity::from_seed_phrase(seed_phrase).map_err(|source| ScenarioError::Identity {
            actor: name.to_string(),
            source,
        })?;
    let client = connector.connect(identity.identity()).await?;

    tracing::info!(
        actor = name,
        principal = %identity.principal(),
        endpoint = %connector.endpoint(),
        "Registered actor"
    );

    Ok(Actor {
        name: name.to_string(),
        identity,
        client,
    })
}

/// Immutable name and principal lookup over the cast
#[derive(Debug)]
pub struct ActorRegistry {
    actors: Vec<Actor>,
    by_name: HashMap<String, usize>,
    by_principal: HashMap<Principal, usize>,
}

impl ActorRegistry {
    /// Build a registry, rejecting an empty cast and duplicate names or principals.
    pub fn new(actors: Vec<Actor>) -> ScenarioResult<Self> {
        if actors.is_empty() {
            return Err(ScenarioError::EmptyRegistry);
        }

        let mut by_name = HashMap::with_capacity(actors.len());
        let mut by_principal = HashMap::with_capacity(actors.len());
        for (index, actor) in actors.iter().enumerate() {
            if by_name.insert(actor.name.clone(), index).is_some() {
                return Err(ScenarioError::DuplicateActor(actor.name.clone()));
            }
            if let Some(previous) = by_principal.insert(actor.principal(), index) {
                return Err(ScenarioError::DuplicateActor(format!(
                    "{} shares a seed phrase with {}",
                    actor.name, actors[previous].name
                )));
            }
        }

        Ok(Self {
            actors,
            by_name,
            by_principal,
        })
    }

    /// Register every `(name, seed_phrase)` pair in order.
    pub async fn register_all<'a, I>(cast: I, connector: &dyn LedgerConnector) -> ScenarioResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut actors = Vec::new();
        for (name, seed_phrase) in cast {
            actors.push(register_actor(name, seed_phrase, connector).await?);
        }
        Self::new(actors)
    }

    pub fn get(&self, name: &str) -> ScenarioResult<&Actor> {
        self.by_name
            .get(name)
            .map(|&index| &self.actors[index])
            .ok_or_else(|| ScenarioError::UnknownActor(name.to_string()))
    }

    pub fn name_of(&self, principal: &Principal) -> Option<&str> {
        self.by_principal
            .get(principal)
            .map(|&index| self.actors[index].name.as_str())
    }

    /// Actor name for an account, or the account text when it is not a
    /// known actor's default account.
    pub fn display_account(&self, account: &Account) -> String {
        match self.name_of(&account.owner) {
            Some(name) if account.normalized().subaccount.is_none() => name.to_string(),
            _ => account.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icrc7_client::InMemoryLedger;

    const ALICE: &str = "mother head idle deer harbor more clinic great shock faculty remove usual auto cheap hip omit future sleep remember sting admit chicken vendor shoe";
    const BOB: &str = "van mule skill beyond bread close fruit bench frame trade flight three elevator release pizza meadow message present stock act tenant morning tragic harsh";

    fn ledger() -> InMemoryLedger {
        InMemoryLedger::new(Principal::anonymous())
    }

    #[tokio::test]
    async fn test_register_actor_binds_client_to_identity() {
        let ledger = ledger();
        let alice = register_actor("Alice", ALICE, &ledger).await.unwrap();
        assert_eq!(alice.name(), "Alice");
        assert_eq!(alice.client().caller(), alice.principal());
        assert_eq!(alice.account(), Account::new(alice.principal()));
    }

    #[tokio::test]
    async fn test_register_actor_rejects_bad_seed() {
        let err = register_actor("Mallory", "not a seed phrase", &ledger())
            .await
            .unwrap_err();
        match err {
            ScenarioError::Identity { actor, .. } => assert_eq!(actor, "Mallory"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_registry_lookup() {
        let registry = ActorRegistry::register_all([("Alice", ALICE), ("Bob", BOB)], &ledger())
            .await
            .unwrap();
        assert_eq!(registry.len(), 2);

        let bob = registry.get("Bob").unwrap();
        assert_eq!(registry.name_of(&bob.principal()), Some("Bob"));
        assert_eq!(registry.display_account(&bob.account()), "Bob");
        assert!(matches!(
            registry.get("bob"),
            Err(ScenarioError::UnknownActor(_))
        ));
    }

    #[tokio::test]
    async fn test_display_account_falls_back_to_text() {
        let registry = ActorRegistry::register_all([("Alice", ALICE)], &ledger())
            .await
            .unwrap();
        let alice = registry.get("Alice").unwrap().principal();

        let stranger = Account::new(Principal::anonymous());
        assert_eq!(registry.display_account(&stranger), stranger.to_string());

        let sub = Account::with_subaccount(alice, vec![1; 32]);
        assert_eq!(registry.display_account(&sub), sub.to_string());

        let zero_sub = Account::with_subaccount(alice, vec![0; 32]);
        assert_eq!(registry.display_account(&zero_sub), "Alice");
    }

    #[tokio::test]
    async fn test_registry_rejects_duplicates_and_empty() {
        let ledger = ledger();
        let duplicate_name =
            ActorRegistry::register_all([("Alice", ALICE), ("Alice", BOB)], &ledger).await;
        assert!(matches!(
            duplicate_name,
            Err(ScenarioError::DuplicateActor(name)) if name == "Alice"
        ));

        let shared_seed =
            ActorRegistry::register_all([("Alice", ALICE), ("Eve", ALICE)], &ledger).await;
        assert!(matches!(shared_seed, Err(ScenarioError::DuplicateActor(_))));

        assert!(matches!(
            ActorRegistry::new(Vec::new()),
            Err(ScenarioError::EmptyRegistry)
        ));
    }
}
