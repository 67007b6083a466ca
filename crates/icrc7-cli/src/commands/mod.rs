//! Command implementations

pub mod actors;
pub mod run;

use crate::config::{Backend, DemoConfig};
use crate::error::{CliError, CliResult};
use icrc7_client::{resolve_canister_id, InMemoryLedger, LedgerConnector, ReplicaConnector, SeedIdentity};

/// Derive the identity of a configured actor
pub fn identity_of(config: &DemoConfig, name: &str) -> CliResult<SeedIdentity> {
    let seed_phrase = config
        .seed_phrase(name)
        .ok_or_else(|| CliError::Config(format!("no actor named '{}' is configured", name)))?;
    SeedIdentity::from_seed_phrase(seed_phrase).map_err(|source| CliError::Identity {
        actor: name.to_string(),
        source,
    })
}

/// Build the ledger connector selected by the configuration
pub fn connector(config: &DemoConfig) -> CliResult<Box<dyn LedgerConnector>> {
    let ledger = &config.ledger;
    match ledger.backend {
        Backend::Replica => {
            let canister_id = resolve_canister_id(
                ledger.canister_id.as_deref(),
                &ledger.canister_ids_path,
                &ledger.canister_name,
                &ledger.network,
            )?;
            tracing::info!(host = %ledger.host, canister_id = %canister_id, "Using replica ledger");
            Ok(Box::new(
                ReplicaConnector::new(&ledger.host, canister_id)
                    .fetch_root_key(ledger.fetch_root_key)
                    .call_timeout(ledger.call_timeout()),
            ))
        }
        Backend::Memory => {
            let minter = identity_of(config, &config.scenario.cast.minter)?.principal();
            tracing::info!(minter = %minter, "Using in-memory ledger");
            Ok(Box::new(InMemoryLedger::new(minter)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_connector() {
        let mut config = DemoConfig::default();
        config.ledger.backend = Backend::Memory;
        let connector = connector(&config).unwrap();
        assert_eq!(connector.endpoint(), "in-memory ledger");
    }

    #[test]
    fn test_replica_connector_with_explicit_id() {
        let mut config = DemoConfig::default();
        config.ledger.canister_id = Some("bkyz2-fmaaa-aaaaa-qaaaq-cai".into());
        let connector = connector(&config).unwrap();
        assert!(connector.endpoint().contains("bkyz2-fmaaa-aaaaa-qaaaq-cai"));
    }

    #[test]
    fn test_replica_connector_without_id_fails() {
        let mut config = DemoConfig::default();
        config.ledger.canister_ids_path = "/nonexistent/canister_ids.json".into();
        assert!(matches!(connector(&config), Err(CliError::Client(_))));
    }

    #[test]
    fn test_unknown_minter() {
        let mut config = DemoConfig::default();
        config.ledger.backend = Backend::Memory;
        config.scenario.cast.minter = "Mallory".into();
        assert!(matches!(connector(&config), Err(CliError::Config(_))));
    }
}
