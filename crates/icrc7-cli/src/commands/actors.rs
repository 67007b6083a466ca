//! `actors` command: list the configured cast

use super::identity_of;
use crate::config::DemoConfig;
use crate::error::CliResult;
use crate::output::{print_output, OutputFormat};
use serde::Serialize;
use tabled::Tabled;

/// Table row for actor display
#[derive(Debug, Serialize, Tabled)]
pub struct ActorRow {
    /// Actor name
    pub name: String,
    /// Principal derived from the seed phrase
    pub principal: String,
    /// Role in the run
    pub role: String,
}

/// Derive every configured actor's principal without contacting the ledger.
pub fn rows(config: &DemoConfig) -> CliResult<Vec<ActorRow>> {
    config
        .actors
        .iter()
        .map(|actor| {
            let identity = identity_of(config, &actor.name)?;
            Ok(ActorRow {
                name: actor.name.clone(),
                principal: identity.principal().to_text(),
                role: role(config, &actor.name),
            })
        })
        .collect()
}

fn role(config: &DemoConfig, name: &str) -> String {
    let cast = &config.scenario.cast;
    let mut roles: Vec<&str> = [
        (&cast.minter, "minter"),
        (&cast.holder, "holder"),
        (&cast.recipient, "recipient"),
        (&cast.outsider, "outsider"),
    ]
    .into_iter()
    .filter(|(actor, _)| actor.as_str() == name)
    .map(|(_, role)| role)
    .collect();
    if config.scenario.observer == name {
        roles.push("observer");
    }
    if roles.is_empty() {
        "-".to_string()
    } else {
        roles.join(", ")
    }
}

/// Execute the actors command
pub fn execute(config: &DemoConfig, format: OutputFormat) -> CliResult<()> {
    print_output(rows(config)?, format)?;
    Ok(())
}
