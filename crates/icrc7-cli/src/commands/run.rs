//! `run` command: play a scenario against the configured ledger

use crate::config::DemoConfig;
use crate::error::CliResult;
use crate::output::{print_outcome, print_summary};
use icrc7_scenario::{
    demo_scenario, ActorRegistry, MetadataBuilder, ScenarioFile, ScenarioRunner, ScenarioSummary,
    Step,
};
use std::path::Path;
use std::sync::Arc;

/// Steps to run: the configured scenario file, or the built-in demo.
pub fn load_steps(config: &DemoConfig) -> CliResult<Vec<Step>> {
    match &config.scenario.file {
        Some(path) => read_scenario(path),
        None => Ok(demo_scenario(&config.scenario.cast)),
    }
}

fn read_scenario(path: &Path) -> CliResult<Vec<Step>> {
    let raw = std::fs::read_to_string(path)?;
    let file: ScenarioFile = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&raw)?,
        _ => serde_json::from_str(&raw)?,
    };
    tracing::debug!(path = %path.display(), steps = file.steps.len(), "Loaded scenario file");
    Ok(file.steps)
}

/// Execute the run command, printing each outcome as it completes.
pub async fn execute(config: &DemoConfig) -> CliResult<ScenarioSummary> {
    let steps = load_steps(config)?;
    let connector = super::connector(config)?;

    let cast = config
        .actors
        .iter()
        .map(|actor| (actor.name.as_str(), actor.seed_phrase.as_str()));
    let actors = ActorRegistry::register_all(cast, connector.as_ref()).await?;

    let metadata = MetadataBuilder::new(config.metadata.image(), config.metadata.fetch_timeout())?;
    let runner = ScenarioRunner::new(Arc::new(actors), &config.scenario.observer, metadata)?;

    let summary = runner.run_scenario(steps, print_outcome).await?;
    print_summary(&summary);
    Ok(summary)
}
