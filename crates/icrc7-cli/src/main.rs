//! icrc7-demo - Drive an ICRC-7 ledger through a scripted scenario
//!
//! This CLI:
//! - Derives the demo actors from their seed phrases
//! - Connects them to a replica-hosted ledger or an in-memory one
//! - Runs the built-in demo or a scenario file, one line per step
//! - Reports steps whose outcome contradicts their expectation

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use config::{Backend, DemoConfig};
use error::CliResult;
use output::OutputFormat;

/// icrc7-demo CLI application
#[derive(Debug, Parser)]
#[command(name = "icrc7-demo")]
#[command(about = "Run scripted scenarios against an ICRC-7 NFT ledger", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ICRC7_DEMO_CONFIG", global = true)]
    config: Option<String>,

    /// Replica URL
    #[arg(long, global = true)]
    host: Option<String>,

    /// Ledger canister id
    #[arg(long, global = true)]
    canister_id: Option<String>,

    /// Ledger backend
    #[arg(short, long, value_enum, global = true)]
    backend: Option<Backend>,

    /// Scenario file (JSON or TOML) to run instead of the built-in demo
    #[arg(short, long, global = true)]
    scenario: Option<PathBuf>,

    /// Exit with status 1 when any step contradicts its expectation
    #[arg(long, global = true)]
    strict: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable JSON logging
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the scenario (default)
    Run,

    /// List the configured actors and their principals
    Actors {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    fn apply(&self, config: &mut DemoConfig) {
        if let Some(host) = &self.host {
            config.ledger.host = host.clone();
        }
        if let Some(canister_id) = &self.canister_id {
            config.ledger.canister_id = Some(canister_id.clone());
        }
        if let Some(backend) = self.backend {
            config.ledger.backend = backend;
        }
        if let Some(scenario) = &self.scenario {
            config.scenario.file = Some(scenario.clone());
        }
        if self.strict {
            config.scenario.strict = true;
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
        if self.log_json {
            config.logging.json = true;
        }
    }
}

fn init_tracing(config: &DemoConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().without_time())
            .init();
    }
}

async fn execute(cli: Cli) -> CliResult<ExitCode> {
    let mut config = DemoConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    init_tracing(&config);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let summary = commands::run::execute(&config).await?;
            if config.scenario.strict && !summary.passed() {
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Actors { output } => {
            commands::actors::execute(&config, output)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_run() {
        let cli = Cli::try_parse_from(["icrc7-demo"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.strict);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "icrc7-demo",
            "run",
            "--backend",
            "memory",
            "--strict",
            "--canister-id",
            "bkyz2-fmaaa-aaaaa-qaaaq-cai",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Run)));
        assert_eq!(cli.backend, Some(Backend::Memory));

        let mut config = DemoConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.ledger.backend, Backend::Memory);
        assert!(config.scenario.strict);
        assert_eq!(
            config.ledger.canister_id.as_deref(),
            Some("bkyz2-fmaaa-aaaaa-qaaaq-cai")
        );
    }

    #[test]
    fn test_verbose_and_json_logging() {
        let cli = Cli::try_parse_from(["icrc7-demo", "-v", "--log-json"]).unwrap();
        let mut config = DemoConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_actors_output_format() {
        let cli = Cli::try_parse_from(["icrc7-demo", "actors", "--output", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Actors {
                output: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["icrc7-demo", "--backend", "ethereum"]).is_err());
    }
}
