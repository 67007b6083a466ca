//! Configuration for icrc7-demo

use icrc7_client::DEFAULT_HOST;
use icrc7_scenario::{DemoCast, DEFAULT_CAST, DEFAULT_IMAGE_URL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Ledger connection
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Mint metadata
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Actors, registered in order
    #[serde(default = "default_actors")]
    pub actors: Vec<ActorConfig>,

    /// Scenario selection and policy
    #[serde(default)]
    pub scenario: ScenarioConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            metadata: MetadataConfig::default(),
            actors: default_actors(),
            scenario: ScenarioConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Which ledger the scenario runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A deployed canister reached through a replica
    Replica,
    /// A ledger living in this process
    Memory,
}

/// Ledger connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// Replica URL
    #[serde(default = "default_host")]
    pub host: String,

    /// Ledger canister id; read from `canister_ids_path` when unset
    #[serde(default)]
    pub canister_id: Option<String>,

    /// dfx canister id file
    #[serde(default = "default_canister_ids_path")]
    pub canister_ids_path: PathBuf,

    /// Entry in the canister id file
    #[serde(default = "default_canister_name")]
    pub canister_name: String,

    /// Network in the canister id file
    #[serde(default = "default_network")]
    pub network: String,

    /// Fetch the replica root key; only for local replicas
    #[serde(default = "default_true")]
    pub fetch_root_key: bool,

    /// Per-call timeout in seconds
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            host: default_host(),
            canister_id: None,
            canister_ids_path: default_canister_ids_path(),
            canister_name: default_canister_name(),
            network: default_network(),
            fetch_root_key: true,
            call_timeout_secs: default_call_timeout(),
        }
    }
}

impl LedgerConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

/// Mint metadata configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Embed the image at `image_url` in every minted token
    #[serde(default = "default_true")]
    pub embed_image: bool,

    #[serde(default = "default_image_url")]
    pub image_url: String,

    /// Image download timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            embed_image: true,
            image_url: default_image_url(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl MetadataConfig {
    /// Image URL to embed, if any
    pub fn image(&self) -> Option<String> {
        self.embed_image.then(|| self.image_url.clone())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// A named actor and its seed phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorConfig {
    pub name: String,
    pub seed_phrase: String,
}

/// Scenario configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Actor issuing every query and check
    #[serde(default = "default_observer")]
    pub observer: String,

    /// Roles in the built-in demo
    #[serde(default)]
    pub cast: DemoCast,

    /// JSON or TOML scenario to run instead of the built-in demo
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Exit non-zero when any step contradicts its expectation
    #[serde(default)]
    pub strict: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            observer: default_observer(),
            cast: DemoCast::default(),
            file: None,
            strict: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_backend() -> Backend {
    Backend::Replica
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_canister_ids_path() -> PathBuf {
    PathBuf::from(".dfx/local/canister_ids.json")
}

fn default_canister_name() -> String {
    "icrc7".to_string()
}

fn default_network() -> String {
    "local".to_string()
}

fn default_call_timeout() -> u64 {
    60
}

fn default_image_url() -> String {
    DEFAULT_IMAGE_URL.to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_actors() -> Vec<ActorConfig> {
    DEFAULT_CAST
        .iter()
        .map(|(name, seed_phrase)| ActorConfig {
            name: name.to_string(),
            seed_phrase: seed_phrase.to_string(),
        })
        .collect()
}

fn default_observer() -> String {
    "Desmond".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DemoConfig {
    /// Load configuration: defaults, then the file at `path`, then
    /// `ICRC7_DEMO_*` environment variables (`__` separates sections).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&DemoConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("ICRC7_DEMO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Seed phrase of the named actor
    pub fn seed_phrase(&self, name: &str) -> Option<&str> {
        self.actors
            .iter()
            .find(|actor| actor.name == name)
            .map(|actor| actor.seed_phrase.as_str())
    }
}
