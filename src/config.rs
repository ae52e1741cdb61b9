//! Configuration for the dispatch and polling subsystem
//!
//! Settings come from a TOML file; credentials come from the process
//! environment at startup. Missing credentials are a fatal startup error,
//! never a runtime error.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub marketplace: MarketplaceSection,
    #[serde(default)]
    pub poll: PollSection,
    #[serde(default)]
    pub task: TaskDefaults,
}

/// Marketplace endpoint and credential sources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketplaceSection {
    /// Marketplace endpoint URL
    pub endpoint: String,
    /// Service name used in the signing payload
    #[serde(default = "default_service")]
    pub service: String,
    /// Wire protocol version sent with every request
    #[serde(default = "default_version")]
    pub version: String,
    /// Environment variable containing the access key id
    #[serde(default = "default_access_key_env")]
    pub access_key_env: String,
    /// Environment variable containing the secret key
    #[serde(default = "default_secret_key_env")]
    pub secret_key_env: String,
    /// HTTP request timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_service() -> String {
    "AWSMechanicalTurkRequester".to_string()
}

fn default_version() -> String {
    "2012-03-25".to_string()
}

fn default_access_key_env() -> String {
    "MARKETPLACE_ACCESS_KEY".to_string()
}

fn default_secret_key_env() -> String {
    "MARKETPLACE_SECRET_KEY".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

/// Completion-polling policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollSection {
    /// Seconds between result polls (default: 60)
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
}

fn default_tick_secs() -> u64 {
    60
}

impl Default for PollSection {
    fn default() -> Self {
        Self {
            tick_secs: default_tick_secs(),
        }
    }
}

impl PollSection {
    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }
}

/// Policy defaults applied to every dispatched task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskDefaults {
    /// Reward per assignment, as a decimal string (e.g. "0.15")
    pub reward_amount: String,
    /// Reward currency code
    pub reward_currency: String,
    /// How long, in seconds, a worker has to complete an assignment
    pub assignment_duration_secs: u32,
    /// How long, in seconds, before the task expires; also the polling deadline
    pub lifetime_secs: u32,
    /// Keywords attached to every task, in order
    pub keywords: Vec<String>,
    /// Seconds before a submitted assignment is auto-approved
    pub auto_approval_delay_secs: u32,
    /// Response group requested from the service
    pub response_group: String,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            reward_amount: "0.15".to_string(),
            reward_currency: "USD".to_string(),
            assignment_duration_secs: 600,
            lifetime_secs: 1200,
            keywords: vec![],
            auto_approval_delay_secs: 0,
            response_group: "Minimal".to_string(),
        }
    }
}

impl TaskDefaults {
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(u64::from(self.lifetime_secs))
    }
}

/// Marketplace credentials, loaded once at startup and immutable afterward
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .finish()
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl AppConfig {
    /// Load configuration from a TOML file and validate the endpoint
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.marketplace.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            url: self.marketplace.endpoint.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Resolve credentials from the environment variables named in the config
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Ok(Credentials {
            access_key: get_env_var(&self.marketplace.access_key_env)?,
            secret_key: get_env_var(&self.marketplace.secret_key_env)?,
        })
    }

    /// Create a test configuration for unit testing
    #[cfg(test)]
    pub fn test_config() -> Self {
        let toml_content = r#"
[marketplace]
endpoint = "https://mechanicalturk.example.com/"

[poll]
tick_secs = 60

[task]
reward_amount = "0.15"
reward_currency = "USD"
assignment_duration_secs = 600
lifetime_secs = 1200
keywords = ["twitter", "emoji"]
auto_approval_delay_secs = 0
response_group = "Minimal"
"#;
        toml::from_str(toml_content).expect("Test config should parse")
    }
}

fn get_env_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::EnvVarNotFound(name.to_string()))
}
