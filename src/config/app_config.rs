use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::api_key::{
    PostgrestConfig, SecretGenerator, DEFAULT_SECRET_LENGTH, DEFAULT_SECRET_PREFIX,
};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Supported record store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-memory store (for testing/development)
    InMemory,
    /// Hosted database through its PostgREST endpoint
    Postgrest,
}

impl StoreBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgrest" | "supabase" | "rest" => Some(Self::Postgrest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Project URL of the hosted database
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeysConfig {
    #[serde(default = "default_secret_prefix")]
    pub secret_prefix: String,
    #[serde(default = "default_secret_length")]
    pub secret_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_table() -> String {
    "api_keys".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_secret_prefix() -> String {
    DEFAULT_SECRET_PREFIX.to_string()
}

fn default_secret_length() -> usize {
    DEFAULT_SECRET_LENGTH
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: String::new(),
            api_key: String::new(),
            table: default_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            secret_prefix: default_secret_prefix(),
            secret_length: default_secret_length(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl StoreConfig {
    pub fn backend(&self) -> Result<StoreBackend, DomainError> {
        StoreBackend::from_str(&self.backend).ok_or_else(|| {
            DomainError::configuration(format!("Unknown store backend '{}'", self.backend))
        })
    }

    pub fn postgrest(&self) -> PostgrestConfig {
        PostgrestConfig::new(&self.url, &self.api_key)
            .with_table(&self.table)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

impl KeysConfig {
    pub fn generator(&self) -> Result<SecretGenerator, DomainError> {
        if self.secret_length == 0 {
            return Err(DomainError::configuration(
                "keys.secret_length must be greater than zero",
            ));
        }
        Ok(SecretGenerator::new(&self.secret_prefix, self.secret_length))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
