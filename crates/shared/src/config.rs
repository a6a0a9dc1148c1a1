//! Application configuration management.
//!
//! Layered the same way for every binary: `config/default`, then
//! `config/{RUN_MODE}`, then `CAIXA__*` environment variables.

use serde::Deserialize;

use crate::types::MatchStrategy;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Import configuration.
    #[serde(default)]
    pub import: ImportConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Reconciling import configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportConfig {
    /// How descriptions are compared when matching a draft to a stored movement.
    #[serde(default)]
    pub match_strategy: MatchStrategy,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "caixa=info".to_string()
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or a required
    /// key (such as `database.url`) is missing.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CAIXA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
