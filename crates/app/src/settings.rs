//! Handles settings for the server. Configuration is read from an optional
//! `settings.toml` and from `EXPENSES__*` environment variables.
//!
//! See `settings.example.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_SETTINGS_FILE: &str = "settings";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    #[serde(untagged)]
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    /// Deadline for a single request; no deadline when absent.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
            database: Database::Sqlite("expenses.db".to_string()),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path = std::env::var("EXPENSES_SETTINGS")
            .unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.to_string());
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(&path).required(false))
                .add_source(Environment::with_prefix("EXPENSES").separator("__")),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
