use std::env;
use std::path::Path;

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::books_repository::PostgresBooksRepositoryConfig;

const CONFIG_PATH_ENV: &str = "BOOKSERVICE_CONFIG_PATH";
const ENV_PREFIX: &str = "BOOKSERVICE";

/// Settings of the book store service.
///
/// Loaded from defaults, an optional `default` file in the config directory
/// and `BOOKSERVICE__*` environment variables, in that order of precedence.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Keep books in process memory instead of postgres
    pub in_memory: bool,
    pub hostname: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    pub service_name: String,
    /// Export spans to a Jaeger agent
    pub jaeger_enabled: bool,
    /// Used when RUST_LOG is not set
    pub log_filter: String,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config".to_string());
        let default_path = Path::new(&config_path).join("default");

        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.in_memory", false)?
            .set_default("database.hostname", "127.0.0.1")?
            .set_default("database.username", "postgres")?
            .set_default("database.password", "postgres")?
            .set_default("telemetry.service_name", "bookservice_store")?
            .set_default("telemetry.jaeger_enabled", false)?
            .set_default("telemetry.log_filter", "info")?
            .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Failed to deserialize settings")
    }
}

impl From<DatabaseSettings> for PostgresBooksRepositoryConfig {
    fn from(settings: DatabaseSettings) -> Self {
        Self {
            hostname: settings.hostname,
            username: settings.username,
            password: settings.password,
        }
    }
}
