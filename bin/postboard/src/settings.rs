//! Runtime settings.
//!
//! Defaults are layered under environment variables prefixed with `POSTBOARD`,
//! using `__` between nesting levels (e.g. `POSTBOARD__SERVER__PORT=9000`).

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite connection string; the file is created if missing.
    pub url: String,
    pub max_connections: u32,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env(
            Environment::with_prefix("POSTBOARD")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite:database.db")?
            .set_default("database.max_connections", 5)?
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}
