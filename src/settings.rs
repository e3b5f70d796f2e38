use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sqlite,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub database_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
    /// Single origin allowed by CORS; credentials are allowed for it.
    pub cors_origin: String,
    pub store: StoreSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // APP_PORT, APP_CORS_ORIGIN, APP_STORE__BACKEND, ...
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("cors_origin", "https://select-position.vercel.app")?
            .set_default("store.backend", "sqlite")?
            .set_default("store.database_url", "sqlite://classes.db?mode=rwc")?
            .build()?;

        config.try_deserialize()
    }
}

/// Settings for the `class-board` client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientSettings {
    pub api_url: Url,
    pub debug: bool,
}

impl ClientSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("api_url", "http://localhost:8080/api")?
            .set_default("debug", false)?
            .build()?;

        config.try_deserialize()
    }
}
