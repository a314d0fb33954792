use anyhow::Result;
use config::{Config, Environment, File};
use moka::future::Cache;
use sea_orm::{Database, DatabaseConnection};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::auth::AuthUser;
use crate::schemas::AppState;

/// Runtime settings.
///
/// Layered from lowest to highest precedence: built-in defaults, an optional
/// `pocketbook.toml` in the working directory, then `POCKETBOOK_*` environment
/// variables. Command line flags are applied on top by the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub request_timeout_secs: u64,
    pub token_cache_ttl_secs: u64,
    pub token_cache_capacity: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://pocketbook.db?mode=rwc".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 30,
            token_cache_ttl_secs: 300,
            token_cache_capacity: 10_000,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();

        let settings: Settings = Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("bind_address", defaults.bind_address)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("token_cache_ttl_secs", defaults.token_cache_ttl_secs)?
            .set_default("token_cache_capacity", defaults.token_cache_capacity)?
            .add_source(File::with_name("pocketbook").required(false))
            .add_source(Environment::with_prefix("POCKETBOOK").try_parsing(true))
            .build()?
            .try_deserialize()?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}

/// Connect to the database
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database: {}", database_url);
    Ok(Database::connect(database_url).await?)
}

pub fn token_cache(settings: &Settings) -> Cache<String, AuthUser> {
    Cache::builder()
        .max_capacity(settings.token_cache_capacity)
        .time_to_live(Duration::from_secs(settings.token_cache_ttl_secs))
        .build()
}

/// Initialize application state
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    let db = connect(&settings.database_url).await?;
    Ok(AppState {
        db,
        tokens: token_cache(settings),
    })
}
