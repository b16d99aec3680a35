use crate::error::ConfigError;
use crate::settings::RawDbEnv;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DbSettings, ServerSettings, TransportSecurity};

/// Loads the database settings from the process environment.
///
/// This is the primary entry point for this crate. Callers that want `.env`
/// support should run `dotenvy::dotenv()` first.
pub fn load_db_settings() -> Result<DbSettings, ConfigError> {
    load_db_settings_from(config::Environment::default())
}

/// Loads the database settings from an explicit environment source.
pub fn load_db_settings_from(env: config::Environment) -> Result<DbSettings, ConfigError> {
    let builder = config::Config::builder().add_source(env).build()?;

    let raw = builder.try_deserialize::<RawDbEnv>()?;
    let settings = DbSettings::try_from(raw)?;

    tracing::debug!(?settings, "Loaded database settings.");
    Ok(settings)
}
