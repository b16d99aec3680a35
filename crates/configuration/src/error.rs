use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from the environment: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Missing database environment variables. Please set: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}
