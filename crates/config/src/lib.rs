//! Configuration management for the survey agent
//!
//! Supports loading configuration from:
//! - YAML files (config/default.yaml, config/{env}.yaml)
//! - Environment variables (SURVEY_AGENT__ prefix, double-underscore paths)
//! - Provider API keys from their conventional environment variables
//!
//! The question catalog is configuration data too: it lives in its own YAML
//! file (`catalog_path` setting) with a built-in default matching the
//! deployed survey.

pub mod catalog;
pub mod settings;

pub use catalog::{default_catalog, load_catalog};
pub use settings::{
    load_settings, LlmConfig, ObservabilityConfig, PersistenceConfig, RuntimeEnvironment,
    ServerConfig, Settings, SpeechConfig, StorageConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
