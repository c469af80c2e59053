//! Configuration file loading
//!
//! The config is a TOML file with `[excel]`, `[jira]` and `[field_mapping]`
//! sections. It is loaded once in `main` and passed down by reference.

mod loader;
mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read configuration file {path}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
