//! Configuration module for the trigger service.
//!
//! Settings are read from environment variables with the `envy` crate and an
//! optional job catalog file (TOML, JSON or YAML). Everything is resolved once
//! at startup and shared read-only afterwards.

mod jobs;
mod settings;

pub use jobs::{JobCatalog, JobDefinition};
pub use settings::{OrchestratorConfig, SecurityConfig, ServerConfig, Settings};

use thiserror::Error;

/// Errors raised while resolving configuration. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable could not be parsed (e.g. a non-numeric port)
    #[error("Invalid environment configuration: {0}")]
    Env(#[from] envy::Error),

    /// Job catalog file could not be read
    #[error("Failed to read job catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Job catalog file could not be parsed
    #[error("Failed to parse job catalog {path}: {message}")]
    Parse { path: String, message: String },

    /// Configured API key header name is not a valid HTTP header name
    #[error("Invalid API key header name: {0}")]
    HeaderName(String),
}
