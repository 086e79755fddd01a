//! Source error types

use thiserror::Error;

/// Errors from source providers, the cache, and ranking configuration
#[derive(Error, Debug)]
pub enum SourceError {
    /// The wrapped provider failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// The shared cache lock was poisoned by a panicking holder
    #[error("Source cache lock poisoned")]
    Poisoned,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML (de)serialization error
    #[error("TOML error: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for SourceError {
    fn from(e: toml::de::Error) -> Self {
        SourceError::Toml(e.to_string())
    }
}
