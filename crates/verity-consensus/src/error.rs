//! Consensus error types

use thiserror::Error;

/// Errors raised at the consensus crate's fallible boundaries
///
/// The round itself never fails; only configuration loading can.
#[derive(Error, Debug)]
pub enum ConsensusError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML (de)serialization error
    #[error("TOML error: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConsensusError {
    fn from(e: toml::de::Error) -> Self {
        ConsensusError::Toml(e.to_string())
    }
}

impl From<toml::ser::Error> for ConsensusError {
    fn from(e: toml::ser::Error) -> Self {
        ConsensusError::Toml(e.to_string())
    }
}
