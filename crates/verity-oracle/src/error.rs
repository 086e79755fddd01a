//! Error types for the oracle

use thiserror::Error;

/// Errors that can occur while answering a query
///
/// Dispatch, timeout, and decode errors never escape [`Oracle::answer`](crate::Oracle::answer);
/// they select the degraded path instead.
#[derive(Error, Debug)]
pub enum OracleError {
    /// Miner dispatcher error
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// The miner pool did not answer in time
    #[error("Dispatch timeout after {0}s")]
    Timeout(u64),

    /// The miner pool answered with a body no decoder understands
    #[error("Decode error: {0}")]
    Decode(String),

    /// Query rejected before dispatch
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Blocking task failed to complete
    #[error("Task join error: {0}")]
    Join(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for OracleError {
    fn from(e: serde_json::Error) -> Self {
        OracleError::Decode(e.to_string())
    }
}

impl From<toml::de::Error> for OracleError {
    fn from(e: toml::de::Error) -> Self {
        OracleError::Config(format!("Failed to parse TOML: {}", e))
    }
}

impl From<toml::ser::Error> for OracleError {
    fn from(e: toml::ser::Error) -> Self {
        OracleError::Config(format!("Failed to serialize to TOML: {}", e))
    }
}

impl From<std::io::Error> for OracleError {
    fn from(e: std::io::Error) -> Self {
        OracleError::Io(e.to_string())
    }
}

impl From<verity_consensus::ConsensusError> for OracleError {
    fn from(e: verity_consensus::ConsensusError) -> Self {
        OracleError::Config(e.to_string())
    }
}

impl From<verity_sources::SourceError> for OracleError {
    fn from(e: verity_sources::SourceError) -> Self {
        OracleError::Config(e.to_string())
    }
}
