//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the consensus engine and the
//! network. Implementations live in other crates; the engine itself never
//! calls them.

use crate::SourceItem;
use serde::{Deserialize, Serialize};

/// Per-query parameters forwarded to the miner pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionParams {
    /// Number of miners to query
    pub sample_size: usize,

    /// Sampling temperature hint
    pub temperature: f64,

    /// Upper bound on answer length, in tokens
    pub max_tokens: u32,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            sample_size: 10,
            temperature: 0.2,
            max_tokens: 512,
        }
    }
}

/// Trait for sending a prompt to the miner pool
///
/// Implemented by the infrastructure layer (verity-oracle)
pub trait MinerDispatcher {
    /// Error type for dispatch operations
    type Error;

    /// Send the prompt and return the raw response body
    ///
    /// The body is decoded at the ingestion boundary; callers treat any error
    /// as "no responses".
    fn dispatch(&self, prompt: &str, params: &SessionParams) -> Result<String, Self::Error>;
}

/// Trait for best-effort external corroboration
///
/// Implemented by the infrastructure layer (verity-sources)
pub trait SourceProvider {
    /// Error type for provider operations
    type Error;

    /// News and reference articles related to the query
    fn fetch_corroborating_sources(&self, query: &str) -> Result<Vec<SourceItem>, Self::Error>;

    /// Fact-check articles related to the query
    fn fetch_fact_checks(&self, query: &str) -> Result<Vec<SourceItem>, Self::Error>;
}
