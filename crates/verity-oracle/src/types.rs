//! Answer types returned by the oracle

use serde::{Deserialize, Serialize};
use verity_domain::ConsensusResult;

/// The outcome of one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleAnswer {
    /// Consensus (or degraded) result
    pub result: ConsensusResult,

    /// Metadata about the round
    pub metadata: RoundMetadata,
}

/// Metadata about one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundMetadata {
    /// The query as received (trimmed)
    pub query: String,

    /// Number of usable miner responses
    pub responded: usize,

    /// Shape of the miner body, when one was decoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_shape: Option<String>,

    /// Why the round fell back to the degraded result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,

    /// Sources received from providers, before ranking
    pub sources_fetched: usize,

    /// Timestamp when the round completed (seconds since Unix epoch)
    pub timestamp: u64,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
