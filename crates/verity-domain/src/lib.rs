//! Verity Domain Layer
//!
//! This crate contains the value types and collaborator traits shared by every
//! other Verity crate. Apart from `serde` derives it has no external
//! dependencies and performs no I/O.
//!
//! ## Key Concepts
//!
//! - **Miner response**: one candidate answer from an untrusted worker
//! - **Numeric range**: a plausible monetary/quantity interval parsed from text
//! - **Verdict / Label**: the true/false/uncertain outcome of a round and its
//!   agreement-derived label
//! - **Source item**: a corroborating external citation
//! - **Consensus result**: the single answer, confidence, and evidence produced
//!   by one round
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Consensus math lives in `verity-consensus`
//! - Source ranking lives in `verity-sources`
//! - Network collaborators live in `verity-oracle`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod range;
pub mod response;
pub mod result;
pub mod source;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use range::{NumericRange, PLAUSIBILITY_FLOOR};
pub use response::{placeholder_address, MinerAssignment, MinerProvenance, MinerResponse};
pub use result::{ConsensusResult, ConsensusSummary, MinerConsensus, SelectionPath};
pub use source::{ReliabilityTier, SourceItem};
pub use verdict::{Label, Verdict};
