//! Verity Consensus
//!
//! Turns the noisy answers of one miner round into a single answer with a
//! calibrated confidence and a true/false/uncertain verdict.
//!
//! A round runs these steps, all pure and synchronous:
//! - Normalize and compare answers (Jaccard over word tokens)
//! - Parse currency ranges and cluster them by interval overlap
//! - Infer yes/no stances and tally them by weight
//! - Select the winning group (numeric, then verdict, then free text)
//! - Score confidence from the group's weight share plus bounded adjustments
//!
//! # Examples
//!
//! ```
//! use verity_consensus::{run_consensus, ConsensusConfig, ConsensusContext};
//! use verity_domain::{MinerResponse, SelectionPath};
//!
//! let responses = MinerResponse::from_texts(["$100,000–$110,000", "$105k", "$300 today"]);
//! let result = run_consensus(
//!     "Where will bitcoin close this year?",
//!     &responses,
//!     None,
//!     &ConsensusContext::default(),
//!     &ConsensusConfig::default(),
//! );
//!
//! assert_eq!(result.path, SelectionPath::NumericMajority);
//! assert_eq!(result.agreements + result.disagreements, 3);
//! ```

#![warn(missing_docs)]

pub mod confidence;
pub mod config;
pub mod engine;
mod error;
pub mod numeric;
pub mod query;
pub mod range_cluster;
pub mod selector;
pub mod text;
pub mod text_cluster;
pub mod verdict;
pub mod weights;

pub use confidence::{ConfidenceBreakdown, ConfidenceInputs, ConfidenceScorer};
pub use config::{ConsensusConfig, ScoringConfig, WeightConfig};
pub use engine::{run_consensus, ConsensusContext, MAX_RESULT_SOURCES};
pub use error::ConsensusError;
pub use range_cluster::RangeCluster;
pub use selector::{ConsensusSelector, Selection, EMPTY_ROUND_ANSWER};
pub use text_cluster::TextCluster;
pub use verdict::VerdictTally;
pub use weights::WeightComputer;
