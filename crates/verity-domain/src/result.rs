//! Consensus result types

use crate::{Label, MinerAssignment, SourceItem, Verdict};
use serde::{Deserialize, Serialize};

/// Which step of the selector produced the winning group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPath {
    /// The round had no responses (or the miner pool was unreachable)
    NoResponses,

    /// A numeric range cluster won
    NumericMajority,

    /// A yes/no side won
    VerdictMajority,

    /// The largest free-text cluster won
    TextMajority,
}

impl SelectionPath {
    /// Human-readable method description used in summaries
    pub fn methodology(&self) -> &'static str {
        match self {
            SelectionPath::NoResponses => "No miner responses were available; no consensus was formed.",
            SelectionPath::NumericMajority => {
                "Numeric answers were clustered by interval overlap; the heaviest majority cluster's median range was selected."
            }
            SelectionPath::VerdictMajority => {
                "Answers were classified as affirming or denying the claim; the side holding a weighted majority was selected."
            }
            SelectionPath::TextMajority => {
                "Answers were grouped by token similarity; the heaviest cluster's most complete answer was selected."
            }
        }
    }
}

/// Miner head-count for the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MinerConsensus {
    /// Number of miners that responded
    pub responded: usize,
    /// Miners in the winning group
    pub agreements: usize,
    /// Miners outside the winning group
    pub disagreements: usize,
}

/// Machine-readable summary for API serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusSummary {
    /// The query being answered
    pub claim: String,
    /// Round verdict
    pub verdict: Verdict,
    /// Confidence as an integer percentage (0-98)
    pub confidence_percent: u8,
    /// Up to three short evidence strings
    pub key_evidence: Vec<String>,
    /// How the answer was chosen
    pub methodology: String,
    /// Miner head-count
    pub miner_consensus: MinerConsensus,
}

/// The single answer produced by one consensus round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Final answer text
    pub answer_text: String,

    /// Calibrated confidence in [0, 0.98]
    pub confidence: f64,

    /// Responses in the winning group
    pub agreements: usize,

    /// Responses outside the winning group
    pub disagreements: usize,

    /// Round verdict
    pub verdict: Verdict,

    /// Agreement label
    pub label: Label,

    /// Ranked corroborating sources (at most five)
    pub sources: Vec<SourceItem>,

    /// Per-miner outcome, in response order
    pub miners: Vec<MinerAssignment>,

    /// Which selector step won
    pub path: SelectionPath,

    /// True when the answer was built without miner consensus
    #[serde(default)]
    pub degraded: bool,

    /// Serializable summary
    pub summary: ConsensusSummary,
}

impl ConsensusResult {
    /// Number of miners that responded
    pub fn responded(&self) -> usize {
        self.agreements + self.disagreements
    }

    /// Fraction of responders in the winning group (0 when none responded)
    pub fn agreement_ratio(&self) -> f64 {
        let responded = self.responded();
        if responded == 0 {
            0.0
        } else {
            self.agreements as f64 / responded as f64
        }
    }
}
