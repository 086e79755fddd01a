//! Verdict and label module

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a claim-checking round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The miner majority affirms the claim
    True,

    /// The miner majority denies the claim
    False,

    /// No side reached a qualified majority
    Uncertain,
}

impl Verdict {
    /// Get the verdict name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "True",
            Verdict::False => "False",
            Verdict::Uncertain => "Uncertain",
        }
    }

    /// Map an explicit yes/no decision to a verdict
    pub fn from_decision(decision: Option<bool>) -> Self {
        match decision {
            Some(true) => Verdict::True,
            Some(false) => Verdict::False,
            None => Verdict::Uncertain,
        }
    }

    /// Whether the verdict is an explicit affirmation or denial
    pub fn is_decisive(&self) -> bool {
        !matches!(self, Verdict::Uncertain)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Agreement label attached to a result
///
/// Derived from the verdict when one exists, otherwise from the agreement
/// ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Affirmed, or broad agreement
    Positive,

    /// Denied, or broad disagreement
    Negative,

    /// Split network
    Disputed,
}

impl Label {
    /// Get the label name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "Positive",
            Label::Negative => "Negative",
            Label::Disputed => "Disputed",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
