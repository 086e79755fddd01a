//! Miner responses and their provenance

use serde::{Deserialize, Serialize};

/// Default trust weight for a miner with no provenance signals
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One candidate answer returned by a miner for the current round
///
/// Responses are created once per round from the miner pool's raw output and
/// are immutable after sanitization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinerResponse {
    /// Position of the response in the round (stable across the pipeline)
    pub index: usize,

    /// Sanitized answer text
    pub raw_text: String,

    /// Trust weight (>= 0)
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

impl MinerResponse {
    /// Create a response with the default weight
    pub fn new(index: usize, raw_text: impl Into<String>) -> Self {
        Self {
            index,
            raw_text: raw_text.into(),
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Set an explicit weight
    ///
    /// Negative and non-finite weights are clamped to 0.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        self
    }

    /// Build a round from plain texts, indexed in order
    ///
    /// # Examples
    ///
    /// ```
    /// use verity_domain::MinerResponse;
    ///
    /// let round = MinerResponse::from_texts(["yes", "no"]);
    /// assert_eq!(round[1].index, 1);
    /// assert_eq!(round[1].weight, 1.0);
    /// ```
    pub fn from_texts<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Self::new(index, text))
            .collect()
    }
}

/// Optional per-miner delivery signals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinerProvenance {
    /// Network address of the miner, when the pool reports one
    #[serde(default)]
    pub address: Option<String>,

    /// The miner acknowledged the request
    #[serde(default)]
    pub acknowledged: bool,

    /// The miner's response hash was verified
    #[serde(default)]
    pub hash_verified: bool,
}

/// How a single miner fared in the round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinerAssignment {
    /// Response index
    pub index: usize,

    /// Reported or placeholder address
    pub address: String,

    /// True when `address` is a placeholder rather than reported by the pool
    pub synthetic_address: bool,

    /// Effective weight used in the round
    pub weight: f64,

    /// Whether the response is counted with the majority
    pub in_majority: bool,

    /// Token similarity between this response and the final answer
    pub similarity_to_answer: f64,
}

/// Deterministic placeholder address for a miner that reported none
///
/// Placeholders are derived from the response index only, so they never carry
/// information into clustering or scoring.
///
/// # Examples
///
/// ```
/// use verity_domain::placeholder_address;
///
/// assert_eq!(placeholder_address(3), placeholder_address(3));
/// assert_ne!(placeholder_address(3), placeholder_address(4));
/// ```
pub fn placeholder_address(index: usize) -> String {
    format!("miner-{:04}", index)
}
