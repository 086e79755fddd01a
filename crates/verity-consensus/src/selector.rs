//! Winning-group selection for one round
//!
//! The selector tries, in order: a numeric range majority, a yes/no majority,
//! and finally the heaviest free-text cluster. Whatever wins becomes the
//! group that agreements, base confidence, and majority membership are
//! computed from.

use crate::config::ConsensusConfig;
use crate::numeric::parse_range;
use crate::range_cluster::{cluster_ranges, RangeCluster};
use crate::text::similarity;
use crate::text_cluster::{cluster_texts, TextCluster};
use crate::verdict::VerdictTally;
use tracing::debug;
use verity_domain::{NumericRange, SelectionPath};

/// Answer reported when no miner responded
pub const EMPTY_ROUND_ANSWER: &str =
    "Oracle network did not return responses for this query. Please try again shortly.";

/// Outcome of selection, before confidence adjustments
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Final answer text
    pub answer_text: String,

    /// Positions of the winning group, ascending
    pub group: Vec<usize>,

    /// Which step produced the group
    pub path: SelectionPath,

    /// Canonical range when the numeric step won
    pub range: Option<NumericRange>,

    /// Base confidence from the group's weight share
    pub base_confidence: f64,

    /// Per-position similarity to the final answer
    pub similarities: Vec<f64>,

    /// Per-position majority membership
    pub in_majority: Vec<bool>,
}

impl Selection {
    /// Responses in the winning group
    pub fn agreements(&self) -> usize {
        self.group.len()
    }

    /// Responses outside the winning group
    pub fn disagreements(&self) -> usize {
        self.similarities.len() - self.group.len()
    }
}

/// Picks the winning group of a round
#[derive(Debug, Clone)]
pub struct ConsensusSelector {
    config: ConsensusConfig,
}

impl ConsensusSelector {
    /// Create a selector
    pub fn new(config: ConsensusConfig) -> Self {
        Self { config }
    }

    /// Select the winning group
    ///
    /// `texts` and `weights` are parallel and indexed by position. `tally` is
    /// the round's verdict tally, computed once by the caller.
    pub fn select(&self, texts: &[&str], weights: &[f64], tally: &VerdictTally) -> Selection {
        let responded = texts.len();
        if responded == 0 {
            return Selection {
                answer_text: EMPTY_ROUND_ANSWER.to_string(),
                group: Vec::new(),
                path: SelectionPath::NoResponses,
                range: None,
                base_confidence: self.config.empty_confidence,
                similarities: Vec::new(),
                in_majority: Vec::new(),
            };
        }

        let threshold = self.config.majority_threshold(responded);

        let (answer_text, group, path, range) = if let Some((range, group)) =
            self.numeric_majority(texts, weights, threshold)
        {
            (render_range(&range), group, SelectionPath::NumericMajority, Some(range))
        } else if let Some((answer, group)) = self.verdict_majority(texts, tally, threshold) {
            (answer, group, SelectionPath::VerdictMajority, None)
        } else {
            let (answer, group) = self.text_majority(texts, weights);
            (answer, group, SelectionPath::TextMajority, None)
        };

        let base_confidence = self.base_confidence(&group, weights, responded);

        let similarities: Vec<f64> = texts.iter().map(|t| similarity(t, &answer_text)).collect();
        let in_majority: Vec<bool> = (0..responded)
            .map(|p| group.contains(&p) || similarities[p] >= self.config.text_similarity_threshold)
            .collect();

        debug!(
            path = ?path,
            agreements = group.len(),
            responded,
            base_confidence,
            "Selected winning group"
        );

        Selection {
            answer_text,
            group,
            path,
            range,
            base_confidence,
            similarities,
            in_majority,
        }
    }

    fn numeric_majority(
        &self,
        texts: &[&str],
        weights: &[f64],
        threshold: usize,
    ) -> Option<(NumericRange, Vec<usize>)> {
        let parsed: Vec<(usize, NumericRange)> = texts
            .iter()
            .enumerate()
            .filter_map(|(position, text)| parse_range(text).map(|r| (position, r)))
            .collect();
        if parsed.is_empty() {
            return None;
        }

        let clusters = cluster_ranges(&parsed, self.config.iou_threshold, self.config.range_step);
        debug!(parsed = parsed.len(), clusters = clusters.len(), threshold, "Clustered numeric answers");

        let eligible: Vec<&RangeCluster> = clusters.iter().filter(|c| c.len() >= threshold).collect();
        let winner = eligible[heaviest(eligible.iter().map(|c| c.member_indices.as_slice()), weights)?];

        match winner.canonical_range() {
            Some(range) => Some((range, winner.member_indices.clone())),
            None => {
                debug!(low = winner.low, high = winner.high, "Canonical range implausible, falling through");
                None
            }
        }
    }

    fn verdict_majority(&self, texts: &[&str], tally: &VerdictTally, threshold: usize) -> Option<(String, Vec<usize>)> {
        let side = tally.decide(threshold)?;
        let group = tally.side(side).to_vec();
        let answer = longest(texts, &group)?;
        Some((answer, group))
    }

    fn text_majority(&self, texts: &[&str], weights: &[f64]) -> (String, Vec<usize>) {
        let clusters = cluster_texts(texts, self.config.text_similarity_threshold);
        debug!(clusters = clusters.len(), "Clustered free-text answers");

        match heaviest(clusters.iter().map(|c| c.member_indices.as_slice()), weights) {
            Some(slot) => {
                let cluster: &TextCluster = &clusters[slot];
                let mut group = cluster.member_indices.clone();
                group.sort_unstable();
                (cluster.representative.clone(), group)
            }
            // Unreachable with at least one response; keep the first answer
            None => (texts[0].to_string(), vec![0]),
        }
    }

    fn base_confidence(&self, group: &[usize], weights: &[f64], responded: usize) -> f64 {
        let total: f64 = weights.iter().sum();
        let share = if total > 0.0 {
            group_weight(group, weights) / total
        } else {
            group.len() as f64 / responded as f64
        };

        let mut base = share.max(self.config.min_base_confidence);
        if group.len() as f64 / responded as f64 >= self.config.clear_majority_share {
            base = base.max(self.config.clear_majority_floor);
        }
        base
    }
}

impl Default for ConsensusSelector {
    fn default() -> Self {
        Self::new(ConsensusConfig::default())
    }
}

fn group_weight(group: &[usize], weights: &[f64]) -> f64 {
    group.iter().map(|&p| weights.get(p).copied().unwrap_or(0.0)).sum()
}

/// Position of the group with the highest weighted sum
///
/// Ties go to the larger group, then the earlier one.
fn heaviest<'g>(groups: impl Iterator<Item = &'g [usize]>, weights: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64, usize)> = None;
    for (slot, group) in groups.enumerate() {
        let weight = group_weight(group, weights);
        let better = match best {
            None => true,
            Some((_, best_weight, best_len)) => {
                weight > best_weight || (weight == best_weight && group.len() > best_len)
            }
        };
        if better {
            best = Some((slot, weight, group.len()));
        }
    }
    best.map(|(slot, _, _)| slot)
}

fn longest(texts: &[&str], group: &[usize]) -> Option<String> {
    let mut best: Option<&str> = None;
    for &p in group {
        let text = texts.get(p)?;
        if best.is_none_or(|b| text.chars().count() > b.chars().count()) {
            best = Some(text);
        }
    }
    best.map(str::to_string)
}

/// Render a canonical range as the consensus sentence
///
/// # Examples
///
/// ```
/// use verity_consensus::selector::render_range;
/// use verity_domain::NumericRange;
///
/// let range = NumericRange::new(100_000.0, 110_000.0).unwrap();
/// assert_eq!(
///     render_range(&range),
///     "The miner consensus places the value between $100,000 and $110,000."
/// );
/// ```
pub fn render_range(range: &NumericRange) -> String {
    format!(
        "The miner consensus places the value between ${} and ${}.",
        thousands(range.low),
        thousands(range.high)
    )
}

fn thousands(value: f64) -> String {
    let digits = (value.round() as u64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
