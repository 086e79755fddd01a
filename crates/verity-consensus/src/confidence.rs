//! Multi-signal confidence scoring
//!
//! The final confidence is the selector's base confidence plus a set of small,
//! bounded adjustments. Every term is reported in a [`ConfidenceBreakdown`] so
//! a result can always be explained.

use crate::config::ScoringConfig;
use crate::numeric::contains_numeric_range;
use crate::query::{is_sports_or_event, is_time_sensitive};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use verity_domain::SourceItem;

static HEDGING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(could|might|may|possibly|perhaps|probably|likely|uncertain|unclear|not sure)\b")
        .expect("Invalid hedging regex")
});

/// Signals the scorer reads
#[derive(Debug, Clone)]
pub struct ConfidenceInputs<'a> {
    /// The query being answered
    pub query: &'a str,
    /// The selected answer
    pub answer: &'a str,
    /// Base confidence from the selector
    pub base: f64,
    /// Ranked corroborating sources
    pub sources: &'a [SourceItem],
    /// Enrichment context supplied with the query
    pub enrichment_context: Option<&'a str>,
    /// Fraction of responders that acknowledged the request
    pub ack_ratio: f64,
    /// Fraction of responders with a verified hash
    pub hash_ratio: f64,
}

/// Every term of a confidence computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    /// Selector base confidence
    pub base: f64,
    /// Base after the live-event caution rule
    pub adjusted_base: f64,
    /// Answer length bonus
    pub quality: f64,
    /// Source count bonus
    pub source: f64,
    /// Time-sensitive enrichment bonus
    pub temporal: f64,
    /// Acknowledgement bonus
    pub ack: f64,
    /// Hash verification bonus
    pub hash: f64,
    /// Hedging penalty (subtracted)
    pub hedging: f64,
    /// Stated range bonus
    pub range: f64,
    /// Clamped total
    pub final_confidence: f64,
}

/// Turns a base confidence and round signals into a final score
#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    config: ScoringConfig,
    max_confidence: f64,
}

impl ConfidenceScorer {
    /// Create a scorer with the given adjustments and ceiling
    pub fn new(config: ScoringConfig, max_confidence: f64) -> Self {
        Self { config, max_confidence }
    }

    /// Score a round
    pub fn score(&self, inputs: &ConfidenceInputs<'_>) -> ConfidenceBreakdown {
        let c = &self.config;

        let time_sensitive = is_time_sensitive(inputs.query);
        let has_verified_source = inputs.sources.iter().any(|s| s.reliability.is_verified());

        let adjusted_base = if time_sensitive && is_sports_or_event(inputs.query) && !has_verified_source {
            (inputs.base - c.live_event_penalty).max(c.live_event_floor)
        } else {
            inputs.base
        };

        let answer_chars = inputs.answer.chars().count() as f64;
        let quality = (answer_chars / c.quality_length_divisor).min(c.max_quality_bonus);
        let source = (inputs.sources.len() as f64 * c.per_source_bonus).min(c.max_source_bonus);
        let has_context = inputs.enrichment_context.is_some_and(|ctx| !ctx.trim().is_empty());
        let temporal = if time_sensitive && has_context { c.temporal_bonus } else { 0.0 };
        let ack = (inputs.ack_ratio * c.max_ack_bonus).min(c.max_ack_bonus);
        let hash = (inputs.hash_ratio * c.max_hash_bonus).min(c.max_hash_bonus);
        let hedging = if HEDGING.is_match(inputs.answer) { c.hedging_penalty } else { 0.0 };
        let range = if contains_numeric_range(inputs.answer) { c.range_bonus } else { 0.0 };

        let raw = adjusted_base + quality + source + temporal + ack + hash - hedging + range;
        let final_confidence = if raw.is_finite() {
            raw.clamp(0.0, self.max_confidence)
        } else {
            0.0
        };

        ConfidenceBreakdown {
            base: inputs.base,
            adjusted_base,
            quality,
            source,
            temporal,
            ack,
            hash,
            hedging,
            range,
            final_confidence,
        }
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default(), 0.98)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::ReliabilityTier;

    fn inputs<'a>(query: &'a str, answer: &'a str, base: f64, sources: &'a [SourceItem]) -> ConfidenceInputs<'a> {
        ConfidenceInputs {
            query,
            answer,
            base,
            sources,
            enrichment_context: None,
            ack_ratio: 0.0,
            hash_ratio: 0.0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_quality_bonus_scales_with_length() {
        let scorer = ConfidenceScorer::default();
        let short = scorer.score(&inputs("q", "Paris", 0.5, &[]));
        assert!(approx(short.quality, 5.0 / 2000.0));

        let long_answer = "x".repeat(5000);
        let long = scorer.score(&inputs("q", &long_answer, 0.5, &[]));
        assert!(approx(long.quality, 0.1));
    }

    #[test]
    fn test_source_bonus_capped() {
        let scorer = ConfidenceScorer::default();
        let sources: Vec<SourceItem> = (0..8)
            .map(|i| SourceItem::new(format!("t{}", i), format!("https://example.com/{}", i), ReliabilityTier::Unknown))
            .collect();
        let breakdown = scorer.score(&inputs("q", "a", 0.5, &sources));
        assert!(approx(breakdown.source, 0.15));
    }

    #[test]
    fn test_hedging_penalty() {
        let scorer = ConfidenceScorer::default();
        let hedged = scorer.score(&inputs("q", "It might be Paris", 0.5, &[]));
        assert!(approx(hedged.hedging, 0.03));
        let plain = scorer.score(&inputs("q", "It is Paris", 0.5, &[]));
        assert_eq!(plain.hedging, 0.0);
    }

    #[test]
    fn test_range_bonus() {
        let scorer = ConfidenceScorer::default();
        let answer = "The miner consensus places the value between $100,000 and $110,000.";
        let breakdown = scorer.score(&inputs("q", answer, 0.5, &[]));
        assert!(approx(breakdown.range, 0.02));
    }

    #[test]
    fn test_temporal_requires_context() {
        let scorer = ConfidenceScorer::default();
        let mut with_context = inputs("latest bitcoin price", "a", 0.5, &[]);
        with_context.enrichment_context = Some("BTC spot 101,000 at 12:00 UTC");
        assert!(approx(scorer.score(&with_context).temporal, 0.05));

        let without = inputs("latest bitcoin price", "a", 0.5, &[]);
        assert_eq!(scorer.score(&without).temporal, 0.0);
    }

    #[test]
    fn test_provenance_ratios() {
        let scorer = ConfidenceScorer::default();
        let mut signals = inputs("q", "a", 0.5, &[]);
        signals.ack_ratio = 1.0;
        signals.hash_ratio = 0.5;
        let breakdown = scorer.score(&signals);
        assert!(approx(breakdown.ack, 0.03));
        assert!(approx(breakdown.hash, 0.035));
    }

    #[test]
    fn test_live_event_caution() {
        let scorer = ConfidenceScorer::default();
        let query = "Who won the match today?";

        let unverified = scorer.score(&inputs(query, "Team A", 0.85, &[]));
        assert!(approx(unverified.adjusted_base, 0.65));

        let sources = vec![SourceItem::new("Report", "https://apnews.com/x", ReliabilityTier::Authoritative)];
        let verified = scorer.score(&inputs(query, "Team A", 0.85, &sources));
        assert!(approx(verified.adjusted_base, 0.85));

        let floored = scorer.score(&inputs(query, "Team A", 0.15, &[]));
        assert!(approx(floored.adjusted_base, 0.1));
    }

    #[test]
    fn test_final_is_clamped() {
        let scorer = ConfidenceScorer::default();
        let long_answer = "y".repeat(3000);
        let breakdown = scorer.score(&inputs("q", &long_answer, 1.0, &[]));
        assert_eq!(breakdown.final_confidence, 0.98);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: final confidence stays within [0, 0.98]
        #[test]
        fn test_confidence_bounded(
            base in 0.0f64..=1.0,
            ack in 0.0f64..=1.0,
            hash in 0.0f64..=1.0,
            answer in "[a-z $,0-9]{0,300}",
            query in "(latest|score|today|what|is) {0,4}",
        ) {
            let scorer = ConfidenceScorer::default();
            let breakdown = scorer.score(&ConfidenceInputs {
                query: &query,
                answer: &answer,
                base,
                sources: &[],
                enrichment_context: Some("context"),
                ack_ratio: ack,
                hash_ratio: hash,
            });
            prop_assert!(breakdown.final_confidence >= 0.0);
            prop_assert!(breakdown.final_confidence <= 0.98);
        }
    }
}
