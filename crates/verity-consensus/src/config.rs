//! Consensus configuration

use crate::ConsensusError;
use serde::{Deserialize, Serialize};

/// Per-miner weight bonuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Bonus for an acknowledged request
    pub ack_bonus: f64,

    /// Bonus for a verified response hash
    pub hash_bonus: f64,

    /// Cap on a miner's weight, as a multiple of its baseline
    pub max_weight_multiple: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            ack_bonus: 0.05,
            hash_bonus: 0.2,
            max_weight_multiple: 1.5,
        }
    }
}

/// Additive confidence adjustments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Answer length (chars) that earns the full quality bonus
    pub quality_length_divisor: f64,
    /// Maximum quality bonus
    pub max_quality_bonus: f64,
    /// Bonus per ranked source
    pub per_source_bonus: f64,
    /// Maximum source bonus
    pub max_source_bonus: f64,
    /// Bonus for a time-sensitive query answered with enrichment context
    pub temporal_bonus: f64,
    /// Maximum acknowledgement bonus
    pub max_ack_bonus: f64,
    /// Maximum hash-verification bonus
    pub max_hash_bonus: f64,
    /// Penalty for hedging language in the answer
    pub hedging_penalty: f64,
    /// Bonus for an answer stating a numeric range
    pub range_bonus: f64,
    /// Base reduction for live sports/event queries without verified sources
    pub live_event_penalty: f64,
    /// Base floor after the live-event reduction
    pub live_event_floor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            quality_length_divisor: 2000.0,
            max_quality_bonus: 0.1,
            per_source_bonus: 0.03,
            max_source_bonus: 0.15,
            temporal_bonus: 0.05,
            max_ack_bonus: 0.03,
            max_hash_bonus: 0.07,
            hedging_penalty: 0.03,
            range_bonus: 0.02,
            live_event_penalty: 0.2,
            live_event_floor: 0.1,
        }
    }
}

/// Configuration for a consensus round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Jaccard similarity needed to join a text cluster or count as majority
    pub text_similarity_threshold: f64,

    /// Interval-over-union needed for two ranges to be adjacent
    pub iou_threshold: f64,

    /// Rounding step for canonical range bounds
    pub range_step: f64,

    /// Fraction of responders a winning group must reach
    pub majority_ratio: f64,

    /// Absolute minimum winning group size
    pub min_majority: usize,

    /// Unweighted share that triggers the clear-majority boost
    pub clear_majority_share: f64,

    /// Base confidence granted to a clear majority
    pub clear_majority_floor: f64,

    /// Lowest base confidence for any winner
    pub min_base_confidence: f64,

    /// Confidence reported when no miner responded
    pub empty_confidence: f64,

    /// Ceiling on the final confidence
    pub max_confidence: f64,

    /// Weight bonuses
    pub weights: WeightConfig,

    /// Confidence adjustments
    pub scoring: ScoringConfig,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            text_similarity_threshold: 0.65,
            iou_threshold: 0.5,
            range_step: 5000.0,
            majority_ratio: 0.5,
            min_majority: 2,
            clear_majority_share: 0.75,
            clear_majority_floor: 0.85,
            min_base_confidence: 0.05,
            empty_confidence: 0.2,
            max_confidence: 0.98,
            weights: WeightConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl ConsensusConfig {
    /// Strict preset: tighter clustering and a larger majority
    pub fn strict() -> Self {
        Self {
            text_similarity_threshold: 0.75,
            iou_threshold: 0.6,
            majority_ratio: 0.6,
            clear_majority_share: 0.8,
            ..Self::default()
        }
    }

    /// Lenient preset: looser clustering for small, noisy pools
    pub fn lenient() -> Self {
        Self {
            text_similarity_threshold: 0.5,
            iou_threshold: 0.4,
            range_step: 10_000.0,
            ..Self::default()
        }
    }

    /// Minimum winning group size for a round with `responded` answers
    ///
    /// `max(min_majority, ceil(responded * majority_ratio))`
    pub fn majority_threshold(&self, responded: usize) -> usize {
        let proportional = (responded as f64 * self.majority_ratio).ceil() as usize;
        proportional.max(self.min_majority)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConsensusError> {
        let unit = [
            ("text_similarity_threshold", self.text_similarity_threshold),
            ("iou_threshold", self.iou_threshold),
            ("majority_ratio", self.majority_ratio),
            ("clear_majority_share", self.clear_majority_share),
            ("clear_majority_floor", self.clear_majority_floor),
            ("min_base_confidence", self.min_base_confidence),
            ("empty_confidence", self.empty_confidence),
            ("max_confidence", self.max_confidence),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConsensusError::Config(format!(
                    "{} must be in [0.0, 1.0], got {}",
                    name, value
                )));
            }
        }
        if self.range_step <= 0.0 {
            return Err(ConsensusError::Config("range_step must be greater than 0".to_string()));
        }
        if self.min_majority == 0 {
            return Err(ConsensusError::Config("min_majority must be at least 1".to_string()));
        }
        if self.weights.max_weight_multiple < 1.0 {
            return Err(ConsensusError::Config(
                "weights.max_weight_multiple must be at least 1.0".to_string(),
            ));
        }
        if self.weights.ack_bonus < 0.0 || self.weights.hash_bonus < 0.0 {
            return Err(ConsensusError::Config("weight bonuses must be non-negative".to_string()));
        }
        if self.scoring.quality_length_divisor <= 0.0 {
            return Err(ConsensusError::Config(
                "scoring.quality_length_divisor must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConsensusError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConsensusError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConsensusConfig::default().validate().is_ok());
        assert!(ConsensusConfig::strict().validate().is_ok());
        assert!(ConsensusConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_majority_threshold() {
        let config = ConsensusConfig::default();
        assert_eq!(config.majority_threshold(0), 2);
        assert_eq!(config.majority_threshold(1), 2);
        assert_eq!(config.majority_threshold(3), 2);
        assert_eq!(config.majority_threshold(5), 3);
        assert_eq!(config.majority_threshold(10), 5);
        assert_eq!(config.majority_threshold(15), 8);
    }

    #[test]
    fn test_invalid_threshold() {
        let mut config = ConsensusConfig::default();
        config.text_similarity_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_range_step() {
        let mut config = ConsensusConfig::default();
        config.range_step = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ConsensusConfig::strict();
        let toml_str = config.to_toml().unwrap();
        let parsed = ConsensusConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ConsensusConfig::from_toml(
            r#"
            text_similarity_threshold = 0.7

            [weights]
            hash_bonus = 0.1
            "#,
        )
        .unwrap();
        assert_eq!(parsed.text_similarity_threshold, 0.7);
        assert_eq!(parsed.weights.hash_bonus, 0.1);
        assert_eq!(parsed.weights.ack_bonus, 0.05);
        assert_eq!(parsed.iou_threshold, 0.5);
    }
}
