//! Per-miner trust weights

use crate::config::WeightConfig;
use verity_domain::{MinerProvenance, MinerResponse};

/// Computes effective weights from response baselines and provenance signals
#[derive(Debug, Clone)]
pub struct WeightComputer {
    config: WeightConfig,
}

impl WeightComputer {
    /// Create a computer with the given bonuses
    pub fn new(config: WeightConfig) -> Self {
        Self { config }
    }

    /// Weight for a single response
    ///
    /// Without provenance the response's own weight is used unchanged.
    pub fn weight(&self, response: &MinerResponse, provenance: Option<&MinerProvenance>) -> f64 {
        let baseline = response.weight;
        let Some(signals) = provenance else {
            return baseline;
        };

        let mut weight = baseline;
        if signals.acknowledged {
            weight += self.config.ack_bonus;
        }
        if signals.hash_verified {
            weight += self.config.hash_bonus;
        }
        weight.min(baseline * self.config.max_weight_multiple)
    }

    /// Weights for a whole round, indexed by response position
    ///
    /// Provenance is matched by position; missing entries count as absent.
    pub fn weights(&self, responses: &[MinerResponse], provenance: Option<&[MinerProvenance]>) -> Vec<f64> {
        responses
            .iter()
            .enumerate()
            .map(|(position, response)| {
                let signals = provenance.and_then(|p| p.get(position));
                self.weight(response, signals)
            })
            .collect()
    }
}

impl Default for WeightComputer {
    fn default() -> Self {
        Self::new(WeightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provenance(acknowledged: bool, hash_verified: bool) -> MinerProvenance {
        MinerProvenance {
            address: None,
            acknowledged,
            hash_verified,
        }
    }

    #[test]
    fn test_no_provenance_keeps_baseline() {
        let computer = WeightComputer::default();
        let response = MinerResponse::new(0, "a").with_weight(0.7);
        assert_eq!(computer.weight(&response, None), 0.7);
    }

    #[test]
    fn test_bonuses() {
        let computer = WeightComputer::default();
        let response = MinerResponse::new(0, "a");
        assert!((computer.weight(&response, Some(&provenance(true, false))) - 1.05).abs() < 1e-9);
        assert!((computer.weight(&response, Some(&provenance(false, true))) - 1.2).abs() < 1e-9);
        assert!((computer.weight(&response, Some(&provenance(true, true))) - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_cap_relative_to_baseline() {
        let computer = WeightComputer::default();
        let response = MinerResponse::new(0, "a").with_weight(0.2);
        // 0.2 + 0.25 capped at 0.3
        assert!((computer.weight(&response, Some(&provenance(true, true))) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_round_weights_with_short_provenance() {
        let computer = WeightComputer::default();
        let responses = MinerResponse::from_texts(["a", "b"]);
        let signals = vec![provenance(false, true)];
        let weights = computer.weights(&responses, Some(&signals));
        assert!((weights[0] - 1.2).abs() < 1e-9);
        assert_eq!(weights[1], 1.0);
    }
}
