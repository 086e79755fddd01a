//! Configuration for the Oracle

use crate::OracleError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use verity_consensus::ConsensusConfig;
use verity_domain::traits::SessionParams;
use verity_sources::RankingConfig;

/// Configuration for the [`Oracle`](crate::Oracle)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Maximum time for one miner dispatch (seconds)
    pub dispatch_timeout_secs: u64,

    /// Maximum time for one source provider call (seconds)
    pub source_timeout_secs: u64,

    /// Sources considered before ranking
    pub max_sources_fetched: usize,

    /// Confidence reported when the miner pool is unreachable
    pub degraded_confidence: f64,

    /// Lifetime of cached source lookups (seconds)
    pub cache_ttl_secs: u64,

    /// Parameters forwarded to the miner pool
    pub session: SessionParams,

    /// Consensus settings
    pub consensus: ConsensusConfig,

    /// Source ranking settings
    pub ranking: RankingConfig,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout_secs: 30,
            source_timeout_secs: 10,
            max_sources_fetched: 20,
            degraded_confidence: 0.1,
            cache_ttl_secs: 300,
            session: SessionParams::default(),
            consensus: ConsensusConfig::default(),
            ranking: RankingConfig::default(),
        }
    }
}

impl OracleConfig {
    /// Aggressive preset: short timeouts, fewer miners
    pub fn aggressive() -> Self {
        Self {
            dispatch_timeout_secs: 10,
            source_timeout_secs: 3,
            max_sources_fetched: 10,
            session: SessionParams {
                sample_size: 5,
                ..SessionParams::default()
            },
            ..Self::default()
        }
    }

    /// Lenient preset: long timeouts, more miners, looser clustering
    pub fn lenient() -> Self {
        Self {
            dispatch_timeout_secs: 90,
            source_timeout_secs: 20,
            max_sources_fetched: 40,
            session: SessionParams {
                sample_size: 15,
                ..SessionParams::default()
            },
            consensus: ConsensusConfig::lenient(),
            ..Self::default()
        }
    }

    /// Get the dispatch timeout as a Duration
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_secs)
    }

    /// Get the source timeout as a Duration
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    /// Get the cache TTL as a Duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), OracleError> {
        if self.dispatch_timeout_secs == 0 {
            return Err(OracleError::Config("dispatch_timeout_secs must be greater than 0".to_string()));
        }
        if self.source_timeout_secs == 0 {
            return Err(OracleError::Config("source_timeout_secs must be greater than 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.degraded_confidence) {
            return Err(OracleError::Config(format!(
                "degraded_confidence must be in [0.0, 1.0], got {}",
                self.degraded_confidence
            )));
        }
        if self.session.sample_size == 0 {
            return Err(OracleError::Config("session.sample_size must be at least 1".to_string()));
        }
        self.consensus.validate()?;
        self.ranking.validate()?;
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, OracleError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OracleError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, OracleError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(OracleConfig::default().validate().is_ok());
        assert!(OracleConfig::aggressive().validate().is_ok());
        assert!(OracleConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_timeout() {
        let config = OracleConfig {
            dispatch_timeout_secs: 0,
            ..OracleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nested_validation() {
        let mut config = OracleConfig::default();
        config.consensus.iou_threshold = 2.0;
        assert!(matches!(config.validate(), Err(OracleError::Config(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = OracleConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = OracleConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml() {
        let parsed = OracleConfig::from_toml(
            r#"
            dispatch_timeout_secs = 5

            [consensus]
            min_majority = 3

            [ranking]
            max_sources = 3
            "#,
        )
        .unwrap();
        assert_eq!(parsed.dispatch_timeout(), Duration::from_secs(5));
        assert_eq!(parsed.consensus.min_majority, 3);
        assert_eq!(parsed.ranking.max_sources, 3);
        assert_eq!(parsed.cache_ttl_secs, 300);
    }
}
