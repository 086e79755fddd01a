//! Source ranking configuration

use crate::SourceError;
use serde::{Deserialize, Serialize};
use verity_domain::ReliabilityTier;

/// Base score per reliability tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierWeights {
    /// Fact-checking organisations
    pub fact_check: f64,
    /// Wire services, government, science bodies
    pub authoritative: f64,
    /// Mainstream publishers
    pub established: f64,
    /// Everything else
    pub unknown: f64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            fact_check: 1.0,
            authoritative: 0.8,
            established: 0.5,
            unknown: 0.2,
        }
    }
}

impl TierWeights {
    /// Weight for a tier
    pub fn weight(&self, tier: ReliabilityTier) -> f64 {
        match tier {
            ReliabilityTier::FactCheck => self.fact_check,
            ReliabilityTier::Authoritative => self.authoritative,
            ReliabilityTier::Established => self.established,
            ReliabilityTier::Unknown => self.unknown,
        }
    }
}

/// Configuration for [`SourceRanker`](crate::SourceRanker)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Sources kept after ranking
    pub max_sources: usize,

    /// Base score per tier
    pub tier_weights: TierWeights,

    /// Bonus for a domain in `credible_domains`
    pub credibility_boost: f64,

    /// Recency bonus for a source published right now
    pub recency_ceiling: f64,

    /// Recency decay per unit of `ln(1 + age_days)`
    pub recency_decay: f64,

    /// Cap on the link-depth bonus
    pub max_link_depth_bonus: f64,

    /// Query parameters removed during normalization
    pub tracking_params: Vec<String>,

    /// Query parameter prefixes removed during normalization
    pub tracking_prefixes: Vec<String>,

    /// Domains kept for claim-checking queries
    pub claim_allow_list: Vec<String>,

    /// Domains earning the credibility boost
    pub credible_domains: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_sources: 5,
            tier_weights: TierWeights::default(),
            credibility_boost: 0.15,
            recency_ceiling: 0.3,
            recency_decay: 0.05,
            max_link_depth_bonus: 0.25,
            tracking_params: strings(&[
                "fbclid", "gclid", "dclid", "msclkid", "mc_cid", "mc_eid", "igshid", "ref", "ref_src",
                "cmpid", "_ga",
            ]),
            tracking_prefixes: strings(&["utm_"]),
            claim_allow_list: strings(&[
                "snopes.com",
                "politifact.com",
                "factcheck.org",
                "fullfact.org",
                "leadstories.com",
                "factcheck.afp.com",
                "checkyourfact.com",
                "healthfeedback.org",
                "reuters.com",
                "apnews.com",
                "bbc.com",
                "bbc.co.uk",
                "who.int",
                "cdc.gov",
                "nasa.gov",
            ]),
            credible_domains: strings(&[
                "reuters.com",
                "apnews.com",
                "bbc.com",
                "bbc.co.uk",
                "npr.org",
                "nytimes.com",
                "theguardian.com",
                "nature.com",
                "science.org",
                "who.int",
                "cdc.gov",
                "nih.gov",
                "nasa.gov",
                "snopes.com",
                "politifact.com",
                "factcheck.org",
            ]),
        }
    }
}

impl RankingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.max_sources == 0 {
            return Err(SourceError::Config("max_sources must be at least 1".to_string()));
        }
        let non_negative = [
            ("credibility_boost", self.credibility_boost),
            ("recency_ceiling", self.recency_ceiling),
            ("recency_decay", self.recency_decay),
            ("max_link_depth_bonus", self.max_link_depth_bonus),
            ("tier_weights.fact_check", self.tier_weights.fact_check),
            ("tier_weights.authoritative", self.tier_weights.authoritative),
            ("tier_weights.established", self.tier_weights.established),
            ("tier_weights.unknown", self.tier_weights.unknown),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SourceError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, SourceError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Whether a query parameter is a tracking parameter
    pub fn is_tracking_param(&self, name: &str) -> bool {
        let lowered = name.to_ascii_lowercase();
        self.tracking_params.iter().any(|p| *p == lowered)
            || self.tracking_prefixes.iter().any(|p| lowered.starts_with(p.as_str()))
    }
}

/// Whether `domain` equals `listed` or is a subdomain of it
pub fn domain_matches(domain: &str, listed: &str) -> bool {
    domain == listed
        || domain
            .strip_suffix(listed)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RankingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_sources_rejected() {
        let config = RankingConfig {
            max_sources: 0,
            ..RankingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tracking_params() {
        let config = RankingConfig::default();
        assert!(config.is_tracking_param("utm_source"));
        assert!(config.is_tracking_param("UTM_Campaign"));
        assert!(config.is_tracking_param("fbclid"));
        assert!(!config.is_tracking_param("id"));
        assert!(!config.is_tracking_param("page"));
    }

    #[test]
    fn test_domain_matches() {
        assert!(domain_matches("snopes.com", "snopes.com"));
        assert!(domain_matches("www2.snopes.com", "snopes.com"));
        assert!(!domain_matches("notsnopes.com", "snopes.com"));
        assert!(!domain_matches("snopes.com.evil.net", "snopes.com"));
    }

    #[test]
    fn test_partial_toml() {
        let config = RankingConfig::from_toml("max_sources = 3\n[tier_weights]\nunknown = 0.1\n").unwrap();
        assert_eq!(config.max_sources, 3);
        assert_eq!(config.tier_weights.unknown, 0.1);
        assert_eq!(config.tier_weights.fact_check, 1.0);
    }
}
