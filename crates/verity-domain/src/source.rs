//! Corroborating source items

use serde::{Deserialize, Serialize};

/// How much a source is trusted before any URL or recency signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliabilityTier {
    /// Dedicated fact-checking organisation
    FactCheck,

    /// Wire service, government, or scientific body
    Authoritative,

    /// Mainstream publisher
    Established,

    /// Anything else
    Unknown,
}

impl ReliabilityTier {
    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ReliabilityTier::FactCheck => "fact_check",
            ReliabilityTier::Authoritative => "authoritative",
            ReliabilityTier::Established => "established",
            ReliabilityTier::Unknown => "unknown",
        }
    }

    /// Parse a tier from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "fact_check" | "factcheck" => Some(ReliabilityTier::FactCheck),
            "authoritative" | "high" => Some(ReliabilityTier::Authoritative),
            "established" | "medium" => Some(ReliabilityTier::Established),
            "unknown" | "low" => Some(ReliabilityTier::Unknown),
            _ => None,
        }
    }

    /// Whether a source of this tier counts as verified corroboration
    pub fn is_verified(&self) -> bool {
        matches!(self, ReliabilityTier::FactCheck | ReliabilityTier::Authoritative)
    }
}

impl Default for ReliabilityTier {
    fn default() -> Self {
        ReliabilityTier::Unknown
    }
}

impl std::str::FromStr for ReliabilityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid reliability tier: {}", s))
    }
}

/// An external citation supporting (or refuting) the answer
///
/// Identity is the normalized URL; items are never mutated after ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    /// Headline or page title
    pub title: String,

    /// Link to the source
    pub url: String,

    /// Trust tier assigned by the provider
    #[serde(default)]
    pub reliability: ReliabilityTier,

    /// Optional excerpt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Publication time (seconds since Unix epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<u64>,

    /// Publisher name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// Host without a leading `www.`; filled in during normalization
    #[serde(default)]
    pub domain: String,
}

impl SourceItem {
    /// Create a source with only the required fields
    pub fn new(title: impl Into<String>, url: impl Into<String>, reliability: ReliabilityTier) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            reliability,
            snippet: None,
            published_at: None,
            publisher: None,
            domain: String::new(),
        }
    }

    /// Attach a publication timestamp
    pub fn with_published_at(mut self, published_at: u64) -> Self {
        self.published_at = Some(published_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse() {
        assert_eq!(ReliabilityTier::parse("fact-check"), Some(ReliabilityTier::FactCheck));
        assert_eq!(ReliabilityTier::parse("HIGH"), Some(ReliabilityTier::Authoritative));
        assert_eq!(ReliabilityTier::parse("bogus"), None);
        assert!("established".parse::<ReliabilityTier>().is_ok());
    }

    #[test]
    fn test_verified_tiers() {
        assert!(ReliabilityTier::FactCheck.is_verified());
        assert!(ReliabilityTier::Authoritative.is_verified());
        assert!(!ReliabilityTier::Established.is_verified());
        assert!(!ReliabilityTier::Unknown.is_verified());
    }

    #[test]
    fn test_source_deserialize_defaults() {
        let item: SourceItem =
            serde_json::from_str(r#"{"title": "t", "url": "https://example.com/a"}"#).unwrap();
        assert_eq!(item.reliability, ReliabilityTier::Unknown);
        assert!(item.published_at.is_none());
        assert!(item.domain.is_empty());
    }
}
