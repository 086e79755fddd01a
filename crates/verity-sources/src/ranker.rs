//! Source deduplication and ranking

use crate::config::{domain_matches, RankingConfig};
use crate::normalize::{normalize_url, NormalizedUrl};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};
use verity_consensus::query::is_claim_query;
use verity_domain::SourceItem;

const SECONDS_PER_DAY: f64 = 86_400.0;

static DATE_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(19|20)\d{2}$|^(19|20)\d{2}-\d{2}(-\d{2})?$").expect("Invalid date segment regex")
});

/// A source with its ranking score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSource {
    /// The normalized source
    pub item: SourceItem,
    /// Composite score (higher is better)
    pub score: f64,
}

/// Deduplicates, filters, scores, and caps corroborating sources
#[derive(Debug, Clone, Default)]
pub struct SourceRanker {
    config: RankingConfig,
}

impl SourceRanker {
    /// Create a ranker
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// Access the configuration
    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank sources for a query
    ///
    /// `now` is the current unix time in seconds; without it the recency term
    /// is zero.
    pub fn rank(&self, query: &str, items: Vec<SourceItem>, now: Option<u64>) -> Vec<RankedSource> {
        let received = items.len();
        let mut unique = self.dedupe(items);

        if is_claim_query(query) {
            unique.retain(|(item, _)| {
                self.config
                    .claim_allow_list
                    .iter()
                    .any(|listed| domain_matches(&item.domain, listed))
            });
        }

        let mut ranked: Vec<RankedSource> = unique
            .into_iter()
            .map(|(item, normalized)| {
                let score = self.score(&item, &normalized, now);
                RankedSource { item, score }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(self.config.max_sources);

        debug!(received, kept = ranked.len(), "Ranked sources");
        ranked
    }

    /// Rank sources and drop the scores
    pub fn rank_items(&self, query: &str, items: Vec<SourceItem>, now: Option<u64>) -> Vec<SourceItem> {
        self.rank(query, items, now).into_iter().map(|r| r.item).collect()
    }

    /// Normalize URLs and drop duplicates, keeping the first occurrence
    fn dedupe(&self, items: Vec<SourceItem>) -> Vec<(SourceItem, NormalizedUrl)> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut unique = Vec::with_capacity(items.len());

        for mut item in items {
            let Some(normalized) = normalize_url(&item.url, &self.config) else {
                warn!(url = %item.url, "Dropping source with unusable URL");
                continue;
            };
            if !seen.insert(normalized.url.clone()) {
                debug!(url = %normalized.url, "Dropping duplicate source");
                continue;
            }
            item.url = normalized.url.clone();
            item.domain = normalized.domain.clone();
            unique.push((item, normalized));
        }
        unique
    }

    fn score(&self, item: &SourceItem, normalized: &NormalizedUrl, now: Option<u64>) -> f64 {
        let tier = self.config.tier_weights.weight(item.reliability);
        let depth = self.link_depth(&normalized.segments);
        let credibility = if self
            .config
            .credible_domains
            .iter()
            .any(|listed| domain_matches(&item.domain, listed))
        {
            self.config.credibility_boost
        } else {
            0.0
        };
        let recency = self.recency(item.published_at, now);
        tier + depth + credibility + recency
    }

    /// Bonus for deep links to specific articles over home pages
    fn link_depth(&self, segments: &[String]) -> f64 {
        let mut bonus: f64 = match segments.len() {
            0 => 0.0,
            1 => 0.05,
            2 => 0.10,
            _ => 0.15,
        };
        if let Some(last) = segments.last() {
            if last.contains('-') && last.chars().any(|c| c.is_alphabetic()) {
                bonus += 0.05;
            }
        }
        if segments.iter().any(|s| DATE_SEGMENT.is_match(s)) {
            bonus += 0.05;
        }
        bonus.min(self.config.max_link_depth_bonus)
    }

    fn recency(&self, published_at: Option<u64>, now: Option<u64>) -> f64 {
        let (Some(published), Some(now)) = (published_at, now) else {
            return 0.0;
        };
        let age_days = now.saturating_sub(published) as f64 / SECONDS_PER_DAY;
        (self.config.recency_ceiling - self.config.recency_decay * (1.0 + age_days).ln()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::ReliabilityTier;

    fn ranker() -> SourceRanker {
        SourceRanker::default()
    }

    fn segments(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_link_depth() {
        let r = ranker();
        assert_eq!(r.link_depth(&[]), 0.0);
        assert_eq!(r.link_depth(&segments(&["news"])), 0.05);
        assert_eq!(r.link_depth(&segments(&["news", "world"])), 0.10);
        assert!((r.link_depth(&segments(&["a", "b", "some-story"])) - 0.20).abs() < 1e-9);
        assert!((r.link_depth(&segments(&["world", "2024", "05", "some-story"])) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_recency_decays() {
        let r = ranker();
        let now = 1_700_000_000;
        assert!((r.recency(Some(now), Some(now)) - 0.3).abs() < 1e-9);
        let week_old = r.recency(Some(now - 7 * 86_400), Some(now));
        assert!(week_old < 0.3 && week_old > 0.0);
        assert_eq!(r.recency(None, Some(now)), 0.0);
        assert_eq!(r.recency(Some(now), None), 0.0);
        // Far in the past bottoms out at zero
        assert_eq!(r.recency(Some(0), Some(now)), 0.0);
    }

    #[test]
    fn test_tier_order() {
        let items = vec![
            SourceItem::new("blog", "https://someblog.net/post", ReliabilityTier::Unknown),
            SourceItem::new("check", "https://snopes.com/fact-check/x", ReliabilityTier::FactCheck),
            SourceItem::new("paper", "https://localpaper.com/news", ReliabilityTier::Established),
        ];
        let ranked = ranker().rank_items("price of gold", items, None);
        let titles: Vec<&str> = ranked.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["check", "paper", "blog"]);
    }

    #[test]
    fn test_unusable_urls_dropped() {
        let items = vec![
            SourceItem::new("bad", "javascript:alert(1)", ReliabilityTier::FactCheck),
            SourceItem::new("good", "https://example.com/a", ReliabilityTier::Unknown),
        ];
        let ranked = ranker().rank_items("q", items, None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "good");
        assert_eq!(ranked[0].domain, "example.com");
    }
}
