//! Verity Sources
//!
//! Corroborating-source handling for consensus rounds:
//! - URL canonicalization and deduplication
//! - Claim-query allow-listing of fact-check and authoritative domains
//! - Composite ranking (tier, link depth, credibility, recency)
//! - A TTL cache that wraps any [`SourceProvider`](verity_domain::traits::SourceProvider)
//!
//! # Examples
//!
//! ```
//! use verity_domain::{ReliabilityTier, SourceItem};
//! use verity_sources::SourceRanker;
//!
//! let ranker = SourceRanker::default();
//! let ranked = ranker.rank_items(
//!     "What is the population of Norway?",
//!     vec![
//!         SourceItem::new("SSB", "https://www.ssb.no/en/befolkning?utm_source=x", ReliabilityTier::Authoritative),
//!         SourceItem::new("SSB again", "https://ssb.no/en/befolkning", ReliabilityTier::Authoritative),
//!     ],
//!     None,
//! );
//! assert_eq!(ranked.len(), 2);
//! ```
//!
//! The two URLs above differ by host (`www.ssb.no` vs `ssb.no`), so both are
//! kept; only identical canonical URLs are merged.

#![warn(missing_docs)]

pub mod cache;
pub mod config;
mod error;
pub mod normalize;
pub mod provider;
pub mod ranker;

pub use cache::{CachedSourceProvider, SharedSourceCache, TtlCache};
pub use config::{RankingConfig, TierWeights};
pub use error::SourceError;
pub use provider::StaticSourceProvider;
pub use ranker::{RankedSource, SourceRanker};
