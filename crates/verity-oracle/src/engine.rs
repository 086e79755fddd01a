//! Consensus engine: ranking plus one round, and the degraded fallback

use tracing::{info, warn};
use verity_consensus::engine::MAX_KEY_EVIDENCE;
use verity_consensus::{run_consensus, ConsensusConfig, ConsensusContext};
use verity_domain::{
    ConsensusResult, ConsensusSummary, Label, MinerConsensus, MinerProvenance, MinerResponse,
    SelectionPath, SourceItem, Verdict,
};
use verity_sources::{RankingConfig, SourceRanker};

/// Answer used when the miner pool is unreachable and no source survived ranking
pub const UNREACHABLE_ANSWER: &str =
    "Verity could not reach the miner network for this query. Please try again shortly.";

/// Methodology reported for degraded results
pub const DEGRADED_METHODOLOGY: &str =
    "The miner network was unreachable; the answer lists external sources only and carries no miner consensus.";

/// Holds the consensus settings and source ranker for repeated rounds
#[derive(Debug, Clone)]
pub struct ConsensusEngine {
    config: ConsensusConfig,
    ranker: SourceRanker,
}

impl ConsensusEngine {
    /// Create a new engine
    pub fn new(config: ConsensusConfig, ranking: RankingConfig) -> Self {
        Self {
            config,
            ranker: SourceRanker::new(ranking),
        }
    }

    /// Consensus settings
    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    /// Source ranker
    pub fn ranker(&self) -> &SourceRanker {
        &self.ranker
    }

    /// Rank raw sources, then run one round
    ///
    /// # Examples
    ///
    /// ```
    /// use verity_oracle::ConsensusEngine;
    /// use verity_domain::{MinerResponse, ReliabilityTier, SourceItem};
    ///
    /// let engine = ConsensusEngine::default();
    /// let responses = MinerResponse::from_texts(["Paris", "Paris", "Lyon"]);
    /// let sources = vec![SourceItem::new("Paris", "https://example.com/paris?utm_source=x", ReliabilityTier::Established)];
    ///
    /// let result = engine.run("What is the capital of France?", &responses, None, sources, None, None);
    /// assert_eq!(result.answer_text, "Paris");
    /// assert_eq!(result.sources[0].url, "https://example.com/paris");
    /// ```
    pub fn run(
        &self,
        query: &str,
        responses: &[MinerResponse],
        provenance: Option<&[MinerProvenance]>,
        raw_sources: Vec<SourceItem>,
        enrichment: Option<String>,
        now: Option<u64>,
    ) -> ConsensusResult {
        let provenance = match provenance {
            Some(p) if p.len() != responses.len() => {
                warn!(
                    "Ignoring provenance for {} miners in a round of {} responses",
                    p.len(),
                    responses.len()
                );
                None
            }
            other => other,
        };

        let context = ConsensusContext {
            sources: self.ranker.rank_items(query, raw_sources, now),
            enrichment_context: enrichment,
        };
        run_consensus(query, responses, provenance, &context, &self.config)
    }

    /// Result for a round where the miner pool could not be used
    ///
    /// The answer lists the top ranked source titles, or a fixed message when
    /// none survived ranking. No miner is counted on either side.
    pub fn degraded(
        &self,
        query: &str,
        raw_sources: Vec<SourceItem>,
        confidence: f64,
        now: Option<u64>,
    ) -> ConsensusResult {
        let sources = self.ranker.rank_items(query, raw_sources, now);
        let confidence = confidence.clamp(0.0, self.config.max_confidence);

        let answer_text = if sources.is_empty() {
            UNREACHABLE_ANSWER.to_string()
        } else {
            let titles: Vec<&str> = sources
                .iter()
                .take(MAX_KEY_EVIDENCE)
                .map(|s| s.title.as_str())
                .collect();
            format!("Miner network unavailable. Related reporting: {}", titles.join("; "))
        };

        let key_evidence = sources
            .iter()
            .take(MAX_KEY_EVIDENCE)
            .map(|s| s.title.clone())
            .collect();

        info!(sources = sources.len(), confidence, "Returning degraded result");

        ConsensusResult {
            answer_text,
            confidence,
            agreements: 0,
            disagreements: 0,
            verdict: Verdict::Uncertain,
            label: Label::Disputed,
            miners: Vec::new(),
            path: SelectionPath::NoResponses,
            degraded: true,
            summary: ConsensusSummary {
                claim: query.to_string(),
                verdict: Verdict::Uncertain,
                confidence_percent: (confidence * 100.0).round() as u8,
                key_evidence,
                methodology: DEGRADED_METHODOLOGY.to_string(),
                miner_consensus: MinerConsensus::default(),
            },
            sources,
        }
    }
}

impl Default for ConsensusEngine {
    fn default() -> Self {
        Self::new(ConsensusConfig::default(), RankingConfig::default())
    }
}
