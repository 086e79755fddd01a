//! Round entry point

use crate::confidence::{ConfidenceInputs, ConfidenceScorer};
use crate::config::ConsensusConfig;
use crate::selector::{ConsensusSelector, Selection};
use crate::verdict::{derive_label, tally};
use crate::weights::WeightComputer;
use tracing::{debug, info};
use verity_domain::{
    placeholder_address, ConsensusResult, ConsensusSummary, Label, MinerAssignment, MinerConsensus,
    MinerProvenance, MinerResponse, SourceItem, Verdict,
};

/// Most sources attached to a result
pub const MAX_RESULT_SOURCES: usize = 5;

/// Most entries in a summary's key evidence
pub const MAX_KEY_EVIDENCE: usize = 3;

const EXCERPT_CHARS: usize = 160;

/// External inputs to a round that do not come from miners
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsensusContext {
    /// Corroborating sources, already ranked
    pub sources: Vec<SourceItem>,

    /// Extra context supplied with the query (prices, scores, ...)
    pub enrichment_context: Option<String>,
}

impl ConsensusContext {
    /// Context with ranked sources only
    pub fn with_sources(sources: Vec<SourceItem>) -> Self {
        Self {
            sources,
            enrichment_context: None,
        }
    }
}

/// Run one consensus round
///
/// Never fails: an empty round yields the fixed "no responses" result. The
/// computation is deterministic for identical inputs.
///
/// # Examples
///
/// ```
/// use verity_consensus::{run_consensus, ConsensusConfig, ConsensusContext};
/// use verity_domain::{MinerResponse, Verdict};
///
/// let responses = MinerResponse::from_texts(vec!["Yes, it is confirmed."; 4]);
/// let result = run_consensus(
///     "Is it true the bridge reopened?",
///     &responses,
///     None,
///     &ConsensusContext::default(),
///     &ConsensusConfig::default(),
/// );
/// assert_eq!(result.agreements, 4);
/// assert_eq!(result.verdict, Verdict::True);
/// ```
pub fn run_consensus(
    query: &str,
    responses: &[MinerResponse],
    provenance: Option<&[MinerProvenance]>,
    context: &ConsensusContext,
    config: &ConsensusConfig,
) -> ConsensusResult {
    let texts: Vec<&str> = responses.iter().map(|r| r.raw_text.as_str()).collect();
    let weights = WeightComputer::new(config.weights.clone()).weights(responses, provenance);
    let responded = responses.len();

    let round_tally = tally(&texts, &weights);
    let verdict = if responded == 0 {
        Verdict::Uncertain
    } else {
        round_tally.verdict(config.majority_threshold(responded))
    };

    let selection = ConsensusSelector::new(config.clone()).select(&texts, &weights, &round_tally);

    let mut sources = context.sources.clone();
    sources.truncate(MAX_RESULT_SOURCES);

    let confidence = if responded == 0 {
        config.empty_confidence
    } else {
        let (ack_ratio, hash_ratio) = provenance_ratios(provenance, responded);
        let breakdown = ConfidenceScorer::new(config.scoring.clone(), config.max_confidence).score(
            &ConfidenceInputs {
                query,
                answer: &selection.answer_text,
                base: selection.base_confidence,
                sources: &sources,
                enrichment_context: context.enrichment_context.as_deref(),
                ack_ratio,
                hash_ratio,
            },
        );
        debug!(?breakdown, "Confidence breakdown");
        breakdown.final_confidence
    };

    let agreements = selection.agreements();
    let disagreements = selection.disagreements();
    let label = if responded == 0 {
        Label::Disputed
    } else {
        derive_label(verdict, agreements as f64 / responded as f64)
    };

    let miners = assignments(responses, provenance, &weights, &selection);
    let key_evidence = key_evidence(&sources, &texts, &selection);

    info!(
        responded,
        agreements,
        verdict = verdict.as_str(),
        confidence,
        path = ?selection.path,
        "Consensus round complete"
    );

    ConsensusResult {
        summary: ConsensusSummary {
            claim: query.to_string(),
            verdict,
            confidence_percent: (confidence * 100.0).round().clamp(0.0, 100.0) as u8,
            key_evidence,
            methodology: selection.path.methodology().to_string(),
            miner_consensus: MinerConsensus {
                responded,
                agreements,
                disagreements,
            },
        },
        answer_text: selection.answer_text,
        confidence,
        agreements,
        disagreements,
        verdict,
        label,
        sources,
        miners,
        path: selection.path,
        degraded: false,
    }
}

fn provenance_ratios(provenance: Option<&[MinerProvenance]>, responded: usize) -> (f64, f64) {
    let Some(signals) = provenance else {
        return (0.0, 0.0);
    };
    let considered = &signals[..signals.len().min(responded)];
    let acked = considered.iter().filter(|p| p.acknowledged).count();
    let hashed = considered.iter().filter(|p| p.hash_verified).count();
    (acked as f64 / responded as f64, hashed as f64 / responded as f64)
}

fn assignments(
    responses: &[MinerResponse],
    provenance: Option<&[MinerProvenance]>,
    weights: &[f64],
    selection: &Selection,
) -> Vec<MinerAssignment> {
    responses
        .iter()
        .enumerate()
        .map(|(position, response)| {
            let reported = provenance
                .and_then(|p| p.get(position))
                .and_then(|p| p.address.clone())
                .filter(|a| !a.trim().is_empty());
            let synthetic_address = reported.is_none();
            MinerAssignment {
                index: response.index,
                address: reported.unwrap_or_else(|| placeholder_address(response.index)),
                synthetic_address,
                weight: weights[position],
                in_majority: selection.in_majority[position],
                similarity_to_answer: selection.similarities[position],
            }
        })
        .collect()
}

/// Source titles, or majority excerpts when no source is available
fn key_evidence(sources: &[SourceItem], texts: &[&str], selection: &Selection) -> Vec<String> {
    if !sources.is_empty() {
        return sources
            .iter()
            .take(MAX_KEY_EVIDENCE)
            .map(|s| s.title.clone())
            .collect();
    }

    let mut evidence: Vec<String> = Vec::new();
    for &position in &selection.group {
        let excerpt = excerpt(texts[position]);
        if !excerpt.is_empty() && !evidence.contains(&excerpt) {
            evidence.push(excerpt);
        }
        if evidence.len() == MAX_KEY_EVIDENCE {
            break;
        }
    }
    evidence
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    format!("{}…", cut.trim_end())
}
