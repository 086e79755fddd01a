//! Core Oracle implementation

use crate::batch::RawMinerBatch;
use crate::config::OracleConfig;
use crate::engine::ConsensusEngine;
use crate::error::OracleError;
use crate::prompt::PromptBuilder;
use crate::types::{OracleAnswer, RoundMetadata};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use verity_domain::traits::{MinerDispatcher, SourceProvider};
use verity_domain::{MinerProvenance, MinerResponse, SourceItem};

/// The Oracle turns a query into one consensus answer
///
/// It dispatches the prompt to the miner pool while fetching corroborating
/// sources, decodes and sanitizes the miner body, then runs one consensus
/// round. Miner failures never surface as errors: they produce the degraded
/// result.
pub struct Oracle<D, S>
where
    D: MinerDispatcher,
    S: SourceProvider,
{
    dispatcher: Arc<D>,
    sources: Arc<S>,
    engine: ConsensusEngine,
    config: OracleConfig,
}

/// A decoded round ready for consensus
struct Round {
    responses: Vec<MinerResponse>,
    provenance: Option<Vec<MinerProvenance>>,
    shape: &'static str,
}

impl<D, S> Oracle<D, S>
where
    D: MinerDispatcher + Send + Sync + 'static,
    S: SourceProvider + Send + Sync + 'static,
    D::Error: std::fmt::Display,
    S::Error: std::fmt::Display,
{
    /// Create a new Oracle
    pub fn new(dispatcher: D, sources: S, config: OracleConfig) -> Result<Self, OracleError> {
        config.validate()?;
        Ok(Self {
            dispatcher: Arc::new(dispatcher),
            sources: Arc::new(sources),
            engine: ConsensusEngine::new(config.consensus.clone(), config.ranking.clone()),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Answer a query
    pub async fn answer(&self, query: &str) -> Result<OracleAnswer, OracleError> {
        self.answer_with_context(query, None).await
    }

    /// Answer a query with enrichment context (live prices, scores, ...)
    ///
    /// The context is included in the prompt and in confidence scoring.
    pub async fn answer_with_context(
        &self,
        query: &str,
        context: Option<String>,
    ) -> Result<OracleAnswer, OracleError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(OracleError::InvalidQuery("query is empty".to_string()));
        }

        let start_time = Instant::now();
        info!("Answering query ({} chars)", query.len());

        let prompt = PromptBuilder::new(query).with_context(context.clone()).build();
        debug!("Prompt length: {} chars", prompt.len());

        let (round, raw_sources) = tokio::join!(self.collect_round(prompt), self.fetch_sources(query));
        let sources_fetched = raw_sources.len();
        let now = unix_now();

        let (result, batch_shape, degraded_reason) = match round {
            Ok(round) => {
                let result = self.engine.run(
                    query,
                    &round.responses,
                    round.provenance.as_deref(),
                    raw_sources,
                    context,
                    Some(now),
                );
                (result, Some(round.shape.to_string()), None)
            }
            Err(e) => {
                warn!("Miner round failed, degrading: {}", e);
                let result = self.engine.degraded(
                    query,
                    raw_sources,
                    self.config.degraded_confidence,
                    Some(now),
                );
                (result, None, Some(e.to_string()))
            }
        };

        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        info!(
            responded = result.responded(),
            degraded = result.degraded,
            processing_time_ms,
            "Query answered"
        );

        Ok(OracleAnswer {
            metadata: RoundMetadata {
                query: query.to_string(),
                responded: result.responded(),
                batch_shape,
                degraded_reason,
                sources_fetched,
                timestamp: now,
                processing_time_ms,
            },
            result,
        })
    }

    /// Dispatch under timeout and decode the body
    async fn collect_round(&self, prompt: String) -> Result<Round, OracleError> {
        let body = timeout(self.config.dispatch_timeout(), self.call_dispatcher(prompt))
            .await
            .map_err(|_| OracleError::Timeout(self.config.dispatch_timeout_secs))??;

        debug!("Miner body length: {} bytes", body.len());

        let batch = RawMinerBatch::decode(&body)?;
        let shape = batch.shape();
        let (responses, provenance) = batch.into_round();
        Ok(Round {
            responses,
            provenance,
            shape,
        })
    }

    /// Call the dispatcher in a blocking context since it is not async
    async fn call_dispatcher(&self, prompt: String) -> Result<String, OracleError> {
        let dispatcher = Arc::clone(&self.dispatcher);
        let params = self.config.session.clone();

        tokio::task::spawn_blocking(move || {
            dispatcher
                .dispatch(&prompt, &params)
                .map_err(|e| OracleError::Dispatch(e.to_string()))
        })
        .await
        .map_err(|e| OracleError::Join(e.to_string()))?
    }

    /// Fact checks first, then corroborating sources
    ///
    /// Provider failures and timeouts yield no sources for that call.
    async fn fetch_sources(&self, query: &str) -> Vec<SourceItem> {
        let (fact_checks, corroborating) = tokio::join!(
            self.fetch_with(query, "fact checks", |p: &S, q: &str| p.fetch_fact_checks(q)),
            self.fetch_with(query, "corroborating sources", |p: &S, q: &str| {
                p.fetch_corroborating_sources(q)
            }),
        );

        let mut items = fact_checks;
        items.extend(corroborating);
        if items.len() > self.config.max_sources_fetched {
            debug!(
                "Keeping {} of {} fetched sources",
                self.config.max_sources_fetched,
                items.len()
            );
            items.truncate(self.config.max_sources_fetched);
        }
        items
    }

    async fn fetch_with<F>(&self, query: &str, kind: &'static str, fetch: F) -> Vec<SourceItem>
    where
        F: FnOnce(&S, &str) -> Result<Vec<SourceItem>, S::Error> + Send + 'static,
    {
        let provider = Arc::clone(&self.sources);
        let query = query.to_string();
        let task = tokio::task::spawn_blocking(move || {
            fetch(provider.as_ref(), query.as_str()).map_err(|e| e.to_string())
        });

        match timeout(self.config.source_timeout(), task).await {
            Ok(Ok(Ok(items))) => {
                debug!("Fetched {} {}", items.len(), kind);
                items
            }
            Ok(Ok(Err(e))) => {
                warn!("Failed to fetch {}: {}", kind, e);
                Vec::new()
            }
            Ok(Err(e)) => {
                warn!("Source task for {} failed: {}", kind, e);
                Vec::new()
            }
            Err(_) => {
                warn!(
                    "Fetching {} timed out after {}s",
                    kind, self.config.source_timeout_secs
                );
                Vec::new()
            }
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
