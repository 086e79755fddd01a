//! Fixed-list source provider

use crate::SourceError;
use std::sync::{Arc, Mutex};
use verity_domain::traits::SourceProvider;
use verity_domain::SourceItem;

/// Serves pre-loaded sources without any network access
///
/// Used by the CLI for source files and by tests. Clones share one call
/// counter.
///
/// # Examples
///
/// ```
/// use verity_domain::traits::SourceProvider;
/// use verity_domain::{ReliabilityTier, SourceItem};
/// use verity_sources::StaticSourceProvider;
///
/// let provider = StaticSourceProvider::new(vec![SourceItem::new(
///     "Fact check",
///     "https://www.snopes.com/fact-check/example",
///     ReliabilityTier::FactCheck,
/// )]);
/// assert_eq!(provider.fetch_corroborating_sources("anything").unwrap().len(), 1);
/// assert!(provider.fetch_fact_checks("anything").unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSourceProvider {
    corroborating: Vec<SourceItem>,
    fact_checks: Vec<SourceItem>,
    error: Option<String>,
    call_count: Arc<Mutex<usize>>,
}

impl StaticSourceProvider {
    /// Serve `corroborating` for every query
    pub fn new(corroborating: Vec<SourceItem>) -> Self {
        Self {
            corroborating,
            ..Self::default()
        }
    }

    /// Also serve fact-check items
    pub fn with_fact_checks(mut self, fact_checks: Vec<SourceItem>) -> Self {
        self.fact_checks = fact_checks;
        self
    }

    /// A provider whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of fetch calls made so far
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn serve(&self, items: &[SourceItem]) -> Result<Vec<SourceItem>, SourceError> {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        match &self.error {
            Some(message) => Err(SourceError::Provider(message.clone())),
            None => Ok(items.to_vec()),
        }
    }
}

impl SourceProvider for StaticSourceProvider {
    type Error = SourceError;

    fn fetch_corroborating_sources(&self, _query: &str) -> Result<Vec<SourceItem>, Self::Error> {
        self.serve(&self.corroborating)
    }

    fn fetch_fact_checks(&self, _query: &str) -> Result<Vec<SourceItem>, Self::Error> {
        self.serve(&self.fact_checks)
    }
}
