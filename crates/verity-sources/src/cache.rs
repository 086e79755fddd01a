//! Time-bounded memoization of source lookups
//!
//! The cache is an ordinary value owned by whoever constructs it. Wrap it in
//! `Arc<Mutex<_>>` to share one cache between several providers.

use crate::SourceError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;
use verity_domain::traits::SourceProvider;
use verity_domain::SourceItem;

/// A string-keyed cache whose entries expire after a fixed TTL
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, (Instant, V)>,
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Get a live entry, evicting it if it has expired
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => return Some(value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Store a value, dropping expired entries first
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.purge_expired();
        self.entries.insert(key.into(), (Instant::now(), value));
    }

    /// Drop every expired entry
    pub fn purge_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
    }

    /// Number of stored entries, live or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared cache handle used by [`CachedSourceProvider`]
pub type SharedSourceCache = Arc<Mutex<TtlCache<Vec<SourceItem>>>>;

/// Wraps a [`SourceProvider`] with a TTL cache keyed by query
pub struct CachedSourceProvider<P> {
    inner: P,
    cache: SharedSourceCache,
}

impl<P> CachedSourceProvider<P>
where
    P: SourceProvider,
    P::Error: std::fmt::Display,
{
    /// Wrap a provider with a fresh cache
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self::with_cache(inner, Arc::new(Mutex::new(TtlCache::new(ttl))))
    }

    /// Wrap a provider with an existing, possibly shared, cache
    pub fn with_cache(inner: P, cache: SharedSourceCache) -> Self {
        Self { inner, cache }
    }

    /// The cache handle
    pub fn cache(&self) -> SharedSourceCache {
        Arc::clone(&self.cache)
    }

    fn cached<F>(&self, kind: &str, query: &str, fetch: F) -> Result<Vec<SourceItem>, SourceError>
    where
        F: FnOnce(&P) -> Result<Vec<SourceItem>, P::Error>,
    {
        let key = format!("{}:{}", kind, query.trim().to_lowercase());

        {
            let mut cache = self.cache.lock().map_err(|_| SourceError::Poisoned)?;
            if let Some(hit) = cache.get(&key) {
                debug!(%key, "Source cache hit");
                return Ok(hit);
            }
        }

        let fetched = fetch(&self.inner).map_err(|e| SourceError::Provider(e.to_string()))?;

        let mut cache = self.cache.lock().map_err(|_| SourceError::Poisoned)?;
        cache.insert(key, fetched.clone());
        Ok(fetched)
    }
}

impl<P> SourceProvider for CachedSourceProvider<P>
where
    P: SourceProvider,
    P::Error: std::fmt::Display,
{
    type Error = SourceError;

    fn fetch_corroborating_sources(&self, query: &str) -> Result<Vec<SourceItem>, Self::Error> {
        self.cached("news", query, |p| p.fetch_corroborating_sources(query))
    }

    fn fetch_fact_checks(&self, query: &str) -> Result<Vec<SourceItem>, Self::Error> {
        self.cached("factcheck", query, |p| p.fetch_fact_checks(query))
    }
}
