//! Price aggregation: cache-then-fan-out across every configured retailer.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::cache::PriceCache;
use crate::config::Config;
use crate::error::SourceError;
use crate::models::PriceQuote;
use crate::sources::{MockRetailer, PriceSource};

/// A source that failed during one fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    pub supplier: String,
    pub error: SourceError,
}

/// Outcome of querying every source once.
///
/// `quotes` are ordered by source declaration, not completion. A fan-out
/// where every source failed is still a report, just with no quotes.
#[derive(Debug, Clone, Default)]
pub struct FanOutReport {
    pub quotes: Vec<PriceQuote>,
    pub failures: Vec<SourceFailure>,
}

/// Result of [`ScraperService::get_prices`].
#[derive(Debug, Clone)]
pub struct PriceLookup {
    pub quotes: Arc<[PriceQuote]>,
    /// True when the quotes came from a fresh cache entry.
    pub cached: bool,
}

pub struct ScraperService {
    sources: Vec<Arc<dyn PriceSource>>,
    cache: PriceCache,
    cache_ttl: Duration,
}

impl ScraperService {
    pub fn new(sources: Vec<Arc<dyn PriceSource>>, cache: PriceCache, cache_ttl: Duration) -> Self {
        ScraperService {
            sources,
            cache,
            cache_ttl,
        }
    }

    /// Builders Warehouse, Cashbuild and Leroy Merlin, wired from `config`.
    pub fn from_config(config: &Config) -> Self {
        let sources = MockRetailer::default_lineup()
            .into_iter()
            .map(|retailer| Arc::new(retailer.with_timeout(config.source_timeout)) as Arc<dyn PriceSource>)
            .collect();
        let cache = match config.cache_max_entries {
            Some(limit) => PriceCache::with_capacity_limit(limit),
            None => PriceCache::new(),
        };
        Self::new(sources, cache, config.cache_ttl)
    }

    pub fn suppliers(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.supplier()).collect()
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    /// Serves a fresh cache entry for `query` or refreshes it from every source.
    ///
    /// The cache key is the query exactly as given. Concurrent misses for the
    /// same query may both fan out; the last one to finish wins the entry.
    pub async fn get_prices(&self, query: &str) -> PriceLookup {
        if let Some(entry) = self.cache.get(query) {
            if entry.is_fresh(self.cache_ttl) {
                tracing::debug!(query, "price cache hit");
                return PriceLookup {
                    quotes: entry.quotes,
                    cached: true,
                };
            }
        }

        tracing::debug!(query, "price cache miss");
        let report = self.fetch_all(query).await;
        let entry = self.cache.put(query, report.quotes);
        PriceLookup {
            quotes: entry.quotes,
            cached: false,
        }
    }

    /// Queries every source concurrently and merges what succeeded.
    ///
    /// Each source is bounded by its own [`PriceSource::timeout`]; there is no
    /// overall deadline. Failures are logged and listed in the report.
    pub async fn fetch_all(&self, query: &str) -> FanOutReport {
        let calls = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            async move {
                let limit = source.timeout();
                let outcome = match tokio::time::timeout(limit, source.fetch(query)).await {
                    Ok(result) => result,
                    Err(_) => Err(SourceError::Timeout(limit)),
                };
                (source, outcome)
            }
        });

        let mut report = FanOutReport::default();
        for (source, outcome) in join_all(calls).await {
            match outcome {
                Ok(quotes) => {
                    tracing::debug!(supplier = source.supplier(), count = quotes.len(), "source returned quotes");
                    report.quotes.extend(quotes);
                }
                Err(error) => {
                    tracing::warn!(supplier = source.supplier(), error = %error, "price source failed");
                    report.failures.push(SourceFailure {
                        supplier: source.supplier().to_string(),
                        error,
                    });
                }
            }
        }
        report
    }
}
