//! In-memory price cache keyed by the raw query string.
//!
//! Entries are stamped with [`tokio::time::Instant`] so freshness follows the
//! runtime clock (and can be advanced in paused-time tests). Staleness is
//! checked by the caller at read time; nothing is evicted proactively.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::models::PriceQuote;

/// Snapshot of one query's last fan-out.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub quotes: Arc<[PriceQuote]>,
    pub captured_at: Instant,
}

impl CacheEntry {
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.captured_at.elapsed() < ttl
    }
}

#[derive(Debug, Default)]
pub struct PriceCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    max_entries: Option<usize>,
}

impl PriceCache {
    /// Unbounded cache; entries live until the process exits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that drops the oldest capture once `max_entries` would be exceeded.
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        PriceCache {
            entries: Mutex::new(HashMap::new()),
            max_entries: Some(max_entries.max(1)),
        }
    }

    /// Exact, case-sensitive lookup. Returns the entry whether or not it is fresh.
    pub fn get(&self, query: &str) -> Option<CacheEntry> {
        self.lock().get(query).cloned()
    }

    /// Replaces any entry for `query` with one captured now.
    pub fn put(&self, query: &str, quotes: Vec<PriceQuote>) -> CacheEntry {
        let entry = CacheEntry {
            quotes: quotes.into(),
            captured_at: Instant::now(),
        };

        let mut entries = self.lock();
        if let Some(limit) = self.max_entries {
            if !entries.contains_key(query) && entries.len() >= limit {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, e)| e.captured_at)
                    .map(|(k, _)| k.clone());
                if let Some(key) = oldest {
                    tracing::debug!(query = %key, "evicting oldest price cache entry");
                    entries.remove(&key);
                }
            }
        }
        entries.insert(query.to_string(), entry.clone());
        entry
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every write replaces a whole entry, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
