//! In-memory response cache with lazy TTL expiry.
//!
//! Caches assembled [`AggregateResponse`] values keyed by the raw query
//! string. Keys are not normalised: `"Rust"` and `"rust "` are distinct
//! entries, so near-duplicate queries miss. The cache has no capacity
//! bound; callers are expected to bound distinct-query volume.
//!
//! Expiry is checked on access. An expired entry is removed by the `get`
//! that observes it; there is no background sweep. The check and the
//! removal run as one atomic per-key operation on the underlying
//! [`moka`] map.

use std::time::Duration;

use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use tokio::time::Instant;

use crate::types::AggregateResponse;

/// Default time-to-live for cached responses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// A cached response together with the time it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Snapshot of the response at store time.
    pub response: AggregateResponse,
    /// When the entry was written.
    pub stored_at: Instant,
    /// The `max_results` the response was fetched with.
    pub fetched_limit: usize,
}

impl CacheEntry {
    /// Whether this entry can answer a request for `max_results` results.
    ///
    /// A response shorter than `max_results` still covers the request when
    /// it was fetched with at least that limit: the source had no more.
    pub fn covers(&self, max_results: usize) -> bool {
        self.response.total_results >= max_results || self.fetched_limit >= max_results
    }

    fn is_expired_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) >= ttl
    }
}

/// Process-scoped cache of aggregate responses.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct ResponseCache {
    entries: Cache<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder().build(),
            ttl,
        }
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up the response cached for exactly `query`.
    ///
    /// Returns an owned copy; mutating it does not affect the cache.
    /// An expired entry is evicted and reported as a miss.
    pub async fn get(&self, query: &str) -> Option<AggregateResponse> {
        self.get_entry(query).await.map(|entry| entry.response)
    }

    /// Like [`get`](Self::get), but returns the whole entry including the
    /// limit it was fetched with.
    pub async fn get_entry(&self, query: &str) -> Option<CacheEntry> {
        let now = Instant::now();
        let ttl = self.ttl;

        let outcome = self
            .entries
            .entry_by_ref(query)
            .and_compute_with(|existing| {
                let op = match existing {
                    Some(entry) if entry.value().is_expired_at(now, ttl) => Op::Remove,
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;

        match outcome {
            CompResult::Unchanged(entry) => {
                tracing::trace!(query, "cache hit");
                Some(entry.into_value())
            }
            CompResult::Removed(_) => {
                tracing::debug!(query, "cache entry expired and evicted");
                None
            }
            _ => None,
        }
    }

    /// Store `response` for `query`, replacing any previous entry.
    ///
    /// The fetch limit is taken to be the number of results held.
    pub async fn set(&self, query: &str, response: AggregateResponse) {
        let fetched_limit = response.total_results;
        self.set_fetched(query, response, fetched_limit).await;
    }

    /// Store `response` for `query`, recording the `max_results` it was
    /// fetched with.
    pub async fn set_fetched(
        &self,
        query: &str,
        response: AggregateResponse,
        fetched_limit: usize,
    ) {
        let entry = CacheEntry {
            response,
            stored_at: Instant::now(),
            fetched_limit,
        };
        self.entries.insert(query.to_owned(), entry).await;
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Whether an entry for `query` is physically present, expired or not.
    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }

    /// Number of stored entries, including expired ones not yet accessed.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
