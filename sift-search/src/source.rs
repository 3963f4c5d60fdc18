//! Trait definition for pluggable content sources.
//!
//! A content source is the boundary to an external search provider: it
//! returns ranked results for a query and readable text for a result URL.
//! [`DuckDuckGoSource`](crate::sources::DuckDuckGoSource) is the built-in
//! implementation.

use std::future::Future;

use crate::error::SearchError;
use crate::types::SearchResult;

/// A pluggable search and page-extraction backend.
///
/// All implementations must be `Send + Sync` so that extraction requests
/// for several results can run concurrently against one source.
pub trait ContentSource: Send + Sync {
    /// Return ranked results for `query`, at most `max_results` of them.
    ///
    /// Every returned result has `content` set to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] only when the provider is unavailable as a
    /// whole (network outage, blocked request). Individual malformed
    /// entries are skipped rather than failing the call.
    fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;

    /// Fetch `url` and return its readable text.
    ///
    /// Implementations apply their own timeout and should prefer returning
    /// an empty string over failing. Callers tolerate either.
    fn extract_content(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<String, SearchError>> + Send;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}
