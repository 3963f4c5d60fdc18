//! Aggregation pipeline: one ranked search, then concurrent page extraction.
//!
//! The pipeline never fails because a provider is down. A failed or empty
//! search yields an empty response; a failed extraction leaves that
//! result's `content` empty while every other result is still enriched.

use std::time::Duration;

use futures::future::join_all;
use tokio::time::{timeout, Instant};

use crate::config::SearchConfig;
use crate::content::truncate_chars;
use crate::error::SearchError;
use crate::source::ContentSource;
use crate::types::AggregateResponse;

/// Retrieves ranked results from a [`ContentSource`] and fills in page content.
pub struct AggregationPipeline<S> {
    source: S,
    call_timeout: Duration,
    max_content_chars: usize,
}

impl<S: ContentSource> AggregationPipeline<S> {
    /// Create a pipeline over `source` using the timeout and content limit
    /// from `config`.
    pub fn new(source: S, config: &SearchConfig) -> Self {
        Self {
            source,
            call_timeout: config.timeout(),
            max_content_chars: config.max_content_chars,
        }
    }

    /// The underlying content source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch ranked results for `query` and extract each result's page text.
    ///
    /// # Pipeline
    ///
    /// 1. Record the start time
    /// 2. Run one search under the per-call timeout; failure, timeout or
    ///    zero results produce an empty response
    /// 3. Truncate to `max_results`
    /// 4. Extract every result's page concurrently, each under its own
    ///    timeout; failures leave `content` as `None`
    /// 5. Return results in search order with the elapsed time
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `max_results` is zero. Provider
    /// failures are never returned as errors.
    pub async fn fetch(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<AggregateResponse, SearchError> {
        if max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }

        let started = Instant::now();
        let source = self.source.name();

        tracing::debug!(source, max_results, "fetching search results");
        let mut results =
            match timeout(self.call_timeout, self.source.search(query, max_results)).await {
                Ok(Ok(results)) => results,
                Ok(Err(err)) => {
                    tracing::warn!(source, error = %err, "search provider failed");
                    Vec::new()
                }
                Err(_) => {
                    tracing::warn!(
                        source,
                        timeout_secs = self.call_timeout.as_secs_f64(),
                        "search provider timed out"
                    );
                    Vec::new()
                }
            };

        if results.is_empty() {
            tracing::warn!(source, "no search results");
            return Ok(AggregateResponse::empty(
                query,
                started.elapsed().as_secs_f64(),
            ));
        }

        results.truncate(max_results);

        tracing::debug!(count = results.len(), "extracting page content");
        let contents = join_all(results.iter().map(|r| self.extract(&r.url))).await;

        for (result, content) in results.iter_mut().zip(contents) {
            result.content = content;
        }

        let search_time = started.elapsed().as_secs_f64();
        tracing::info!(
            count = results.len(),
            search_time,
            "search completed"
        );

        Ok(AggregateResponse::new(query, results, search_time))
    }

    /// Extract one page, mapping every failure to `None`.
    async fn extract(&self, url: &str) -> Option<String> {
        match timeout(self.call_timeout, self.source.extract_content(url)).await {
            Ok(Ok(text)) if text.trim().is_empty() => None,
            Ok(Ok(text)) => Some(truncate_chars(&text, self.max_content_chars)),
            Ok(Err(err)) => {
                tracing::warn!(url, error = %err, "content extraction failed");
                None
            }
            Err(_) => {
                tracing::warn!(url, "content extraction timed out");
                None
            }
        }
    }
}
