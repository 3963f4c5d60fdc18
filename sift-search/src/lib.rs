//! # sift-search
//!
//! Web result retrieval and page content extraction for sift.
//!
//! This crate turns a free-text query into an [`AggregateResponse`]: one
//! ranked search against a [`ContentSource`], followed by concurrent
//! extraction of each result's readable page text.
//!
//! ## Design
//!
//! - Scrapes DuckDuckGo's HTML endpoint; no API keys required
//! - Result order is exactly the provider's ranking order
//! - Extractions run concurrently, each with its own timeout
//! - Graceful degradation: a failed search yields an empty response and a
//!   failed extraction leaves only that result without content
//! - In-memory response cache with lazy TTL expiry
//!
//! ## Security
//!
//! - No network listeners; this is a library, not a server
//! - Search queries are logged only at trace/debug level

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod source;
pub mod sources;
pub mod types;

pub use cache::ResponseCache;
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use pipeline::AggregationPipeline;
pub use source::ContentSource;
pub use sources::DuckDuckGoSource;
pub use types::{AggregateResponse, SearchResult};

/// Search the web with DuckDuckGo and extract each result's page text.
///
/// Builds a one-off [`AggregationPipeline`] over a [`DuckDuckGoSource`].
/// Long-lived callers should build the pipeline once and reuse it.
///
/// # Errors
///
/// Returns [`SearchError::InvalidQuery`] for a blank query and
/// [`SearchError::Config`] for an invalid configuration. Provider
/// failures degrade to an empty response instead.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> sift_search::Result<()> {
/// let config = sift_search::SearchConfig::default();
/// let response = sift_search::search("rust memory safety", &config).await?;
/// for result in &response.results {
///     println!("{}: {}", result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<AggregateResponse> {
    config.validate()?;
    if query.trim().is_empty() {
        return Err(SearchError::InvalidQuery("query must not be empty".into()));
    }
    let pipeline = AggregationPipeline::new(DuckDuckGoSource::new(config)?, config);
    pipeline
        .fetch(query, config.resolve_max_results(None))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_validates_config_zero_timeout() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = search("test", &config).await.unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn search_validates_config_zero_cap() {
        let config = SearchConfig {
            max_results_cap: 0,
            ..Default::default()
        };
        let err = search("test", &config).await.unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }

    #[tokio::test]
    async fn search_rejects_blank_query() {
        let err = search("   ", &SearchConfig::default()).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }
}
