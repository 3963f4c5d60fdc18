//! Request coordination: validation, cache, retrieval and answer fan-out.

use std::collections::BTreeMap;
use std::sync::Arc;

use sift_search::{
    AggregateResponse, AggregationPipeline, ContentSource, DuckDuckGoSource, ResponseCache,
    SearchConfig,
};

use crate::answer::{self, AnswerFanout};
use crate::config::SiftConfig;
use crate::context::build_context;
use crate::error::{Result, SiftError};

/// Serves one query end to end.
///
/// # Flow
///
/// 1. Reject a blank query before any provider is contacted
/// 2. Resolve `max_results` against the configured default and cap
/// 3. Serve search results from the cache when fresh and fetched with a
///    limit at least as large, otherwise run the pipeline and cache a
///    non-empty outcome
/// 4. Build context from the top results and fan out to answer sources
/// 5. Return the response with the merged answers attached
///
/// Answers are generated on every request, including cache hits; only
/// search results are cached.
pub struct RequestCoordinator<S> {
    pipeline: AggregationPipeline<S>,
    cache: Arc<ResponseCache>,
    fanout: AnswerFanout,
    search_config: SearchConfig,
    context_results: usize,
}

impl<S: ContentSource> RequestCoordinator<S> {
    /// Wire the coordinator's collaborators together.
    pub fn new(
        pipeline: AggregationPipeline<S>,
        cache: Arc<ResponseCache>,
        fanout: AnswerFanout,
        search_config: SearchConfig,
        context_results: usize,
    ) -> Self {
        Self {
            pipeline,
            cache,
            fanout,
            search_config,
            context_results,
        }
    }

    /// The shared response cache.
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// The answer fan-out.
    pub fn fanout(&self) -> &AnswerFanout {
        &self.fanout
    }

    /// Search for `query` and attach answers from every provider.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::InvalidQuery`] for a blank query. Provider
    /// outages never surface as errors; they degrade to empty results or
    /// placeholder answers.
    pub async fn search(
        &self,
        query: &str,
        max_results: Option<usize>,
    ) -> Result<AggregateResponse> {
        if query.trim().is_empty() {
            return Err(SiftError::InvalidQuery("query must not be empty".into()));
        }
        let max_results = self.search_config.resolve_max_results(max_results);

        let cached = self
            .cache
            .get_entry(query)
            .await
            .filter(|entry| entry.covers(max_results));
        let response = match cached {
            Some(entry) => {
                tracing::debug!(max_results, "serving search results from cache");
                let mut response = entry.response;
                response.truncate(max_results);
                response
            }
            None => {
                let fresh = self.pipeline.fetch(query, max_results).await?;
                if fresh.total_results > 0 {
                    self.cache.set_fetched(query, fresh.clone(), max_results).await;
                }
                fresh
            }
        };

        let context = build_context(&response, self.context_results);
        let answers = self.fanout.dispatch(query, &context).await;
        tracing::info!(
            results = response.total_results,
            providers = answers.len(),
            "request served"
        );

        Ok(response.with_answers(answers))
    }

    /// Probe every answer provider.
    pub async fn provider_status(&self) -> BTreeMap<String, bool> {
        self.fanout.check_availability().await
    }
}

impl RequestCoordinator<DuckDuckGoSource> {
    /// Build the production coordinator: DuckDuckGo retrieval, a fresh
    /// cache and every enabled answer provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, an enabled provider has
    /// no API key, or an HTTP client cannot be built.
    pub fn from_config(config: &SiftConfig) -> Result<Self> {
        config.validate()?;

        let source = DuckDuckGoSource::new(&config.search)?;
        let pipeline = AggregationPipeline::new(source, &config.search);
        let cache = Arc::new(ResponseCache::new(config.search.cache_ttl()));
        let fanout = AnswerFanout::new(
            answer::sources_from_config(&config.answers)?,
            config.answers.timeout(),
        )?;

        tracing::info!(providers = ?fanout.provider_names(), "coordinator ready");
        Ok(Self::new(
            pipeline,
            cache,
            fanout,
            config.search.clone(),
            config.answers.context_results,
        ))
    }
}
