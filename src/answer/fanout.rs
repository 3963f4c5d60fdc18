//! Parallel dispatch to every configured answer source.
//!
//! Each source runs in its own tokio task under a per-call timeout. Errors,
//! timeouts and panics are converted at the join point into a fixed
//! placeholder for that provider, so one slow or broken provider never
//! affects the others and the merged map always has one entry per source.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::timeout;

use super::AnswerSource;
use super::error::AnswerError;

/// Placeholder used for every provider when no task could be scheduled.
pub const FAILED_PLACEHOLDER: &str = "Failed to generate response";

/// Placeholder recorded for a provider whose generation failed.
///
/// The provider id is shown with its first letter capitalised
/// (`"Error generating Gemini response"`).
pub fn error_placeholder(provider: &str) -> String {
    let mut chars = provider.chars();
    let display: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("Error generating {display} response")
}

/// Dispatches one request to many answer sources and merges the outcomes.
pub struct AnswerFanout {
    sources: Vec<Arc<dyn AnswerSource>>,
    call_timeout: Duration,
}

impl AnswerFanout {
    /// Create a fan-out over `sources`, each call bounded by `call_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`AnswerError::ConfigError`] if two sources share a name.
    pub fn new(
        sources: Vec<Arc<dyn AnswerSource>>,
        call_timeout: Duration,
    ) -> Result<Self, AnswerError> {
        let mut seen = HashSet::new();
        for source in &sources {
            if !seen.insert(source.name().to_owned()) {
                return Err(AnswerError::ConfigError(format!(
                    "duplicate answer provider name: {}",
                    source.name()
                )));
            }
        }
        Ok(Self {
            sources,
            call_timeout,
        })
    }

    /// Names of the configured providers, in configuration order.
    pub fn provider_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_owned()).collect()
    }

    /// Number of configured providers.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no providers are configured.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Ask every provider to answer `query` grounded in `context`.
    ///
    /// Never fails: the result holds exactly one entry per configured
    /// provider, either its generated text or a failure placeholder.
    pub async fn dispatch(&self, query: &str, context: &str) -> BTreeMap<String, String> {
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::error!("no tokio runtime available for answer generation");
            return self.all_failed();
        }

        let tasks: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let query = query.to_owned();
                let context = context.to_owned();
                let call_timeout = self.call_timeout;
                tokio::spawn(async move {
                    match timeout(call_timeout, source.generate(&query, &context)).await {
                        Ok(outcome) => outcome,
                        Err(_) => Err(AnswerError::TimeoutError(format!(
                            "no answer within {}s",
                            call_timeout.as_secs_f64()
                        ))),
                    }
                })
            })
            .collect();

        let outcomes = join_all(tasks).await;

        self.sources
            .iter()
            .zip(outcomes)
            .map(|(source, outcome)| {
                let name = source.name().to_owned();
                let text = match outcome {
                    Ok(Ok(text)) => text,
                    Ok(Err(e)) => {
                        tracing::warn!(provider = %name, code = e.code(), error = %e, "answer generation failed");
                        error_placeholder(&name)
                    }
                    Err(join_err) => {
                        tracing::error!(provider = %name, error = %join_err, "answer task aborted");
                        error_placeholder(&name)
                    }
                };
                (name, text)
            })
            .collect()
    }

    /// Probe every provider concurrently.
    ///
    /// Each value reflects only that provider's probe; a probe that fails,
    /// panics or times out reports `false`.
    pub async fn check_availability(&self) -> BTreeMap<String, bool> {
        if tokio::runtime::Handle::try_current().is_err() {
            return self.provider_names().into_iter().map(|n| (n, false)).collect();
        }

        let tasks: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let call_timeout = self.call_timeout;
                tokio::spawn(async move {
                    timeout(call_timeout, source.is_available())
                        .await
                        .unwrap_or(false)
                })
            })
            .collect();

        let outcomes = join_all(tasks).await;

        self.sources
            .iter()
            .zip(outcomes)
            .map(|(source, outcome)| {
                let available = outcome.unwrap_or(false);
                tracing::debug!(provider = source.name(), available, "availability probe");
                (source.name().to_owned(), available)
            })
            .collect()
    }

    fn all_failed(&self) -> BTreeMap<String, String> {
        self.provider_names()
            .into_iter()
            .map(|name| (name, FAILED_PLACEHOLDER.to_owned()))
            .collect()
    }
}
