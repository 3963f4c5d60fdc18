//! Answer generation: provider adapters and the parallel fan-out.
//!
//! An [`AnswerSource`] turns a query plus grounding context into free text.
//! [`AnswerFanout`] sends the same request to every configured source at
//! once and merges the outcomes, one entry per provider.

pub mod error;
pub mod fanout;
pub mod gemini;
pub mod groq;
pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::AnswersConfig;

pub use error::AnswerError;
pub use fanout::AnswerFanout;
pub use gemini::GeminiSource;
pub use groq::GroqSource;

/// Capability boundary to an external answer-generation provider.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Stable provider id used as the key in merged answer maps
    /// (e.g. `"gemini"`, `"groq"`).
    fn name(&self) -> &str;

    /// Generate an answer to `query` grounded in `context`.
    async fn generate(&self, query: &str, context: &str) -> Result<String, AnswerError>;

    /// Probe whether the provider currently answers requests.
    async fn is_available(&self) -> bool;
}

/// Build every enabled answer source described by `config`.
///
/// # Errors
///
/// Returns [`AnswerError::ConfigError`] if an enabled provider has no API
/// key or its HTTP client cannot be built.
pub fn sources_from_config(config: &AnswersConfig) -> Result<Vec<Arc<dyn AnswerSource>>, AnswerError> {
    let timeout = config.timeout();
    let mut sources: Vec<Arc<dyn AnswerSource>> = Vec::new();

    if config.gemini.enabled {
        sources.push(Arc::new(GeminiSource::from_config(&config.gemini, timeout)?));
    }
    if config.groq.enabled {
        sources.push(Arc::new(GroqSource::from_config(&config.groq, timeout)?));
    }

    tracing::debug!(count = sources.len(), "answer sources configured");
    Ok(sources)
}

/// Require a non-blank API key for `provider`.
fn require_api_key(provider: &str, env_var: &str, key: Option<&str>) -> Result<String, AnswerError> {
    match key.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_owned()),
        _ => Err(AnswerError::ConfigError(format!(
            "{provider} is enabled but has no API key (set {env_var} or answers.{provider}.api_key)"
        ))),
    }
}

fn build_http_client(provider: &str, timeout: Duration) -> Result<reqwest::Client, AnswerError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AnswerError::ConfigError(format!("failed to build {provider} HTTP client: {e}")))
}

/// Map a non-success provider response to an [`AnswerError`].
fn map_http_error(provider: &str, status: reqwest::StatusCode, body: &str) -> AnswerError {
    AnswerError::RequestError(format!(
        "{provider} HTTP {}: {}",
        status.as_u16(),
        extract_error_message(body)
    ))
}

/// Extract `error.message` from a provider error body, falling back to the raw body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}
