//! Gemini answer source over the `generateContent` REST API.
//!
//! The API key is sent as the `?key=` query parameter. Thinking models tag
//! reasoning parts with `"thought": true`; those parts are dropped.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::error::AnswerError;
use super::prompt::{PROBE_PROMPT, gemini_prompt};
use super::{AnswerSource, build_http_client, map_http_error, require_api_key};
use crate::config::ProviderConfig;

/// Gemini v1beta REST API base.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Answer source backed by Google's Gemini models.
pub struct GeminiSource {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSource")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiSource {
    /// Create a source for `model` using the public API base.
    ///
    /// # Errors
    ///
    /// Returns [`AnswerError::ConfigError`] if the key is blank or the HTTP
    /// client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AnswerError> {
        let api_key: String = api_key.into();
        let api_key = require_api_key("gemini", "GEMINI_API_KEY", Some(api_key.as_str()))?;
        Ok(Self {
            client: build_http_client("gemini", timeout)?,
            api_key,
            model: model.into(),
            base_url: GEMINI_API_BASE.to_owned(),
        })
    }

    /// Build a source from a provider config section.
    ///
    /// # Errors
    ///
    /// Returns [`AnswerError::ConfigError`] if no API key is configured.
    pub fn from_config(config: &ProviderConfig, timeout: Duration) -> Result<Self, AnswerError> {
        let api_key = require_api_key("gemini", "GEMINI_API_KEY", config.api_key.as_deref())?;
        let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
        let source = Self::new(api_key, model, timeout)?;
        Ok(match &config.base_url {
            Some(url) => source.with_base_url(url),
            None => source,
        })
    }

    /// Point the source at a different API base (no trailing slash).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    /// The configured model id.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn post(&self, prompt: &str) -> Result<String, AnswerError> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&build_request_body(prompt))
            .send()
            .await
            .map_err(|e| AnswerError::from_transport("gemini", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error("gemini", status, &body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AnswerError::ParseError(format!("gemini response is not JSON: {e}")))?;

        extract_text(&body).ok_or_else(|| {
            AnswerError::ParseError("gemini response contained no candidate text".into())
        })
    }
}

/// Build the `generateContent` request body for a single user turn.
pub fn build_request_body(prompt: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }]
    })
}

/// Join the text parts of the first candidate, skipping thought parts.
///
/// Falls back to thought text if the candidate has nothing else.
pub fn extract_text(response: &Value) -> Option<String> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;

    let answer: Vec<&str> = parts
        .iter()
        .filter(|p| !p["thought"].as_bool().unwrap_or(false))
        .filter_map(|p| p["text"].as_str())
        .collect();
    if !answer.is_empty() {
        return Some(answer.join(""));
    }

    let thoughts: Vec<&str> = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    (!thoughts.is_empty()).then(|| thoughts.join(""))
}

#[async_trait]
impl AnswerSource for GeminiSource {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, query: &str, context: &str) -> Result<String, AnswerError> {
        tracing::debug!(model = %self.model, "requesting gemini answer");
        self.post(&gemini_prompt(query, context)).await
    }

    async fn is_available(&self) -> bool {
        match self.post(PROBE_PROMPT).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(code = e.code(), error = %e, "gemini probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> GeminiSource {
        GeminiSource::new("test-key", DEFAULT_GEMINI_MODEL, Duration::from_secs(5)).expect("source")
    }

    #[test]
    fn request_body_shape() {
        let body = build_request_body("hello");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn endpoint_includes_model() {
        let source = source().with_base_url("http://localhost:9999/v1beta/");
        assert_eq!(
            source.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn extract_joins_text_parts() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello, " }, { "text": "world" }] } }]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("Hello, world"));
    }

    #[test]
    fn extract_skips_thought_parts() {
        let body = json!({
            "candidates": [{ "content": { "parts": [
                { "text": "thinking...", "thought": true },
                { "text": "The answer" }
            ] } }]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("The answer"));
    }

    #[test]
    fn extract_falls_back_to_thoughts() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "only thought", "thought": true }] } }]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("only thought"));
    }

    #[test]
    fn extract_without_candidates_is_none() {
        assert!(extract_text(&json!({ "candidates": [] })).is_none());
        assert!(extract_text(&json!({})).is_none());
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", source());
        assert!(!rendered.contains("test-key"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn from_config_applies_defaults() {
        let config = ProviderConfig {
            api_key: Some("k".into()),
            ..Default::default()
        };
        let source = GeminiSource::from_config(&config, Duration::from_secs(1)).expect("source");
        assert_eq!(source.model(), DEFAULT_GEMINI_MODEL);
        assert_eq!(source.base_url, GEMINI_API_BASE);
    }

    #[test]
    fn from_config_without_key_fails() {
        let err = GeminiSource::from_config(&ProviderConfig::default(), Duration::from_secs(1))
            .unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }
}
