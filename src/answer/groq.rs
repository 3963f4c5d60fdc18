//! Groq answer source over the OpenAI-compatible chat completions API.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::error::AnswerError;
use super::prompt::{PROBE_PROMPT, SYSTEM_MESSAGE, groq_prompt};
use super::{AnswerSource, build_http_client, map_http_error, require_api_key};
use crate::config::ProviderConfig;

/// Groq API base.
pub const GROQ_API_BASE: &str = "https://api.groq.com";

/// Default model when none is configured.
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// Answer source backed by Groq-hosted models.
pub struct GroqSource {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GroqSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqSource")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GroqSource {
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
        let api_key = require_api_key("groq", "GROQ_API_KEY", Some(api_key.as_str()))?;
        Ok(Self {
            client: build_http_client("groq", timeout)?,
            api_key,
            model: model.into(),
            base_url: GROQ_API_BASE.to_owned(),
        })
    }

    /// Build a source from a provider config section.
    ///
    /// # Errors
    ///
    /// Returns [`AnswerError::ConfigError`] if no API key is configured.
    pub fn from_config(config: &ProviderConfig, timeout: Duration) -> Result<Self, AnswerError> {
        let api_key = require_api_key("groq", "GROQ_API_KEY", config.api_key.as_deref())?;
        let model = config.model.as_deref().unwrap_or(DEFAULT_GROQ_MODEL);
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
        format!("{}/openai/v1/chat/completions", self.base_url)
    }

    async fn complete(&self, messages: Value) -> Result<String, AnswerError> {
        let body = build_completions_request(&self.model, messages);
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnswerError::from_transport("groq", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error("groq", status, &body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AnswerError::ParseError(format!("groq response is not JSON: {e}")))?;

        extract_content(&body)
            .ok_or_else(|| AnswerError::ParseError("groq response contained no message content".into()))
    }
}

/// Build a non-streaming chat completions request body.
pub fn build_completions_request(model: &str, messages: Value) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "stream": false,
    })
}

/// Read `choices[0].message.content`.
pub fn extract_content(response: &Value) -> Option<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(String::from)
}

#[async_trait]
impl AnswerSource for GroqSource {
    fn name(&self) -> &str {
        "groq"
    }

    async fn generate(&self, query: &str, context: &str) -> Result<String, AnswerError> {
        tracing::debug!(model = %self.model, "requesting groq answer");
        let messages = json!([
            { "role": "system", "content": SYSTEM_MESSAGE },
            { "role": "user", "content": groq_prompt(query, context) },
        ]);
        self.complete(messages).await
    }

    async fn is_available(&self) -> bool {
        let messages = json!([{ "role": "user", "content": PROBE_PROMPT }]);
        match self.complete(messages).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(code = e.code(), error = %e, "groq probe failed");
                false
            }
        }
    }
}
