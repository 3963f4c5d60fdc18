//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls result limits, per-call timeouts, content
//! truncation, caching and HTTP client behaviour.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Configuration for retrieval, extraction and caching.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Result count used when a request does not specify one.
    pub default_max_results: usize,
    /// System-wide upper bound on results per request.
    pub max_results_cap: usize,
    /// Timeout in seconds applied to the search call and to each page
    /// extraction.
    pub timeout_seconds: u64,
    /// Maximum characters of extracted text kept per result.
    pub max_content_chars: usize,
    /// How long cached responses stay valid, in seconds.
    pub cache_ttl_seconds: u64,
    /// Idle connections kept per host by the HTTP client.
    pub max_connections_per_host: usize,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_results: 10,
            max_results_cap: 10,
            timeout_seconds: 30,
            max_content_chars: 5000,
            cache_ttl_seconds: 30 * 60,
            max_connections_per_host: 8,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `default_max_results` and `max_results_cap` must be greater than 0
    /// - `default_max_results` must be <= `max_results_cap`
    /// - `timeout_seconds` must be greater than 0
    /// - `max_content_chars` must be greater than 0
    /// - `cache_ttl_seconds` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results_cap == 0 || self.default_max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.default_max_results > self.max_results_cap {
            return Err(SearchError::Config(
                "default_max_results must be <= max_results_cap".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_content_chars == 0 {
            return Err(SearchError::Config(
                "max_content_chars must be greater than 0".into(),
            ));
        }
        if self.cache_ttl_seconds == 0 {
            return Err(SearchError::Config(
                "cache_ttl_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Per-call timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Cache time-to-live as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Resolve a requested result count against the configured default and cap.
    ///
    /// `None` selects the default; values are clamped into `1..=max_results_cap`.
    pub fn resolve_max_results(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_max_results)
            .clamp(1, self.max_results_cap.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.default_max_results, 10);
        assert_eq!(config.max_results_cap, 10);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.max_content_chars, 5000);
        assert_eq!(config.cache_ttl_seconds, 1800);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_cap_rejected() {
        let config = SearchConfig {
            max_results_cap: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn default_above_cap_rejected() {
        let config = SearchConfig {
            default_max_results: 20,
            max_results_cap: 10,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_results_cap"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn zero_content_limit_rejected() {
        let config = SearchConfig {
            max_content_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_ttl_rejected() {
        let config = SearchConfig {
            cache_ttl_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cache_ttl"));
    }

    #[test]
    fn resolve_max_results_uses_default() {
        let config = SearchConfig {
            default_max_results: 5,
            ..Default::default()
        };
        assert_eq!(config.resolve_max_results(None), 5);
    }

    #[test]
    fn resolve_max_results_clamps_to_cap() {
        let config = SearchConfig::default();
        assert_eq!(config.resolve_max_results(Some(50)), 10);
        assert_eq!(config.resolve_max_results(Some(0)), 1);
        assert_eq!(config.resolve_max_results(Some(3)), 3);
    }

    #[test]
    fn durations_follow_seconds() {
        let config = SearchConfig {
            timeout_seconds: 7,
            cache_ttl_seconds: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(7));
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn custom_user_agent() {
        let config = SearchConfig {
            user_agent: Some("CustomBot/1.0".into()),
            ..Default::default()
        };
        assert_eq!(config.user_agent.as_deref(), Some("CustomBot/1.0"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"timeout_seconds": 5}"#).expect("deserialize");
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.max_content_chars, 5000);
    }
}
