//! Configuration types for the sift service.
//!
//! Loaded from TOML (`$XDG_CONFIG_HOME/sift/config.toml` by default). Every
//! section has defaults, so an empty file is a valid config. API keys may be
//! supplied through `GEMINI_API_KEY` and `GROQ_API_KEY` instead of the file.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sift_search::SearchConfig;

use crate::error::{Result, SiftError};

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable holding the Groq API key.
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable selecting the config file path.
pub const CONFIG_PATH_ENV: &str = "SIFT_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Search retrieval, extraction and cache settings.
    pub search: SearchConfig,
    /// Answer generation settings.
    pub answers: AnswersConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind.
    pub host: String,
    /// Port to bind (`0` picks a free port).
    pub port: u16,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8000,
            allowed_origins: vec!["http://localhost:5173".to_owned()],
        }
    }
}

/// Answer generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswersConfig {
    /// How many top-ranked results feed the answer context.
    pub context_results: usize,
    /// Per-provider call timeout in seconds.
    pub timeout_seconds: u64,
    /// Gemini provider settings.
    pub gemini: ProviderConfig,
    /// Groq provider settings.
    pub groq: ProviderConfig,
}

impl Default for AnswersConfig {
    fn default() -> Self {
        Self {
            context_results: 3,
            timeout_seconds: 30,
            gemini: ProviderConfig::default(),
            groq: ProviderConfig::default(),
        }
    }
}

impl AnswersConfig {
    /// Per-provider call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Settings for one answer provider.
///
/// Unset `model` and `base_url` fall back to the provider's defaults.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Whether the provider takes part in the fan-out.
    pub enabled: bool,
    /// API key; usually supplied through the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model id override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// API base URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: None,
            base_url: None,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("enabled", &self.enabled)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl SiftConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SiftError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SiftError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/sift/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("sift").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("sift")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/sift-config.toml")
        }
    }

    /// Fill API keys from `GEMINI_API_KEY` and `GROQ_API_KEY` when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Fill API keys from `lookup`, which maps an environment variable name
    /// to its value. Blank values are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = present(GEMINI_API_KEY_ENV) {
            self.answers.gemini.api_key = Some(key);
        }
        if let Some(key) = present(GROQ_API_KEY_ENV) {
            self.answers.groq.api_key = Some(key);
        }
    }

    /// Check that the configuration can run a server.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Config`] describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.search
            .validate()
            .map_err(|e| SiftError::Config(e.to_string()))?;
        if self.answers.context_results == 0 {
            return Err(SiftError::Config(
                "answers.context_results must be greater than 0".into(),
            ));
        }
        if self.answers.timeout_seconds == 0 {
            return Err(SiftError::Config(
                "answers.timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.server.host.trim().is_empty() {
            return Err(SiftError::Config("server.host must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = SiftConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.answers.context_results, 3);
        assert_eq!(config.search.default_max_results, 10);
        assert!(config.answers.gemini.enabled);
        assert!(config.answers.groq.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_is_default() {
        let config: SiftConfig = toml::from_str("").expect("parse");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.answers.timeout_seconds, 30);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: SiftConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [answers.groq]
            enabled = false
            "#,
        )
        .expect("parse");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.allowed_origins, ["http://localhost:5173"]);
        assert!(!config.answers.groq.enabled);
        assert!(config.answers.gemini.enabled);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = SiftConfig::from_file(std::path::Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(SiftError::Io(_))));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = SiftConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("sift"));
    }

    #[test]
    fn env_overrides_fill_keys() {
        let mut config = SiftConfig::default();
        config.answers.groq.api_key = Some("from-file".into());
        config.apply_overrides_from(|key| match key {
            GEMINI_API_KEY_ENV => Some("gem-env".into()),
            GROQ_API_KEY_ENV => Some("  ".into()),
            _ => None,
        });
        assert_eq!(config.answers.gemini.api_key.as_deref(), Some("gem-env"));
        assert_eq!(config.answers.groq.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn validate_rejects_zero_context() {
        let mut config = SiftConfig::default();
        config.answers.context_results = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("context_results"));
    }

    #[test]
    fn validate_surfaces_search_errors() {
        let mut config = SiftConfig::default();
        config.search.timeout_seconds = 0;
        assert!(matches!(config.validate(), Err(SiftError::Config(_))));
    }

    #[test]
    fn debug_redacts_api_key() {
        let provider = ProviderConfig {
            api_key: Some("secret-key".into()),
            ..Default::default()
        };
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("secret-key"));
    }
}
