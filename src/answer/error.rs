//! Error types for answer sources.
//!
//! Each error variant carries a stable error code (SCREAMING_SNAKE_CASE)
//! that is included in the Display output and accessible via [`AnswerError::code()`].

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// Invalid or missing configuration, such as an absent API key.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// The provider request failed or returned a non-success status.
    pub const REQUEST_FAILED: &str = "REQUEST_FAILED";

    /// The provider response did not contain generated text.
    pub const PARSE_FAILED: &str = "PARSE_FAILED";

    /// The provider did not answer in time.
    pub const TIMEOUT_ERROR: &str = "TIMEOUT_ERROR";
}

/// Errors produced by answer sources.
///
/// The Display impl formats as `[CODE] message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    /// Invalid or missing configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    ConfigError(String),

    /// Request to the provider failed.
    #[error("[{}] {}", error_codes::REQUEST_FAILED, .0)]
    RequestError(String),

    /// Provider response could not be interpreted.
    #[error("[{}] {}", error_codes::PARSE_FAILED, .0)]
    ParseError(String),

    /// Request timed out.
    #[error("[{}] {}", error_codes::TIMEOUT_ERROR, .0)]
    TimeoutError(String),
}

impl AnswerError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => error_codes::CONFIG_INVALID,
            Self::RequestError(_) => error_codes::REQUEST_FAILED,
            Self::ParseError(_) => error_codes::PARSE_FAILED,
            Self::TimeoutError(_) => error_codes::TIMEOUT_ERROR,
        }
    }

    /// Returns the inner message without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::ConfigError(m)
            | Self::RequestError(m)
            | Self::ParseError(m)
            | Self::TimeoutError(m) => m,
        }
    }

    /// Classify a reqwest transport error.
    pub(crate) fn from_transport(provider: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(format!("{provider} request timed out: {err}"))
        } else {
            Self::RequestError(format!("{provider} request failed: {err}"))
        }
    }
}
