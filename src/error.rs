//! Error types for the sift service.

use sift_search::SearchError;

use crate::answer::AnswerError;

/// Top-level error type for the search and answer service.
#[derive(Debug, thiserror::Error)]
pub enum SiftError {
    /// The caller supplied a query that cannot be served.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Search retrieval or pipeline argument error.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Answer provider construction error.
    #[error("answer provider error: {0}")]
    Answer(#[from] AnswerError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// HTTP server bind or serve error.
    #[error("server error: {0}")]
    Server(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SiftError {
    /// Whether the error was caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuery(_) | Self::Search(SearchError::InvalidQuery(_))
        )
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SiftError>;
