//! Error types for the sift-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Queries and page bodies never appear in
//! error messages.

/// Errors that can occur while retrieving or enriching search results.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to the search provider or a result page failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a provider response or page HTML.
    #[error("parse error: {0}")]
    Parse(String),

    /// A provider call exceeded its time budget.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Invalid search configuration or arguments.
    #[error("config error: {0}")]
    Config(String),

    /// The query was empty or blank.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Convenience type alias for sift-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
