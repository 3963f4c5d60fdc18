//! Content source implementations.
//!
//! Each module provides a struct implementing [`crate::source::ContentSource`]
//! for a specific search provider.

pub mod duckduckgo;

pub use duckduckgo::DuckDuckGoSource;
