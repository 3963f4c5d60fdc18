//! Sift: web search aggregation with parallel answer generation.
//!
//! A query flows through one pipeline:
//! Query → Cache → Search → Page extraction → Context → Answer fan-out
//!
//! # Architecture
//!
//! - **Retrieval**: ranked results and page text from [`sift_search`]
//! - **Cache**: recent search responses kept for a fixed TTL
//! - **Context**: the top results rendered as grounding text
//! - **Fan-out**: every answer provider (Gemini, Groq) queried concurrently,
//!   failures replaced by per-provider placeholders
//! - **Server**: `axum` endpoints for search, provider status and health

pub mod answer;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod server;

pub use answer::{AnswerError, AnswerFanout, AnswerSource};
pub use config::SiftConfig;
pub use coordinator::RequestCoordinator;
pub use error::{Result, SiftError};
pub use server::SiftServer;
