//! Grounding context for answer generation.

use sift_search::AggregateResponse;

/// Default number of top-ranked results used as context.
pub const DEFAULT_CONTEXT_RESULTS: usize = 3;

/// Render the first `top_n` results as a plain-text context block.
///
/// Each result becomes a `Title/Description/Content` stanza; stanzas are
/// separated by a blank line. Missing fields render as empty lines, and an
/// empty result set yields an empty string.
pub fn build_context(response: &AggregateResponse, top_n: usize) -> String {
    response
        .results
        .iter()
        .take(top_n)
        .map(|result| {
            format!(
                "Title: {}\nDescription: {}\nContent: {}\n",
                result.title,
                result.description.as_deref().unwrap_or_default(),
                result.content.as_deref().unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
