//! Core types for search results and the aggregate search response.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single ranked result returned by a content source.
///
/// `content` is `None` until the extraction phase fills it, and stays
/// `None` when extraction for this result failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// Absolute, scheme-qualified URL of the result.
    pub url: String,
    /// Short snippet shown by the search provider.
    #[serde(default)]
    pub description: Option<String>,
    /// Readable page text extracted from `url`.
    #[serde(default)]
    pub content: Option<String>,
    /// Publication or crawl time, when the provider reports one.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl SearchResult {
    /// Create a result with only a title and URL set.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: None,
            content: None,
            timestamp: None,
        }
    }

    /// Attach a provider snippet.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The assembled response for one query.
///
/// `total_results` always equals `results.len()`; build values through
/// [`AggregateResponse::new`] or [`AggregateResponse::empty`] to keep it so.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResponse {
    /// The query exactly as the caller supplied it.
    pub query: String,
    /// Results in provider ranking order.
    pub results: Vec<SearchResult>,
    /// Number of entries in `results`.
    pub total_results: usize,
    /// Wall-clock seconds spent retrieving and enriching results.
    pub search_time: f64,
    /// Generated answers keyed by provider name. Absent until the
    /// answer fan-out has run.
    #[serde(default, rename = "llm_responses")]
    pub answers: Option<BTreeMap<String, String>>,
}

impl AggregateResponse {
    /// Build a response from ranked results, with no answers attached.
    pub fn new(query: impl Into<String>, results: Vec<SearchResult>, search_time: f64) -> Self {
        let total_results = results.len();
        Self {
            query: query.into(),
            results,
            total_results,
            search_time,
            answers: None,
        }
    }

    /// Build a response carrying no results.
    pub fn empty(query: impl Into<String>, search_time: f64) -> Self {
        Self::new(query, Vec::new(), search_time)
    }

    /// Keep only the first `max_results` results, updating `total_results`.
    pub fn truncate(&mut self, max_results: usize) {
        self.results.truncate(max_results);
        self.total_results = self.results.len();
    }

    /// Attach the merged answer map produced by the fan-out stage.
    pub fn with_answers(mut self, answers: BTreeMap<String, String>) -> Self {
        self.answers = Some(answers);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_construction() {
        let result = SearchResult::new("Example", "https://example.com")
            .with_description("An example page");
        assert_eq!(result.title, "Example");
        assert_eq!(result.description.as_deref(), Some("An example page"));
        assert!(result.content.is_none());
        assert!(result.timestamp.is_none());
    }

    #[test]
    fn new_response_counts_results() {
        let results = vec![
            SearchResult::new("A", "https://a.com"),
            SearchResult::new("B", "https://b.com"),
        ];
        let response = AggregateResponse::new("q", results, 0.5);
        assert_eq!(response.total_results, 2);
        assert_eq!(response.total_results, response.results.len());
        assert!(response.answers.is_none());
    }

    #[test]
    fn empty_response_has_zero_results() {
        let response = AggregateResponse::empty("nothing", 0.1);
        assert_eq!(response.total_results, 0);
        assert!(response.results.is_empty());
        assert_eq!(response.query, "nothing");
    }

    #[test]
    fn truncate_keeps_count_in_sync() {
        let results = (0..5)
            .map(|i| SearchResult::new(format!("R{i}"), format!("https://r{i}.com")))
            .collect();
        let mut response = AggregateResponse::new("q", results, 1.0);
        response.truncate(2);
        assert_eq!(response.total_results, 2);
        assert_eq!(response.results[1].title, "R1");

        response.truncate(10);
        assert_eq!(response.total_results, 2);
    }

    #[test]
    fn answers_serialize_as_llm_responses() {
        let mut answers = BTreeMap::new();
        answers.insert("gemini".to_string(), "hello".to_string());
        let response = AggregateResponse::empty("q", 0.0).with_answers(answers);

        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["llm_responses"]["gemini"], "hello");
        assert!(json.get("answers").is_none());
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let response = AggregateResponse::new("q", vec![SearchResult::new("A", "https://a.com")], 0.0);
        let json = serde_json::to_value(&response).expect("serialize");
        assert!(json["llm_responses"].is_null());
        assert!(json["results"][0]["content"].is_null());
        assert!(json["results"][0]["description"].is_null());
    }

    #[test]
    fn search_result_deserializes_without_optional_fields() {
        let json = r#"{"title":"T","url":"https://t.com"}"#;
        let result: SearchResult = serde_json::from_str(json).expect("deserialize");
        assert_eq!(result.url, "https://t.com");
        assert!(result.description.is_none());
    }
}
