//! DuckDuckGo content source. Scrapes the HTML endpoint, no API key required.
//!
//! Uses the HTML-only version at `https://html.duckduckgo.com/html/`
//! which requires no JavaScript and is tolerant of automated requests.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::SearchConfig;
use crate::content;
use crate::error::SearchError;
use crate::http::{self, ClientProfile};
use crate::source::ContentSource;
use crate::types::SearchResult;

/// Default DuckDuckGo HTML endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo HTML search scraper and page fetcher.
///
/// Holds a search client for provider queries and a separate page client
/// shared by all extraction requests.
pub struct DuckDuckGoSource {
    search_client: reqwest::Client,
    page_client: reqwest::Client,
    endpoint: String,
    max_content_chars: usize,
}

impl DuckDuckGoSource {
    /// Create a source using the public DuckDuckGo endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Self::with_endpoint(config, DEFAULT_ENDPOINT)
    }

    /// Create a source that posts queries to a custom endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn with_endpoint(
        config: &SearchConfig,
        endpoint: impl Into<String>,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            search_client: http::build_client(config, ClientProfile::Search)?,
            page_client: http::build_client(config, ClientProfile::Page)?,
            endpoint: endpoint.into(),
            max_content_chars: config.max_content_chars,
        })
    }

    /// Extract the actual URL from DuckDuckGo's redirect wrapper.
    ///
    /// DDG wraps URLs like: `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`
    /// We parse out the `uddg` query parameter and URL-decode it.
    fn extract_url(href: &str) -> Option<String> {
        let full_href = if href.starts_with("//") {
            format!("https:{href}")
        } else {
            href.to_string()
        };

        let parsed = Url::parse(&full_href).ok()?;

        if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        } else {
            Some(full_href)
        }
    }
}

impl ContentSource for DuckDuckGoSource {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "DuckDuckGo search");

        let response = self
            .search_client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("DuckDuckGo HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo response read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");

        parse_duckduckgo_html(&html, max_results)
    }

    async fn extract_content(&self, url: &str) -> Result<String, SearchError> {
        let response = match self.page_client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, error = %e, "page fetch failed");
                return Ok(String::new());
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "page fetch returned non-success status");
            return Ok(String::new());
        }

        match response.text().await {
            Ok(html) => Ok(content::extract_text(&html, self.max_content_chars)),
            Err(e) => {
                tracing::warn!(url, error = %e, "page body read failed");
                Ok(String::new())
            }
        }
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

/// Ensure a displayed URL is scheme-qualified.
fn ensure_scheme(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

/// Element text with inner whitespace collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse DuckDuckGo HTML response into search results.
///
/// Extracted as a separate function for testability with mock HTML.
pub(crate) fn parse_duckduckgo_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(".result:not(.result--ad)")
        .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(".result__a, .result__title")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let link_sel = Selector::parse(".result__url")
        .map_err(|e| SearchError::Parse(format!("invalid link selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }

        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };

        let title = element_text(title_el);
        if title.is_empty() {
            continue;
        }

        // Prefer the anchor target; fall back to the displayed URL text.
        let url = title_el
            .value()
            .attr("href")
            .and_then(DuckDuckGoSource::extract_url)
            .or_else(|| {
                element
                    .select(&link_sel)
                    .next()
                    .map(element_text)
                    .filter(|u| !u.is_empty())
                    .map(|u| ensure_scheme(&u))
            });

        let Some(url) = url.filter(|u| Url::parse(u).is_ok()) else {
            continue;
        };

        let description = element
            .select(&snippet_sel)
            .next()
            .map(element_text)
            .filter(|s| !s.is_empty());

        results.push(SearchResult {
            title,
            url,
            description,
            content: None,
            timestamp: None,
        });
    }

    tracing::debug!(count = results.len(), "DuckDuckGo results parsed");
    Ok(results)
}
