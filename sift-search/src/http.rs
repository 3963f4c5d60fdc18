//! HTTP clients for search requests and page fetches.
//!
//! Search requests and page fetches get separate clients. The search client
//! keeps cookies for the provider session; the page client does not, so one
//! site's cookies never leak into requests to another. Both share the
//! configured timeout, idle pool bound and User-Agent.

use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Desktop browser User-Agents used when none is configured.
const BROWSER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:129.0) Gecko/20100101 Firefox/129.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36 Edg/128.0.0.0",
];

/// What a client is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientProfile {
    /// Queries against the search provider. Keeps a cookie jar.
    Search,
    /// Fetching result pages for extraction. Stateless, HTML preferred.
    Page,
}

impl ClientProfile {
    fn default_headers(self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        if self == Self::Page {
            headers.insert(
                ACCEPT,
                HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.5"),
            );
        }
        headers
    }

    fn max_redirects(self) -> usize {
        match self {
            Self::Search => 3,
            Self::Page => 10,
        }
    }
}

/// Build a [`reqwest::Client`] for `profile`.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(
    config: &SearchConfig,
    profile: ClientProfile,
) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .cookie_store(profile == ClientProfile::Search)
        .default_headers(profile.default_headers())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .pool_max_idle_per_host(config.max_connections_per_host)
        .user_agent(user_agent(config))
        .redirect(reqwest::redirect::Policy::limited(profile.max_redirects()))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build {profile:?} client: {e}")))
}

/// The configured User-Agent, or a random browser one.
pub fn user_agent(config: &SearchConfig) -> String {
    if let Some(custom) = &config.user_agent {
        return custom.clone();
    }
    BROWSER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(BROWSER_AGENTS[0])
        .to_owned()
}
