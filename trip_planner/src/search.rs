//! Web search collaborator used by the flight and hotel tools.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;

pub const FLIGHT_DOMAINS: [&str; 3] = ["booking.com", "qatarairways.com", "skyscanner.com"];
pub const HOTEL_DOMAINS: [&str; 2] = ["expedia.com", "marriott.com"];

const TAVILY_BASE_URL: &str = "https://api.tavily.com";

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("no search client installed")]
    NotConfigured,

    #[error("search request failed: {0}")]
    Http(String),

    #[error("search provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("invalid search response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Searches the web, restricted to `include_domains`.
    async fn search(
        &self,
        query: &str,
        include_domains: &[&str],
    ) -> Result<SearchResponse, SearchError>;
}

/// Numbered list of result contents, one per line.
///
/// Results with empty content are dropped but still use up their number,
/// so the list can skip (`1.`, `3.`).
pub fn format_results(response: &SearchResponse) -> String {
    response
        .results
        .iter()
        .enumerate()
        .filter(|(_, result)| !result.content.is_empty())
        .map(|(i, result)| format!("{}. {}", i + 1, result.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// HTTP client for the Tavily search API.
#[derive(Clone)]
pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: TAVILY_BASE_URL.to_owned(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(
        &self,
        query: &str,
        include_domains: &[&str],
    ) -> Result<SearchResponse, SearchError> {
        let url = format!("{}/search", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|err| SearchError::Http(format!("Invalid API key header: {err}")))?,
        );

        tracing::debug!(%query, domains = ?include_domains, "searching");
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&json!({
                "query": query,
                "include_domains": include_domains,
            }))
            .send()
            .await
            .map_err(|err| SearchError::Http(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SearchError::Http(err.to_string()))?;

        if !status.is_success() {
            return Err(SearchError::Provider {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|err| {
            SearchError::InvalidResponse(format!("Failed to parse response: {err}\nBody: {body}"))
        })
    }
}

impl std::fmt::Debug for TavilyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
