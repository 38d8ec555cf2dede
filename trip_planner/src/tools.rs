//! The planner's tools. Both search the web through the process-wide
//! [`SearchClient`] installed at start-up.

use std::sync::Arc;

use fntool::tool;
use once_cell::sync::OnceCell;

use crate::search::{FLIGHT_DOMAINS, HOTEL_DOMAINS, SearchClient, SearchError, format_results};

static SEARCH_CLIENT: OnceCell<Arc<dyn SearchClient>> = OnceCell::new();

/// Installs the search client the tools use. Only the first call wins;
/// returns whether this one did.
pub fn install_search_client(client: Arc<dyn SearchClient>) -> bool {
    let installed = SEARCH_CLIENT.set(client).is_ok();
    if !installed {
        tracing::warn!("search client already installed, keeping the first one");
    }
    installed
}

async fn search(query: &str, include_domains: &[&str]) -> Result<String, SearchError> {
    let client = SEARCH_CLIENT.get().ok_or(SearchError::NotConfigured)?;
    let response = client.search(query, include_domains).await?;
    tracing::debug!(%query, results = response.results.len(), "search finished");
    Ok(format_results(&response))
}

/// Searches for flights based on the provided query
///
/// Args:
///     query (str): The search query for flights
///
/// Returns:
///     str: A formatted string containing the search results
#[tool]
pub async fn flight_search(query: String) -> Result<String, SearchError> {
    search(&query, &FLIGHT_DOMAINS).await
}

/// Searches for hotels based on the provided query
///
/// Args:
///     query (str): The search query for hotels
///
/// Returns:
///     str: A formatted string containing the search results
#[tool]
pub async fn hotel_search(query: String) -> Result<String, SearchError> {
    search(&query, &HOTEL_DOMAINS).await
}
