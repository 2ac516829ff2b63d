//! Web search (Bing Web Search API)
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use async_trait::async_trait;
use serde::Deserialize;

use super::{base_url, fetch_json, require_key};
use crate::core::ServiceError;

const SERVICE: &str = "search";

/// Results returned per query
pub const MAX_RESULTS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// At most [`MAX_RESULTS`] results
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ServiceError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(rename = "webPages")]
    web_pages: Option<WebPages>,
}

#[derive(Deserialize)]
struct WebPages {
    #[serde(default)]
    value: Vec<WebPage>,
}

#[derive(Deserialize)]
struct WebPage {
    name: String,
    #[serde(default)]
    snippet: String,
}

pub struct BingSearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl BingSearchClient {
    pub fn new(client: reqwest::Client, base: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url(base),
            api_key,
        }
    }
}

#[async_trait]
impl SearchProvider for BingSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ServiceError> {
        let key = require_key(SERVICE, &self.api_key)?;

        let request = self
            .client
            .get(format!("{}/v7.0/search", self.base_url))
            .header("Ocp-Apim-Subscription-Key", key)
            .query(&[("q", query)]);
        let body: SearchResponse = fetch_json(SERVICE, request).await?;

        Ok(body
            .web_pages
            .map(|pages| pages.value)
            .unwrap_or_default()
            .into_iter()
            .take(MAX_RESULTS)
            .map(|page| SearchResult {
                title: page.name,
                snippet: page.snippet,
            })
            .collect())
    }
}
