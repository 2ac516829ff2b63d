//! Encyclopedia lookups that supply context for question answering
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use super::{base_url, fetch_json};
use crate::core::{truncate_chars, ServiceError};

const SERVICE: &str = "knowledge";

#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Summary of the best-matching article, or `None` when nothing matches
    async fn lookup(&self, question: &str) -> Result<Option<String>, ServiceError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: String,
}

/// Wikipedia search followed by a page-summary fetch
pub struct WikipediaClient {
    client: reqwest::Client,
    base_url: String,
    max_chars: usize,
}

impl WikipediaClient {
    pub fn new(client: reqwest::Client, base: &str, max_chars: usize) -> Self {
        Self {
            client,
            base_url: base_url(base),
            max_chars,
        }
    }
}

#[async_trait]
impl KnowledgeSource for WikipediaClient {
    async fn lookup(&self, question: &str) -> Result<Option<String>, ServiceError> {
        let request = self
            .client
            .get(format!("{}/w/api.php", self.base_url))
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("format", "json"),
                ("srlimit", "1"),
                ("srsearch", question),
            ]);
        let found: SearchResponse = fetch_json(SERVICE, request).await?;

        let Some(hit) = found.query.search.into_iter().next() else {
            debug!("No article matches {question:?}");
            return Ok(None);
        };

        let title = hit.title.replace(' ', "_");
        let mut url = reqwest::Url::parse(&format!("{}/api/rest_v1/page/summary/", self.base_url))
            .map_err(|e| ServiceError::malformed(SERVICE, e))?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::malformed(SERVICE, "base URL cannot hold a path"))?
            .pop_if_empty()
            .push(&title);

        let summary: PageSummary = fetch_json(SERVICE, self.client.get(url)).await?;
        let extract = summary.extract.trim();
        if extract.is_empty() {
            return Ok(None);
        }
        Ok(Some(truncate_chars(extract, self.max_chars)))
    }
}
