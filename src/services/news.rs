//! Top headlines (newsapi.org)
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use async_trait::async_trait;
use serde::Deserialize;

use super::{base_url, fetch_json, require_key};
use crate::core::ServiceError;

const SERVICE: &str = "news";

/// Headlines returned per request
pub const MAX_HEADLINES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// At most [`MAX_HEADLINES`] articles
    async fn top_headlines(&self) -> Result<Vec<Article>, ServiceError>;
}

#[derive(Deserialize)]
struct HeadlinesResponse {
    status: String,
    #[serde(default)]
    articles: Vec<ArticleBlock>,
}

#[derive(Deserialize)]
struct ArticleBlock {
    title: Option<String>,
    description: Option<String>,
}

pub struct NewsApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    country: String,
}

impl NewsApiClient {
    pub fn new(
        client: reqwest::Client,
        base: &str,
        api_key: Option<String>,
        country: String,
    ) -> Self {
        Self {
            client,
            base_url: base_url(base),
            api_key,
            country,
        }
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn top_headlines(&self) -> Result<Vec<Article>, ServiceError> {
        let key = require_key(SERVICE, &self.api_key)?;

        let request = self
            .client
            .get(format!("{}/v2/top-headlines", self.base_url))
            .query(&[("country", self.country.as_str()), ("apiKey", key)]);
        let body: HeadlinesResponse = fetch_json(SERVICE, request).await?;

        if body.status != "ok" {
            return Err(ServiceError::unavailable(
                SERVICE,
                format!("status {}", body.status),
            ));
        }

        Ok(body
            .articles
            .into_iter()
            .filter_map(|a| {
                let title = a.title?.trim().to_string();
                (!title.is_empty()).then(|| Article {
                    title,
                    description: a.description.filter(|d| !d.trim().is_empty()),
                })
            })
            .take(MAX_HEADLINES)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NewsApiClient {
        NewsApiClient::new(
            crate::services::http_client(Duration::from_secs(5)).unwrap(),
            &server.uri(),
            Some("news-key".to_string()),
            "in".to_string(),
        )
    }

    #[tokio::test]
    async fn test_caps_at_five_headlines() {
        let articles: Vec<_> = (0..8)
            .map(|i| json!({"title": format!("Story {i}"), "description": format!("Details {i}")}))
            .collect();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/top-headlines"))
            .and(query_param("country", "in"))
            .and(query_param("apiKey", "news-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ok", "articles": articles})),
            )
            .mount(&server)
            .await;

        let headlines = client_for(&server).top_headlines().await.unwrap();
        assert_eq!(headlines.len(), MAX_HEADLINES);
        assert_eq!(headlines[0].title, "Story 0");
        assert_eq!(headlines[0].description.as_deref(), Some("Details 0"));
    }

    #[tokio::test]
    async fn test_missing_description_kept_as_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "articles": [{"title": "Only a title", "description": null}, {"title": null}]
            })))
            .mount(&server)
            .await;

        let headlines = client_for(&server).top_headlines().await.unwrap();
        assert_eq!(
            headlines,
            vec![Article {
                title: "Only a title".to_string(),
                description: None
            }]
        );
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "error", "code": "rateLimited"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).top_headlines().await.unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable { .. }));
    }
}
