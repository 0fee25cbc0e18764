//! Web search client.
//!
//! Thin adapter over a Serper-shaped search API: POST a query, map the
//! provider's `organic` entries into [`SearchResult`]s in provider order.
//! The provider's own rate limiting is its concern; this client only reports
//! failures.

use std::time::Duration;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::{DeepSearchError, Result};
use crate::types::SearchResult;

const DEFAULT_ENDPOINT: &str = "https://google.serper.dev/search";

// Provider requests can hang indefinitely without an explicit timeout.
const REQUEST_TIMEOUT_MS: u64 = 20_000;

#[derive(Debug, Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    organic: Vec<OrganicEntry>,
}

#[derive(Debug, Deserialize)]
struct OrganicEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    date: Option<String>,
}

impl SearchClient {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Build from config; errors when no API key is configured.
    pub fn from_config(
        client: reqwest::Client,
        config: &crate::config::DeepSearchConfig,
    ) -> Result<Self> {
        let api_key = config.search_api_key.clone().ok_or_else(|| {
            DeepSearchError::Configuration("missing SERPER_API_KEY".to_string())
        })?;
        let mut this = Self::new(client, api_key);
        if let Some(endpoint) = &config.search_endpoint {
            this.endpoint = endpoint.clone();
        }
        Ok(this)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Run one search, returning up to `result_count` organic results in
    /// provider order.
    pub async fn search(
        &self,
        query: &str,
        result_count: usize,
        cancel: CancellationToken,
    ) -> Result<Vec<SearchResult>> {
        let request = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({ "q": query, "num": result_count }))
            .timeout(Duration::from_millis(REQUEST_TIMEOUT_MS));

        let response = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(DeepSearchError::Stream("search canceled".to_string()));
            }
            response = request.send() => response?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeepSearchError::provider(
                status.as_u16(),
                truncate(&body, 256),
            ));
        }

        let parsed: ProviderResponse = response.json().await.map_err(|e| {
            DeepSearchError::provider(status.as_u16(), format!("malformed response: {e}"))
        })?;

        Ok(parsed
            .organic
            .into_iter()
            .map(|entry| SearchResult {
                title: entry.title,
                link: entry.link,
                snippet: entry.snippet,
                date: entry.date,
            })
            .collect())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SearchClient {
        SearchClient::new(reqwest::Client::new(), "test-key")
            .with_endpoint(format!("{}/search", server.uri()))
    }

    #[tokio::test]
    async fn maps_organic_results_preserving_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(
                serde_json::json!({"q": "latest TypeScript version", "num": 2}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "organic": [
                    {"title": "TS 5.6", "link": "https://a.example", "snippet": "release", "date": "2024-09-01"},
                    {"title": "TS blog", "link": "https://b.example", "snippet": "notes"}
                ]
            })))
            .mount(&server)
            .await;

        let results = client_for(&server)
            .search("latest TypeScript version", 2, CancellationToken::new())
            .await
            .expect("search");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "TS 5.6");
        assert_eq!(results[0].date.as_deref(), Some("2024-09-01"));
        assert_eq!(results[1].link, "https://b.example");
        assert_eq!(results[1].date, None);
    }

    #[tokio::test]
    async fn non_2xx_surfaces_as_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .search("q", 5, CancellationToken::new())
            .await
            .expect_err("expected provider error");
        assert!(matches!(
            err,
            DeepSearchError::Provider { status: 403, .. }
        ));
    }

    #[tokio::test]
    async fn malformed_body_surfaces_as_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .search("q", 5, CancellationToken::new())
            .await
            .expect_err("expected provider error");
        assert!(matches!(err, DeepSearchError::Provider { .. }));
    }

    #[tokio::test]
    async fn cancellation_aborts_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"organic": []}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = client_for(&server)
            .search("q", 5, cancel)
            .await
            .expect_err("expected cancellation");
        assert!(matches!(err, DeepSearchError::Stream(_)));
    }
}
