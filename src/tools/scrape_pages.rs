//! The `scrapePages` tool.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::arguments::ToolArguments;
use super::tool::Tool;
use crate::crawler::Crawler;
use crate::error::DeepSearchError;

/// Bulk page scraping exposed to the model: `scrapePages(urls: string[])`.
///
/// Partial failure is a payload, not an error: the model always receives the
/// full per-URL outcome list so it can reason over what did succeed.
pub struct ScrapePagesTool {
    crawler: Crawler,
}

impl ScrapePagesTool {
    pub fn new(crawler: Crawler) -> Self {
        Self { crawler }
    }
}

#[async_trait]
impl Tool for ScrapePagesTool {
    fn name(&self) -> &str {
        "scrapePages"
    }

    fn description(&self) -> &str {
        "Extract the full readable content of specific web pages. Use when search \
         snippets are not enough and you have concrete URLs to analyze in detail."
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "urls": {
                    "type": "array",
                    "items": {"type": "string"},
                    "minItems": 1,
                    "description": "Array of URLs to scrape for full content"
                }
            },
            "required": ["urls"]
        })
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        cancel: CancellationToken,
    ) -> Result<serde_json::Value, DeepSearchError> {
        let urls = args.get_str_array("urls")?;
        if urls.is_empty() {
            return Err(DeepSearchError::InvalidArgument(
                "scrapePages requires at least one URL".to_string(),
            ));
        }
        let result = self.crawler.bulk_crawl(&urls, cancel).await;
        Ok(serde_json::to_value(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;

    #[tokio::test]
    async fn empty_url_list_is_an_invalid_argument() {
        let tool = ScrapePagesTool::new(Crawler::new(
            reqwest::Client::new(),
            CrawlConfig::default(),
        ));
        let args = ToolArguments::new(serde_json::json!({"urls": []}));
        let err = tool
            .execute(&args, CancellationToken::new())
            .await
            .expect_err("expected invalid argument");
        assert!(matches!(err, DeepSearchError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn partial_failure_still_returns_every_outcome() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/ok"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string("<html><body><p>content</p></body></html>"),
            )
            .mount(&server)
            .await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/bad"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let tool = ScrapePagesTool::new(Crawler::new(
            reqwest::Client::new(),
            CrawlConfig::default(),
        ));
        let args = ToolArguments::new(serde_json::json!({
            "urls": [format!("{}/ok", server.uri()), format!("{}/bad", server.uri())]
        }));
        let value = tool
            .execute(&args, CancellationToken::new())
            .await
            .expect("tool result");

        assert_eq!(value["overall_success"], serde_json::json!(false));
        assert_eq!(value["outcomes"].as_array().unwrap().len(), 2);
        assert_eq!(value["outcomes"][0]["status"], "success");
        assert_eq!(value["outcomes"][1]["status"], "failure");
    }
}
