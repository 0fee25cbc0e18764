//! Bulk crawler: concurrent multi-URL fetch with partial-failure aggregation.
//!
//! Every input URL produces exactly one outcome, positionally aligned with
//! the input list. One URL's failure never aborts the batch, and the batch
//! always runs to completion before returning.

use std::io::Cursor;

use futures::StreamExt;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::CrawlConfig;

/// Column width handed to the HTML-to-text renderer.
const EXTRACT_WIDTH: usize = 80;

/// Per-URL crawl outcome. Success carries extracted readable text; failure
/// carries the reason and nothing else.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CrawlData {
    Success { data: String },
    Failure { error_reason: String },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CrawlOutcome {
    pub url: String,
    #[serde(flatten)]
    pub data: CrawlData,
}

impl CrawlOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.data, CrawlData::Success { .. })
    }
}

/// Aggregated result of one crawl batch.
///
/// `overall_success` is true iff every outcome succeeded; `outcomes` always
/// has one entry per input URL regardless.
#[derive(Debug, Clone, Serialize)]
pub struct BulkCrawlResult {
    pub overall_success: bool,
    pub outcomes: Vec<CrawlOutcome>,
}

#[derive(Debug, Clone)]
pub struct Crawler {
    client: reqwest::Client,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(client: reqwest::Client, config: CrawlConfig) -> Self {
        Self { client, config }
    }

    /// Fetch and extract every URL concurrently, capped at the configured
    /// fan-out. `buffered` preserves input order in the collected outcomes,
    /// whatever order the fetches complete in.
    pub async fn bulk_crawl(&self, urls: &[String], cancel: CancellationToken) -> BulkCrawlResult {
        let outcomes: Vec<CrawlOutcome> = futures::stream::iter(urls.iter().cloned())
            .map(|url| {
                let cancel = cancel.child_token();
                async move {
                    let data = self.crawl_one(&url, cancel).await;
                    CrawlOutcome { url, data }
                }
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let overall_success = outcomes.iter().all(CrawlOutcome::succeeded);
        if !overall_success {
            let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
            tracing::debug!(total = outcomes.len(), failed, "bulk crawl partial failure");
        }
        BulkCrawlResult {
            overall_success,
            outcomes,
        }
    }

    /// One isolated fetch attempt. Every fault becomes a failure outcome;
    /// nothing escapes the per-URL boundary.
    async fn crawl_one(&self, raw_url: &str, cancel: CancellationToken) -> CrawlData {
        let url = match Url::parse(raw_url) {
            Ok(url) => url,
            Err(e) => {
                return CrawlData::Failure {
                    error_reason: format!("invalid url: {e}"),
                }
            }
        };

        let fetch = self.fetch_body(url);
        let body = tokio::select! {
            _ = cancel.cancelled() => {
                return CrawlData::Failure {
                    error_reason: "canceled".to_string(),
                };
            }
            body = tokio::time::timeout(self.config.fetch_timeout, fetch) => match body {
                Ok(Ok(body)) => body,
                Ok(Err(reason)) => return CrawlData::Failure { error_reason: reason },
                Err(_) => {
                    return CrawlData::Failure {
                        error_reason: "timeout".to_string(),
                    }
                }
            },
        };

        match extract_readable_text(&body) {
            Ok(text) => CrawlData::Success { data: text },
            Err(reason) => CrawlData::Failure {
                error_reason: reason,
            },
        }
    }

    async fn fetch_body(&self, url: Url) -> Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("http status {}", status.as_u16()));
        }
        response
            .text()
            .await
            .map_err(|e| format!("body read failed: {e}"))
    }
}

/// Reduce raw markup to readable text. Scripts, styles, and navigation
/// chrome drop out; heading and paragraph breaks survive well enough for
/// downstream summarization.
pub fn extract_readable_text(html: &str) -> Result<String, String> {
    let text = html2text::from_read(Cursor::new(html.as_bytes()), EXTRACT_WIDTH)
        .map_err(|e| format!("extraction failed: {e}"))?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("no readable text in payload".to_string());
    }
    Ok(trimmed.to_string())
}
