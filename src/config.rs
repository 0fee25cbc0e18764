//! Runtime configuration (layered: code > env > defaults).

use std::time::Duration;

/// Default cap on model-completion calls per window.
const DEFAULT_MAX_REQUESTS_IN_WINDOW: u32 = 20;
/// Default throttle window.
const DEFAULT_WINDOW_MS: u64 = 60_000;
/// Default bounded-backoff retry count when the window is exhausted.
const DEFAULT_MAX_RETRIES: usize = 3;
/// Default round budget for one agent run.
const DEFAULT_MAX_STEPS: usize = 10;
/// Default concurrent fetch cap for the bulk crawler.
const DEFAULT_CRAWL_CONCURRENCY: usize = 6;
/// Default per-URL fetch timeout.
const DEFAULT_CRAWL_TIMEOUT_MS: u64 = 10_000;
/// Results requested per search call.
const DEFAULT_SEARCH_RESULT_COUNT: usize = 15;

/// Configuration for the deepsearch runtime.
#[derive(Debug, Clone)]
pub struct DeepSearchConfig {
    /// API key for the search-results provider.
    pub search_api_key: Option<String>,
    /// Override for the search provider endpoint (tests point this at a stub).
    pub search_endpoint: Option<String>,
    /// Number of organic results requested per search call.
    pub search_result_count: usize,
    /// Global throttle settings for the model-completion capability.
    pub rate_limit: crate::throttle::RateLimitConfig,
    /// Bulk crawler settings.
    pub crawl: CrawlConfig,
    /// Maximum tool-call rounds per agent run.
    pub max_steps: usize,
}

/// Bulk crawler tunables.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Cap on simultaneous outbound fetches.
    pub concurrency: usize,
    /// Per-URL fetch timeout.
    pub fetch_timeout: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CRAWL_CONCURRENCY,
            fetch_timeout: Duration::from_millis(DEFAULT_CRAWL_TIMEOUT_MS),
        }
    }
}

impl Default for DeepSearchConfig {
    fn default() -> Self {
        Self {
            search_api_key: None,
            search_endpoint: None,
            search_result_count: DEFAULT_SEARCH_RESULT_COUNT,
            rate_limit: crate::throttle::RateLimitConfig {
                key_prefix: "completion".to_string(),
                max_requests_in_window: DEFAULT_MAX_REQUESTS_IN_WINDOW,
                window_duration_ms: DEFAULT_WINDOW_MS,
                max_retries: DEFAULT_MAX_RETRIES,
            },
            crawl: CrawlConfig::default(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl DeepSearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables (SERPER_API_KEY etc.).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();

        if let Ok(key) = std::env::var("SERPER_API_KEY") {
            if !key.trim().is_empty() {
                config.search_api_key = Some(key);
            }
        }
        if let Ok(endpoint) = std::env::var("DEEPSEARCH_SEARCH_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                config.search_endpoint = Some(endpoint);
            }
        }
        if let Some(v) = env_u64("DEEPSEARCH_RATE_LIMIT_MAX_REQUESTS") {
            config.rate_limit.max_requests_in_window = v as u32;
        }
        if let Some(v) = env_u64("DEEPSEARCH_RATE_LIMIT_WINDOW_MS") {
            config.rate_limit.window_duration_ms = v;
        }
        if let Some(v) = env_u64("DEEPSEARCH_RATE_LIMIT_MAX_RETRIES") {
            config.rate_limit.max_retries = v as usize;
        }
        if let Some(v) = env_u64("DEEPSEARCH_MAX_STEPS") {
            config.max_steps = v as usize;
        }
        if let Some(v) = env_u64("DEEPSEARCH_CRAWL_CONCURRENCY") {
            config.crawl.concurrency = (v as usize).max(1);
        }
        if let Some(v) = env_u64("DEEPSEARCH_CRAWL_TIMEOUT_MS") {
            config.crawl.fetch_timeout = Duration::from_millis(v);
        }

        config
    }

    pub fn with_search_api_key(mut self, key: impl Into<String>) -> Self {
        self.search_api_key = Some(key.into());
        self
    }

    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok()?.trim().parse::<u64>().ok()
}
