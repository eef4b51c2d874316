//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building HTTP clients with the crawler's user agent string
//! - The robots.txt gate in front of every page
//! - Global rate limiting of each attempt
//! - Retry of temporary failures (5xx, timeouts)

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::RateLimiter;
use crate::robots::RobotsPolicy;
use reqwest::{header, Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// Builds an HTTP client identifying the crawler
///
/// The user agent has the form `Name/Version (+ContactURL; ContactEmail)`,
/// with the parenthesised part omitted when no contact details are set.
///
/// # Example
///
/// ```no_run
/// use site_gleaner::config::UserAgentConfig;
/// use site_gleaner::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "SiteGleaner".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: Some("https://example.com/about".to_string()),
///     contact_email: None,
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Attempt budget and timing for page requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Attempts per page, including the first
    pub max_attempts: u32,

    /// Timeout of a single attempt
    pub request_timeout: Duration,

    /// Fixed pause before retrying a temporary failure
    pub retry_backoff: Duration,
}

impl FetchPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            request_timeout: config.request_timeout(),
            retry_backoff: config.retry_backoff(),
        }
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            request_timeout: Duration::from_secs(10),
            retry_backoff: Duration::from_secs(3),
        }
    }
}

/// Outcome of a single request
#[derive(Debug)]
enum Attempt {
    /// HTML body of a 200 response
    Page(String),

    /// Nothing usable and nothing worth retrying
    Skip,

    /// Server error or timeout
    Temporary(String),
}

/// Fetches pages for one worker
///
/// Each worker owns its client; the rate limiter and robots policy are
/// shared by all workers.
pub struct Fetcher {
    client: Client,
    limiter: Arc<RateLimiter>,
    robots: Arc<RobotsPolicy>,
    policy: FetchPolicy,
}

impl Fetcher {
    pub fn new(
        client: Client,
        limiter: Arc<RateLimiter>,
        robots: Arc<RobotsPolicy>,
        policy: FetchPolicy,
    ) -> Self {
        Self {
            client,
            limiter,
            robots,
            policy,
        }
    }

    /// Fetches the HTML of `url`, or `None` if there is nothing to extract
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Disallowed by robots.txt | `None`, no request sent |
    /// | HTTP 200, HTML | Body returned |
    /// | HTTP 200, other content type | `None` |
    /// | HTTP 4xx | `None` |
    /// | HTTP 5xx | Retry after backoff |
    /// | Timeout | Retry after backoff |
    /// | Other status or error | `None` |
    ///
    /// Every attempt waits on the shared rate limiter first.
    pub async fn fetch_page(&self, url: &str) -> Option<String> {
        if !self.robots.allowed(url).await {
            tracing::debug!("Disallowed by robots.txt: {}", url);
            return None;
        }

        let max_attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            self.limiter.acquire().await;

            match self.attempt(url).await {
                Attempt::Page(body) => return Some(body),
                Attempt::Skip => return None,
                Attempt::Temporary(reason) => {
                    if attempt >= max_attempts {
                        tracing::warn!("Give up {} after {} attempts: {}", url, attempt, reason);
                        return None;
                    }
                    tracing::debug!(
                        "Attempt {}/{} for {} failed ({}), retrying",
                        attempt,
                        max_attempts,
                        url,
                        reason
                    );
                    tokio::time::sleep(self.policy.retry_backoff).await;
                }
            }
        }

        None
    }

    async fn attempt(&self, url: &str) -> Attempt {
        let response = match self
            .client
            .get(url)
            .timeout(self.policy.request_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Attempt::Temporary("request timeout".to_string()),
            Err(e) => {
                tracing::error!("Fetch failed for {}: {}", url, e);
                return Attempt::Skip;
            }
        };

        let status = response.status();
        if status == StatusCode::OK {
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_ascii_lowercase();

            if !content_type.contains("text/html") {
                tracing::info!("Content type {:?} not supported: {}", content_type, url);
                return Attempt::Skip;
            }

            return match response.text().await {
                Ok(body) => Attempt::Page(body),
                Err(e) if e.is_timeout() => Attempt::Temporary("body read timeout".to_string()),
                Err(e) => {
                    tracing::error!("Fetch failed for {}: {}", url, e);
                    Attempt::Skip
                }
            };
        }

        if status.is_client_error() {
            tracing::info!("Skip {}: {}", url, status);
            return Attempt::Skip;
        }

        if status.is_server_error() {
            return Attempt::Temporary(format!("HTTP {}", status.as_u16()));
        }

        tracing::debug!("Unexpected status {} for {}", status, url);
        Attempt::Skip
    }
}
