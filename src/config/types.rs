use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Site-Gleaner
///
/// Every section may be omitted; only `crawler.start-url` has no usable
/// default, and it may also be supplied on the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(rename = "site", default)]
    pub sites: Vec<SiteEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from
    #[serde(rename = "start-url", default)]
    pub start_url: String,

    /// Stop admitting new pages once this many documents were collected
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: Option<u32>,

    /// Deepest link distance from the start URL that is still crawled
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: Option<u32>,

    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Minimum spacing between two request dispatches (milliseconds)
    #[serde(rename = "request-interval-ms", default = "default_request_interval_ms")]
    pub request_interval_ms: u64,

    /// Per-attempt request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Attempts per page, including the first one
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed pause before retrying a temporary failure (milliseconds)
    #[serde(rename = "retry-backoff-ms", default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl CrawlerConfig {
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: String::new(),
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            workers: default_workers(),
            request_interval_ms: default_request_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_max_pages() -> Option<u32> {
    Some(100)
}

fn default_max_depth() -> Option<u32> {
    Some(3)
}

fn default_workers() -> u32 {
    2
}

fn default_request_interval_ms() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    3000
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the token robots.txt groups are matched against
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default)]
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// `Name/Version`, followed by `(+url; email)` when contact details are set.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        let contact: Vec<String> = [
            self.contact_url.as_ref().map(|u| format!("+{}", u)),
            self.contact_email.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contact.is_empty() {
            base
        } else {
            format!("{} ({})", base, contact.join("; "))
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
            contact_email: None,
        }
    }
}

fn default_crawler_name() -> String {
    "SiteGleaner".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// JSON-lines file extracted documents are appended to
    #[serde(rename = "documents-path", default = "default_documents_path")]
    pub documents_path: String,

    /// JSON-lines page cache shared across runs
    #[serde(rename = "cache-path", default = "default_cache_path")]
    pub cache_path: String,

    /// Optional log file, written in addition to stderr
    #[serde(rename = "log-path", default)]
    pub log_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            documents_path: default_documents_path(),
            cache_path: default_cache_path(),
            log_path: None,
        }
    }
}

fn default_documents_path() -> String {
    "output/pages/out_pages.jsonl".to_string()
}

fn default_cache_path() -> String {
    "output/cache/page_cache.jsonl".to_string()
}

/// Crawl rules for one host
///
/// The host `default` supplies URL rules for sites without their own entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Host the rules apply to, without a leading `www.`
    pub host: String,

    /// Path prefixes whose pages are never queued
    #[serde(rename = "drop-prefix", default)]
    pub drop_prefix: Vec<String>,

    /// Path-prefix to page-type labels
    #[serde(rename = "page-type", default)]
    pub page_types: Vec<PageTypeRule>,
}

/// Maps pages under a path prefix to a page-type label
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageTypeRule {
    /// Path prefix, e.g. `/consumer-tools`
    #[serde(rename = "match")]
    pub prefix: String,

    /// Label stored in the document's `page_type`
    #[serde(rename = "type")]
    pub page_type: String,
}

/// URL filtering rules applied to discovered links
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlRules {
    pub drop_prefix: Vec<String>,
}
