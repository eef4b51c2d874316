//! Per-host robots.txt policy cache
//!
//! Entries are created lazily and never expire or get invalidated within a
//! run. Retrieval failures of any kind cache an allow-all entry.

use crate::robots::ParsedRobots;
use crate::url::netloc;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

/// Timeout for a single robots.txt request
const ROBOTS_TIMEOUT: Duration = Duration::from_secs(10);

type RobotsSlot = Arc<OnceCell<Arc<ParsedRobots>>>;

/// Shared robots.txt policy, keyed by `host[:port]`
pub struct RobotsPolicy {
    client: Client,
    user_agent: String,
    entries: Mutex<HashMap<String, RobotsSlot>>,
}

impl RobotsPolicy {
    /// Creates an empty policy cache
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for robots.txt requests
    /// * `user_agent` - Product token robots.txt groups are matched against
    pub fn new(client: Client, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Checks whether `url` may be fetched
    ///
    /// Unparseable URLs are never allowed. Concurrent first lookups for the
    /// same host share a single robots.txt request.
    pub async fn allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = netloc(&parsed) else {
            return false;
        };

        let slot = self.slot(&host);
        let robots = slot
            .get_or_init(|| async {
                let robots_url = format!("{}://{}/robots.txt", parsed.scheme(), host);
                Arc::new(fetch_robots(&self.client, &robots_url).await)
            })
            .await;

        robots.is_allowed(url, &self.user_agent)
    }

    /// Number of hosts with a resolved entry
    pub fn cached_hosts(&self) -> usize {
        self.lock_entries()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    fn slot(&self, host: &str) -> RobotsSlot {
        self.lock_entries()
            .entry(host.to_string())
            .or_default()
            .clone()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, RobotsSlot>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Retrieves and parses one robots.txt, failing open
pub async fn fetch_robots(client: &Client, robots_url: &str) -> ParsedRobots {
    tracing::debug!("Fetching {}", robots_url);

    let response = match client.get(robots_url).timeout(ROBOTS_TIMEOUT).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::info!("robots.txt unavailable at {} ({}), allowing all", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    if !response.status().is_success() {
        tracing::info!(
            "robots.txt at {} returned {}, allowing all",
            robots_url,
            response.status()
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => ParsedRobots::from_content(&body),
        Err(e) => {
            tracing::info!("Failed to read robots.txt at {} ({}), allowing all", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}
