//! Crawler module for fetching and processing pages
//!
//! This module contains the core crawling logic, including:
//! - The frontier task queue with page and depth budgets
//! - HTTP fetching with robots.txt gating and retry logic
//! - Global request rate limiting
//! - Overall crawl coordination across workers

mod coordinator;
mod fetcher;
mod frontier;
mod limiter;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, FetchPolicy, Fetcher};
pub use frontier::{CrawlLimits, Frontier, Task, TaskGuard};
pub use limiter::RateLimiter;
