//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator wires the shared components together (frontier, robots
//! policy, page cache, document sink, rate limiter), runs one worker task per
//! configured worker, and shuts the workers down once the frontier drains.

use crate::config::{Config, SiteRules};
use crate::crawler::{build_http_client, CrawlLimits, FetchPolicy, Fetcher, Frontier, RateLimiter, Task};
use crate::extract::extract_page;
use crate::robots::RobotsPolicy;
use crate::storage::{DocumentSink, PageCache, PageEntry};
use crate::url::{normalize_url, normalized_host};
use crate::{GleanError, UrlError};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Documents written during this run
    pub collected: u32,

    /// URLs admitted to the frontier
    pub admitted: usize,

    pub documents_path: PathBuf,
    pub elapsed: Duration,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    start_url: String,
    frontier: Arc<Frontier>,
    robots: Arc<RobotsPolicy>,
    page_cache: Arc<PageCache>,
    sink: Arc<DocumentSink>,
    limiter: Arc<RateLimiter>,
    rules: Arc<SiteRules>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Normalizes the start URL, selects the site rules for its host, loads
    /// the page cache, and prepares the document file.
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    pub fn new(config: Config) -> Result<Self, GleanError> {
        let start_url = normalize_url(&config.crawler.start_url, None)?;
        let host = normalized_host(&start_url)
            .ok_or_else(|| UrlError::MissingHost(start_url.clone()))?;
        let rules = SiteRules::for_host(&config.sites, &host);
        tracing::debug!(
            "Site rules for {}: {} page types, url rules {}",
            host,
            rules.page_types.len(),
            if rules.urls.is_some() { "present" } else { "absent" }
        );

        let frontier = Frontier::new(CrawlLimits {
            max_pages: config.crawler.max_pages,
            max_depth: config.crawler.max_depth,
        });

        let robots_client = build_http_client(&config.user_agent)?;
        let robots = RobotsPolicy::new(robots_client, config.user_agent.crawler_name.clone());

        let page_cache = PageCache::open(&config.output.cache_path)?;
        let sink = DocumentSink::create(&config.output.documents_path)?;
        let limiter = RateLimiter::new(config.crawler.request_interval());

        Ok(Self {
            config: Arc::new(config),
            start_url,
            frontier: Arc::new(frontier),
            robots: Arc::new(robots),
            page_cache: Arc::new(page_cache),
            sink: Arc::new(sink),
            limiter: Arc::new(limiter),
            rules: Arc::new(rules),
        })
    }

    /// Normalized start URL
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    /// Runs the crawl until the frontier drains
    ///
    /// 1. Seed the frontier with the start URL at depth 0
    /// 2. Spawn the workers, each with its own HTTP client
    /// 3. Wait until every admitted task has been processed
    /// 4. Abort the workers and wait for all of them to finish
    pub async fn run(self) -> Result<CrawlReport, GleanError> {
        let start_time = Instant::now();
        let worker_count = self.config.crawler.workers.max(1);
        tracing::info!(
            "Starting crawl of {} with {} workers",
            self.start_url,
            worker_count
        );

        self.frontier.put(Task::seed(self.start_url.clone()));

        let policy = FetchPolicy::from_config(&self.config.crawler);
        let mut workers = JoinSet::new();
        for id in 0..worker_count {
            let client = build_http_client(&self.config.user_agent)?;
            let worker = Worker {
                id,
                frontier: Arc::clone(&self.frontier),
                fetcher: Fetcher::new(
                    client,
                    Arc::clone(&self.limiter),
                    Arc::clone(&self.robots),
                    policy,
                ),
                robots: Arc::clone(&self.robots),
                page_cache: Arc::clone(&self.page_cache),
                sink: Arc::clone(&self.sink),
                rules: Arc::clone(&self.rules),
            };
            workers.spawn(worker.run());
        }

        self.frontier.join().await;
        tracing::debug!("Frontier drained, stopping workers");
        workers.abort_all();

        let mut failure = None;
        while let Some(outcome) = workers.join_next().await {
            match outcome {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    tracing::error!("Worker task failed: {}", e);
                    failure.get_or_insert(e);
                }
            }
        }
        if let Some(e) = failure {
            return Err(GleanError::Worker(e));
        }

        let report = CrawlReport {
            collected: self.frontier.collected_count(),
            admitted: self.frontier.seen_count(),
            documents_path: self.sink.path().to_path_buf(),
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Done, {} new documents collected in {} ({} URLs admitted, {:.1}s)",
            report.collected,
            report.documents_path.display(),
            report.admitted,
            report.elapsed.as_secs_f64()
        );

        Ok(report)
    }
}

/// One crawl worker; loops until aborted
struct Worker {
    id: u32,
    frontier: Arc<Frontier>,
    fetcher: Fetcher,
    robots: Arc<RobotsPolicy>,
    page_cache: Arc<PageCache>,
    sink: Arc<DocumentSink>,
    rules: Arc<SiteRules>,
}

impl Worker {
    async fn run(self) {
        tracing::debug!("Worker {} started", self.id);
        loop {
            let task = self.frontier.get().await;
            let _done = self.frontier.done_guard();
            let url = task.url.clone();

            match AssertUnwindSafe(self.process(task)).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("Process task failed, {}, error: {}", url, e),
                Err(panic) => tracing::error!(
                    "Process task panicked, {}, error: {}",
                    url,
                    panic_message(panic.as_ref())
                ),
            }
        }
    }

    async fn process(&self, task: Task) -> Result<(), GleanError> {
        if self.frontier.is_budget_exhausted() {
            return Ok(());
        }

        let inner_links = if self.page_cache.exists(&task.url) {
            tracing::debug!("Use cache, {}", task.url);
            self.page_cache.get_inner_links(&task.url)
        } else {
            let Some(html) = self.fetcher.fetch_page(&task.url).await else {
                return Ok(());
            };

            let extracted = extract_page(&html, &task.url, &self.rules)?;
            self.page_cache
                .write(PageEntry::new(task.url.clone(), extracted.inner_links.clone()))
                .await?;

            match extracted.document {
                Some(mut document) => {
                    document.parent_url = task.parent_url.clone();
                    self.sink.write(&document).await?;
                    let collected = self.frontier.mark_collected();
                    if collected % 10 == 0 {
                        tracing::info!("{} documents collected", collected);
                    }
                }
                None => tracing::info!("No document from {}", task.url),
            }

            extracted.inner_links
        };

        for link in inner_links {
            if !self.robots.allowed(&link).await {
                continue;
            }
            self.frontier.put(task.child(link));
        }

        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use site_gleaner::config::load_config;
/// use site_gleaner::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let report = run_crawl(config).await?;
/// println!("{} documents", report.collected);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, GleanError> {
    Coordinator::new(config)?.run().await
}
