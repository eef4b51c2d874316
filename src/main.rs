//! Site-Gleaner main entry point
//!
//! This is the command-line interface for the Site-Gleaner document harvester.

use anyhow::Context;
use clap::Parser;
use site_gleaner::config::{load_config_with_hash, validate, Config, SiteRules};
use site_gleaner::crawler::run_crawl;
use site_gleaner::output::{export_text, load_statistics, print_statistics};
use site_gleaner::url::{normalize_url, normalized_host};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Site-Gleaner: a polite single-site document harvester
///
/// Site-Gleaner crawls one website from a start URL while respecting
/// robots.txt and a global request rate, and appends the readable text of
/// each page to a JSON-lines file.
#[derive(Parser, Debug)]
#[command(name = "site-gleaner")]
#[command(version)]
#[command(about = "A polite single-site document harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// URL the crawl starts from
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// Stop after this many documents
    #[arg(long, value_name = "N", conflicts_with = "no_page_limit")]
    max_pages: Option<u32>,

    /// Crawl without a page limit
    #[arg(long)]
    no_page_limit: bool,

    /// Deepest link distance from the start URL to crawl
    #[arg(long, value_name = "N", conflicts_with = "no_depth_limit")]
    max_depth: Option<u32>,

    /// Crawl without a depth limit
    #[arg(long)]
    no_depth_limit: bool,

    /// Number of concurrent workers
    #[arg(long, value_name = "N")]
    workers: Option<u32>,

    /// JSON-lines file documents are appended to
    #[arg(long, value_name = "PATH")]
    out_file: Option<String>,

    /// JSON-lines page cache
    #[arg(long, value_name = "PATH")]
    cache_file: Option<String>,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show what would be crawled
    #[arg(long, conflicts_with_all = ["stats", "export_text"])]
    dry_run: bool,

    /// Show statistics of the documents file and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_text"])]
    stats: bool,

    /// Render the documents file as readable text into FILE and exit
    #[arg(long, value_name = "FILE", conflicts_with_all = ["dry_run", "stats"])]
    export_text: Option<PathBuf>,
}

impl Cli {
    /// Applies command-line values on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.start_url {
            config.crawler.start_url = url.clone();
        }
        if self.no_page_limit {
            config.crawler.max_pages = None;
        } else if let Some(n) = self.max_pages {
            config.crawler.max_pages = Some(n);
        }
        if self.no_depth_limit {
            config.crawler.max_depth = None;
        } else if let Some(n) = self.max_depth {
            config.crawler.max_depth = Some(n);
        }
        if let Some(n) = self.workers {
            config.crawler.workers = n;
        }
        if let Some(path) = &self.out_file {
            config.output.documents_path = path.clone();
        }
        if let Some(path) = &self.cache_file {
            config.output.cache_path = path.clone();
        }
        if let Some(path) = &self.log_file {
            config.output.log_path = Some(path.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };
    cli.apply_overrides(&mut config);

    setup_logging(cli.verbose, cli.quiet, config.output.log_path.as_deref())?;

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        _ => tracing::debug!("No configuration file, using defaults"),
    }

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else if let Some(path) = &cli.export_text {
        handle_export_text(&config, path)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr and, when a log file is configured, to that file too.
fn setup_logging(verbose: u8, quiet: bool, log_path: Option<&str>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_gleaner=info,warn"),
            1 => EnvFilter::new("site_gleaner=debug,info"),
            2 => EnvFilter::new("site_gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file_layer = match log_path {
        Some(path) => {
            let path = Path::new(path);
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(file_layer)
        .init();

    Ok(())
}

fn limit(value: Option<u32>) -> String {
    value.map_or_else(|| "unlimited".to_string(), |n| n.to_string())
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    validate(config).context("Invalid configuration")?;
    let start_url = normalize_url(&config.crawler.start_url, None)?;
    let host = normalized_host(&start_url).unwrap_or_default();
    let rules = SiteRules::for_host(&config.sites, &host);

    println!("=== Site-Gleaner Dry Run ===\n");

    println!("Crawl:");
    println!("  Start URL: {}", start_url);
    println!("  Host: {}", host);
    println!("  Max pages: {}", limit(config.crawler.max_pages));
    println!("  Max depth: {}", limit(config.crawler.max_depth));
    println!("  Workers: {}", config.crawler.workers);
    println!("  Request interval: {}ms", config.crawler.request_interval_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!(
        "  Attempts: {} ({}ms backoff)",
        config.crawler.max_attempts, config.crawler.retry_backoff_ms
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Documents: {}", config.output.documents_path);
    println!("  Page cache: {}", config.output.cache_path);
    if let Some(log) = &config.output.log_path {
        println!("  Log file: {}", log);
    }

    println!("\nPage Types ({}):", rules.page_types.len());
    for rule in &rules.page_types {
        println!("  - {} -> {}", rule.prefix, rule.page_type);
    }

    match &rules.urls {
        Some(urls) => {
            println!("\nDropped Prefixes ({}):", urls.drop_prefix.len());
            for prefix in &urls.drop_prefix {
                println!("  - {}", prefix);
            }
        }
        None => println!("\nNo URL rules; only query strings are filtered"),
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the --stats mode: shows statistics of the documents file
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Documents: {}\n", config.output.documents_path);

    let stats = load_statistics(Path::new(&config.output.documents_path))?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-text mode: renders documents as plain text
fn handle_export_text(config: &Config, output: &Path) -> anyhow::Result<()> {
    println!("=== Exporting Documents ===\n");
    println!("Documents: {}", config.output.documents_path);
    println!("Output: {}", output.display());
    println!();

    let count = export_text(Path::new(&config.output.documents_path), output)?;
    println!("✓ {} documents exported to: {}", count, output.display());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    validate(&config).context("Invalid configuration")?;

    match run_crawl(config).await {
        Ok(report) => {
            tracing::info!(
                "Crawl completed: {} documents in {:?}",
                report.collected,
                report.elapsed
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
