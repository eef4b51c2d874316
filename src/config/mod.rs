//! Configuration module for Site-Gleaner
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and turning the `[[site]]` tables into the rule set used by the
//! extractor for the host being crawled.
//!
//! # Example
//!
//! ```no_run
//! use site_gleaner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gleaner.toml")).unwrap();
//! println!("Crawl starts at: {}", config.crawler.start_url);
//! ```

mod parser;
mod rules;
mod types;
mod validation;

// Re-export types
pub use rules::SiteRules;
pub use types::{
    Config, CrawlerConfig, OutputConfig, PageTypeRule, SiteEntry, UrlRules, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, read_config};
pub use validation::validate;
