//! URL handling module for Site-Gleaner
//!
//! This module provides link normalization, host helpers used to keep the
//! crawl on a single site, and the rule-driven filter that decides which
//! discovered links are worth queueing.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{is_internal_link, netloc, normalized_host};
pub use filter::should_keep;
pub use normalize::{normalize_url, resolve_url};
