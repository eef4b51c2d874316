//! Robots.txt handling module
//!
//! This module fetches, parses, and caches robots.txt files per host. The
//! first lookup for a host retrieves its robots.txt exactly once; later
//! lookups reuse the cached rules for the rest of the run.

mod parser;
mod policy;

pub use parser::ParsedRobots;
pub use policy::{fetch_robots, RobotsPolicy};
