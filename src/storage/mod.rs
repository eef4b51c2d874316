//! Storage module for persisting crawl data
//!
//! Both persisted files are append-only JSON lines:
//! - The page cache (`{url, inner_links}` per fetched page), reloaded at
//!   start so later runs skip pages already fetched
//! - The document file, one extracted [`Document`](crate::extract::Document)
//!   per line
//!
//! Appends are serialized by an async mutex and the blocking file write runs
//! on tokio's blocking pool.

mod documents;
mod error;
mod jsonl;
mod page_cache;

pub use documents::DocumentSink;
pub use error::{StorageError, StorageResult};
pub use jsonl::{read_json_lines, JsonLinesWriter};
pub use page_cache::{PageCache, PageEntry};
