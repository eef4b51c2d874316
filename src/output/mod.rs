//! Output module for inspecting the documents file after a crawl
//!
//! This module handles:
//! - Statistics over collected documents (page types, languages, sizes)
//! - Plain-text export of the documents for reading

mod export;
pub mod stats;

pub use export::{export_text, format_document};
pub use stats::{load_statistics, print_statistics, DocumentStatistics};

use crate::extract::Document;
use crate::storage::read_json_lines;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while producing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Documents file not found: {0}")]
    MissingInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Reads every document from a documents file
///
/// Unlike the page cache, a missing documents file is an error here.
pub fn read_documents(path: &Path) -> OutputResult<Vec<Document>> {
    if !path.exists() {
        return Err(OutputError::MissingInput(path.display().to_string()));
    }
    Ok(read_json_lines(path)?)
}
