use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One extracted document, written as a single JSON line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub title: Option<String>,
    pub content_text: String,
    pub page_type: Option<String>,
    /// Page the crawler followed to reach this one; `None` for the start URL
    pub parent_url: Option<String>,
    pub meta: DocumentMeta,
}

/// Derived facts about a document's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// ISO 639-1 code of the detected language
    pub language: Option<String>,
    pub word_count: usize,
    pub char_count: usize,
    pub fetched_at: DateTime<Utc>,
}

/// Counts words, treating every line break as one extra token
///
/// Line breaks separate headings from paragraphs, so they are counted as
/// structural units.
pub fn word_count(text: &str) -> usize {
    text.replace('\n', " <NL> ").split_whitespace().count()
}

/// Counts Unicode scalar values
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}
