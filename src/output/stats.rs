//! Statistics over a documents file

use crate::extract::Document;
use crate::output::{read_documents, OutputResult};
use std::collections::HashMap;
use std::path::Path;

/// Label used for documents without a page type or language
const UNKNOWN: &str = "(none)";

/// Summary of the collected documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStatistics {
    /// Number of documents
    pub total_documents: u64,

    /// Documents per page type
    pub by_page_type: HashMap<String, u64>,

    /// Documents per detected language
    pub by_language: HashMap<String, u64>,

    /// Sum of word counts
    pub total_words: u64,

    /// Sum of character counts
    pub total_chars: u64,

    /// Documents reached from the start URL directly or without a parent
    pub root_documents: u64,
}

impl DocumentStatistics {
    /// Aggregates statistics over already loaded documents
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut stats = Self::default();

        for doc in documents {
            stats.total_documents += 1;
            *stats
                .by_page_type
                .entry(label(doc.page_type.as_deref()))
                .or_default() += 1;
            *stats
                .by_language
                .entry(label(doc.meta.language.as_deref()))
                .or_default() += 1;
            stats.total_words += doc.meta.word_count as u64;
            stats.total_chars += doc.meta.char_count as u64;
            if doc.parent_url.is_none() {
                stats.root_documents += 1;
            }
        }

        stats
    }

    pub fn average_words(&self) -> f64 {
        if self.total_documents == 0 {
            0.0
        } else {
            self.total_words as f64 / self.total_documents as f64
        }
    }
}

fn label(value: Option<&str>) -> String {
    value.unwrap_or(UNKNOWN).to_string()
}

/// Loads statistics from a documents file
pub fn load_statistics(path: &Path) -> OutputResult<DocumentStatistics> {
    let documents = read_documents(path)?;
    Ok(DocumentStatistics::from_documents(&documents))
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &DocumentStatistics) {
    println!("=== Document Statistics ===\n");

    println!("Overview:");
    println!("  Total documents: {}", stats.total_documents);
    println!("  Total words: {}", stats.total_words);
    println!("  Total characters: {}", stats.total_chars);
    println!("  Average words per document: {:.1}", stats.average_words());
    println!("  Documents without parent: {}", stats.root_documents);
    println!();

    print_breakdown("Documents by Page Type:", &stats.by_page_type, stats.total_documents);
    print_breakdown("Documents by Language:", &stats.by_language, stats.total_documents);
}

fn print_breakdown(title: &str, counts: &HashMap<String, u64>, total: u64) {
    if counts.is_empty() {
        return;
    }

    println!("{}", title);
    // Sort by count (descending), then name
    let mut rows: Vec<_> = counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (name, count) in rows {
        let percentage = if total > 0 {
            (*count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", name, count, percentage);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::DocumentMeta;
    use crate::output::OutputError;
    use chrono::Utc;
    use tempfile::TempDir;

    fn document(page_type: Option<&str>, language: Option<&str>, words: usize) -> Document {
        Document {
            url: "https://example.com/page".to_string(),
            title: None,
            content_text: String::new(),
            page_type: page_type.map(str::to_string),
            parent_url: None,
            meta: DocumentMeta {
                language: language.map(str::to_string),
                word_count: words,
                char_count: words * 5,
                fetched_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_statistics_from_documents() {
        let mut child = document(Some("guide"), Some("en"), 40);
        child.parent_url = Some("https://example.com/".to_string());
        let docs = vec![
            document(Some("guide"), Some("en"), 100),
            child,
            document(None, Some("fr"), 60),
        ];

        let stats = DocumentStatistics::from_documents(&docs);
        assert_eq!(stats.total_documents, 3);
        assert_eq!(stats.by_page_type.get("guide"), Some(&2));
        assert_eq!(stats.by_page_type.get(UNKNOWN), Some(&1));
        assert_eq!(stats.by_language.get("en"), Some(&2));
        assert_eq!(stats.by_language.get("fr"), Some(&1));
        assert_eq!(stats.total_words, 200);
        assert_eq!(stats.total_chars, 1000);
        assert_eq!(stats.root_documents, 2);
        assert!((stats.average_words() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = DocumentStatistics::from_documents(&[]);
        assert_eq!(stats.total_documents, 0);
        assert_eq!(stats.average_words(), 0.0);
    }

    #[test]
    fn test_load_statistics_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_statistics(&dir.path().join("absent.jsonl"));
        assert!(matches!(result, Err(OutputError::MissingInput(_))));
    }

    #[test]
    fn test_load_statistics_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs.jsonl");
        let lines: Vec<String> = [document(Some("faq"), None, 10), document(Some("faq"), None, 20)]
            .iter()
            .map(|d| serde_json::to_string(d).unwrap())
            .collect();
        std::fs::write(&path, lines.join("\n")).unwrap();

        let stats = load_statistics(&path).unwrap();
        assert_eq!(stats.total_documents, 2);
        assert_eq!(stats.by_page_type.get("faq"), Some(&2));
        assert_eq!(stats.by_language.get(UNKNOWN), Some(&2));
    }
}
