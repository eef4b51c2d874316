//! Persisted URL to inner-links cache that lets later runs skip fetched pages.

use crate::storage::{read_json_lines, JsonLinesWriter, StorageResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

/// Persisted record of a fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    pub url: String,
    #[serde(default)]
    pub inner_links: Vec<String>,
}

impl PageEntry {
    pub fn new(url: impl Into<String>, inner_links: Vec<String>) -> Self {
        Self {
            url: url.into(),
            inner_links,
        }
    }
}

/// Cache of already fetched pages and their child links
///
/// The whole file is loaded into memory at construction; the map grows for
/// the life of the run without eviction. A URL recorded here is never
/// fetched again, in this run or any later run sharing the file.
pub struct PageCache {
    entries: RwLock<HashMap<String, Vec<String>>>,
    writer: JsonLinesWriter,
}

impl PageCache {
    /// Opens a cache file, loading any entries it already holds
    ///
    /// When a URL appears more than once the last record wins.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let records: Vec<PageEntry> = read_json_lines(path)?;

        let entries: HashMap<String, Vec<String>> = records
            .into_iter()
            .map(|entry| (entry.url, entry.inner_links))
            .collect();

        tracing::info!("Loaded {} cached pages from {}", entries.len(), path.display());

        Ok(Self {
            entries: RwLock::new(entries),
            writer: JsonLinesWriter::create(path)?,
        })
    }

    pub fn exists(&self, url: &str) -> bool {
        self.read_entries().contains_key(url)
    }

    /// Returns the cached child links, or an empty list for unknown URLs
    pub fn get_inner_links(&self, url: &str) -> Vec<String> {
        self.read_entries().get(url).cloned().unwrap_or_default()
    }

    /// Appends an entry to the cache file, then records it in memory
    pub async fn write(&self, entry: PageEntry) -> StorageResult<()> {
        self.writer.append(&entry).await?;

        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(entry.url, entry.inner_links);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Vec<String>>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn links(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn test_write_then_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache/pages.jsonl");

        let cache = PageCache::open(&path).unwrap();
        assert!(cache.is_empty());
        cache
            .write(PageEntry::new(
                "https://example.com/",
                links(&["https://example.com/a", "https://example.com/b"]),
            ))
            .await
            .unwrap();
        assert!(cache.exists("https://example.com/"));

        let reloaded = PageCache::open(&path).unwrap();
        assert!(reloaded.exists("https://example.com/"));
        assert_eq!(
            reloaded.get_inner_links("https://example.com/"),
            links(&["https://example.com/a", "https://example.com/b"])
        );
        assert_eq!(reloaded.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_url() {
        let dir = TempDir::new().unwrap();
        let cache = PageCache::open(dir.path().join("pages.jsonl")).unwrap();
        assert!(!cache.exists("https://example.com/missing"));
        assert!(cache.get_inner_links("https://example.com/missing").is_empty());
    }

    #[tokio::test]
    async fn test_entry_without_links_is_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pages.jsonl");
        let cache = PageCache::open(&path).unwrap();
        cache
            .write(PageEntry::new("https://example.com/leaf", Vec::new()))
            .await
            .unwrap();

        let reloaded = PageCache::open(&path).unwrap();
        assert!(reloaded.exists("https://example.com/leaf"));
        assert!(reloaded.get_inner_links("https://example.com/leaf").is_empty());
    }

    #[test]
    fn test_load_existing_file_last_record_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pages.jsonl");
        std::fs::write(
            &path,
            concat!(
                "{\"url\":\"https://example.com/\",\"inner_links\":[\"https://example.com/old\"]}\n",
                "{\"url\":\"https://example.com/x\"}\n",
                "{\"url\":\"https://example.com/\",\"inner_links\":[\"https://example.com/new\"]}\n",
            ),
        )
        .unwrap();

        let cache = PageCache::open(&path).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.get_inner_links("https://example.com/"),
            links(&["https://example.com/new"])
        );
        assert!(cache.exists("https://example.com/x"));
    }
}
