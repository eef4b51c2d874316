//! Append-only JSON lines files.

use crate::storage::{StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Append-only JSON-lines file shared by concurrent writers
///
/// Each record is serialized up front; the append itself happens under one
/// async mutex so records never interleave.
#[derive(Debug)]
pub struct JsonLinesWriter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonLinesWriter {
    /// Prepares a writer, creating the parent directory if needed
    ///
    /// The file itself is created on the first append.
    pub fn create(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record as a single line
    pub async fn append<T: Serialize>(&self, record: &T) -> StorageResult<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || append_line(&path, &line)).await??;
        Ok(())
    }
}

fn append_line(path: &Path, line: &str) -> StorageResult<()> {
    let io_err = |source| StorageError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    file.write_all(line.as_bytes()).map_err(io_err)?;
    Ok(())
}

/// Reads every record of a JSON-lines file
///
/// A missing file reads as empty. Blank lines are ignored; lines that do not
/// parse are logged and skipped.
pub fn read_json_lines<T: DeserializeOwned>(path: &Path) -> StorageResult<Vec<T>> {
    let io_err = |source| StorageError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err(e)),
    };

    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(
                "Skipping malformed line {} in {}: {}",
                index + 1,
                path.display(),
                e
            ),
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u32,
        text: String,
    }

    #[tokio::test]
    async fn test_append_creates_parent_and_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/rows.jsonl");
        let writer = JsonLinesWriter::create(&path).unwrap();
        assert!(path.parent().unwrap().exists());
        assert!(!path.exists());

        writer
            .append(&Row {
                id: 1,
                text: "héllo".to_string(),
            })
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"id\":1,\"text\":\"héllo\"}\n");
    }

    #[tokio::test]
    async fn test_concurrent_appends_do_not_interleave() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.jsonl");
        let writer = Arc::new(JsonLinesWriter::create(&path).unwrap());

        let mut handles = Vec::new();
        for id in 0..50 {
            let writer = writer.clone();
            handles.push(tokio::spawn(async move {
                let row = Row {
                    id,
                    text: "x".repeat(2000),
                };
                writer.append(&row).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let rows: Vec<Row> = read_json_lines(&path).unwrap();
        assert_eq!(rows.len(), 50);
        let mut ids: Vec<u32> = rows.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let rows: Vec<Row> = read_json_lines(&dir.path().join("absent.jsonl")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_skips_blank_and_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.jsonl");
        std::fs::write(
            &path,
            "{\"id\":1,\"text\":\"a\"}\n\n{broken\n{\"id\":2,\"text\":\"b\"}\n",
        )
        .unwrap();

        let rows: Vec<Row> = read_json_lines(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                Row {
                    id: 1,
                    text: "a".to_string()
                },
                Row {
                    id: 2,
                    text: "b".to_string()
                },
            ]
        );
    }
}
