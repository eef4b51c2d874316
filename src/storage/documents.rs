use crate::extract::Document;
use crate::storage::{JsonLinesWriter, StorageResult};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Append-only sink for extracted documents
pub struct DocumentSink {
    writer: JsonLinesWriter,
    written: AtomicUsize,
}

impl DocumentSink {
    /// Prepares the document file, creating its directory if needed
    ///
    /// Existing documents are kept; new ones are appended after them.
    pub fn create(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self {
            writer: JsonLinesWriter::create(path)?,
            written: AtomicUsize::new(0),
        })
    }

    pub async fn write(&self, document: &Document) -> StorageResult<()> {
        self.writer.append(document).await?;
        self.written.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Documents written through this sink during the current run
    pub fn written(&self) -> usize {
        self.written.load(Ordering::SeqCst)
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }
}
