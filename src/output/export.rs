//! Plain-text rendering of a documents file

use crate::extract::Document;
use crate::output::{read_documents, OutputResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const SEPARATOR_WIDTH: usize = 100;

/// Formats one document as a readable text block
///
/// URL, content, the parent URL, then a dashed separator, each followed by a
/// blank line.
pub fn format_document(doc: &Document) -> String {
    format!(
        "{}\n\n{}\n\nparent:{}\n\n{}\n\n",
        doc.url,
        doc.content_text,
        doc.parent_url.as_deref().unwrap_or(""),
        "-".repeat(SEPARATOR_WIDTH)
    )
}

/// Writes every document of `documents_path` to `output_path` as text
///
/// Returns the number of documents written.
pub fn export_text(documents_path: &Path, output_path: &Path) -> OutputResult<usize> {
    let documents = read_documents(documents_path)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(output_path)?);
    for doc in &documents {
        out.write_all(format_document(doc).as_bytes())?;
    }
    out.flush()?;

    Ok(documents.len())
}
