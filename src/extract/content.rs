//! Content-block filtering
//!
//! Headings are always kept. Paragraph-like blocks survive only when they
//! are long enough to be real prose; a page counts as a document only if at
//! least one such paragraph survives.

use crate::extract::lang::{detect_language, is_cjk};
use crate::extract::parse::Block;

/// Minimum words (or characters, for CJK text) of a meaningful paragraph
pub const MIN_WORDS: usize = 30;

pub const HEADING_TAGS: &[&str] = &["h1", "h2", "h3"];
pub const PARAGRAPH_TAGS: &[&str] = &["p", "blockquote", "pre", "code"];

/// Returns true if the tag is a heading or paragraph tag
pub fn is_content_tag(tag: &str) -> bool {
    HEADING_TAGS.contains(&tag) || PARAGRAPH_TAGS.contains(&tag)
}

/// Collapses a block's lines into one space-separated line
pub fn normalize_block(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decides whether a text block is long enough to count as a paragraph
///
/// Text in an undetectable language never counts.
pub fn is_long_paragraph(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }

    match detect_language(text) {
        None => false,
        Some(lang) if is_cjk(lang) => text.chars().count() >= MIN_WORDS,
        Some(_) => text.split_whitespace().count() >= MIN_WORDS,
    }
}

/// Keeps headings and long paragraphs
///
/// Returns whether any long paragraph was found, along with the kept blocks
/// in their original order.
pub fn filter_blocks(blocks: &[Block]) -> (bool, Vec<Block>) {
    let mut kept = Vec::new();
    let mut has_long_paragraph = false;

    for block in blocks {
        let tag = block.tag.to_lowercase();
        let text = block.text.trim();
        if text.is_empty() {
            continue;
        }

        if HEADING_TAGS.contains(&tag.as_str()) {
            kept.push(block.clone());
        } else if PARAGRAPH_TAGS.contains(&tag.as_str()) && is_long_paragraph(text) {
            kept.push(block.clone());
            has_long_paragraph = true;
        }
    }

    (has_long_paragraph, kept)
}
