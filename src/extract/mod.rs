//! Extraction module: turns fetched HTML into a document and child links
//!
//! This module contains the pure, stateless half of the crawl:
//! - HTML parsing into title, blocks, and anchors
//! - Content-block filtering with language-aware paragraph lengths
//! - Page-type inference from path-prefix rules
//! - Internal link resolution and rule-based filtering

mod content;
mod document;
mod lang;
mod parse;

pub use content::{filter_blocks, is_long_paragraph, normalize_block, MIN_WORDS};
pub use document::{char_count, word_count, Document, DocumentMeta};
pub use lang::{detect_language, language_code};
pub use parse::{parse_page, Block, ParsedPage, RawLink};

use crate::config::{PageTypeRule, SiteRules, UrlRules};
use crate::url::{is_internal_link, resolve_url, should_keep};
use crate::GleanError;
use chrono::Utc;
use std::collections::HashSet;
use url::Url;

/// Result of extracting one page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// The document, if the page carried enough prose
    pub document: Option<Document>,

    /// Normalized same-site links that passed the URL rules
    pub inner_links: Vec<String>,
}

/// Title, content blocks, and internal links of a parsed page
#[derive(Debug, Clone)]
pub struct PageInfo {
    pub title: Option<String>,
    pub blocks: Vec<Block>,
    pub inner_links: Vec<String>,
}

/// Keeps content-tag blocks (normalized) and resolves internal links
pub fn build_page_info(parsed: ParsedPage, page_url: &Url) -> PageInfo {
    let blocks = parsed
        .blocks
        .into_iter()
        .filter(|b| content::is_content_tag(&b.tag))
        .map(|b| Block {
            text: normalize_block(&b.text),
            tag: b.tag,
        })
        .collect();

    PageInfo {
        title: parsed.title,
        blocks,
        inner_links: internal_links(&parsed.links, page_url),
    }
}

/// Resolves anchors against the page and keeps same-site links
///
/// Duplicates are dropped; first-seen order is kept.
fn internal_links(links: &[RawLink], page_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for link in links {
        let Ok(resolved) = resolve_url(&link.href, Some(page_url)) else {
            continue;
        };
        if !is_internal_link(&resolved, page_url) {
            continue;
        }
        let resolved = String::from(resolved);
        if seen.insert(resolved.clone()) {
            out.push(resolved);
        }
    }

    out
}

/// Infers a page type from path-prefix rules
///
/// Rules are expected longest prefix first; the first rule whose prefix
/// (trailing slashes ignored) equals or starts the page path wins.
pub fn infer_page_type(page_url: &Url, rules: &[PageTypeRule]) -> Option<String> {
    let path = match page_url.path() {
        "" => "/",
        p => p,
    };

    rules.iter().find_map(|rule| {
        let prefix = match rule.prefix.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        if path == prefix || path.starts_with(prefix) {
            Some(rule.page_type.clone())
        } else {
            None
        }
    })
}

/// Joins kept blocks into the document body, one block per line
fn make_content_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn filter_inner_links(links: Vec<String>, rules: Option<&UrlRules>) -> Vec<String> {
    links
        .into_iter()
        .filter(|link| should_keep(link, rules))
        .collect()
}

/// End-to-end extraction of one fetched page
///
/// Pure apart from the `fetched_at` timestamp. `parent_url` is left empty;
/// the caller stamps it.
///
/// # Errors
///
/// Returns [`GleanError::Extraction`] when `url` is not an absolute URL.
///
/// # Example
///
/// ```
/// use site_gleaner::config::SiteRules;
/// use site_gleaner::extract::extract_page;
///
/// let html = r#"<html><body><h1>Hello</h1><a href="/next">Next</a></body></html>"#;
/// let page = extract_page(html, "https://example.com/", &SiteRules::default()).unwrap();
/// assert!(page.document.is_none());
/// assert_eq!(page.inner_links, vec!["https://example.com/next".to_string()]);
/// ```
pub fn extract_page(html: &str, url: &str, rules: &SiteRules) -> Result<ExtractedPage, GleanError> {
    let page_url = Url::parse(url).map_err(|e| GleanError::Extraction {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let info = build_page_info(parse_page(html), &page_url);
    let (has_content, kept) = filter_blocks(&info.blocks);

    let document = if has_content {
        let content_text = make_content_text(&kept);
        Some(Document {
            url: url.to_string(),
            title: info.title,
            page_type: infer_page_type(&page_url, &rules.page_types),
            parent_url: None,
            meta: DocumentMeta {
                language: detect_language(&content_text).map(|l| language_code(l).to_string()),
                word_count: word_count(&content_text),
                char_count: char_count(&content_text),
                fetched_at: Utc::now(),
            },
            content_text,
        })
    } else {
        None
    };

    Ok(ExtractedPage {
        document,
        inner_links: filter_inner_links(info.inner_links, rules.urls.as_ref()),
    })
}
