//! HTML parser for extracting titles, content blocks, and links
//!
//! Pages are parsed with `scraper` into three raw pieces:
//! - The page title (from `<title>`)
//! - Candidate content blocks in document order
//! - Every anchor with a non-blank `href`

use scraper::{ElementRef, Html, Selector};

/// Tags that may carry readable content
const BLOCK_TAGS: &str = "h1, h2, h3, p, li, blockquote, pre, code";

/// Containers holding navigation or boilerplate
const NOISE_PARENTS: &[&str] = &["nav", "header", "footer", "aside"];

/// A raw content block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Lowercase tag name, e.g. `p`
    pub tag: String,

    /// Block text; lines separate the element's text nodes
    pub text: String,
}

/// A raw anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub href: String,
    pub text: String,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Content blocks outside navigation containers
    pub blocks: Vec<Block>,

    /// All anchors found in the body, unresolved
    pub links: Vec<RawLink>,
}

/// Parses HTML content into title, blocks, and links
///
/// # Block Extraction Rules
///
/// **Include:** `h1`-`h3`, `p`, `li`, `blockquote`, `pre`, `code`
///
/// **Exclude:** anything nested in `nav`, `header`, `footer`, or `aside`
///
/// `pre` and `code` keep their raw text. Other blocks join their trimmed,
/// non-empty text nodes with newlines.
///
/// # Example
///
/// ```
/// use site_gleaner::extract::parse_page;
///
/// let html = r#"<html><head><title>Test</title></head><body><p>Hi</p><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_page(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.blocks.len(), 1);
/// assert_eq!(parsed.links[0].href, "/page");
/// ```
pub fn parse_page(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        blocks: extract_blocks(&document),
        links: extract_links(&document),
    }
}

/// Joins an element's trimmed text nodes with newlines
fn stripped_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| stripped_text(&element))
        .filter(|s| !s.is_empty())
}

/// Returns true if any ancestor of the element is a noise container
fn in_noise_container(element: &ElementRef) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .map_or(false, |e| NOISE_PARENTS.contains(&e.name()))
    })
}

/// Extracts candidate content blocks in document order
fn extract_blocks(document: &Html) -> Vec<Block> {
    let Ok(selector) = Selector::parse(BLOCK_TAGS) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| !in_noise_container(element))
        .filter_map(|element| {
            let tag = element.value().name().to_string();
            let text = match tag.as_str() {
                "pre" | "code" => element.text().collect::<String>(),
                _ => stripped_text(&element),
            };
            if text.is_empty() {
                None
            } else {
                Some(Block { tag, text })
            }
        })
        .collect()
}

/// Extracts all anchors with a non-blank href from the body
fn extract_links(document: &Html) -> Vec<RawLink> {
    let Ok(selector) = Selector::parse("body a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            Some(RawLink {
                href: href.to_string(),
                text: stripped_text(&element),
            })
        })
        .collect()
}
