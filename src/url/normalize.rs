use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a raw link against an optional base and normalizes it
///
/// # Normalization Steps
///
/// 1. Resolve `href` against `base` (or parse it as absolute when no base)
/// 2. Reject anything that is not HTTP or HTTPS
/// 3. Remove fragment (everything after #)
/// 4. Remove trailing slashes from the path; an empty path becomes `/`
///
/// Query strings are left untouched; rejecting them is the job of
/// [`should_keep`](crate::url::should_keep).
///
/// # Examples
///
/// ```
/// use site_gleaner::url::normalize_url;
///
/// let url = normalize_url("/docs/guide/#intro", Some("https://example.com/a")).unwrap();
/// assert_eq!(url, "https://example.com/docs/guide");
/// ```
pub fn normalize_url(href: &str, base: Option<&str>) -> UrlResult<String> {
    let base = match base {
        Some(b) => Some(Url::parse(b).map_err(|e| UrlError::Parse(format!("{}: {}", b, e)))?),
        None => None,
    };
    resolve_url(href, base.as_ref()).map(String::from)
}

/// Same as [`normalize_url`] but works on an already parsed base and
/// returns the parsed result
pub fn resolve_url(href: &str, base: Option<&Url>) -> UrlResult<Url> {
    let href = href.trim();
    if href.is_empty() {
        return Err(UrlError::Parse("empty link".to_string()));
    }

    let mut url = match base {
        Some(base) => base.join(href),
        None => Url::parse(href),
    }
    .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    url.set_fragment(None);

    let trimmed = url.path().trim_end_matches('/');
    let path = if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    };
    url.set_path(&path);

    Ok(url)
}
