use url::Url;

/// Returns the `host[:port]` part of a URL
///
/// Two URLs are on the same site exactly when their netlocs are equal. The
/// host is lowercased by the URL parser; default ports are dropped.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_gleaner::url::netloc;
///
/// let url = Url::parse("https://Example.com:8080/path").unwrap();
/// assert_eq!(netloc(&url), Some("example.com:8080".to_string()));
/// ```
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Returns the netloc of a URL string with any leading `www.` removed
///
/// This is the key under which per-site crawl rules are looked up.
pub fn normalized_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = netloc(&parsed)?;
    Some(match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    })
}

/// Checks whether `url` lives on the same netloc as `base`
pub fn is_internal_link(url: &Url, base: &Url) -> bool {
    match (netloc(url), netloc(base)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
