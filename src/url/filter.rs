use crate::config::UrlRules;
use url::Url;

/// Decides whether a normalized link should be queued for crawling
///
/// Links carrying a query string are always rejected. Otherwise the link is
/// rejected when its path equals, or sits below, one of the rule set's
/// `drop-prefix` entries. Trailing slashes are ignored on both sides.
///
/// # Examples
///
/// ```
/// use site_gleaner::config::UrlRules;
/// use site_gleaner::url::should_keep;
///
/// let rules = UrlRules { drop_prefix: vec!["/about-us/".to_string()] };
/// assert!(!should_keep("https://example.com/about-us/team", Some(&rules)));
/// assert!(should_keep("https://example.com/about-usage", Some(&rules)));
/// assert!(!should_keep("https://example.com/search?q=x", None));
/// ```
pub fn should_keep(url: &str, rules: Option<&UrlRules>) -> bool {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return false,
    };

    if parsed.query().map_or(false, |q| !q.is_empty()) {
        return false;
    }

    let path = match parsed.path().trim_end_matches('/') {
        "" => "/",
        p => p,
    };

    let Some(rules) = rules else {
        return true;
    };

    for prefix in &rules.drop_prefix {
        let prefix = prefix.trim_end_matches('/');
        if path == prefix || path.starts_with(&format!("{}/", prefix)) {
            return false;
        }
    }

    true
}
