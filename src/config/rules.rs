use crate::config::types::{PageTypeRule, SiteEntry, UrlRules};

/// Host name of the entry whose URL rules apply when a site has none
const DEFAULT_SITE: &str = "default";

/// Rule set resolved for the host being crawled
#[derive(Debug, Clone, Default)]
pub struct SiteRules {
    /// Page-type rules, longest prefix first
    pub page_types: Vec<PageTypeRule>,

    /// Link filtering rules, if any entry provides them
    pub urls: Option<UrlRules>,
}

impl SiteRules {
    /// Resolves the rules for `host` from the configured `[[site]]` entries
    ///
    /// Page types come only from the host's own entry. URL rules come from
    /// the host's entry, falling back to the `default` entry.
    pub fn for_host(sites: &[SiteEntry], host: &str) -> Self {
        let own = sites.iter().find(|s| s.host.eq_ignore_ascii_case(host));
        let fallback = sites
            .iter()
            .find(|s| s.host.eq_ignore_ascii_case(DEFAULT_SITE));

        let mut page_types = own.map(|s| s.page_types.clone()).unwrap_or_default();
        page_types.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

        let urls = own.or(fallback).map(|s| UrlRules {
            drop_prefix: s.drop_prefix.clone(),
        });

        Self { page_types, urls }
    }
}
