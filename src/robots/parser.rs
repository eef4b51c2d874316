//! Robots.txt rules backed by the robotstxt crate matcher

use robotstxt::DefaultMatcher;

/// Rules for one host
///
/// `AllowAll` is the fail-open entry cached when robots.txt could not be
/// retrieved; `Rules` keeps the raw file, which the matcher reads on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRobots {
    AllowAll,
    Rules(String),
}

impl ParsedRobots {
    /// Wraps raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self::Rules(content.to_string())
    }

    /// The permissive fallback entry
    pub fn allow_all() -> Self {
        Self::AllowAll
    }

    pub fn is_allow_all(&self) -> bool {
        matches!(self, Self::AllowAll)
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The user agent product token, e.g. `SiteGleaner`
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self {
            Self::AllowAll => true,
            Self::Rules(content) if content.trim().is_empty() => true,
            Self::Rules(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, url)
            }
        }
    }
}
