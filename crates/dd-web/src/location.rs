//! Location API
//!
//! window.location over `url::Url`, with a session history.

use crate::WebError;
use url::Url;

/// Location state
#[derive(Debug, Clone)]
pub struct Location {
    url: Url,
    history: Vec<Url>,
}

impl Location {
    pub fn new(url_str: &str) -> Result<Self, WebError> {
        let url = parse(url_str)?;
        Ok(Self {
            history: vec![url.clone()],
            url,
        })
    }

    /// Full URL
    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Navigate to `target`, resolved against the current URL
    pub fn assign(&mut self, target: &str) -> Result<&Url, WebError> {
        let next = self.resolve(target)?;
        tracing::info!(from = %self.url, to = %next, "navigating");
        self.history.push(next.clone());
        self.url = next;
        Ok(&self.url)
    }

    /// Resolve a possibly-relative URL against the current one
    pub fn resolve(&self, target: &str) -> Result<Url, WebError> {
        self.url.join(target).map_err(|source| WebError::InvalidUrl {
            url: target.to_string(),
            source,
        })
    }

    /// Step back one history entry, returning the new URL
    pub fn back(&mut self) -> Option<&Url> {
        if self.history.len() < 2 {
            return None;
        }
        self.history.pop();
        let previous = self.history.last()?.clone();
        self.url = previous;
        Some(&self.url)
    }

    /// Visited URLs, oldest first
    pub fn history(&self) -> &[Url] {
        &self.history
    }

    /// Protocol (e.g., "https:")
    pub fn protocol(&self) -> String {
        format!("{}:", self.url.scheme())
    }

    /// Host (hostname:port)
    pub fn host(&self) -> String {
        match (self.url.host_str(), self.url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            _ => String::new(),
        }
    }

    /// Hostname only
    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    /// Pathname
    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    /// Search/query string (including ?)
    pub fn search(&self) -> String {
        self.url
            .query()
            .filter(|q| !q.is_empty())
            .map(|q| format!("?{q}"))
            .unwrap_or_default()
    }

    /// Hash/fragment (including #)
    pub fn hash(&self) -> String {
        self.url
            .fragment()
            .filter(|f| !f.is_empty())
            .map(|f| format!("#{f}"))
            .unwrap_or_default()
    }

    /// Origin
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }
}

fn parse(url: &str) -> Result<Url, WebError> {
    Url::parse(url).map_err(|source| WebError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parts() {
        let loc = Location::new("https://example.com:8443/a/b?x=1#top").unwrap();
        assert_eq!(loc.protocol(), "https:");
        assert_eq!(loc.host(), "example.com:8443");
        assert_eq!(loc.hostname(), "example.com");
        assert_eq!(loc.pathname(), "/a/b");
        assert_eq!(loc.search(), "?x=1");
        assert_eq!(loc.hash(), "#top");
        assert_eq!(loc.origin(), "https://example.com:8443");
    }

    #[test]
    fn test_assign_relative() {
        let mut loc = Location::new("https://example.com/docs/index.html").unwrap();
        loc.assign("guide.html").unwrap();
        assert_eq!(loc.href(), "https://example.com/docs/guide.html");
        loc.assign("/home").unwrap();
        assert_eq!(loc.href(), "https://example.com/home");
        assert_eq!(loc.history().len(), 3);
    }

    #[test]
    fn test_back() {
        let mut loc = Location::new("https://example.com/").unwrap();
        assert!(loc.back().is_none());
        loc.assign("/next").unwrap();
        assert_eq!(loc.back().unwrap().path(), "/");
        assert_eq!(loc.history().len(), 1);
    }

    #[test]
    fn test_invalid() {
        assert!(Location::new("not a url").is_err());
        let mut blank = Location::new("about:blank").unwrap();
        assert!(matches!(blank.assign("relative"), Err(WebError::InvalidUrl { .. })));
    }
}
