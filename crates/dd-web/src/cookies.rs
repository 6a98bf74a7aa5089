//! Cookie storage
//!
//! A cookie jar with `document.cookie` semantics: writing takes one
//! `name=value; attr=...` string, reading yields `name=value; ...` for
//! the cookies visible at a URL.

use chrono::{DateTime, Duration, Utc};
use percent_encoding::percent_decode_str;
use url::Url;

/// A browser cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    /// Set when no Domain attribute was given
    pub host_only: bool,
    pub path: String,
    /// `None` for session cookies
    pub expires: Option<DateTime<Utc>>,
    pub secure: bool,
    pub same_site: SameSite,
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    #[default]
    Lax,
    Strict,
    None,
}

impl Cookie {
    /// Create a new host-only session cookie at `/`
    pub fn new(name: &str, value: &str, domain: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            domain: domain.to_ascii_lowercase(),
            host_only: true,
            path: "/".to_string(),
            expires: None,
            secure: false,
            same_site: SameSite::Lax,
        }
    }

    /// Check if cookie is expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    /// Check if cookie is visible at a URL
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or("").to_ascii_lowercase();
        let domain_ok = if self.host_only {
            host == self.domain
        } else {
            domain_matches(&host, &self.domain)
        };

        domain_ok && path_matches(url.path(), &self.path) && (!self.secure || url.scheme() == "https")
    }

    /// Parse a cookie string as written to `document.cookie` on `url`
    ///
    /// `expires=session` and unparseable dates leave a session cookie.
    /// `max-age` wins over `expires`. Returns `None` for strings that set
    /// nothing or name a domain the URL cannot set.
    pub fn parse(input: &str, url: &Url, now: DateTime<Utc>) -> Option<Self> {
        let mut parts = input.split(';');
        let first = parts.next()?.trim();

        let (name, value) = match first.split_once('=') {
            Some((n, v)) => (n.trim(), v.trim()),
            None => ("", first),
        };
        if name.is_empty() && value.is_empty() {
            return None;
        }

        let host = url.host_str().unwrap_or("");
        let mut cookie = Cookie::new(name, value, host);
        cookie.path = default_path(url);
        let mut max_age = None;

        for part in parts {
            let part = part.trim();
            let (attr, val) = match part.split_once('=') {
                Some((a, v)) => (a.trim(), v.trim()),
                None => (part, ""),
            };
            match attr.to_ascii_lowercase().as_str() {
                "expires" => cookie.expires = parse_expires(val),
                "max-age" => {
                    if let Ok(secs) = val.parse::<i64>() {
                        max_age = Some(secs);
                    }
                }
                "domain" if !val.is_empty() => {
                    let domain = val.trim_start_matches('.').to_ascii_lowercase();
                    if !domain_matches(&host.to_ascii_lowercase(), &domain) {
                        tracing::warn!(domain = %domain, host, "cookie domain rejected");
                        return None;
                    }
                    cookie.domain = domain;
                    cookie.host_only = false;
                }
                "path" if val.starts_with('/') => cookie.path = val.to_string(),
                "secure" => cookie.secure = true,
                "samesite" => {
                    cookie.same_site = match val.to_ascii_lowercase().as_str() {
                        "strict" => SameSite::Strict,
                        "none" => SameSite::None,
                        _ => SameSite::Lax,
                    };
                }
                _ => {}
            }
        }

        if let Some(secs) = max_age {
            cookie.expires = Some(if secs <= 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                Duration::try_seconds(secs)
                    .and_then(|d| now.checked_add_signed(d))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC)
            });
        }

        Some(cookie)
    }

    /// Serialize to Cookie header format
    pub fn to_header(&self) -> String {
        if self.name.is_empty() {
            self.value.clone()
        } else {
            format!("{}={}", self.name, self.value)
        }
    }
}

/// HTTP-date, e.g. `Thu, 01 Jan 1970 00:00:00 GMT`
fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    if value.eq_ignore_ascii_case("session") {
        return None;
    }
    DateTime::parse_from_rfc2822(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn domain_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
}

/// Directory of the URL path, `/` at the top
fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => path[..i].to_string(),
    }
}

/// `decodeURIComponent`, with invalid UTF-8 replaced
pub fn decode_uri_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Cookie jar - stores and manages cookies in creation order
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie, replacing one with the same name, domain and path.
    /// An expired cookie only removes its counterpart.
    pub fn add(&mut self, cookie: Cookie, now: DateTime<Utc>) {
        let existing = self.cookies.iter().position(|c| {
            c.name == cookie.name && c.domain == cookie.domain && c.path == cookie.path
        });

        if cookie.is_expired(now) {
            if let Some(i) = existing {
                self.cookies.remove(i);
            }
            tracing::debug!(name = %cookie.name, "expired cookie removed");
            return;
        }

        match existing {
            Some(i) => self.cookies[i] = cookie,
            None => self.cookies.push(cookie),
        }
    }

    /// `document.cookie = input` on the page at `url`
    pub fn set_document_cookie(&mut self, url: &Url, input: &str) {
        self.set_document_cookie_at(url, input, Utc::now());
    }

    pub fn set_document_cookie_at(&mut self, url: &Url, input: &str, now: DateTime<Utc>) {
        match Cookie::parse(input, url, now) {
            Some(cookie) => self.add(cookie, now),
            None => tracing::warn!(input, "ignored cookie string"),
        }
    }

    /// Value of `document.cookie` on the page at `url`
    pub fn document_cookie(&self, url: &Url) -> String {
        self.document_cookie_at(url, Utc::now())
    }

    /// Longer paths first, then creation order
    pub fn document_cookie_at(&self, url: &Url, now: DateTime<Utc>) -> String {
        let mut visible = self.get_for_url(url, now);
        visible.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        visible
            .iter()
            .map(|c| c.to_header())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Get live cookies visible at a URL
    pub fn get_for_url(&self, url: &Url, now: DateTime<Utc>) -> Vec<&Cookie> {
        self.cookies
            .iter()
            .filter(|c| c.matches(url) && !c.is_expired(now))
            .collect()
    }

    /// Clear all cookies
    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Drop cookies expired at `now`
    pub fn clear_expired(&mut self, now: DateTime<Utc>) {
        self.cookies.retain(|c| !c.is_expired(now));
    }

    /// Count cookies
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}
