//! Page configuration

use crate::Result;
use dd_web::NavigatorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for a `Page`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Initial document URL
    pub url: String,
    pub navigator: NavigatorConfig,
    /// Local storage file; in-memory when unset
    pub storage_path: Option<PathBuf>,
    /// Overrides `navigator.userAgent` for requests and client info
    pub user_agent: Option<String>,
    pub has_vibrator: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            navigator: NavigatorConfig::default(),
            storage_path: None,
            user_agent: None,
            has_vibrator: false,
            timeout_secs: 30,
        }
    }
}

impl PageConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Effective user agent
    pub fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .unwrap_or(&self.navigator.user_agent)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PageConfig::default();
        assert_eq!(config.url, "about:blank");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.user_agent(), dd_web::DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_partial_json() {
        let config = PageConfig::from_json(
            r#"{"url": "https://example.com/", "has_vibrator": true, "navigator": {"language": "es"}}"#,
        )
        .unwrap();
        assert_eq!(config.url, "https://example.com/");
        assert!(config.has_vibrator);
        assert_eq!(config.navigator.language, "es");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_user_agent_override() {
        let config = PageConfig {
            user_agent: Some("custom/1.0".into()),
            ..PageConfig::default()
        };
        assert_eq!(config.user_agent(), "custom/1.0");
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(PageConfig::from_json("{"), Err(crate::Error::ConfigJson(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            PageConfig::from_file("/nonexistent/dd-config.json"),
            Err(crate::Error::ConfigIo(_))
        ));
    }
}
