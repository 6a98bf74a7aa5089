//! Navigator information

use serde::{Deserialize, Serialize};

/// User agent sent by default
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; doubledollar/0.1)";

/// What the navigator reports about the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigatorConfig {
    pub language: String,
    pub user_agent: String,
    pub platform: String,
    pub vendor: String,
    pub on_line: bool,
    pub cookie_enabled: bool,
    /// `"1"`, `"0"`, or unset
    pub do_not_track: Option<String>,
    pub app_version: String,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            platform: std::env::consts::OS.to_string(),
            vendor: String::new(),
            on_line: true,
            cookie_enabled: true,
            do_not_track: None,
            app_version: "5.0 (compatible; doubledollar/0.1)".to_string(),
        }
    }
}

/// Snapshot of client details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub lang: String,
    pub user_agent: String,
    pub os: String,
    pub vendor: String,
    pub online: bool,
    pub cookies_enabled: bool,
    /// `"1"`, `"0"` or `"unspecified"`
    pub do_not_track: String,
    pub version: String,
}

impl From<&NavigatorConfig> for ClientInfo {
    fn from(nav: &NavigatorConfig) -> Self {
        Self {
            lang: nav.language.clone(),
            user_agent: nav.user_agent.clone(),
            os: nav.platform.clone(),
            vendor: nav.vendor.clone(),
            online: nav.on_line,
            cookies_enabled: nav.cookie_enabled,
            do_not_track: nav
                .do_not_track
                .clone()
                .unwrap_or_else(|| "unspecified".to_string()),
            version: nav.app_version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_info_from_defaults() {
        let info = ClientInfo::from(&NavigatorConfig::default());
        assert_eq!(info.lang, "en-US");
        assert_eq!(info.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(info.do_not_track, "unspecified");
        assert!(info.online);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let nav: NavigatorConfig =
            serde_json::from_str(r#"{"language": "fr-FR", "doNotTrack": "1"}"#).unwrap();
        assert_eq!(nav.language, "fr-FR");
        assert_eq!(nav.do_not_track.as_deref(), Some("1"));
        assert!(nav.cookie_enabled);
    }

    #[test]
    fn test_client_info_serializes_camel_case() {
        let json = serde_json::to_value(ClientInfo::from(&NavigatorConfig::default())).unwrap();
        assert!(json.get("userAgent").is_some());
        assert!(json.get("cookiesEnabled").is_some());
    }
}
