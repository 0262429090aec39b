//! Endpoint locations for the configuration bridge.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Paths of the JSON endpoints, relative to `url_prefix`.
pub struct ConfigEndpoints {
    /// Deployment prefix prepended to every path (empty when served from the root).
    pub url_prefix: String,
    /// Shortcut declarations (`GET`).
    pub shortcuts: String,
    /// Shortcut declarations (`POST`).
    pub shortcuts_save: String,
    /// Desktop settings (`GET`/`POST`).
    pub settings: String,
    /// Alternate editor document (`GET`).
    pub api_config: String,
    /// Alternate editor document (`POST`).
    pub api_save: String,
    /// Icon catalog regeneration (`POST`).
    pub icons_sync: String,
    /// Icon catalog (`GET`).
    pub icon_manifest: String,
}

impl Default for ConfigEndpoints {
    fn default() -> Self {
        Self {
            url_prefix: String::new(),
            shortcuts: "/config/shortcuts.json".to_string(),
            shortcuts_save: "/shortcuts.json".to_string(),
            settings: "/settings.json".to_string(),
            api_config: "/api/config".to_string(),
            api_save: "/api/save".to_string(),
            icons_sync: "/api/icons/sync".to_string(),
            icon_manifest: "/js/icon-manifest.json".to_string(),
        }
    }
}

impl ConfigEndpoints {
    /// Joins `path` onto the URL prefix.
    pub fn url(&self, path: &str) -> String {
        let prefix = self.url_prefix.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{prefix}{path}")
        } else {
            format!("{prefix}/{path}")
        }
    }
}
