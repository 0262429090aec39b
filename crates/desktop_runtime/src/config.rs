//! Shell configuration: endpoint locations, persistence policy and layout constants.
//!
//! Every field has a default matching the stock deployment, so an empty JSON object is a valid
//! configuration document.

use platform_host::ConfigEndpoints;
use serde::{Deserialize, Serialize};

/// Stacking level of modal dialogs.
pub const MODAL_Z_INDEX: u32 = 9998;
/// Stacking level of the full-viewport overlay shown during drag and resize.
pub const DRAG_GUARD_Z_INDEX: u32 = 9999;
/// Stacking level of toast notifications.
pub const NOTIFICATION_Z_INDEX: u32 = 10000;
/// Stacking level of context menus.
pub const CONTEXT_MENU_Z_INDEX: u32 = 10001;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistenceConfig {
    pub storage_key: String,
    pub schema_version: String,
    pub debounce_ms: u32,
    pub periodic_save_ms: u32,
    pub max_age_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            storage_key: "warmbos-desktop-state".to_string(),
            schema_version: crate::model::SNAPSHOT_SCHEMA_VERSION.to_string(),
            debounce_ms: 1_000,
            periodic_save_ms: 30_000,
            max_age_ms: 24 * 60 * 60 * 1_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub taskbar_height_px: i32,
    /// Lowest z-index a focused window can receive; focus always lands strictly above it.
    pub z_floor: u32,
    /// Highest z-index ever assigned to a window.
    pub z_ceiling: u32,
    pub min_window_width: i32,
    pub min_window_height: i32,
    pub default_window_width: i32,
    pub default_window_height: i32,
    /// Offset of the first window from the top-left corner; later windows cascade from it.
    pub cascade_origin: i32,
    pub cascade_step: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            taskbar_height_px: 40,
            z_floor: 1001,
            z_ceiling: 9000,
            min_window_width: 200,
            min_window_height: 120,
            default_window_width: 640,
            default_window_height: 480,
            cascade_origin: 40,
            cascade_step: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Complete shell configuration handed to [`crate::DesktopProvider`].
pub struct ShellConfig {
    pub endpoints: ConfigEndpoints,
    pub persistence: PersistenceConfig,
    pub layout: LayoutConfig,
}

impl ShellConfig {
    /// Parses a configuration document, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when `raw` is not a valid configuration object.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Configuration with every endpoint rooted under `url_prefix`.
    pub fn with_url_prefix(mut self, url_prefix: impl Into<String>) -> Self {
        self.endpoints.url_prefix = url_prefix.into();
        self
    }
}
