use std::fmt;

use platform_host::{DesktopSettings, ShortcutEntry, ShortcutsConfig};
use serde::{Deserialize, Serialize};

use crate::{
    config::LayoutConfig,
    content::{ContentLocator, ContentState},
    restore::RestoreQueue,
};

pub use crate::geometry::{
    CssLength, DragSession, InteractionState, PointerPosition, ResizeEdge, ResizeSession,
    WindowGeometry, WindowRect,
};

pub const SNAPSHOT_SCHEMA_VERSION: &str = "1.1";
const WINDOW_ID_PREFIX: &str = "w_";
const WINDOW_ID_SUFFIX_LEN: usize = 8;
const DEFAULT_ID_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowFlags {
    pub maximized: bool,
    pub minimized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub content: ContentLocator,
    pub icon_url: Option<String>,
    pub geometry: WindowGeometry,
    /// Geometry captured when the window was maximized; present only while maximized.
    pub restore_geometry: Option<WindowGeometry>,
    pub z_index: u32,
    pub is_active: bool,
    pub flags: WindowFlags,
    /// Set while a layout restore pass has already claimed this window.
    pub state_restored: bool,
    pub body: ContentState,
}

impl WindowRecord {
    pub fn is_visible(&self) -> bool {
        !self.flags.minimized
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub title: String,
    pub content: String,
    pub icon_url: Option<String>,
    /// Leaves the window without a taskbar button until it is first minimized.
    pub skip_taskbar_binding: bool,
}

impl OpenWindowRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_icon(mut self, icon_url: impl Into<String>) -> Self {
        let icon_url = icon_url.into();
        self.icon_url = (!icon_url.trim().is_empty()).then_some(icon_url);
        self
    }

    pub fn skipping_taskbar(mut self) -> Self {
        self.skip_taskbar_binding = true;
        self
    }

    pub fn from_shortcut(shortcut: &ShortcutEntry) -> Self {
        Self::new(&shortcut.title, &shortcut.content_path).with_icon(&shortcut.icon_url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskbarButtonId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarButtonKind {
    /// Declared by the taskbar shortcut list; survives its window.
    Static,
    /// Created for a window with no matching static entry; removed with it.
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Association between a taskbar button and the window it controls.
///
/// Replacing a binding swaps the whole value, so a button is never attached to two windows.
pub struct TaskbarBinding {
    pub window_id: WindowId,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskbarButton {
    pub id: TaskbarButtonId,
    pub kind: TaskbarButtonKind,
    pub label: String,
    pub icon_url: Option<String>,
    /// Launch target for static buttons clicked while unbound.
    pub shortcut: Option<ShortcutEntry>,
    pub binding: Option<TaskbarBinding>,
    pub active: bool,
}

impl TaskbarButton {
    pub fn bound_window(&self) -> Option<&WindowId> {
        self.binding.as_ref().map(|b| &b.window_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskbarState {
    pub buttons: Vec<TaskbarButton>,
    pub next_button_id: u64,
    pub next_binding_generation: u64,
}

impl TaskbarState {
    pub fn button(&self, id: TaskbarButtonId) -> Option<&TaskbarButton> {
        self.buttons.iter().find(|b| b.id == id)
    }

    pub fn button_for_window(&self, window_id: &WindowId) -> Option<&TaskbarButton> {
        self.buttons
            .iter()
            .find(|b| b.bound_window() == Some(window_id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    /// Open windows in stacking order, back to front.
    pub windows: Vec<WindowRecord>,
    pub taskbar: TaskbarState,
    pub start_menu_open: bool,
    pub shortcuts: ShortcutsConfig,
    pub settings: DesktopSettings,
    /// Message shown in place of the desktop icons when shortcut declarations failed to load.
    pub config_error: Option<String>,
    pub restore: RestoreQueue,
    pub layout: LayoutConfig,
    pub id_entropy: u64,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), DEFAULT_ID_SEED)
    }
}

impl DesktopState {
    pub fn new(layout: LayoutConfig, id_seed: u64) -> Self {
        Self {
            windows: Vec::new(),
            taskbar: TaskbarState::default(),
            start_menu_open: false,
            shortcuts: ShortcutsConfig::default(),
            settings: DesktopSettings::default(),
            config_error: None,
            restore: RestoreQueue::default(),
            layout,
            // xorshift never leaves zero
            id_entropy: if id_seed == 0 { DEFAULT_ID_SEED } else { id_seed },
        }
    }

    pub fn window(&self, id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == id)
    }

    pub fn window_mut(&mut self, id: &WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| &w.id == id)
    }

    pub fn window_by_title(&self, title: &str) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.title == title)
    }

    pub fn active_window(&self) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.is_active)
    }

    /// Draws a fresh `w_` + 8 base-36 character id not used by any open window.
    pub fn next_window_id(&mut self) -> WindowId {
        loop {
            let mut bits = self.next_entropy();
            let mut suffix = String::with_capacity(WINDOW_ID_SUFFIX_LEN);
            for _ in 0..WINDOW_ID_SUFFIX_LEN {
                suffix.push(base36_digit(bits % 36));
                bits /= 36;
            }
            let id = WindowId(format!("{WINDOW_ID_PREFIX}{suffix}"));
            if self.window(&id).is_none() {
                return id;
            }
        }
    }

    fn next_entropy(&mut self) -> u64 {
        let mut x = self.id_entropy;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.id_entropy = x;
        x
    }
}

fn base36_digit(value: u64) -> char {
    char::from_digit(value as u32, 36).unwrap_or('0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_ids_use_prefixed_base36_suffix() {
        let mut state = DesktopState::default();
        let id = state.next_window_id();
        let suffix = id.as_str().strip_prefix("w_").expect("prefix");
        assert_eq!(suffix.len(), 8);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(id, state.next_window_id());
    }

    #[test]
    fn open_request_drops_blank_icons() {
        let request = OpenWindowRequest::new("Notes", "notes.html").with_icon("  ");
        assert_eq!(request.icon_url, None);
        let request = OpenWindowRequest::from_shortcut(&ShortcutEntry::new(
            "Notes",
            "notes.html",
            "/icons/png/notes.png",
        ));
        assert_eq!(request.icon_url.as_deref(), Some("/icons/png/notes.png"));
        assert!(!request.skip_taskbar_binding);
    }
}
