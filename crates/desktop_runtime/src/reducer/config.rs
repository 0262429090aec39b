//! Reducer helpers for configuration documents loaded from the host.

use platform_host::{DesktopSettings, ShortcutsConfig};

use crate::{model::DesktopState, taskbar_binder};

pub(super) fn apply_shortcuts(state: &mut DesktopState, shortcuts: ShortcutsConfig) {
    state.shortcuts = shortcuts;
    state.config_error = None;
    taskbar_binder::set_static_buttons(
        &mut state.taskbar,
        &state.shortcuts.taskbar,
        &state.windows,
    );
}

pub(super) fn apply_settings(state: &mut DesktopState, settings: DesktopSettings) {
    if !settings.background_image_is_valid() {
        leptos::logging::warn!(
            "ignoring invalid background image `{}`",
            settings.background_image
        );
        state.settings = DesktopSettings {
            background_image: String::new(),
            ..settings
        };
        return;
    }
    state.settings = settings;
}

#[cfg(test)]
mod tests {
    use platform_host::ShortcutEntry;

    use super::*;
    use crate::model::TaskbarButtonKind;

    #[test]
    fn loading_shortcuts_clears_a_previous_error_and_builds_static_buttons() {
        let mut state = DesktopState {
            config_error: Some("offline".to_string()),
            ..DesktopState::default()
        };
        let mut shortcuts = ShortcutsConfig::default();
        shortcuts
            .taskbar
            .push(ShortcutEntry::new("Mail", "/mail.html", ""));
        apply_shortcuts(&mut state, shortcuts);
        assert_eq!(state.config_error, None);
        assert_eq!(state.taskbar.buttons.len(), 1);
        assert_eq!(state.taskbar.buttons[0].kind, TaskbarButtonKind::Static);
    }

    #[test]
    fn invalid_background_images_are_dropped() {
        let mut state = DesktopState::default();
        apply_settings(
            &mut state,
            DesktopSettings {
                background_image: "javascript:alert(1)".to_string(),
                ..DesktopSettings::default()
            },
        );
        assert_eq!(state.settings.background_image, "");
    }
}
