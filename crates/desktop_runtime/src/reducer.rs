//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

mod config;

use platform_host::{DesktopSettings, ShortcutsConfig};
use thiserror::Error;

use crate::{
    content::{ContentLocator, ContentState},
    model::{
        DesktopState, DragSession, InteractionState, OpenWindowRequest, PointerPosition,
        ResizeEdge, ResizeSession, TaskbarButtonId, WindowId, WindowRect,
    },
    persistence::DesktopSnapshot,
    restore::{self, RestoreStep},
    taskbar_binder,
    window_manager::{self, OpenOutcome},
    z_order,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window, or focus the one already showing the same title.
    OpenWindow(OpenWindowRequest),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Un-minimize and focus a window.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Maximize a window, or return it to its pre-maximize geometry.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
        /// Browser viewport; the taskbar height is taken off its bottom.
        viewport: WindowRect,
    },
    /// Toggle taskbar behavior for a window (focus, minimize, or restore).
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Click on a taskbar button.
    ActivateTaskbarButton {
        /// Clicked button.
        button_id: TaskbarButtonId,
    },
    /// Toggle the start menu open/closed.
    ToggleStartMenu,
    /// Close the start menu if open.
    CloseStartMenu,
    /// Begin dragging a window by its title bar.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag.
    EndMove,
    /// Begin resizing a window.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window resize.
    EndResize,
    /// An HTML fragment fetch finished.
    ContentLoaded {
        /// Window the fetch was issued for.
        window_id: WindowId,
        /// Fragment markup, or the failure description.
        result: Result<String, String>,
    },
    /// Shortcut declarations arrived from the configuration endpoint. Replaces the static
    /// taskbar entries and re-binds open windows against the new list.
    ShortcutsLoaded {
        /// Loaded declarations.
        shortcuts: ShortcutsConfig,
    },
    /// Shortcut declarations could not be loaded.
    ShortcutsLoadFailed {
        /// Message shown in place of the desktop icons.
        message: String,
    },
    /// Desktop settings arrived from the configuration endpoint.
    SettingsLoaded {
        /// Loaded settings.
        settings: DesktopSettings,
    },
    /// Start restoring a saved layout.
    BeginRestore {
        /// Validated snapshot to restore.
        snapshot: DesktopSnapshot,
    },
    /// Restore the next queued window.
    RestoreNextWindow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell runtime to execute.
pub enum RuntimeEffect {
    /// Schedule a debounced layout save.
    PersistLayout,
    /// Fetch an HTML fragment and report back with [`DesktopAction::ContentLoaded`].
    LoadContent {
        /// Window waiting for the fragment.
        window_id: WindowId,
        /// Fragment path.
        path: String,
    },
    /// Dispatch [`DesktopAction::RestoreNextWindow`] on the next animation frame.
    ScheduleRestoreStep,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions (for example, referencing a missing window).
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window not found")]
    WindowNotFound,
    /// The target taskbar button was not found in the current state.
    #[error("taskbar button not found")]
    ButtonNotFound,
    /// The window chrome could not be built (the request carries no title).
    #[error("window scaffold unavailable: open request has no title")]
    MissingScaffold,
}

fn load_effect(state: &DesktopState, window_id: &WindowId) -> Option<RuntimeEffect> {
    let window = state.window(window_id)?;
    match (&window.content, &window.body) {
        (ContentLocator::HtmlFragment(path), ContentState::Pending) => {
            Some(RuntimeEffect::LoadContent {
                window_id: window_id.clone(),
                path: path.clone(),
            })
        }
        _ => None,
    }
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// This function is the authoritative state transition engine for window management, taskbar
/// bindings and layout restore. Taskbar highlights are recomputed after every action.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not
/// present, [`ReducerError::ButtonNotFound`] for unknown taskbar buttons, and
/// [`ReducerError::MissingScaffold`] when an open request cannot produce a window.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            let outcome = window_manager::open_window(state, &req)?;
            state.start_menu_open = false;
            if let OpenOutcome::Created(window_id) = &outcome {
                effects.extend(load_effect(state, window_id));
            }
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::CloseWindow { window_id } => {
            if !window_manager::close_window(state, &window_id) {
                return Ok(effects);
            }
            if interaction
                .dragging
                .as_ref()
                .is_some_and(|s| s.window_id == window_id)
            {
                interaction.dragging = None;
            }
            if interaction
                .resizing
                .as_ref()
                .is_some_and(|s| s.window_id == window_id)
            {
                interaction.resizing = None;
            }
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::FocusWindow { window_id } => {
            let was_front = state
                .active_window()
                .is_some_and(|w| w.id == window_id);
            window_manager::focus_window(state, &window_id)?;
            state.start_menu_open = false;
            if !was_front {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::MinimizeWindow { window_id } => {
            window_manager::minimize_window(state, &window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::RestoreWindow { window_id } => {
            window_manager::restore_window(state, &window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ToggleMaximize {
            window_id,
            viewport,
        } => {
            window_manager::toggle_maximize(state, &window_id, viewport)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let window = state
                .window(&window_id)
                .ok_or(ReducerError::WindowNotFound)?;
            let (minimized, active) = (window.flags.minimized, window.is_active);
            if minimized {
                window_manager::restore_window(state, &window_id)?;
            } else if active {
                window_manager::minimize_window(state, &window_id)?;
            } else {
                window_manager::focus_window(state, &window_id)?;
            }
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ActivateTaskbarButton { button_id } => {
            let button = state
                .taskbar
                .button(button_id)
                .ok_or(ReducerError::ButtonNotFound)?;
            match (button.bound_window().cloned(), button.shortcut.clone()) {
                (Some(window_id), _) => {
                    return reduce_desktop(
                        state,
                        interaction,
                        DesktopAction::ToggleTaskbarWindow { window_id },
                    );
                }
                (None, Some(shortcut)) => {
                    return reduce_desktop(
                        state,
                        interaction,
                        DesktopAction::OpenWindow(
                            OpenWindowRequest::from_shortcut(&shortcut).skipping_taskbar(),
                        ),
                    );
                }
                (None, None) => {}
            }
        }
        DesktopAction::ToggleStartMenu => {
            state.start_menu_open = !state.start_menu_open;
        }
        DesktopAction::CloseStartMenu => {
            state.start_menu_open = false;
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let window = state
                .window(&window_id)
                .ok_or(ReducerError::WindowNotFound)?;
            let rect_start = (!window.flags.maximized)
                .then(|| window.geometry.to_rect())
                .flatten();
            window_manager::focus_window(state, &window_id)?;
            if let Some(rect_start) = rect_start {
                interaction.dragging = Some(DragSession {
                    window_id,
                    pointer_start: pointer,
                    rect_start,
                });
            }
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let rect = session.rect_at(pointer);
                if state.window(&session.window_id).is_none() {
                    interaction.dragging = None;
                    return Err(ReducerError::WindowNotFound);
                }
                window_manager::place_window(state, &session.window_id, rect);
            }
        }
        DesktopAction::EndMove => {
            if interaction.dragging.take().is_some() {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let window = state
                .window(&window_id)
                .ok_or(ReducerError::WindowNotFound)?;
            let rect_start = (!window.flags.maximized)
                .then(|| window.geometry.to_rect())
                .flatten();
            window_manager::focus_window(state, &window_id)?;
            if let Some(rect_start) = rect_start {
                interaction.resizing = Some(ResizeSession {
                    window_id,
                    edge,
                    pointer_start: pointer,
                    rect_start,
                });
            }
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let layout = state.layout;
                let rect =
                    session.rect_at(pointer, layout.min_window_width, layout.min_window_height);
                if state.window(&session.window_id).is_none() {
                    interaction.resizing = None;
                    return Err(ReducerError::WindowNotFound);
                }
                window_manager::place_window(state, &session.window_id, rect);
            }
        }
        DesktopAction::EndResize => {
            if interaction.resizing.take().is_some() {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::ContentLoaded { window_id, result } => {
            // Late results for closed windows are dropped.
            if let Some(window) = state.window_mut(&window_id) {
                if window.body == ContentState::Pending {
                    window.body = ContentState::from_fetch(result);
                }
            }
        }
        DesktopAction::ShortcutsLoaded { shortcuts } => {
            config::apply_shortcuts(state, shortcuts);
        }
        DesktopAction::ShortcutsLoadFailed { message } => {
            state.config_error = Some(message);
        }
        DesktopAction::SettingsLoaded { settings } => {
            config::apply_settings(state, settings);
        }
        DesktopAction::BeginRestore { snapshot } => {
            restore::begin(state, snapshot);
            effects.push(RuntimeEffect::ScheduleRestoreStep);
        }
        DesktopAction::RestoreNextWindow => {
            if !state.restore.in_progress {
                return Ok(effects);
            }
            match restore::step(state)? {
                RestoreStep::Created(window_id) => {
                    effects.extend(load_effect(state, &window_id));
                    effects.push(RuntimeEffect::ScheduleRestoreStep);
                }
                RestoreStep::Applied(_) | RestoreStep::Skipped(_) => {
                    effects.push(RuntimeEffect::ScheduleRestoreStep);
                }
                RestoreStep::Finished => effects.push(RuntimeEffect::PersistLayout),
            }
        }
    }

    z_order::normalize_active(state);
    taskbar_binder::sync_with_windows(&mut state.taskbar, &state.windows);
    Ok(effects)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use platform_host::ShortcutEntry;

    use super::*;
    use crate::model::TaskbarButtonKind;

    fn open(
        state: &mut DesktopState,
        interaction: &mut InteractionState,
        title: &str,
        content: &str,
    ) -> WindowId {
        reduce_desktop(
            state,
            interaction,
            DesktopAction::OpenWindow(OpenWindowRequest::new(title, content)),
        )
        .unwrap();
        state.window_by_title(title).unwrap().id.clone()
    }

    #[test]
    fn opening_html_content_requests_a_fetch() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::OpenWindow(OpenWindowRequest::new("About", "/pages/about.html")),
        )
        .unwrap();
        let id = state.window_by_title("About").unwrap().id.clone();
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::LoadContent {
                    window_id: id.clone(),
                    path: "/pages/about.html".to_string(),
                },
                RuntimeEffect::PersistLayout,
            ]
        );

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ContentLoaded {
                window_id: id.clone(),
                result: Err("status 404".to_string()),
            },
        )
        .unwrap();
        assert_eq!(state.window(&id).unwrap().body, ContentState::Failed);
    }

    #[test]
    fn late_content_for_a_closed_window_is_ignored() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "About", "/about.html");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow {
                window_id: id.clone(),
            },
        )
        .unwrap();
        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ContentLoaded {
                window_id: id,
                result: Ok("<p>late</p>".to_string()),
            },
        )
        .unwrap();
        assert!(effects.is_empty());
        assert!(state.windows.is_empty());
    }

    #[test]
    fn closing_an_unknown_window_is_a_quiet_no_op() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "Notes", "hello");
        let close = || DesktopAction::CloseWindow {
            window_id: id.clone(),
        };
        reduce_desktop(&mut state, &mut interaction, close()).unwrap();
        let before = state.clone();

        assert_eq!(
            reduce_desktop(&mut state, &mut interaction, close()),
            Ok(Vec::new())
        );
        assert_eq!(state, before);
    }

    #[test]
    fn taskbar_toggle_cycles_minimize_and_restore() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "Notes", "hello");
        let button = state.taskbar.button_for_window(&id).unwrap().id;
        assert!(state.taskbar.button(button).unwrap().active);

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ActivateTaskbarButton { button_id: button },
        )
        .unwrap();
        assert!(state.window(&id).unwrap().flags.minimized);
        assert!(!state.taskbar.button(button).unwrap().active);

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ActivateTaskbarButton { button_id: button },
        )
        .unwrap();
        assert!(!state.window(&id).unwrap().flags.minimized);
        assert!(state.window(&id).unwrap().is_active);
    }

    #[test]
    fn unbound_static_button_opens_its_shortcut() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let mut shortcuts = ShortcutsConfig::default();
        shortcuts
            .taskbar
            .push(ShortcutEntry::new("Paint", "/paint.html", "/icons/paint.png"));
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ShortcutsLoaded { shortcuts },
        )
        .unwrap();
        let button = state.taskbar.buttons[0].id;
        assert_eq!(state.taskbar.buttons[0].kind, TaskbarButtonKind::Static);

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ActivateTaskbarButton { button_id: button },
        )
        .unwrap();
        let paint = state.window_by_title("Paint").unwrap().id.clone();
        assert_eq!(state.taskbar.buttons.len(), 1);
        assert_eq!(state.taskbar.buttons[0].binding, None);

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id: paint.clone() },
        )
        .unwrap();
        assert_eq!(state.taskbar.buttons.len(), 1);
        assert_eq!(state.taskbar.buttons[0].bound_window(), Some(&paint));
    }

    #[test]
    fn reloaded_shortcuts_rebind_open_windows() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let shortcuts = |titles: &[&str]| ShortcutsConfig {
            taskbar: titles
                .iter()
                .map(|title| ShortcutEntry::new(*title, format!("/{title}.html"), ""))
                .collect(),
            ..ShortcutsConfig::default()
        };
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ShortcutsLoaded {
                shortcuts: shortcuts(&["Mail"]),
            },
        )
        .unwrap();
        let mail = open(&mut state, &mut interaction, "Mail", "inbox");
        let notes = open(&mut state, &mut interaction, "Notes", "hello");
        assert_eq!(
            state.taskbar.button_for_window(&notes).map(|b| b.kind),
            Some(TaskbarButtonKind::Dynamic)
        );

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ShortcutsLoaded {
                shortcuts: shortcuts(&["Notes"]),
            },
        )
        .unwrap();
        assert_eq!(state.taskbar.buttons.len(), 2);
        assert_eq!(
            state.taskbar.button_for_window(&mail).map(|b| b.kind),
            Some(TaskbarButtonKind::Dynamic)
        );
        let notes_button = state.taskbar.button_for_window(&notes).unwrap();
        assert_eq!(notes_button.kind, TaskbarButtonKind::Static);
        assert_eq!(notes_button.label, "Notes");
    }

    #[test]
    fn drag_is_ignored_for_maximized_windows() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "Notes", "hello");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleMaximize {
                window_id: id.clone(),
                viewport: WindowRect {
                    x: 0,
                    y: 0,
                    w: 1000,
                    h: 700,
                },
            },
        )
        .unwrap();
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: id,
                pointer: PointerPosition { x: 5, y: 5 },
            },
        )
        .unwrap();
        assert!(!interaction.guard_active());
    }

    #[test]
    fn resize_respects_the_minimum_size() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "Notes", "hello");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::BeginResize {
                window_id: id.clone(),
                edge: ResizeEdge::SouthEast,
                pointer: PointerPosition { x: 0, y: 0 },
            },
        )
        .unwrap();
        assert!(interaction.guard_active());
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateResize {
                pointer: PointerPosition { x: -2000, y: -2000 },
            },
        )
        .unwrap();
        let effects =
            reduce_desktop(&mut state, &mut interaction, DesktopAction::EndResize).unwrap();
        let rect = state.window(&id).unwrap().geometry.to_rect().unwrap();
        assert_eq!((rect.w, rect.h), (200, 120));
        assert_eq!(effects, vec![RuntimeEffect::PersistLayout]);
        assert!(!interaction.guard_active());
    }

    #[test]
    fn unknown_taskbar_button_is_an_error() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        assert_eq!(
            reduce_desktop(
                &mut state,
                &mut interaction,
                DesktopAction::ActivateTaskbarButton {
                    button_id: TaskbarButtonId(99)
                },
            ),
            Err(ReducerError::ButtonNotFound)
        );
    }
}
