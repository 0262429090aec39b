//! Window registry transitions shared by the reducer and the layout restore pass.

use crate::{
    content::ContentLocator,
    geometry::{WindowGeometry, WindowRect},
    model::{DesktopState, OpenWindowRequest, WindowFlags, WindowId, WindowRecord},
    reducer::ReducerError,
    taskbar_binder, z_order,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of [`open_window`].
pub enum OpenOutcome {
    /// A new window was registered.
    Created(WindowId),
    /// A window with the same title already existed and was focused instead.
    Focused(WindowId),
}

impl OpenOutcome {
    pub fn window_id(&self) -> &WindowId {
        match self {
            Self::Created(id) | Self::Focused(id) => id,
        }
    }
}

fn cascade_geometry(state: &DesktopState) -> WindowGeometry {
    let layout = state.layout;
    let offset = (state.windows.len() as i32 % 8) * layout.cascade_step;
    WindowGeometry::from_rect(WindowRect {
        x: layout.cascade_origin + offset,
        y: layout.cascade_origin + offset,
        w: layout.default_window_width,
        h: layout.default_window_height,
    })
}

/// Registers a new window without checking for title duplicates. The window starts in the
/// front-most, active position.
///
/// # Errors
///
/// Returns [`ReducerError::MissingScaffold`] when the request has no title to build the window
/// chrome from.
pub fn create_window(
    state: &mut DesktopState,
    req: &OpenWindowRequest,
) -> Result<WindowId, ReducerError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ReducerError::MissingScaffold);
    }

    let id = state.next_window_id();
    let content = ContentLocator::classify(&req.content);
    let record = WindowRecord {
        id: id.clone(),
        title: title.to_string(),
        body: content.initial_body(),
        content,
        icon_url: req.icon_url.clone(),
        geometry: cascade_geometry(state),
        restore_geometry: None,
        z_index: 0,
        is_active: false,
        flags: WindowFlags::default(),
        state_restored: false,
    };
    state.windows.push(record);
    z_order::bring_to_front(state, &id);
    if !req.skip_taskbar_binding {
        taskbar_binder::bind_window(&mut state.taskbar, &id, title, req.icon_url.as_deref());
    }
    Ok(id)
}

/// Opens a window, or focuses the existing window with the same title.
///
/// # Errors
///
/// See [`create_window`].
pub fn open_window(
    state: &mut DesktopState,
    req: &OpenWindowRequest,
) -> Result<OpenOutcome, ReducerError> {
    if let Some(existing) = state.window_by_title(req.title.trim()) {
        let id = existing.id.clone();
        focus_window(state, &id)?;
        return Ok(OpenOutcome::Focused(id));
    }
    create_window(state, req).map(OpenOutcome::Created)
}

/// Removes a window and detaches its taskbar button.
///
/// Returns `false` without touching state when the window is already gone.
pub fn close_window(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(index) = state.windows.iter().position(|w| &w.id == window_id) else {
        return false;
    };
    state.windows.remove(index);
    taskbar_binder::unbind_window(&mut state.taskbar, window_id);
    z_order::normalize_active(state);
    true
}

/// Shows (if minimized) and raises a window.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] for unknown ids.
pub fn focus_window(state: &mut DesktopState, window_id: &WindowId) -> Result<(), ReducerError> {
    let window = state
        .window_mut(window_id)
        .ok_or(ReducerError::WindowNotFound)?;
    window.flags.minimized = false;
    z_order::bring_to_front(state, window_id);
    Ok(())
}

/// Hides a window and makes sure it has a taskbar button to bring it back.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] for unknown ids.
pub fn minimize_window(state: &mut DesktopState, window_id: &WindowId) -> Result<(), ReducerError> {
    let window = state
        .window_mut(window_id)
        .ok_or(ReducerError::WindowNotFound)?;
    window.flags.minimized = true;
    window.is_active = false;
    let (title, icon_url) = (window.title.clone(), window.icon_url.clone());
    taskbar_binder::bind_window(&mut state.taskbar, window_id, &title, icon_url.as_deref());
    z_order::normalize_active(state);
    Ok(())
}

/// Un-minimizes and focuses a window. Maximized state is kept.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] for unknown ids.
pub fn restore_window(state: &mut DesktopState, window_id: &WindowId) -> Result<(), ReducerError> {
    focus_window(state, window_id)
}

/// Maximizes a window to the viewport minus the taskbar, or puts back the geometry it had
/// before it was maximized.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] for unknown ids.
pub fn toggle_maximize(
    state: &mut DesktopState,
    window_id: &WindowId,
    viewport: WindowRect,
) -> Result<(), ReducerError> {
    let taskbar_height = state.layout.taskbar_height_px;
    let window = state
        .window_mut(window_id)
        .ok_or(ReducerError::WindowNotFound)?;

    if window.flags.maximized {
        if let Some(previous) = window.restore_geometry.take() {
            window.geometry = previous;
        }
        window.flags.maximized = false;
    } else {
        window.restore_geometry = Some(window.geometry.clone());
        window.geometry = WindowGeometry::from_rect(WindowRect {
            x: 0,
            y: 0,
            w: viewport.w,
            h: (viewport.h - taskbar_height).max(0),
        });
        window.flags.maximized = true;
    }
    focus_window(state, window_id)
}

/// Moves a window to `rect`. Maximized windows stay where they are.
///
/// Returns `true` when the geometry changed.
pub fn place_window(state: &mut DesktopState, window_id: &WindowId, rect: WindowRect) -> bool {
    let Some(window) = state.window_mut(window_id) else {
        return false;
    };
    if window.flags.maximized {
        return false;
    }
    let geometry = WindowGeometry::from_rect(rect);
    if window.geometry == geometry {
        return false;
    }
    window.geometry = geometry;
    true
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::TaskbarButtonKind;

    const VIEWPORT: WindowRect = WindowRect {
        x: 0,
        y: 0,
        w: 1280,
        h: 800,
    };

    fn open(state: &mut DesktopState, title: &str) -> WindowId {
        open_window(state, &OpenWindowRequest::new(title, "hello"))
            .expect("open")
            .window_id()
            .clone()
    }

    #[test]
    fn opening_a_duplicate_title_focuses_the_existing_window() {
        let mut state = DesktopState::default();
        let first = open(&mut state, "Notes");
        open(&mut state, "Mail");
        let outcome = open_window(&mut state, &OpenWindowRequest::new("Notes", "other"))
            .expect("open");
        assert_eq!(outcome, OpenOutcome::Focused(first.clone()));
        assert_eq!(state.windows.len(), 2);
        assert_eq!(state.active_window().map(|w| &w.id), Some(&first));
    }

    #[test]
    fn blank_titles_are_rejected() {
        let mut state = DesktopState::default();
        assert_eq!(
            open_window(&mut state, &OpenWindowRequest::new("  ", "x")),
            Err(ReducerError::MissingScaffold)
        );
        assert!(state.windows.is_empty());
    }

    #[test]
    fn maximize_round_trip_restores_exact_geometry() {
        let mut state = DesktopState::default();
        let id = open(&mut state, "Notes");
        let before = state.window(&id).expect("window").geometry.clone();

        toggle_maximize(&mut state, &id, VIEWPORT).expect("maximize");
        let maximized = state.window(&id).expect("window");
        assert!(maximized.flags.maximized);
        assert_eq!(
            maximized.geometry,
            WindowGeometry::from_css("0px", "0px", "1280px", "760px")
        );

        toggle_maximize(&mut state, &id, VIEWPORT).expect("restore");
        let restored = state.window(&id).expect("window");
        assert!(!restored.flags.maximized);
        assert_eq!(restored.geometry, before);
        assert_eq!(restored.restore_geometry, None);
    }

    #[test]
    fn minimize_binds_a_button_and_hands_focus_down_the_stack() {
        let mut state = DesktopState::default();
        let notes = open_window(
            &mut state,
            &OpenWindowRequest::new("Notes", "hi").skipping_taskbar(),
        )
        .expect("open")
        .window_id()
        .clone();
        let mail = open(&mut state, "Mail");
        assert_eq!(state.taskbar.button_for_window(&notes), None);

        minimize_window(&mut state, &mail).expect("minimize");
        minimize_window(&mut state, &notes).expect("minimize");
        assert_eq!(
            state.taskbar.button_for_window(&notes).map(|b| b.kind),
            Some(TaskbarButtonKind::Dynamic)
        );
        assert_eq!(state.active_window(), None);

        restore_window(&mut state, &mail).expect("restore");
        assert_eq!(state.active_window().map(|w| &w.id), Some(&mail));
    }

    #[test]
    fn maximized_windows_ignore_placement() {
        let mut state = DesktopState::default();
        let id = open(&mut state, "Notes");
        toggle_maximize(&mut state, &id, VIEWPORT).expect("maximize");
        assert!(!place_window(
            &mut state,
            &id,
            WindowRect {
                x: 5,
                y: 5,
                w: 300,
                h: 300
            }
        ));
    }
}
