//! Incremental layout restore.
//!
//! A snapshot is queued in state and applied one window per step. The host yields to the
//! browser between steps, so each restored window is fully in place before the next is opened.

use std::collections::VecDeque;

use crate::{
    model::{DesktopState, OpenWindowRequest, WindowId},
    persistence::{DesktopSnapshot, SavedWindow},
    reducer::ReducerError,
    taskbar_binder, window_manager, z_order,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RestoreQueue {
    pub pending: VecDeque<SavedWindow>,
    pub in_progress: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreStep {
    /// The saved window was applied to a window that already existed.
    Applied(WindowId),
    /// A window was created for the saved entry; its content still has to be loaded.
    Created(WindowId),
    /// The entry could not be matched to an unclaimed window and was dropped.
    Skipped(String),
    /// The queue is empty; restore markers were cleared.
    Finished,
}

/// Queues every window of `snapshot`, back to front.
pub fn begin(state: &mut DesktopState, snapshot: DesktopSnapshot) {
    let mut windows = snapshot.open_windows;
    windows.sort_by_key(|w| w.z_index);
    state.restore.pending = windows.into();
    state.restore.in_progress = true;
}

/// Applies the next queued window, or finishes the pass when the queue is empty.
///
/// # Errors
///
/// Propagates window creation failures.
pub fn step(state: &mut DesktopState) -> Result<RestoreStep, ReducerError> {
    let Some(saved) = state.restore.pending.pop_front() else {
        finish(state);
        return Ok(RestoreStep::Finished);
    };
    let title = saved.title.trim().to_string();
    if title.is_empty() {
        return Ok(RestoreStep::Skipped(saved.title));
    }

    let unclaimed = state
        .windows
        .iter()
        .find(|w| w.title == title && !w.state_restored)
        .map(|w| w.id.clone());
    let (window_id, created) = match unclaimed {
        Some(id) => (id, false),
        None if state.window_by_title(&title).is_some() => {
            return Ok(RestoreStep::Skipped(title));
        }
        None => {
            let request = OpenWindowRequest::new(&title, &saved.content_path)
                .with_icon(&saved.icon_url)
                .skipping_taskbar();
            (window_manager::create_window(state, &request)?, true)
        }
    };

    let Some(window) = state.window_mut(&window_id) else {
        return Err(ReducerError::WindowNotFound);
    };
    window.geometry = saved.geometry();
    window.flags.maximized = saved.state.is_maximized;
    window.flags.minimized = saved.state.is_minimized;
    window.restore_geometry = saved
        .state
        .is_maximized
        .then(|| saved.restore.clone())
        .flatten();
    window.z_index = saved.z_index;
    window.state_restored = true;
    let icon_url = window.icon_url.clone();

    taskbar_binder::bind_window(&mut state.taskbar, &window_id, &title, icon_url.as_deref());
    z_order::resort(state);
    z_order::normalize_active(state);

    Ok(if created {
        RestoreStep::Created(window_id)
    } else {
        RestoreStep::Applied(window_id)
    })
}

/// Clears restore markers and ends the pass.
pub fn finish(state: &mut DesktopState) {
    for window in &mut state.windows {
        window.state_restored = false;
    }
    state.restore = RestoreQueue::default();
    z_order::resort(state);
    z_order::normalize_active(state);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        geometry::{CssLength, WindowGeometry},
        persistence::{SavedPosition, SavedSize, SavedWindowState},
    };

    fn saved(title: &str, z_index: u32, minimized: bool) -> SavedWindow {
        SavedWindow {
            title: title.to_string(),
            content_path: format!("/{title}.html"),
            icon_url: String::new(),
            position: SavedPosition {
                left: CssLength::Px(10),
                top: CssLength::Px(20),
            },
            size: SavedSize {
                width: CssLength::Px(300),
                height: CssLength::Px(200),
            },
            state: SavedWindowState {
                is_maximized: false,
                is_minimized: minimized,
            },
            z_index,
            restore: None,
        }
    }

    fn run(state: &mut DesktopState) -> Vec<RestoreStep> {
        let mut steps = Vec::new();
        loop {
            let step = step(state).expect("step");
            let done = step == RestoreStep::Finished;
            steps.push(step);
            if done {
                return steps;
            }
        }
    }

    #[test]
    fn restore_recreates_windows_in_saved_order() {
        let mut state = DesktopState::default();
        begin(
            &mut state,
            DesktopSnapshot {
                version: "1.1".to_string(),
                timestamp: 0,
                open_windows: vec![saved("Mail", 1010, true), saved("Notes", 1005, false)],
            },
        );
        let steps = run(&mut state);
        assert_eq!(steps.len(), 3);
        assert!(steps[..2]
            .iter()
            .all(|s| matches!(s, RestoreStep::Created(_))));

        let titles: Vec<_> = state.windows.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["Notes", "Mail"]);
        let mail = state.window_by_title("Mail").expect("mail");
        assert!(mail.flags.minimized);
        assert_eq!(mail.z_index, 1010);
        assert_eq!(
            mail.geometry,
            WindowGeometry::from_css("10px", "20px", "300px", "200px")
        );
        assert!(state.windows.iter().all(|w| !w.state_restored));
        assert!(!state.restore.in_progress);
        assert_eq!(
            state.active_window().map(|w| w.title.as_str()),
            Some("Notes")
        );
        assert!(state.taskbar.button_for_window(&mail.id).is_some());
    }

    #[test]
    fn duplicate_saved_titles_claim_each_window_once() {
        let mut state = DesktopState::default();
        begin(
            &mut state,
            DesktopSnapshot {
                version: "1.1".to_string(),
                timestamp: 0,
                open_windows: vec![saved("Notes", 1002, false), saved("Notes", 1003, false)],
            },
        );
        let steps = run(&mut state);
        assert_eq!(steps[1], RestoreStep::Skipped("Notes".to_string()));
        assert_eq!(state.windows.len(), 1);
    }
}
