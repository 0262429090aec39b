//! Stacking-order controller.
//!
//! `state.windows` is kept sorted back to front, and `z_index` values increase strictly along it.
//! Focus moves a window to the end and hands it the next index above the current maximum.

use crate::model::{DesktopState, WindowId};

/// Raises `window_id` to the front and makes it the single active window.
///
/// Returns `false` when the window does not exist.
pub fn bring_to_front(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(index) = state.windows.iter().position(|w| &w.id == window_id) else {
        return false;
    };

    let floor = state.layout.z_floor;
    let z_index = state.windows[index].z_index;
    let already_front = index + 1 == state.windows.len()
        && z_index > floor
        && index
            .checked_sub(1)
            .map_or(true, |below| state.windows[below].z_index < z_index);
    for window in &mut state.windows {
        window.is_active = false;
    }

    let mut window = state.windows.remove(index);
    window.is_active = true;
    if !already_front {
        let mut next = max_z(state).max(floor) + 1;
        if next > state.layout.z_ceiling {
            compact(state);
            next = max_z(state).max(floor) + 1;
        }
        window.z_index = next.min(state.layout.z_ceiling);
    }
    state.windows.push(window);
    true
}

/// Highest z-index among open windows (zero when none are open).
pub fn max_z(state: &DesktopState) -> u32 {
    state.windows.iter().map(|w| w.z_index).max().unwrap_or(0)
}

/// Reassigns consecutive indices starting just above the floor, preserving the current order.
pub fn compact(state: &mut DesktopState) {
    let base = state.layout.z_floor + 1;
    for (offset, window) in state.windows.iter_mut().enumerate() {
        window.z_index = base + offset as u32;
    }
}

/// Re-sorts the stack by z-index after indices were assigned from outside (layout restore),
/// clamping every index into the floor/ceiling band.
///
/// Equal indices keep their current relative order and are then separated, so indices increase
/// strictly back to front. The stack is compacted if that pushes the top past the ceiling.
pub fn resort(state: &mut DesktopState) {
    let (floor, ceiling) = (state.layout.z_floor, state.layout.z_ceiling);
    for window in &mut state.windows {
        window.z_index = window.z_index.clamp(floor, ceiling);
    }
    state.windows.sort_by_key(|w| w.z_index);

    let mut below: Option<u32> = None;
    for window in &mut state.windows {
        if let Some(prev) = below.filter(|&prev| window.z_index <= prev) {
            window.z_index = prev + 1;
        }
        below = Some(window.z_index);
    }
    if below.is_some_and(|top| top > ceiling) {
        compact(state);
    }
}

/// Ensures at most one window is active, that minimized windows are never active, and that the
/// front-most visible window takes over when the active one went away.
pub fn normalize_active(state: &mut DesktopState) {
    let mut has_active = false;
    for window in state.windows.iter_mut().rev() {
        if window.flags.minimized {
            window.is_active = false;
        }
        if window.is_active {
            if has_active {
                window.is_active = false;
            } else {
                has_active = true;
            }
        }
    }

    if !has_active {
        if let Some(front) = state.windows.iter_mut().rev().find(|w| !w.flags.minimized) {
            front.is_active = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        config::LayoutConfig,
        content::ContentLocator,
        geometry::WindowGeometry,
        model::{WindowFlags, WindowRecord},
    };

    fn push_window(state: &mut DesktopState, id: &str, z_index: u32) {
        let content = ContentLocator::classify("text");
        state.windows.push(WindowRecord {
            id: WindowId::from(id),
            title: id.to_string(),
            body: content.initial_body(),
            content,
            icon_url: None,
            geometry: WindowGeometry::from_css("0px", "0px", "300px", "200px"),
            restore_geometry: None,
            z_index,
            is_active: false,
            flags: WindowFlags::default(),
            state_restored: false,
        });
    }

    fn z_of(state: &DesktopState, id: &str) -> u32 {
        state
            .window(&WindowId::from(id))
            .map(|w| w.z_index)
            .unwrap_or_default()
    }

    #[test]
    fn focus_lands_above_the_floor_and_current_maximum() {
        let mut state = DesktopState::default();
        push_window(&mut state, "a", 0);
        push_window(&mut state, "b", 0);

        assert!(bring_to_front(&mut state, &WindowId::from("a")));
        assert_eq!(z_of(&state, "a"), 1002);
        assert!(bring_to_front(&mut state, &WindowId::from("b")));
        assert_eq!(z_of(&state, "b"), 1003);
        assert!(bring_to_front(&mut state, &WindowId::from("a")));
        assert!(z_of(&state, "a") > z_of(&state, "b"));
        assert_eq!(
            state.active_window().map(|w| w.id.as_str()),
            Some("a")
        );
    }

    #[test]
    fn refocusing_the_front_window_keeps_its_index() {
        let mut state = DesktopState::default();
        push_window(&mut state, "a", 0);
        bring_to_front(&mut state, &WindowId::from("a"));
        bring_to_front(&mut state, &WindowId::from("a"));
        assert_eq!(z_of(&state, "a"), 1002);
    }

    #[test]
    fn reaching_the_ceiling_compacts_while_preserving_order() {
        let layout = LayoutConfig {
            z_ceiling: 1005,
            ..LayoutConfig::default()
        };
        let mut state = DesktopState::new(layout, 7);
        push_window(&mut state, "a", 0);
        push_window(&mut state, "b", 0);
        push_window(&mut state, "c", 0);

        for id in ["a", "b", "c", "a", "b", "c", "a"] {
            bring_to_front(&mut state, &WindowId::from(id));
        }
        let order: Vec<_> = state.windows.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert!(z_of(&state, "b") < z_of(&state, "c"));
        assert!(z_of(&state, "c") < z_of(&state, "a"));
        assert!(state.windows.iter().all(|w| w.z_index <= 1005 && w.z_index > 1001));
    }

    #[test]
    fn resort_separates_tied_indices_in_stack_order() {
        let mut state = DesktopState::default();
        push_window(&mut state, "a", 1005);
        push_window(&mut state, "b", 1005);
        push_window(&mut state, "c", 1003);
        resort(&mut state);

        let stack: Vec<_> = state
            .windows
            .iter()
            .map(|w| (w.id.as_str(), w.z_index))
            .collect();
        assert_eq!(stack, vec![("c", 1003), ("a", 1005), ("b", 1006)]);
    }

    #[test]
    fn resort_compacts_when_separating_ties_passes_the_ceiling() {
        let layout = LayoutConfig {
            z_ceiling: 1010,
            ..LayoutConfig::default()
        };
        let mut state = DesktopState::new(layout, 7);
        push_window(&mut state, "a", 1010);
        push_window(&mut state, "b", 1010);
        resort(&mut state);
        assert_eq!(z_of(&state, "a"), 1002);
        assert_eq!(z_of(&state, "b"), 1003);
    }

    #[test]
    fn focusing_a_front_window_tied_with_the_one_below_raises_it() {
        let mut state = DesktopState::default();
        push_window(&mut state, "a", 1005);
        push_window(&mut state, "b", 1005);
        assert!(bring_to_front(&mut state, &WindowId::from("b")));
        assert!(z_of(&state, "b") > z_of(&state, "a"));
    }

    #[test]
    fn minimized_windows_lose_active_to_the_front_visible_window() {
        let mut state = DesktopState::default();
        push_window(&mut state, "a", 1002);
        push_window(&mut state, "b", 1003);
        state.windows[1].is_active = true;
        state.windows[1].flags.minimized = true;
        normalize_active(&mut state);
        assert_eq!(
            state.active_window().map(|w| w.id.as_str()),
            Some("a")
        );
    }
}
