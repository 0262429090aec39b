//! Association between windows and taskbar buttons.
//!
//! Static buttons come from the taskbar shortcut list and outlive the windows they control.
//! Dynamic buttons are created for windows without a static counterpart and disappear with them.
//! Every window is referenced by at most one button, and every button by at most one window.

use platform_host::ShortcutEntry;

use crate::model::{
    TaskbarBinding, TaskbarButton, TaskbarButtonId, TaskbarButtonKind, TaskbarState,
    WindowRecord, WindowId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What [`bind_window`] did.
pub enum BindOutcome {
    /// An unbound static button was attached to the window.
    BoundStatic(TaskbarButtonId),
    /// A static button bound to a different window was moved over to this one.
    Rebound(TaskbarButtonId),
    /// The window already had its button; nothing changed.
    AlreadyBound(TaskbarButtonId),
    /// A dynamic button was created.
    CreatedDynamic(TaskbarButtonId),
}

impl BindOutcome {
    pub fn button_id(self) -> TaskbarButtonId {
        match self {
            Self::BoundStatic(id)
            | Self::Rebound(id)
            | Self::AlreadyBound(id)
            | Self::CreatedDynamic(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What [`unbind_window`] did.
pub enum UnbindOutcome {
    /// A static button was released and stays on the taskbar.
    ReleasedStatic(TaskbarButtonId),
    /// A dynamic button was removed.
    RemovedDynamic(TaskbarButtonId),
}

fn allocate_button_id(taskbar: &mut TaskbarState) -> TaskbarButtonId {
    taskbar.next_button_id += 1;
    TaskbarButtonId(taskbar.next_button_id)
}

fn attach(taskbar: &mut TaskbarState, index: usize, window_id: &WindowId) {
    taskbar.next_binding_generation += 1;
    taskbar.buttons[index].binding = Some(TaskbarBinding {
        window_id: window_id.clone(),
        generation: taskbar.next_binding_generation,
    });
}

/// Ensures the window is represented on the taskbar. Idempotent.
///
/// Resolution order: a static button whose label equals the trimmed title (claiming it from any
/// stale window), then a button already bound to the window, then a new dynamic button.
pub fn bind_window(
    taskbar: &mut TaskbarState,
    window_id: &WindowId,
    title: &str,
    icon_url: Option<&str>,
) -> BindOutcome {
    let title = title.trim();
    let static_match = taskbar
        .buttons
        .iter()
        .position(|b| b.kind == TaskbarButtonKind::Static && b.label.trim() == title);

    if let Some(index) = static_match {
        let button_id = taskbar.buttons[index].id;
        let outcome = match taskbar.buttons[index].bound_window() {
            Some(bound) if bound == window_id => BindOutcome::AlreadyBound(button_id),
            Some(_) => {
                attach(taskbar, index, window_id);
                BindOutcome::Rebound(button_id)
            }
            None => {
                attach(taskbar, index, window_id);
                BindOutcome::BoundStatic(button_id)
            }
        };
        taskbar.buttons.retain(|b| {
            b.id == button_id || b.bound_window() != Some(window_id)
        });
        return outcome;
    }

    if let Some(button) = taskbar
        .buttons
        .iter()
        .find(|b| b.bound_window() == Some(window_id))
    {
        return BindOutcome::AlreadyBound(button.id);
    }

    let id = allocate_button_id(taskbar);
    taskbar.next_binding_generation += 1;
    taskbar.buttons.push(TaskbarButton {
        id,
        kind: TaskbarButtonKind::Dynamic,
        label: title.to_string(),
        icon_url: icon_url.map(str::to_string),
        shortcut: None,
        binding: Some(TaskbarBinding {
            window_id: window_id.clone(),
            generation: taskbar.next_binding_generation,
        }),
        active: false,
    });
    BindOutcome::CreatedDynamic(id)
}

/// Detaches the window's button: static buttons are released, dynamic ones removed.
pub fn unbind_window(taskbar: &mut TaskbarState, window_id: &WindowId) -> Option<UnbindOutcome> {
    let index = taskbar
        .buttons
        .iter()
        .position(|b| b.bound_window() == Some(window_id))?;
    let button = &mut taskbar.buttons[index];
    match button.kind {
        TaskbarButtonKind::Static => {
            button.binding = None;
            button.active = false;
            Some(UnbindOutcome::ReleasedStatic(button.id))
        }
        TaskbarButtonKind::Dynamic => {
            let id = button.id;
            taskbar.buttons.remove(index);
            Some(UnbindOutcome::RemovedDynamic(id))
        }
    }
}

/// Replaces the static button set with the taskbar shortcut list.
///
/// Buttons keep their id when an entry with the same label survives. Windows bound to a static
/// button that disappeared fall back to dynamic buttons; open windows matching a new entry by
/// title are bound to it.
pub fn set_static_buttons(
    taskbar: &mut TaskbarState,
    entries: &[ShortcutEntry],
    windows: &[WindowRecord],
) {
    let previous = std::mem::take(&mut taskbar.buttons);
    let (old_static, dynamic): (Vec<_>, Vec<_>) = previous
        .into_iter()
        .partition(|b| b.kind == TaskbarButtonKind::Static);

    let mut orphaned = Vec::new();
    let mut statics = Vec::with_capacity(entries.len());
    let mut claimed: Vec<&str> = Vec::new();
    for entry in entries {
        let label = entry.title.trim();
        if claimed.contains(&label) {
            continue;
        }
        claimed.push(label);
        let reused = old_static.iter().find(|b| b.label.trim() == label);
        let id = match reused {
            Some(button) => button.id,
            None => allocate_button_id(taskbar),
        };
        statics.push(TaskbarButton {
            id,
            kind: TaskbarButtonKind::Static,
            label: entry.title.clone(),
            icon_url: entry.icon().map(str::to_string),
            shortcut: Some(entry.clone()),
            binding: reused.and_then(|b| b.binding.clone()),
            active: false,
        });
    }
    for button in old_static {
        let kept = statics.iter().any(|b| b.id == button.id);
        if let (false, Some(binding)) = (kept, button.binding) {
            orphaned.push((binding.window_id, button.label, button.icon_url));
        }
    }

    taskbar.buttons = statics;
    taskbar.buttons.extend(dynamic);
    for (window_id, label, icon_url) in orphaned {
        if let Some(window) = windows.iter().find(|w| w.id == window_id) {
            bind_window(taskbar, &window.id, &window.title, window.icon_url.as_deref());
        } else {
            bind_window(taskbar, &window_id, &label, icon_url.as_deref());
        }
    }

    let unclaimed_static: Vec<usize> = taskbar
        .buttons
        .iter()
        .enumerate()
        .filter(|(_, b)| b.kind == TaskbarButtonKind::Static && b.binding.is_none())
        .map(|(i, _)| i)
        .collect();
    for index in unclaimed_static {
        let label = taskbar.buttons[index].label.trim().to_string();
        let candidate = windows.iter().find(|w| {
            w.title.trim() == label
                && taskbar
                    .button_for_window(&w.id)
                    .map_or(true, |b| b.kind == TaskbarButtonKind::Dynamic)
        });
        if let Some(window) = candidate {
            bind_window(taskbar, &window.id, &window.title, window.icon_url.as_deref());
        }
    }
}

/// Drops bindings to windows that no longer exist and recomputes the active highlight: a button
/// is active exactly when its window is the active, visible window.
pub fn sync_with_windows(taskbar: &mut TaskbarState, windows: &[WindowRecord]) {
    taskbar.buttons.retain(|b| {
        b.kind == TaskbarButtonKind::Static
            || b
                .bound_window()
                .is_some_and(|id| windows.iter().any(|w| &w.id == id))
    });
    for button in &mut taskbar.buttons {
        let window = button
            .bound_window()
            .and_then(|id| windows.iter().find(|w| &w.id == id));
        if button.binding.is_some() && window.is_none() {
            button.binding = None;
        }
        button.active = window.is_some_and(|w| w.is_active && !w.flags.minimized);
    }
}
