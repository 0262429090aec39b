use desktop_runtime::{
    config::PersistenceConfig,
    persistence::{load_snapshot, save_snapshot},
    reduce_desktop, DesktopAction, DesktopState, InteractionState, OpenWindowRequest,
    PointerPosition, RuntimeEffect, TaskbarButtonKind, WindowGeometry, WindowId, WindowRect,
};
use futures::executor::block_on;
use platform_host::{MemoryPrefsStore, ShortcutEntry, ShortcutsConfig, StorageError};
use pretty_assertions::assert_eq;

const DAY_MS: u64 = 24 * 60 * 60 * 1000;
const VIEWPORT: WindowRect = WindowRect {
    x: 0,
    y: 0,
    w: 1280,
    h: 800,
};

struct Shell {
    state: DesktopState,
    interaction: InteractionState,
}

impl Shell {
    fn new() -> Self {
        Self {
            state: DesktopState::default(),
            interaction: InteractionState::default(),
        }
    }

    fn dispatch(&mut self, action: DesktopAction) -> Vec<RuntimeEffect> {
        reduce_desktop(&mut self.state, &mut self.interaction, action).expect("reduce")
    }

    fn open(&mut self, title: &str) -> WindowId {
        self.dispatch(DesktopAction::OpenWindow(OpenWindowRequest::new(
            title,
            format!("plain text for {title}"),
        )));
        self.state
            .window_by_title(title)
            .map(|w| w.id.clone())
            .expect("window opened")
    }

    fn z(&self, id: &WindowId) -> u32 {
        self.state.window(id).expect("window").z_index
    }

    fn buttons_bound_to(&self, id: &WindowId) -> usize {
        self.state
            .taskbar
            .buttons
            .iter()
            .filter(|b| b.bound_window() == Some(id))
            .count()
    }

    /// Runs a restore pass to completion, the way the host does one frame at a time.
    fn run_restore(&mut self) {
        let mut steps = 0;
        loop {
            let effects = self.dispatch(DesktopAction::RestoreNextWindow);
            steps += 1;
            assert!(steps < 100, "restore did not finish");
            if !effects.contains(&RuntimeEffect::ScheduleRestoreStep) {
                return;
            }
        }
    }
}

#[test]
fn opening_the_same_title_twice_keeps_one_window_and_one_button() {
    let mut shell = Shell::new();
    let first = shell.open("Notes");
    let second = shell.open("Notes");

    assert_eq!(first, second);
    assert_eq!(shell.state.windows.len(), 1);
    assert_eq!(shell.state.taskbar.buttons.len(), 1);
    assert_eq!(shell.buttons_bound_to(&first), 1);
}

#[test]
fn declared_taskbar_entry_is_bound_and_survives_close() {
    let mut shell = Shell::new();
    shell.dispatch(DesktopAction::ShortcutsLoaded {
        shortcuts: ShortcutsConfig {
            taskbar: vec![ShortcutEntry::new("Notes", "/notes.html", "/icons/notes.png")],
            ..ShortcutsConfig::default()
        },
    });
    assert_eq!(shell.state.taskbar.buttons.len(), 1);
    let static_id = shell.state.taskbar.buttons[0].id;

    let window = shell.open("Notes");
    assert_eq!(shell.state.taskbar.buttons.len(), 1);
    let button = &shell.state.taskbar.buttons[0];
    assert_eq!(button.id, static_id);
    assert_eq!(button.kind, TaskbarButtonKind::Static);
    assert_eq!(button.bound_window(), Some(&window));

    shell.dispatch(DesktopAction::CloseWindow { window_id: window });
    assert_eq!(shell.state.taskbar.buttons.len(), 1);
    assert_eq!(shell.state.taskbar.buttons[0].id, static_id);
    assert_eq!(shell.state.taskbar.buttons[0].bound_window(), None);
    assert!(!shell.state.taskbar.buttons[0].active);
}

#[test]
fn saved_layout_round_trips_through_storage() {
    let store = MemoryPrefsStore::default();
    let config = PersistenceConfig::default();
    let now = 1_700_000_000_000;

    let mut shell = Shell::new();
    let mail = shell.open("Mail");
    let notes = shell.open("Notes");
    shell.dispatch(DesktopAction::MinimizeWindow { window_id: mail });
    shell.dispatch(DesktopAction::ToggleMaximize {
        window_id: notes,
        viewport: VIEWPORT,
    });
    block_on(save_snapshot(&store, &config, &shell.state, now)).expect("save");

    let snapshot = block_on(load_snapshot(&store, &config, now + DAY_MS - 1)).expect("snapshot");
    let mut reloaded = Shell::new();
    reloaded.dispatch(DesktopAction::BeginRestore { snapshot });
    reloaded.run_restore();

    assert_eq!(reloaded.state.windows.len(), 2);
    for original in &shell.state.windows {
        let restored = reloaded
            .state
            .window_by_title(&original.title)
            .expect("restored window");
        assert_eq!(restored.geometry, original.geometry);
        assert_eq!(restored.flags, original.flags);
        assert_eq!(restored.restore_geometry, original.restore_geometry);
        assert_eq!(restored.z_index, original.z_index);
    }
    let restored_mail = reloaded.state.window_by_title("Mail").expect("mail");
    assert!(restored_mail.flags.minimized);
    assert!(reloaded
        .state
        .window_by_title("Notes")
        .expect("notes")
        .flags
        .maximized);
    assert_eq!(reloaded.buttons_bound_to(&restored_mail.id), 1);
    assert!(!reloaded.state.restore.in_progress);
}

#[test]
fn snapshots_older_than_a_day_restore_nothing() {
    let store = MemoryPrefsStore::default();
    let config = PersistenceConfig::default();
    let saved_at = 1_700_000_000_000;

    let mut shell = Shell::new();
    shell.open("Mail");
    block_on(save_snapshot(&store, &config, &shell.state, saved_at)).expect("save");

    let loaded = block_on(load_snapshot(&store, &config, saved_at + DAY_MS + 1));
    assert_eq!(loaded, None);
    assert_eq!(store.raw(&config.storage_key), None);
}

#[test]
fn snapshots_from_another_schema_are_discarded() {
    let store = MemoryPrefsStore::default();
    let config = PersistenceConfig::default();
    store.insert_raw(
        &config.storage_key,
        r#"{"version":"1.0","timestamp":0,"openWindows":[]}"#,
    );

    assert_eq!(block_on(load_snapshot(&store, &config, 10)), None);
    assert_eq!(store.raw(&config.storage_key), None);
}

#[test]
fn quota_errors_clear_saved_state_instead_of_failing_the_session() {
    let store = MemoryPrefsStore::with_quota(64);
    let config = PersistenceConfig::default();
    store.insert_raw(&config.storage_key, "{}");

    let mut shell = Shell::new();
    shell.open("A window with a fairly long title");
    let err = block_on(save_snapshot(&store, &config, &shell.state, 0)).expect_err("quota");
    assert_eq!(err, StorageError::QuotaExceeded);
    assert_eq!(store.raw(&config.storage_key), None);
    assert_eq!(shell.state.windows.len(), 1);
}

#[test]
fn refocusing_raises_above_every_earlier_focus() {
    let mut shell = Shell::new();
    let a = shell.open("A");
    let b = shell.open("B");

    shell.dispatch(DesktopAction::FocusWindow {
        window_id: a.clone(),
    });
    let a_before = shell.z(&a);
    shell.dispatch(DesktopAction::FocusWindow {
        window_id: b.clone(),
    });
    let b_after = shell.z(&b);
    shell.dispatch(DesktopAction::FocusWindow {
        window_id: a.clone(),
    });
    let a_after = shell.z(&a);

    assert!(a_after > b_after);
    assert!(b_after > a_before);
    assert_eq!(shell.state.active_window().map(|w| &w.id), Some(&a));
}

#[test]
fn windows_saved_with_equal_z_restore_strictly_stacked() {
    let store = MemoryPrefsStore::default();
    let config = PersistenceConfig::default();
    let window = |title: &str| {
        format!(
            r#"{{"title":"{title}","contentPath":"{title} notes","iconUrl":"",
                "position":{{"left":"10px","top":"10px"}},
                "size":{{"width":"300px","height":"200px"}},
                "state":{{"isMaximized":false,"isMinimized":false}},
                "zIndex":"1005"}}"#
        )
    };
    store.insert_raw(
        &config.storage_key,
        &format!(
            r#"{{"version":"1.1","timestamp":1000,"openWindows":[{},{}]}}"#,
            window("A"),
            window("B")
        ),
    );

    let snapshot = block_on(load_snapshot(&store, &config, 2000)).expect("snapshot");
    let mut shell = Shell::new();
    shell.dispatch(DesktopAction::BeginRestore { snapshot });
    shell.run_restore();

    let strictly_stacked = |shell: &Shell| {
        shell
            .state
            .windows
            .windows(2)
            .all(|pair| pair[0].z_index < pair[1].z_index)
    };
    assert!(strictly_stacked(&shell));

    let front = shell.state.windows.last().expect("front").id.clone();
    shell.dispatch(DesktopAction::FocusWindow {
        window_id: front.clone(),
    });
    assert!(strictly_stacked(&shell));
    assert_eq!(shell.state.windows.last().map(|w| &w.id), Some(&front));
}

#[test]
fn repeated_focus_never_exceeds_the_ceiling() {
    let mut shell = Shell::new();
    let ids: Vec<_> = ["A", "B", "C"].into_iter().map(|t| shell.open(t)).collect();
    let ceiling = shell.state.layout.z_ceiling;

    for round in 0..12_000 {
        let window_id = ids[round % ids.len()].clone();
        shell.dispatch(DesktopAction::FocusWindow { window_id });
        assert!(shell.state.windows.iter().all(|w| w.z_index <= ceiling));
    }
    let front = shell.state.windows.last().expect("front");
    assert_eq!(shell.state.active_window().map(|w| &w.id), Some(&front.id));
}

#[test]
fn minimize_restore_minimize_binds_exactly_one_button() {
    let mut shell = Shell::new();
    let id = shell.open("Paint");

    shell.dispatch(DesktopAction::MinimizeWindow {
        window_id: id.clone(),
    });
    shell.dispatch(DesktopAction::RestoreWindow {
        window_id: id.clone(),
    });
    shell.dispatch(DesktopAction::MinimizeWindow {
        window_id: id.clone(),
    });

    let window = shell.state.window(&id).expect("window");
    assert!(window.flags.minimized);
    assert!(!window.is_active);
    assert_eq!(shell.buttons_bound_to(&id), 1);
    assert_eq!(shell.state.taskbar.buttons.len(), 1);
}

#[test]
fn maximize_then_restore_reapplies_the_exact_geometry() {
    let mut shell = Shell::new();
    let id = shell.open("Editor");
    let original = WindowGeometry::from_css("40px", "60px", "500px", "400px");
    shell.state.window_mut(&id).expect("window").geometry = original.clone();

    shell.dispatch(DesktopAction::ToggleMaximize {
        window_id: id.clone(),
        viewport: VIEWPORT,
    });
    let taskbar = shell.state.layout.taskbar_height_px;
    assert_eq!(
        shell.state.window(&id).expect("window").geometry,
        WindowGeometry::from_rect(WindowRect {
            x: 0,
            y: 0,
            w: VIEWPORT.w,
            h: VIEWPORT.h - taskbar,
        })
    );

    shell.dispatch(DesktopAction::MinimizeWindow {
        window_id: id.clone(),
    });
    shell.dispatch(DesktopAction::RestoreWindow {
        window_id: id.clone(),
    });
    assert!(shell.state.window(&id).expect("window").flags.maximized);

    shell.dispatch(DesktopAction::ToggleMaximize {
        window_id: id.clone(),
        viewport: VIEWPORT,
    });
    let window = shell.state.window(&id).expect("window");
    assert_eq!(window.geometry, original);
    assert!(!window.flags.maximized);
}

#[test]
fn drag_guard_covers_the_drag_and_lifts_on_release() {
    let mut shell = Shell::new();
    let id = shell.open("Mail");
    let start = shell
        .state
        .window(&id)
        .and_then(|w| w.geometry.to_rect())
        .expect("pixel geometry");

    shell.dispatch(DesktopAction::BeginMove {
        window_id: id.clone(),
        pointer: PointerPosition { x: 100, y: 100 },
    });
    assert!(shell.interaction.guard_active());

    shell.dispatch(DesktopAction::UpdateMove {
        pointer: PointerPosition { x: 130, y: 90 },
    });
    let effects = shell.dispatch(DesktopAction::EndMove);
    assert!(!shell.interaction.guard_active());
    assert_eq!(effects, vec![RuntimeEffect::PersistLayout]);
    assert_eq!(
        shell.state.window(&id).and_then(|w| w.geometry.to_rect()),
        Some(start.offset(30, -10))
    );
}

#[test]
fn late_content_for_a_closed_window_is_ignored() {
    let mut shell = Shell::new();
    let effects = shell.dispatch(DesktopAction::OpenWindow(OpenWindowRequest::new(
        "About",
        "/pages/about.html",
    )));
    let id = shell.state.window_by_title("About").expect("about").id.clone();
    assert!(effects.contains(&RuntimeEffect::LoadContent {
        window_id: id.clone(),
        path: "/pages/about.html".to_string(),
    }));

    shell.dispatch(DesktopAction::CloseWindow {
        window_id: id.clone(),
    });
    let before = shell.state.clone();
    let effects = shell.dispatch(DesktopAction::ContentLoaded {
        window_id: id,
        result: Ok("<p>late</p>".to_string()),
    });
    assert_eq!(effects, Vec::new());
    assert_eq!(shell.state, before);
}
