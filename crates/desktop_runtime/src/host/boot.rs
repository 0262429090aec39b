use leptos::{create_effect, logging, spawn_local, Callable, Callback};
use platform_host::unix_time_ms_now;

use crate::{host::DesktopHostContext, persistence, reducer::DesktopAction};

/// Loads configuration before the saved layout so static taskbar buttons exist by the time
/// restored windows are bound.
pub(super) fn install_boot_hydration(host: DesktopHostContext, dispatch: Callback<DesktopAction>) {
    create_effect(move |_| {
        let host = host.clone();
        logging::log!("desktop host strategy: {}", host.host_strategy_name());
        spawn_local(async move {
            let config = host.config_service();
            match config.load_shortcuts().await {
                Ok(shortcuts) => dispatch.call(DesktopAction::ShortcutsLoaded { shortcuts }),
                Err(err) => {
                    logging::warn!("shortcut config load failed: {err}");
                    dispatch.call(DesktopAction::ShortcutsLoadFailed {
                        message: format!("Could not load desktop shortcuts ({err})."),
                    });
                }
            }

            match config.load_settings().await {
                Ok(settings) => dispatch.call(DesktopAction::SettingsLoaded { settings }),
                Err(err) => logging::warn!("desktop settings load failed: {err}"),
            }

            let prefs = host.prefs_store();
            let snapshot = persistence::load_snapshot(
                prefs.as_ref(),
                &host.shell_config().persistence,
                unix_time_ms_now(),
            )
            .await;
            if let Some(snapshot) = snapshot {
                logging::log!("restoring {} saved windows", snapshot.open_windows.len());
                dispatch.call(DesktopAction::BeginRestore { snapshot });
            }
        });
    });
}
