use std::time::Duration;

use futures::FutureExt;
use leptos::{
    ev, logging, on_cleanup, set_interval_with_handle, set_timeout, spawn_local,
    window_event_listener, SignalGetUntracked,
};
use platform_host::unix_time_ms_now;

use crate::{
    host::DesktopHostContext, model::DesktopState, persistence,
    runtime_context::DesktopRuntimeContext,
};

/// Takes a debounce ticket and writes after the quiet period if no newer change arrived.
pub(super) fn schedule_layout_save(host: DesktopHostContext, runtime: DesktopRuntimeContext) {
    let ticket = host.debouncer.borrow_mut().schedule();
    let delay = Duration::from_millis(host.shell_config.persistence.debounce_ms.into());
    set_timeout(
        move || {
            if host.debouncer.borrow_mut().fire(ticket) {
                save_layout(host, runtime.state.get_untracked(), "debounced");
            }
        },
        delay,
    );
}

fn save_layout(host: DesktopHostContext, state: DesktopState, cause: &'static str) {
    // A restore pass in flight would overwrite the stored layout with a partial one.
    if state.restore.in_progress {
        return;
    }
    spawn_local(async move {
        let window_count = state.windows.len();
        match persistence::save_snapshot(
            host.prefs.as_ref(),
            &host.shell_config.persistence,
            &state,
            unix_time_ms_now(),
        )
        .await
        {
            Ok(bytes) => {
                logging::log!("saved desktop state ({cause}): {window_count} windows, {bytes} bytes")
            }
            Err(err) => logging::warn!("desktop state save failed ({cause}): {err}"),
        }
    });
}

/// Saves synchronously; the page is about to go away, so the write cannot wait for the executor.
fn save_layout_before_unload(host: &DesktopHostContext, state: &DesktopState) {
    if state.restore.in_progress {
        return;
    }
    let write = persistence::save_snapshot(
        host.prefs.as_ref(),
        &host.shell_config.persistence,
        state,
        unix_time_ms_now(),
    );
    match write.now_or_never() {
        Some(Ok(_)) => host.debouncer.borrow_mut().flush(),
        Some(Err(err)) => logging::warn!("desktop state save on unload failed: {err}"),
        None => logging::warn!("desktop state store did not complete synchronously on unload"),
    }
}

pub(super) fn install_triggers(host: DesktopHostContext, runtime: DesktopRuntimeContext) {
    let period = Duration::from_millis(host.shell_config.persistence.periodic_save_ms.into());
    let periodic_host = host.clone();
    match set_interval_with_handle(
        move || save_layout(periodic_host.clone(), runtime.state.get_untracked(), "periodic"),
        period,
    ) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(err) => logging::warn!("periodic desktop state save unavailable: {err:?}"),
    }

    let unload = window_event_listener(ev::beforeunload, move |_| {
        save_layout_before_unload(&host, &runtime.state.get_untracked());
    });
    on_cleanup(move || unload.remove());
}
