//! Desktop shell UI composition and interaction surfaces.

mod menus;
mod settings_page;
mod taskbar;
mod window;

use leptos::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

use self::{menus::StartMenu, taskbar::Taskbar, window::DesktopWindow};

use crate::{
    config::DRAG_GUARD_Z_INDEX,
    model::{OpenWindowRequest, PointerPosition, ResizeEdge},
    reducer::DesktopAction,
};

pub use self::settings_page::SettingsPage;
pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

#[component]
/// Renders the full desktop shell UI and processes queued [`crate::RuntimeEffect`] values.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let interaction = runtime.interaction;

    let escape_listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() || ev.key() != "Escape" {
            return;
        }
        if runtime.state.get_untracked().start_menu_open {
            ev.prevent_default();
            runtime.dispatch_action(DesktopAction::CloseStartMenu);
        }
    });
    on_cleanup(move || escape_listener.remove());

    // Pointer tracking is global so a release outside the window still ends the session.
    let move_listener = window_event_listener(ev::pointermove, move |ev| {
        let pointer = pointer_from_pointer_event(&ev);
        let interaction = runtime.interaction.get_untracked();
        if interaction.dragging.is_some() {
            runtime.dispatch_action(DesktopAction::UpdateMove { pointer });
        }
        if interaction.resizing.is_some() {
            runtime.dispatch_action(DesktopAction::UpdateResize { pointer });
        }
    });
    let up_listener = window_event_listener(ev::pointerup, move |_| {
        end_active_pointer_interaction(runtime)
    });
    let cancel_listener = window_event_listener(ev::pointercancel, move |_| {
        end_active_pointer_interaction(runtime)
    });
    on_cleanup(move || {
        move_listener.remove();
        up_listener.remove();
        cancel_listener.remove();
    });

    let wallpaper_style = move || {
        let image = state.get().settings.background_image;
        if image.is_empty() {
            String::new()
        } else {
            format!("background-image:url('{image}');background-size:cover;")
        }
    };

    view! {
        <div
            id="desktop-shell-root"
            class="desktop-shell"
            data-ui-kind="desktop-root"
            data-theme=move || state.get().settings.preferences.theme
            style=move || {
                format!(
                    "{}font-size:{}px;",
                    wallpaper_style(),
                    state.get().settings.preferences.font_size
                )
            }
            on:click=move |ev: web_sys::MouseEvent| {
                if let Some(request) = open_request_from_marked_element(&ev) {
                    stop_mouse_event(&ev);
                    runtime.dispatch_action(DesktopAction::OpenWindow(request));
                }
            }
        >
            <div
                class="desktop-surface"
                data-ui-kind="desktop-surface"
                on:mousedown=move |_| runtime.dispatch_action(DesktopAction::CloseStartMenu)
            >
                <DesktopIcons />
            </div>

            <div class="desktop-window-layer" data-ui-kind="window-layer">
                <For
                    each=move || state.get().windows
                    key=|win| win.id.clone()
                    let:win
                >
                    <DesktopWindow window_id=win.id />
                </For>
            </div>

            <Show when=move || interaction.get().guard_active() fallback=|| ()>
                <div
                    class="drag-guard"
                    data-ui-kind="drag-guard"
                    style=format!(
                        "position:fixed;inset:0;background:transparent;z-index:{DRAG_GUARD_Z_INDEX};"
                    )
                />
            </Show>

            <StartMenu />
            <Taskbar />
        </div>
    }
}

#[component]
fn DesktopIcons() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    view! {
        {move || match state.get().config_error {
            Some(message) => {
                view! { <p class="desktop-config-error" role="alert">{message}</p> }.into_view()
            }
            None => {
                view! {
                    <div class="desktop-icon-grid" data-ui-kind="desktop-icons">
                        {state
                            .get()
                            .shortcuts
                            .desktop
                            .into_iter()
                            .map(|shortcut| {
                                let request = OpenWindowRequest::from_shortcut(&shortcut);
                                let icon = shortcut.icon().map(str::to_string);
                                view! {
                                    <button
                                        type="button"
                                        class="desktop-icon"
                                        on:click=move |ev| {
                                            stop_mouse_event(&ev);
                                            runtime
                                                .dispatch_action(
                                                    DesktopAction::OpenWindow(request.clone()),
                                                );
                                        }
                                    >
                                        {icon.map(|src| view! { <img src=src alt="" /> })}
                                        <span>{shortcut.title}</span>
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                }
                    .into_view()
            }
        }}
    }
}

/// Maps a click on an element marked with `data-title` and `data-content`/`data-url` to an
/// open request.
#[cfg(target_arch = "wasm32")]
fn open_request_from_marked_element(ev: &web_sys::MouseEvent) -> Option<OpenWindowRequest> {
    let target = ev.target()?.dyn_into::<web_sys::Element>().ok()?;
    let marked = target.closest("[data-title]").ok()??;
    crate::content::open_request_from_attributes(
        marked.get_attribute("data-title").as_deref(),
        marked.get_attribute("data-content").as_deref(),
        marked.get_attribute("data-url").as_deref(),
        marked.get_attribute("data-icon").as_deref(),
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn open_request_from_marked_element(_: &web_sys::MouseEvent) -> Option<OpenWindowRequest> {
    None
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

fn end_active_pointer_interaction(runtime: DesktopRuntimeContext) {
    let interaction = runtime.interaction.get_untracked();
    if interaction.dragging.is_some() {
        runtime.dispatch_action(DesktopAction::EndMove);
    }
    if interaction.resizing.is_some() {
        runtime.dispatch_action(DesktopAction::EndResize);
    }
}

fn resize_handle_class(edge: ResizeEdge) -> String {
    format!("window-resize-handle edge-{}", edge.css().0)
}
