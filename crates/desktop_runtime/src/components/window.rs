use super::*;
use crate::{
    content::{ContentState, CONTENT_LOAD_FAILED},
    model::{WindowId, WindowRecord},
};

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

fn is_primary_press(ev: &web_sys::PointerEvent) -> bool {
    if ev.pointer_type() == "mouse" {
        ev.button() == 0
    } else {
        ev.is_primary()
    }
}

fn window_style(win: &WindowRecord) -> String {
    let display = if win.flags.minimized {
        "display:none;"
    } else {
        ""
    };
    format!(
        "position:absolute;{}z-index:{};{}",
        win.geometry.to_style(),
        win.z_index,
        display
    )
}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let id = store_value(window_id);

    let window = create_memo(move |_| id.with_value(|id| runtime.state.get().window(id).cloned()));
    let body = create_memo(move |_| window.get().map(|w| w.body));

    let toggle_maximize = move || {
        runtime.dispatch_action(DesktopAction::ToggleMaximize {
            window_id: id.get_value(),
            viewport: runtime.host.get_value().viewport_rect(),
        })
    };
    let focus = move |_| {
        let should_focus = window
            .get_untracked()
            .is_some_and(|w| !w.is_active || w.flags.minimized);
        if should_focus {
            runtime.dispatch_action(DesktopAction::FocusWindow {
                window_id: id.get_value(),
            });
        }
    };
    let begin_move = move |ev: web_sys::PointerEvent| {
        if !is_primary_press(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::BeginMove {
            window_id: id.get_value(),
            pointer: pointer_from_pointer_event(&ev),
        });
    };

    let class_name = move || {
        let Some(win) = window.get() else {
            return "desktop-window".to_string();
        };
        let mut class = String::from("desktop-window");
        if win.is_active {
            class.push_str(" active");
        }
        if win.flags.minimized {
            class.push_str(" minimized");
        }
        if win.flags.maximized {
            class.push_str(" maximized");
        }
        class
    };
    let maximized = move || window.get().is_some_and(|w| w.flags.maximized);

    view! {
        <Show when=move || window.get().is_some() fallback=|| ()>
            <section
                class=class_name
                style=move || window.get().map(|w| window_style(&w)).unwrap_or_default()
                data-window-id=move || id.get_value().0
                on:pointerdown=focus
                role="dialog"
                aria-label=move || window.get().map(|w| w.title).unwrap_or_default()
            >
                <header
                    class="titlebar"
                    on:pointerdown=begin_move
                    on:dblclick=move |ev| {
                        stop_mouse_event(&ev);
                        toggle_maximize();
                    }
                >
                    <div class="titlebar-title">
                        {move || {
                            window
                                .get()
                                .and_then(|w| w.icon_url)
                                .map(|src| view! { <img class="titlebar-icon" src=src alt="" /> })
                        }}
                        <span>{move || window.get().map(|w| w.title).unwrap_or_default()}</span>
                    </div>
                    <div class="titlebar-controls">
                        <button
                            type="button"
                            aria-label="Minimize window"
                            on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                            on:click=move |ev| {
                                stop_mouse_event(&ev);
                                runtime.dispatch_action(DesktopAction::MinimizeWindow {
                                    window_id: id.get_value(),
                                });
                            }
                        >
                            "_"
                        </button>
                        <button
                            type="button"
                            aria-label=move || {
                                if maximized() { "Restore window" } else { "Maximize window" }
                            }
                            on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                            on:click=move |ev| {
                                stop_mouse_event(&ev);
                                toggle_maximize();
                            }
                        >
                            {move || if maximized() { "❐" } else { "□" }}
                        </button>
                        <button
                            type="button"
                            aria-label="Close window"
                            on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                            on:click=move |ev| {
                                stop_mouse_event(&ev);
                                runtime.dispatch_action(DesktopAction::CloseWindow {
                                    window_id: id.get_value(),
                                });
                            }
                        >
                            "×"
                        </button>
                    </div>
                </header>
                <div class="window-body">
                    {move || body.get().map(|body| view! { <WindowBody body=body /> })}
                </div>
                <Show when=move || !maximized() fallback=|| ()>
                    {ResizeEdge::ALL
                        .into_iter()
                        .map(|edge| view! { <WindowResizeHandle window_id=id.get_value() edge=edge /> })
                        .collect_view()}
                </Show>
            </section>
        </Show>
    }
}

#[component]
fn WindowResizeHandle(window_id: WindowId, edge: ResizeEdge) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let id = store_value(window_id);

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if !is_primary_press(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::BeginResize {
            window_id: id.get_value(),
            edge,
            pointer: pointer_from_pointer_event(&ev),
        });
    };

    view! {
        <div
            class=resize_handle_class(edge)
            style=format!("cursor:{};", edge.css().1)
            aria-hidden="true"
            on:pointerdown=on_pointerdown
        />
    }
}

#[component]
fn WindowBody(body: ContentState) -> impl IntoView {
    match body {
        ContentState::Pending => {
            view! { <p class="window-loading">"Loading…"</p> }.into_view()
        }
        ContentState::Frame(url) => {
            view! { <iframe class="window-frame" src=url title="window content"></iframe> }
                .into_view()
        }
        ContentState::Text(text) => view! { <pre class="window-text">{text}</pre> }.into_view(),
        ContentState::Failed => {
            view! { <p class="window-error">{CONTENT_LOAD_FAILED}</p> }.into_view()
        }
        ContentState::Markup { html, scripts } => {
            let runtime = use_desktop_runtime();
            let container = create_node_ref::<html::Div>();
            container.on_load(move |element| {
                if scripts.is_empty() {
                    return;
                }
                let element: &web_sys::Element = &element;
                runtime
                    .host
                    .get_value()
                    .run_embedded_scripts(element.clone(), scripts);
            });
            view! { <div class="window-markup" node_ref=container inner_html=html></div> }
                .into_view()
        }
    }
}
