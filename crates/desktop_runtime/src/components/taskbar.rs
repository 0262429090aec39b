use super::*;
use crate::model::{TaskbarButton, TaskbarButtonKind};

fn taskbar_button_class(button: &TaskbarButton) -> String {
    let mut class = String::from("taskbar-button");
    class.push_str(match button.kind {
        TaskbarButtonKind::Static => " static",
        TaskbarButtonKind::Dynamic => " dynamic",
    });
    if button.binding.is_some() {
        class.push_str(" bound");
    }
    if button.active {
        class.push_str(" active");
    }
    class
}

#[component]
pub(super) fn Taskbar() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let height = state.get_untracked().layout.taskbar_height_px;

    view! {
        <footer
            class="taskbar"
            data-ui-kind="taskbar"
            style=format!("position:fixed;left:0;right:0;bottom:0;height:{height}px;")
        >
            <button
                type="button"
                class=move || {
                    if state.get().start_menu_open { "start-button open" } else { "start-button" }
                }
                aria-haspopup="menu"
                aria-expanded=move || state.get().start_menu_open.to_string()
                on:mousedown=move |ev| ev.stop_propagation()
                on:click=move |ev| {
                    stop_mouse_event(&ev);
                    runtime.dispatch_action(DesktopAction::ToggleStartMenu);
                }
            >
                "Start"
            </button>
            <div class="taskbar-buttons" role="toolbar" aria-label="Open windows">
                {move || {
                    state
                        .get()
                        .taskbar
                        .buttons
                        .into_iter()
                        .map(|button| {
                            let button_id = button.id;
                            let class_name = taskbar_button_class(&button);
                            let pressed = button.active.to_string();
                            view! {
                                <button
                                    type="button"
                                    class=class_name
                                    aria-pressed=pressed
                                    data-button-id=button_id.0.to_string()
                                    on:click=move |ev| {
                                        stop_mouse_event(&ev);
                                        runtime
                                            .dispatch_action(DesktopAction::ActivateTaskbarButton {
                                                button_id,
                                            });
                                    }
                                >
                                    {button.icon_url.map(|src| view! { <img src=src alt="" /> })}
                                    <span>{button.label}</span>
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>
        </footer>
    }
}
