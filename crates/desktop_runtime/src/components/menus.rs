use super::*;
use crate::config::CONTEXT_MENU_Z_INDEX;

#[component]
pub(super) fn StartMenu() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    view! {
        <Show when=move || state.get().start_menu_open fallback=|| ()>
            <nav
                class="start-menu"
                role="menu"
                data-ui-kind="start-menu"
                style=move || {
                    format!(
                        "position:fixed;left:0;bottom:{}px;z-index:{CONTEXT_MENU_Z_INDEX};",
                        state.get().layout.taskbar_height_px
                    )
                }
                on:mousedown=move |ev| ev.stop_propagation()
            >
                <ul>
                    {move || {
                        state
                            .get()
                            .shortcuts
                            .start_menu
                            .into_iter()
                            .map(|shortcut| {
                                let request = OpenWindowRequest::from_shortcut(&shortcut);
                                let icon = shortcut.icon().map(str::to_string);
                                view! {
                                    <li role="none">
                                        <button
                                            type="button"
                                            role="menuitem"
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
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                    <li role="none" class="start-menu-separator">
                        <a role="menuitem" href="/settings">"Settings"</a>
                    </li>
                </ul>
            </nav>
        </Show>
    }
}
