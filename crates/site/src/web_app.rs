use desktop_runtime::{DesktopProvider, DesktopShell, SettingsPage, ShellConfig};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

/// Element id of the optional JSON document overriding shell defaults.
const SHELL_CONFIG_ELEMENT_ID: &str = "shell-config";

#[cfg(target_arch = "wasm32")]
fn embedded_config_document() -> Option<String> {
    web_sys::window()?
        .document()?
        .get_element_by_id(SHELL_CONFIG_ELEMENT_ID)?
        .text_content()
}

#[cfg(not(target_arch = "wasm32"))]
fn embedded_config_document() -> Option<String> {
    None
}

/// Shell configuration from the page's embedded override document, or defaults.
pub fn page_shell_config() -> ShellConfig {
    parse_shell_config(embedded_config_document().as_deref())
}

fn parse_shell_config(raw: Option<&str>) -> ShellConfig {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => ShellConfig::from_json(raw).unwrap_or_else(|err| {
            logging::warn!("ignoring invalid #{SHELL_CONFIG_ELEMENT_ID} document: {err}");
            ShellConfig::default()
        }),
        None => ShellConfig::default(),
    }
}

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Web Desktop" />
        <Meta name="description" content="A desktop-style browser shell." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="" view=DesktopEntry />
                    <Route path="/settings" view=SettingsEntry />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
pub fn DesktopEntry() -> impl IntoView {
    view! {
        <DesktopProvider config=page_shell_config()>
            <DesktopShell />
        </DesktopProvider>
    }
}

#[component]
pub fn SettingsEntry() -> impl IntoView {
    view! { <SettingsPage config=page_shell_config() /> }
}
