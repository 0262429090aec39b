//! Settings page: shortcut lists, desktop preferences and the icon picker.
//!
//! The page runs outside [`crate::DesktopProvider`]; it talks to the configuration endpoints directly and
//! keeps its own editing state.

use leptos::*;
use platform_host::{DesktopSettings, ShortcutSection};

use crate::{
    config::ShellConfig,
    host::DesktopHostContext,
    settings::{
        apply_preferences, DraftField, EditorError, IconPicker, PreferencesForm, ShortcutEditor,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Notice {
    Saved(&'static str),
    Failed(String),
}

#[derive(Clone, Copy)]
struct SettingsSignals {
    host: StoredValue<DesktopHostContext>,
    editor: RwSignal<ShortcutEditor>,
    settings: RwSignal<DesktopSettings>,
    form: RwSignal<PreferencesForm>,
    picker: RwSignal<IconPicker>,
    notice: RwSignal<Option<Notice>>,
}

impl SettingsSignals {
    fn edit(self, f: impl FnOnce(&mut ShortcutEditor) -> Result<(), EditorError>) {
        if let Some(Err(err)) = self.editor.try_update(f) {
            self.notice.set(Some(Notice::Failed(err.to_string())));
        }
    }

    fn load(self) {
        let config = self.host.get_value().config_service();
        spawn_local(async move {
            // Older deployments only serve the combined editor document.
            match ShortcutEditor::load(config.as_ref()).await {
                Ok(editor) => self.editor.set(editor),
                Err(err) => {
                    logging::warn!("shortcut config load failed: {err}");
                    self.notice.set(Some(Notice::Failed(format!(
                        "Could not load shortcuts ({err})."
                    ))));
                }
            }
            match config.load_settings().await {
                Ok(settings) => {
                    self.form.set(PreferencesForm::from_settings(&settings));
                    self.settings.set(settings);
                }
                Err(err) => {
                    logging::warn!("desktop settings load failed: {err}");
                    self.notice.set(Some(Notice::Failed(format!(
                        "Could not load settings ({err})."
                    ))));
                }
            }
            match config.load_icon_manifest().await {
                Ok(manifest) => self.picker.set(IconPicker::from_manifest(&manifest)),
                Err(err) => logging::warn!("icon manifest load failed: {err}"),
            }
        });
    }

    fn save_shortcuts(self) {
        let config = self.host.get_value().config_service();
        spawn_local(async move {
            let mut editor = self.editor.get_untracked();
            match editor.apply(config.as_ref()).await {
                Ok(()) => {
                    self.editor.set(editor);
                    self.notice.set(Some(Notice::Saved("Shortcuts saved.")));
                }
                Err(err) => {
                    logging::warn!("shortcut save failed: {err}");
                    self.notice.set(Some(Notice::Failed(err.to_string())));
                }
            }
        });
    }

    fn save_preferences(self) {
        let config = self.host.get_value().config_service();
        spawn_local(async move {
            let current = self.settings.get_untracked();
            let form = self.form.get_untracked();
            match apply_preferences(config.as_ref(), &current, &form).await {
                Ok(saved) => {
                    self.settings.set(saved);
                    self.notice.set(Some(Notice::Saved("Preferences saved.")));
                }
                Err(err) => {
                    logging::warn!("preferences save failed: {err}");
                    self.notice.set(Some(Notice::Failed(err.to_string())));
                }
            }
        });
    }

    fn sync_icons(self) {
        let config = self.host.get_value().config_service();
        spawn_local(async move {
            let mut picker = self.picker.get_untracked();
            match picker.sync(config.as_ref()).await {
                Ok(count) => {
                    logging::log!("icon catalog synced: {count} icons");
                    self.picker.set(picker);
                }
                Err(err) => {
                    logging::warn!("icon sync failed: {err}");
                    self.notice.set(Some(Notice::Failed(format!("Icon sync failed ({err})."))));
                }
            }
        });
    }
}

#[component]
/// Settings editor page backed by the configuration endpoints.
pub fn SettingsPage(
    /// Shell tunables; defaults apply when omitted.
    #[prop(optional)]
    config: Option<ShellConfig>,
) -> impl IntoView {
    let page = SettingsSignals {
        host: store_value(DesktopHostContext::new(config.unwrap_or_default())),
        editor: create_rw_signal(ShortcutEditor::default()),
        settings: create_rw_signal(DesktopSettings::default()),
        form: create_rw_signal(PreferencesForm::from_settings(&DesktopSettings::default())),
        picker: create_rw_signal(IconPicker::default()),
        notice: create_rw_signal(None::<Notice>),
    };
    create_effect(move |_| page.load());

    view! {
        <main class="settings-page" data-ui-kind="settings-page">
            <h1>"Settings"</h1>
            {move || {
                page.notice.get().map(|notice| match notice {
                    Notice::Saved(message) => {
                        view! { <p class="settings-notice" role="status">{message}</p> }
                    }
                    Notice::Failed(message) => {
                        view! { <p class="settings-notice error" role="alert">{message}</p> }
                    }
                })
            }}
            <section class="settings-shortcuts">
                <h2>"Shortcuts"</h2>
                {ShortcutSection::ALL
                    .into_iter()
                    .map(|section| view! { <ShortcutList page=page section=section /> })
                    .collect_view()}
                <DraftForm page=page />
                <button
                    type="button"
                    disabled=move || !page.editor.get().is_dirty()
                    on:click=move |_| page.save_shortcuts()
                >
                    "Save shortcuts"
                </button>
            </section>
            <IconPickerPanel page=page />
            <PreferencesPanel page=page />
            <a href="/">"Back to desktop"</a>
        </main>
    }
}

#[component]
fn ShortcutList(page: SettingsSignals, section: ShortcutSection) -> impl IntoView {
    view! {
        <div class="shortcut-section" data-section=section.as_str()>
            <h3>{section.label()}</h3>
            <ol>
                {move || {
                    let entries = page.editor.get().shortcuts().section(section).to_vec();
                    let last = entries.len().saturating_sub(1);
                    entries
                        .into_iter()
                        .enumerate()
                        .map(|(index, entry)| {
                            view! {
                                <li>
                                    <span class="shortcut-title">{entry.title}</span>
                                    <code class="shortcut-path">{entry.content_path}</code>
                                    <button
                                        type="button"
                                        on:click=move |_| page.edit(|e| e.begin_edit(section, index))
                                    >
                                        "Edit"
                                    </button>
                                    <button
                                        type="button"
                                        disabled={index == 0}
                                        on:click=move |_| {
                                            page.edit(|e| e.move_entry(section, index, index.saturating_sub(1)))
                                        }
                                    >
                                        "Up"
                                    </button>
                                    <button
                                        type="button"
                                        disabled={index == last}
                                        on:click=move |_| {
                                            page.edit(|e| e.move_entry(section, index, index + 1))
                                        }
                                    >
                                        "Down"
                                    </button>
                                    <button
                                        type="button"
                                        on:click=move |_| {
                                            page.edit(|e| e.delete(section, index).map(|_| ()))
                                        }
                                    >
                                        "Delete"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ol>
            <button
                type="button"
                on:click=move |_| {
                    page.edit(|e| {
                        e.begin_add(section);
                        Ok(())
                    })
                }
            >
                "Add"
            </button>
        </div>
    }
}

#[component]
fn DraftInput(page: SettingsSignals, field: DraftField, label: &'static str) -> impl IntoView {
    let value = move || {
        page.editor
            .get()
            .session()
            .map(|session| match field {
                DraftField::Title => session.draft.title.clone(),
                DraftField::ContentPath => session.draft.content_path.clone(),
                DraftField::IconUrl => session.draft.icon_url.clone(),
            })
            .unwrap_or_default()
    };

    view! {
        <label>
            {label}
            <input
                type="text"
                prop:value=value
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    page.edit(|e| e.update_draft(field, &value));
                }
            />
        </label>
    }
}

#[component]
fn DraftForm(page: SettingsSignals) -> impl IntoView {
    view! {
        <Show when=move || page.editor.get().session().is_some() fallback=|| ()>
            <form
                class="shortcut-draft"
                on:submit=move |ev| {
                    ev.prevent_default();
                    page.edit(ShortcutEditor::commit);
                }
            >
                <DraftInput page=page field=DraftField::Title label="Title" />
                <DraftInput page=page field=DraftField::ContentPath label="Content" />
                <DraftInput page=page field=DraftField::IconUrl label="Icon" />
                <button type="submit">"OK"</button>
                <button
                    type="button"
                    on:click=move |_| {
                        page.edit(|e| {
                            e.cancel();
                            Ok(())
                        })
                    }
                >
                    "Cancel"
                </button>
            </form>
        </Show>
    }
}

#[component]
fn IconPickerPanel(page: SettingsSignals) -> impl IntoView {
    view! {
        <section class="icon-picker">
            <h2>"Icons"</h2>
            <input
                type="search"
                placeholder="Search icons"
                prop:value=move || page.picker.get().query
                on:input=move |ev| {
                    let query = event_target_value(&ev);
                    page.picker.update(|p| p.query = query);
                }
            />
            <select on:change=move |ev| {
                let category = event_target_value(&ev);
                page.picker.update(|p| p.category = category);
            }>
                <option value="">"All categories"</option>
                {move || {
                    page.picker
                        .get()
                        .categories()
                        .into_iter()
                        .map(|category| {
                            view! { <option value=category.clone()>{category}</option> }
                        })
                        .collect_view()
                }}
            </select>
            <button type="button" on:click=move |_| page.sync_icons()>
                "Sync icons"
            </button>
            <div class="icon-grid">
                {move || {
                    page.picker
                        .get()
                        .visible()
                        .into_iter()
                        .map(|icon| {
                            let path = icon.png_path();
                            let name = icon.name.clone();
                            view! {
                                <button
                                    type="button"
                                    title=name.clone()
                                    disabled=move || page.editor.get().session().is_none()
                                    on:click=move |_| {
                                        page.edit(|e| e.update_draft(DraftField::IconUrl, &path))
                                    }
                                >
                                    <img src=icon.path.clone() alt=name />
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>
        </section>
    }
}

#[component]
fn PreferencesPanel(page: SettingsSignals) -> impl IntoView {
    view! {
        <section class="settings-preferences">
            <h2>"Preferences"</h2>
            <label>
                "Background image"
                <input
                    type="text"
                    prop:value=move || page.form.get().background_image
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        page.form.update(|f| f.background_image = value);
                    }
                />
            </label>
            <label>
                "Theme"
                <select
                    prop:value=move || page.form.get().theme
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        page.form.update(|f| f.theme = value);
                    }
                >
                    <option value="dark">"Dark"</option>
                    <option value="light">"Light"</option>
                </select>
            </label>
            <label>
                "Font size"
                <input
                    type="number"
                    min="8"
                    max="32"
                    prop:value=move || page.form.get().font_size.to_string()
                    on:input=move |ev| {
                        if let Ok(size) = event_target_value(&ev).parse::<u32>() {
                            page.form.update(|f| f.font_size = size);
                        }
                    }
                />
            </label>
            <button type="button" on:click=move |_| page.save_preferences()>
                "Save preferences"
            </button>
        </section>
    }
}
