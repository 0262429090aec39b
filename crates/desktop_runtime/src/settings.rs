//! Editing model behind the settings page: shortcut lists, preferences and the icon picker.
//!
//! Nothing here touches the DOM; the page component owns one [`ShortcutEditor`] and renders from
//! it. Saving goes through [`platform_host::ConfigService`], and local state is only marked clean
//! once the endpoint accepted the document.

use platform_host::{
    ApiConfig, ConfigError, ConfigService, DesktopSettings, IconEntry, IconManifest, ShortcutEntry,
    ShortcutSection, ShortcutsConfig,
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("title and content path are required")]
    IncompleteDraft,
    #[error("no shortcut is being edited")]
    NoSession,
    #[error("no {section} shortcut at position {index}")]
    OutOfRange { section: &'static str, index: usize },
    #[error("invalid background image URL")]
    InvalidBackground,
    #[error("save failed: {0}")]
    Save(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    ContentPath,
    IconUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub section: ShortcutSection,
    /// Position being edited; `None` while adding.
    pub index: Option<usize>,
    pub draft: ShortcutEntry,
}

/// Endpoint family the shortcut lists were read from; saves go back to the same one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ShortcutSource {
    /// `/config/shortcuts.json`, saved with `POST /shortcuts.json`.
    #[default]
    Sectioned,
    /// The combined `/api/config` document, saved with `POST /api/save`.
    Combined(ApiConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortcutEditor {
    shortcuts: ShortcutsConfig,
    source: ShortcutSource,
    session: Option<EditSession>,
    dirty: bool,
}

impl ShortcutEditor {
    pub fn new(shortcuts: ShortcutsConfig) -> Self {
        Self {
            shortcuts,
            source: ShortcutSource::Sectioned,
            session: None,
            dirty: false,
        }
    }

    /// Editor over the combined document served by older deployments.
    pub fn from_api_config(api_config: ApiConfig) -> Self {
        Self {
            shortcuts: api_config.to_shortcuts(),
            source: ShortcutSource::Combined(api_config),
            session: None,
            dirty: false,
        }
    }

    /// Loads the sectioned shortcut lists, falling back to the combined document.
    ///
    /// # Errors
    ///
    /// Returns the sectioned endpoint's error when neither document can be loaded.
    pub async fn load(service: &dyn ConfigService) -> Result<Self, ConfigError> {
        match service.load_shortcuts().await {
            Ok(shortcuts) => Ok(Self::new(shortcuts)),
            Err(err) => service
                .load_api_config()
                .await
                .map(Self::from_api_config)
                .map_err(|_| err),
        }
    }

    pub fn source(&self) -> &ShortcutSource {
        &self.source
    }

    pub fn shortcuts(&self) -> &ShortcutsConfig {
        &self.shortcuts
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Whether local edits have not been saved yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn out_of_range(section: ShortcutSection, index: usize) -> EditorError {
        EditorError::OutOfRange {
            section: section.as_str(),
            index,
        }
    }

    pub fn begin_add(&mut self, section: ShortcutSection) {
        self.session = Some(EditSession {
            section,
            index: None,
            draft: ShortcutEntry::new("", "", ""),
        });
    }

    /// Starts editing the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfRange`] when the section has no such entry.
    pub fn begin_edit(&mut self, section: ShortcutSection, index: usize) -> Result<(), EditorError> {
        let draft = self
            .shortcuts
            .section(section)
            .get(index)
            .cloned()
            .ok_or_else(|| Self::out_of_range(section, index))?;
        self.session = Some(EditSession {
            section,
            index: Some(index),
            draft,
        });
        Ok(())
    }

    /// Updates one field of the draft.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoSession`] when nothing is being edited.
    pub fn update_draft(&mut self, field: DraftField, value: &str) -> Result<(), EditorError> {
        let session = self.session.as_mut().ok_or(EditorError::NoSession)?;
        let slot = match field {
            DraftField::Title => &mut session.draft.title,
            DraftField::ContentPath => &mut session.draft.content_path,
            DraftField::IconUrl => &mut session.draft.icon_url,
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Writes the draft into its section, appending new entries.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::IncompleteDraft`] (keeping the session open) when the draft lacks a
    /// title or content path.
    pub fn commit(&mut self) -> Result<(), EditorError> {
        let session = self.session.as_ref().ok_or(EditorError::NoSession)?;
        let draft = &session.draft;
        if draft.title.trim().is_empty() || draft.content_path.trim().is_empty() {
            return Err(EditorError::IncompleteDraft);
        }
        let entry = ShortcutEntry::new(
            draft.title.trim(),
            draft.content_path.trim(),
            draft.icon_url.trim(),
        );
        let (section, index) = (session.section, session.index);
        let list = self.shortcuts.section_mut(section);
        match index {
            Some(index) if index < list.len() => list[index] = entry,
            Some(index) => return Err(Self::out_of_range(section, index)),
            None => list.push(entry),
        }
        self.session = None;
        self.dirty = true;
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.session = None;
    }

    /// Removes and returns the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfRange`] when the section has no such entry.
    pub fn delete(
        &mut self,
        section: ShortcutSection,
        index: usize,
    ) -> Result<ShortcutEntry, EditorError> {
        let list = self.shortcuts.section_mut(section);
        if index >= list.len() {
            return Err(Self::out_of_range(section, index));
        }
        let removed = list.remove(index);
        if self
            .session
            .as_ref()
            .is_some_and(|s| s.section == section && s.index == Some(index))
        {
            self.session = None;
        }
        self.dirty = true;
        Ok(removed)
    }

    /// Moves an entry to a new position within its section (drag reordering).
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfRange`] when `from` does not exist.
    pub fn move_entry(
        &mut self,
        section: ShortcutSection,
        from: usize,
        to: usize,
    ) -> Result<(), EditorError> {
        let list = self.shortcuts.section_mut(section);
        if from >= list.len() {
            return Err(Self::out_of_range(section, from));
        }
        let entry = list.remove(from);
        let to = to.min(list.len());
        list.insert(to, entry);
        self.session = None;
        self.dirty = true;
        Ok(())
    }

    /// Posts every shortcut list to the endpoint they were loaded from. Local state stays dirty
    /// when the endpoint refuses.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Save`] with the endpoint failure.
    pub async fn apply(&mut self, service: &dyn ConfigService) -> Result<(), EditorError> {
        match &mut self.source {
            ShortcutSource::Sectioned => service.save_shortcuts(&self.shortcuts).await?,
            ShortcutSource::Combined(api_config) => {
                let merged = api_config.with_shortcuts(&self.shortcuts);
                service.save_api_config(&merged).await?;
                *api_config = merged;
            }
        }
        self.dirty = false;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Values edited on the preferences tab.
pub struct PreferencesForm {
    pub background_image: String,
    pub theme: String,
    pub font_size: u32,
}

impl PreferencesForm {
    pub fn from_settings(settings: &DesktopSettings) -> Self {
        Self {
            background_image: settings.background_image.clone(),
            theme: settings.preferences.theme.clone(),
            font_size: settings.preferences.font_size,
        }
    }

    /// Settings document for this form; fields the form does not edit keep their current value.
    pub fn to_settings(&self, current: &DesktopSettings) -> DesktopSettings {
        let mut settings = current.clone();
        settings.background_image = self.background_image.trim().to_string();
        settings.preferences.theme = self.theme.clone();
        settings.preferences.font_size = self.font_size;
        settings
    }
}

/// Validates and posts the preferences form, returning the document the endpoint accepted.
///
/// # Errors
///
/// Returns [`EditorError::InvalidBackground`] without contacting the endpoint when the wallpaper
/// reference would be refused, and [`EditorError::Save`] when the endpoint fails.
pub async fn apply_preferences(
    service: &dyn ConfigService,
    current: &DesktopSettings,
    form: &PreferencesForm,
) -> Result<DesktopSettings, EditorError> {
    let settings = form.to_settings(current);
    if !settings.background_image_is_valid() {
        return Err(EditorError::InvalidBackground);
    }
    service.save_settings(&settings).await?;
    Ok(settings)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Searchable icon catalog shown next to the shortcut editor.
pub struct IconPicker {
    icons: Vec<IconEntry>,
    pub query: String,
    /// Selected category; empty for all.
    pub category: String,
}

impl IconPicker {
    pub fn from_manifest(manifest: &IconManifest) -> Self {
        Self {
            icons: manifest.unique_png_icons(),
            ..Self::default()
        }
    }

    pub fn categories(&self) -> Vec<String> {
        IconManifest::categories(&self.icons)
    }

    pub fn visible(&self) -> Vec<&IconEntry> {
        IconManifest::filter(&self.icons, &self.query, &self.category)
    }

    /// Asks the server to rescan its icon directory, then reloads the catalog.
    ///
    /// # Errors
    ///
    /// Returns the endpoint failure; the current catalog is kept.
    pub async fn sync(&mut self, service: &dyn ConfigService) -> Result<usize, ConfigError> {
        service.sync_icons().await?;
        let manifest = service.load_icon_manifest().await?;
        self.icons = manifest.unique_png_icons();
        Ok(self.icons.len())
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{ApiConfigButton, MemoryConfigService};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn commit_rejects_incomplete_drafts_and_keeps_the_session() {
        let mut editor = ShortcutEditor::default();
        editor.begin_add(ShortcutSection::Desktop);
        editor.update_draft(DraftField::Title, "Notes").unwrap();
        assert_eq!(editor.commit(), Err(EditorError::IncompleteDraft));
        assert!(editor.session().is_some());

        editor
            .update_draft(DraftField::ContentPath, " /notes.html ")
            .unwrap();
        editor.commit().unwrap();
        assert_eq!(
            editor.shortcuts().desktop,
            vec![ShortcutEntry::new("Notes", "/notes.html", "")]
        );
        assert!(editor.is_dirty());
        assert_eq!(editor.session(), None);
    }

    #[test]
    fn editing_replaces_in_place_and_delete_removes() {
        let mut shortcuts = ShortcutsConfig::default();
        shortcuts.taskbar = vec![
            ShortcutEntry::new("Mail", "/mail.html", ""),
            ShortcutEntry::new("Paint", "/paint.html", ""),
        ];
        let mut editor = ShortcutEditor::new(shortcuts);
        editor.begin_edit(ShortcutSection::Taskbar, 1).unwrap();
        editor.update_draft(DraftField::Title, "Sketch").unwrap();
        editor.commit().unwrap();
        assert_eq!(editor.shortcuts().taskbar[1].title, "Sketch");

        let removed = editor.delete(ShortcutSection::Taskbar, 0).unwrap();
        assert_eq!(removed.title, "Mail");
        assert!(matches!(
            editor.begin_edit(ShortcutSection::Taskbar, 5),
            Err(EditorError::OutOfRange { index: 5, .. })
        ));
    }

    #[test]
    fn failed_apply_keeps_local_edits_dirty() {
        let service = MemoryConfigService::default();
        let mut editor = ShortcutEditor::default();
        editor.begin_add(ShortcutSection::StartMenu);
        editor.update_draft(DraftField::Title, "Docs").unwrap();
        editor
            .update_draft(DraftField::ContentPath, "/docs.html")
            .unwrap();
        editor.commit().unwrap();

        service.reject_saves_with(Some(500));
        assert!(matches!(
            block_on(editor.apply(&service)),
            Err(EditorError::Save(ConfigError::Status { status: 500, .. }))
        ));
        assert!(editor.is_dirty());
        assert!(service.shortcuts().start_menu.is_empty());

        service.reject_saves_with(None);
        block_on(editor.apply(&service)).unwrap();
        assert!(!editor.is_dirty());
        assert_eq!(service.shortcuts(), editor.shortcuts().clone());
    }

    #[test]
    fn combined_document_edits_save_through_the_api_endpoint() {
        let mut api_config = ApiConfig::default();
        api_config.taskbar_unique.push(ApiConfigButton {
            title: "Clock".to_string(),
            url: "clock.html".to_string(),
            icon: None,
            width: None,
            height: None,
        });
        let service = MemoryConfigService::with_api_config(api_config);

        let mut editor = block_on(ShortcutEditor::load(&service)).unwrap();
        assert!(matches!(editor.source(), ShortcutSource::Combined(_)));
        assert_eq!(editor.shortcuts().taskbar[0].title, "Clock");

        editor.begin_edit(ShortcutSection::Taskbar, 0).unwrap();
        editor.update_draft(DraftField::Title, "World Clock").unwrap();
        editor.commit().unwrap();
        block_on(editor.apply(&service)).unwrap();

        assert!(!editor.is_dirty());
        assert_eq!(service.api_config().taskbar[0].title, "World Clock");
        assert!(service.shortcuts().taskbar.is_empty());
    }

    #[test]
    fn sectioned_lists_load_without_touching_the_api_document() {
        let mut shortcuts = ShortcutsConfig::default();
        shortcuts.desktop.push(ShortcutEntry::new("Mail", "/mail.html", ""));
        let service = MemoryConfigService::with_shortcuts(shortcuts.clone());

        let editor = block_on(ShortcutEditor::load(&service)).unwrap();
        assert_eq!(editor.source(), &ShortcutSource::Sectioned);
        assert_eq!(editor.shortcuts(), &shortcuts);
    }

    #[test]
    fn preferences_keep_the_language_and_validate_wallpaper() {
        let service = MemoryConfigService::default();
        let mut current = DesktopSettings::default();
        current.preferences.language = "de-DE".to_string();

        let mut form = PreferencesForm::from_settings(&current);
        form.theme = "light".to_string();
        form.background_image = "/img/wall.png".to_string();
        let saved = block_on(apply_preferences(&service, &current, &form)).unwrap();
        assert_eq!(saved.preferences.language, "de-DE");
        assert_eq!(service.settings(), saved);

        form.background_image = "ftp://nope".to_string();
        assert_eq!(
            block_on(apply_preferences(&service, &current, &form)),
            Err(EditorError::InvalidBackground)
        );
    }

    #[test]
    fn moving_entries_reorders_within_the_section() {
        let mut shortcuts = ShortcutsConfig::default();
        shortcuts.desktop = vec![
            ShortcutEntry::new("A", "a", ""),
            ShortcutEntry::new("B", "b", ""),
            ShortcutEntry::new("C", "c", ""),
        ];
        let mut editor = ShortcutEditor::new(shortcuts);
        editor.move_entry(ShortcutSection::Desktop, 0, 2).unwrap();
        let titles: Vec<_> = editor
            .shortcuts()
            .desktop
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["B", "C", "A"]);
    }
}
