//! Serializable configuration documents exchanged with the configuration endpoints.

use serde::{Deserialize, Deserializer, Serialize};

const UNTITLED_SHORTCUT: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawShortcutEntry", rename_all = "camelCase")]
/// One launchable shortcut (desktop icon, taskbar entry or start-menu item).
///
/// Older documents spell the content field `url` or `content` and the icon field `icon`; they are
/// accepted on input and always written back as `contentPath`/`iconUrl`.
pub struct ShortcutEntry {
    /// Display title; also the key used to match windows with taskbar entries.
    pub title: String,
    /// Content locator opened by the shortcut.
    pub content_path: String,
    /// Icon image reference, empty when none.
    pub icon_url: String,
}

impl ShortcutEntry {
    /// Creates a shortcut from its three fields.
    pub fn new(
        title: impl Into<String>,
        content_path: impl Into<String>,
        icon_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content_path: content_path.into(),
            icon_url: icon_url.into(),
        }
    }

    /// Returns the icon reference when one is set.
    pub fn icon(&self) -> Option<&str> {
        let icon = self.icon_url.trim();
        (!icon.is_empty()).then_some(icon)
    }
}

#[derive(Deserialize)]
struct RawShortcutEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "contentPath")]
    content_path: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, rename = "iconUrl")]
    icon_url: Option<String>,
    #[serde(default)]
    icon: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<RawShortcutEntry> for ShortcutEntry {
    fn from(raw: RawShortcutEntry) -> Self {
        Self {
            title: non_empty(raw.title).unwrap_or_else(|| UNTITLED_SHORTCUT.to_string()),
            content_path: non_empty(raw.content_path)
                .or_else(|| non_empty(raw.url))
                .or_else(|| non_empty(raw.content))
                .unwrap_or_default(),
            icon_url: non_empty(raw.icon_url)
                .or_else(|| non_empty(raw.icon))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// The three shortcut lists of [`ShortcutsConfig`].
pub enum ShortcutSection {
    /// Desktop icon grid.
    Desktop,
    /// Statically declared taskbar entries.
    Taskbar,
    /// Start-menu items.
    StartMenu,
}

impl ShortcutSection {
    /// All sections in display order.
    pub const ALL: [Self; 3] = [Self::Desktop, Self::Taskbar, Self::StartMenu];

    /// Stable key used in JSON documents and DOM ids.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Taskbar => "taskbar",
            Self::StartMenu => "startMenu",
        }
    }

    /// Human-readable heading.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Desktop => "Desktop",
            Self::Taskbar => "Taskbar",
            Self::StartMenu => "Start Menu",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Shortcut declarations served by the shortcuts endpoint.
pub struct ShortcutsConfig {
    /// Desktop icons.
    pub desktop: Vec<ShortcutEntry>,
    /// Static taskbar entries.
    pub taskbar: Vec<ShortcutEntry>,
    /// Start-menu items.
    pub start_menu: Vec<ShortcutEntry>,
}

impl ShortcutsConfig {
    /// Returns the list for `section`.
    pub fn section(&self, section: ShortcutSection) -> &[ShortcutEntry] {
        match section {
            ShortcutSection::Desktop => &self.desktop,
            ShortcutSection::Taskbar => &self.taskbar,
            ShortcutSection::StartMenu => &self.start_menu,
        }
    }

    /// Returns the mutable list for `section`.
    pub fn section_mut(&mut self, section: ShortcutSection) -> &mut Vec<ShortcutEntry> {
        match section {
            ShortcutSection::Desktop => &mut self.desktop,
            ShortcutSection::Taskbar => &mut self.taskbar,
            ShortcutSection::StartMenu => &mut self.start_menu,
        }
    }

    /// Finds the first shortcut in any section whose title equals `title`.
    pub fn find_by_title(&self, title: &str) -> Option<&ShortcutEntry> {
        ShortcutSection::ALL
            .into_iter()
            .flat_map(|section| self.section(section).iter())
            .find(|entry| entry.title == title)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawShortcutsConfig {
    Sections {
        #[serde(default)]
        desktop: Vec<ShortcutEntry>,
        #[serde(default)]
        taskbar: Vec<ShortcutEntry>,
        #[serde(default, rename = "startMenu")]
        start_menu: Vec<ShortcutEntry>,
    },
    Legacy(Vec<ShortcutEntry>),
}

impl<'de> Deserialize<'de> for ShortcutsConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawShortcutsConfig::deserialize(deserializer)? {
            RawShortcutsConfig::Sections {
                desktop,
                taskbar,
                start_menu,
            } => Self {
                desktop,
                taskbar,
                start_menu,
            },
            RawShortcutsConfig::Legacy(desktop) => Self {
                desktop,
                ..Self::default()
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Editor preferences nested in [`DesktopSettings`].
pub struct DesktopPreferences {
    /// Theme name.
    pub theme: String,
    /// Base font size in px.
    pub font_size: u32,
    /// UI language tag.
    pub language: String,
}

impl Default for DesktopPreferences {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            font_size: 14,
            language: "en-US".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Document served by the settings endpoint.
pub struct DesktopSettings {
    /// Desktop wallpaper reference, empty for none.
    pub background_image: String,
    /// Editor preferences.
    pub preferences: DesktopPreferences,
}

impl DesktopSettings {
    /// Checks the wallpaper reference the way the settings endpoint does: empty, or an
    /// `http(s)://` URL, or a root-relative path.
    pub fn background_image_is_valid(&self) -> bool {
        let url = self.background_image.trim();
        url.is_empty()
            || url.starts_with("http://")
            || url.starts_with("https://")
            || url.starts_with('/')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Width/height hint on an alternate-editor button: a pixel count or a CSS length.
pub enum ApiDimension {
    /// Plain pixel count.
    Px(u32),
    /// CSS length string.
    Css(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Taskbar or menu button in the alternate editor's configuration document.
pub struct ApiConfigButton {
    /// Display title.
    pub title: String,
    /// Content locator.
    pub url: String,
    /// Icon reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Preferred window width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<ApiDimension>,
    /// Preferred window height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<ApiDimension>,
}

impl ApiConfigButton {
    /// Converts the button into a plain shortcut.
    pub fn to_shortcut(&self) -> ShortcutEntry {
        ShortcutEntry::new(
            self.title.clone(),
            self.url.clone(),
            self.icon.clone().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Main-menu row: a section heading or a launchable item.
pub enum MainMenuEntry {
    /// Non-interactive heading.
    Heading {
        /// Heading text.
        heading: String,
    },
    /// Launchable item.
    Item(ApiConfigButton),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Configuration document used by the alternate editor (`/api/config`, `/api/save`).
pub struct ApiConfig {
    /// Left-hand taskbar buttons.
    pub taskbar: Vec<ApiConfigButton>,
    /// Right-hand taskbar buttons.
    pub taskbar_unique: Vec<ApiConfigButton>,
    /// Main-menu rows.
    pub main_menu: Vec<MainMenuEntry>,
    /// Wallpaper reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

impl ApiConfig {
    /// Folds the alternate document into the sectioned shortcut form: both taskbar rows become
    /// taskbar entries and main-menu items become start-menu entries (headings are dropped).
    pub fn to_shortcuts(&self) -> ShortcutsConfig {
        ShortcutsConfig {
            desktop: Vec::new(),
            taskbar: self
                .taskbar
                .iter()
                .chain(self.taskbar_unique.iter())
                .map(ApiConfigButton::to_shortcut)
                .collect(),
            start_menu: self
                .main_menu
                .iter()
                .filter_map(|entry| match entry {
                    MainMenuEntry::Item(button) => Some(button.to_shortcut()),
                    MainMenuEntry::Heading { .. } => None,
                })
                .collect(),
        }
    }

    /// Writes edited shortcut lists back into this document for `/api/save`.
    ///
    /// Taskbar entries return to the row they were read from (new titles go to `taskbar`), and
    /// size hints survive for titles that still exist. Start-menu entries refill the item slots
    /// between the existing headings; extra entries are appended. The document has no desktop
    /// section, so desktop entries are not written.
    pub fn with_shortcuts(&self, shortcuts: &ShortcutsConfig) -> Self {
        let previous = |title: &str| {
            self.taskbar
                .iter()
                .chain(self.taskbar_unique.iter())
                .chain(self.main_menu.iter().filter_map(|entry| match entry {
                    MainMenuEntry::Item(button) => Some(button),
                    MainMenuEntry::Heading { .. } => None,
                }))
                .find(|button| button.title == title)
        };
        let button = |entry: &ShortcutEntry| {
            let old = previous(&entry.title);
            ApiConfigButton {
                title: entry.title.clone(),
                url: entry.content_path.clone(),
                icon: entry.icon().map(str::to_string),
                width: old.and_then(|b| b.width.clone()),
                height: old.and_then(|b| b.height.clone()),
            }
        };

        let (taskbar_unique, taskbar): (Vec<_>, Vec<_>) = shortcuts
            .taskbar
            .iter()
            .map(|entry| {
                let unique = self.taskbar_unique.iter().any(|b| b.title == entry.title);
                (unique, button(entry))
            })
            .partition(|(unique, _)| *unique);

        let mut items = shortcuts.start_menu.iter().map(button);
        let mut main_menu: Vec<MainMenuEntry> = self
            .main_menu
            .iter()
            .filter_map(|entry| match entry {
                MainMenuEntry::Heading { .. } => Some(entry.clone()),
                MainMenuEntry::Item(_) => items.next().map(MainMenuEntry::Item),
            })
            .collect();
        main_menu.extend(items.map(MainMenuEntry::Item));

        Self {
            taskbar: taskbar.into_iter().map(|(_, b)| b).collect(),
            taskbar_unique: taskbar_unique.into_iter().map(|(_, b)| b).collect(),
            main_menu,
            background_image: self.background_image.clone(),
        }
    }
}

/// Prefixes a relative asset reference with the deployment URL prefix.
///
/// Absolute `http(s)` URLs and `data:` URIs are returned unchanged.
pub fn prefix_asset_url(prefix: &str, asset: &str) -> String {
    if asset.is_empty() || asset.starts_with("http") || asset.starts_with("data:") {
        return asset.to_string();
    }
    let prefix = prefix.trim_end_matches('/');
    if asset.starts_with('/') {
        format!("{prefix}{asset}")
    } else {
        format!("{prefix}/{asset}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One icon in the server-generated icon catalog.
pub struct IconEntry {
    /// Display name.
    pub name: String,
    /// File stem.
    #[serde(default)]
    pub filename: String,
    /// Root-relative path of the icon file.
    #[serde(default)]
    pub path: String,
    /// Category bucket.
    #[serde(default)]
    pub category: Option<String>,
    /// File type (`png` or `svg`).
    #[serde(rename = "type")]
    pub kind: String,
}

impl IconEntry {
    /// Path the picker writes into a shortcut when this icon is chosen.
    pub fn png_path(&self) -> String {
        format!("/icons/png/{}.png", self.filename)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Icon catalog (`icon-manifest.json`).
pub struct IconManifest {
    /// Every icon in the catalog.
    pub icons: Vec<IconEntry>,
}

impl IconManifest {
    /// PNG icons only, first occurrence per name, sorted by name.
    pub fn unique_png_icons(&self) -> Vec<IconEntry> {
        let mut seen = std::collections::HashSet::new();
        let mut icons = self
            .icons
            .iter()
            .filter(|icon| icon.kind == "png" && seen.insert(icon.name.clone()))
            .cloned()
            .collect::<Vec<_>>();
        icons.sort_by(|a, b| a.name.cmp(&b.name));
        icons
    }

    /// Sorted distinct categories present in `icons`.
    pub fn categories(icons: &[IconEntry]) -> Vec<String> {
        let mut categories = icons
            .iter()
            .filter_map(|icon| icon.category.clone())
            .filter(|category| !category.is_empty())
            .collect::<Vec<_>>();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Filters `icons` by a case-insensitive search over name and file stem, and by category.
    /// An empty query or category matches everything.
    pub fn filter<'a>(icons: &'a [IconEntry], query: &str, category: &str) -> Vec<&'a IconEntry> {
        let query = query.trim().to_lowercase();
        icons
            .iter()
            .filter(|icon| category.is_empty() || icon.category.as_deref() == Some(category))
            .filter(|icon| {
                query.is_empty()
                    || icon.name.to_lowercase().contains(&query)
                    || icon.filename.to_lowercase().contains(&query)
            })
            .collect()
    }
}
