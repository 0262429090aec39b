//! Typed host-domain contracts and shared models used across the desktop runtime and browser
//! adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the preference storage
//! contract used for window-layout persistence, the configuration bridge (shortcut, settings and
//! icon-catalog endpoints), content fetching for window bodies, and time helpers. Concrete browser
//! adapters live in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod content;
pub mod storage;
pub mod time;

pub use config::endpoints::ConfigEndpoints;
pub use config::models::{
    prefix_asset_url, ApiConfig, ApiConfigButton, ApiDimension, DesktopPreferences,
    DesktopSettings, IconEntry, IconManifest, MainMenuEntry, ShortcutEntry, ShortcutSection,
    ShortcutsConfig,
};
pub use config::service::{
    ConfigError, ConfigFuture, ConfigService, MemoryConfigService, NoopConfigService,
};
pub use content::{ContentFuture, ContentService, MemoryContentService, NoopContentService};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore,
    PrefsStoreFuture, StorageError,
};
pub use time::{elapsed_ms_since, next_monotonic_timestamp_ms, unix_time_ms_now};
