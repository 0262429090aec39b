use platform_host::{
    ApiConfig, ConfigEndpoints, ConfigError, ConfigFuture, ConfigService, ContentFuture,
    ContentService, DesktopSettings, IconManifest, NoopConfigService, NoopContentService,
    NoopPrefsStore, PrefsStore, PrefsStoreFuture, ShortcutsConfig, StorageError,
};

use crate::{WebConfigService, WebContentService, WebPrefsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters (`localStorage`, `fetch`).
    Browser,
    /// Inert adapters for builds without a serving backend (`offline-host` feature).
    Offline,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "offline-host")]
    {
        HostStrategy::Offline
    }

    #[cfg(not(feature = "offline-host"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::Offline => "offline",
    }
}

/// Adapter enum that erases the concrete preference backend behind [`PrefsStore`].
#[derive(Debug, Clone, Copy)]
pub enum PrefsStoreAdapter {
    /// Browser `localStorage`.
    Browser(WebPrefsStore),
    /// No-op fallback.
    Offline(NoopPrefsStore),
}

impl PrefsStore for PrefsStoreAdapter {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, StorageError>> {
        match self {
            Self::Browser(store) => store.load_pref(key),
            Self::Offline(store) => store.load_pref(key),
        }
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        match self {
            Self::Browser(store) => store.save_pref(key, raw_json),
            Self::Offline(store) => store.save_pref(key, raw_json),
        }
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        match self {
            Self::Browser(store) => store.delete_pref(key),
            Self::Offline(store) => store.delete_pref(key),
        }
    }
}

/// Adapter enum that erases the concrete configuration backend behind [`ConfigService`].
#[derive(Debug, Clone)]
pub enum ConfigServiceAdapter {
    /// HTTP endpoints.
    Browser(WebConfigService),
    /// Always-unavailable fallback.
    Offline(NoopConfigService),
}

impl ConfigService for ConfigServiceAdapter {
    fn load_shortcuts<'a>(&'a self) -> ConfigFuture<'a, Result<ShortcutsConfig, ConfigError>> {
        match self {
            Self::Browser(service) => service.load_shortcuts(),
            Self::Offline(service) => service.load_shortcuts(),
        }
    }

    fn save_shortcuts<'a>(
        &'a self,
        shortcuts: &'a ShortcutsConfig,
    ) -> ConfigFuture<'a, Result<(), ConfigError>> {
        match self {
            Self::Browser(service) => service.save_shortcuts(shortcuts),
            Self::Offline(service) => service.save_shortcuts(shortcuts),
        }
    }

    fn load_settings<'a>(&'a self) -> ConfigFuture<'a, Result<DesktopSettings, ConfigError>> {
        match self {
            Self::Browser(service) => service.load_settings(),
            Self::Offline(service) => service.load_settings(),
        }
    }

    fn save_settings<'a>(
        &'a self,
        settings: &'a DesktopSettings,
    ) -> ConfigFuture<'a, Result<(), ConfigError>> {
        match self {
            Self::Browser(service) => service.save_settings(settings),
            Self::Offline(service) => service.save_settings(settings),
        }
    }

    fn load_api_config<'a>(&'a self) -> ConfigFuture<'a, Result<ApiConfig, ConfigError>> {
        match self {
            Self::Browser(service) => service.load_api_config(),
            Self::Offline(service) => service.load_api_config(),
        }
    }

    fn save_api_config<'a>(
        &'a self,
        config: &'a ApiConfig,
    ) -> ConfigFuture<'a, Result<(), ConfigError>> {
        match self {
            Self::Browser(service) => service.save_api_config(config),
            Self::Offline(service) => service.save_api_config(config),
        }
    }

    fn sync_icons<'a>(&'a self) -> ConfigFuture<'a, Result<(), ConfigError>> {
        match self {
            Self::Browser(service) => service.sync_icons(),
            Self::Offline(service) => service.sync_icons(),
        }
    }

    fn load_icon_manifest<'a>(&'a self) -> ConfigFuture<'a, Result<IconManifest, ConfigError>> {
        match self {
            Self::Browser(service) => service.load_icon_manifest(),
            Self::Offline(service) => service.load_icon_manifest(),
        }
    }
}

/// Adapter enum that erases the concrete content backend behind [`ContentService`].
#[derive(Debug, Clone, Copy)]
pub enum ContentServiceAdapter {
    /// Browser `fetch`.
    Browser(WebContentService),
    /// Always-failing fallback.
    Offline(NoopContentService),
}

impl ContentService for ContentServiceAdapter {
    fn fetch_text<'a>(&'a self, path: &'a str) -> ContentFuture<'a, Result<String, ConfigError>> {
        match self {
            Self::Browser(service) => service.fetch_text(path),
            Self::Offline(service) => service.fetch_text(path),
        }
    }
}

/// Builds the preference adapter for the compile-time selected host strategy.
pub fn prefs_store() -> PrefsStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => PrefsStoreAdapter::Browser(WebPrefsStore),
        HostStrategy::Offline => PrefsStoreAdapter::Offline(NoopPrefsStore),
    }
}

/// Builds the configuration adapter for the compile-time selected host strategy.
pub fn config_service(endpoints: ConfigEndpoints) -> ConfigServiceAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => ConfigServiceAdapter::Browser(WebConfigService::new(endpoints)),
        HostStrategy::Offline => ConfigServiceAdapter::Offline(NoopConfigService),
    }
}

/// Builds the content adapter for the compile-time selected host strategy.
pub fn content_service() -> ContentServiceAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => ContentServiceAdapter::Browser(WebContentService),
        HostStrategy::Offline => ContentServiceAdapter::Offline(NoopContentService),
    }
}
