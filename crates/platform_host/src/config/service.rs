//! Configuration bridge service contract.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use thiserror::Error;

use super::models::{ApiConfig, DesktopSettings, IconManifest, ShortcutsConfig};

/// Object-safe boxed future used by [`ConfigService`] async methods.
pub type ConfigFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures talking to the configuration endpoints.
pub enum ConfigError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// The endpoint answered with a non-2xx status.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (or the server's `error` message).
        body: String,
    },
    /// The response body was not the expected JSON document.
    #[error("invalid response: {0}")]
    Decode(String),
    /// No configuration backend exists on this host.
    #[error("configuration service unavailable")]
    Unavailable,
}

/// Host service for the JSON configuration endpoints.
pub trait ConfigService {
    /// `GET` the shortcut declarations.
    fn load_shortcuts<'a>(&'a self) -> ConfigFuture<'a, Result<ShortcutsConfig, ConfigError>>;

    /// `POST` edited shortcut lists. Nothing is applied unless this returns `Ok`.
    fn save_shortcuts<'a>(
        &'a self,
        shortcuts: &'a ShortcutsConfig,
    ) -> ConfigFuture<'a, Result<(), ConfigError>>;

    /// `GET` the desktop settings document.
    fn load_settings<'a>(&'a self) -> ConfigFuture<'a, Result<DesktopSettings, ConfigError>>;

    /// `POST` the desktop settings document.
    fn save_settings<'a>(
        &'a self,
        settings: &'a DesktopSettings,
    ) -> ConfigFuture<'a, Result<(), ConfigError>>;

    /// `GET` the alternate editor document.
    fn load_api_config<'a>(&'a self) -> ConfigFuture<'a, Result<ApiConfig, ConfigError>>;

    /// `POST` the alternate editor document.
    fn save_api_config<'a>(
        &'a self,
        config: &'a ApiConfig,
    ) -> ConfigFuture<'a, Result<(), ConfigError>>;

    /// Asks the server to regenerate its icon catalog.
    fn sync_icons<'a>(&'a self) -> ConfigFuture<'a, Result<(), ConfigError>>;

    /// `GET` the icon catalog.
    fn load_icon_manifest<'a>(&'a self) -> ConfigFuture<'a, Result<IconManifest, ConfigError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Configuration service for hosts without endpoints; every call reports
/// [`ConfigError::Unavailable`].
pub struct NoopConfigService;

impl ConfigService for NoopConfigService {
    fn load_shortcuts<'a>(&'a self) -> ConfigFuture<'a, Result<ShortcutsConfig, ConfigError>> {
        Box::pin(async { Err(ConfigError::Unavailable) })
    }

    fn save_shortcuts<'a>(
        &'a self,
        _shortcuts: &'a ShortcutsConfig,
    ) -> ConfigFuture<'a, Result<(), ConfigError>> {
        Box::pin(async { Err(ConfigError::Unavailable) })
    }

    fn load_settings<'a>(&'a self) -> ConfigFuture<'a, Result<DesktopSettings, ConfigError>> {
        Box::pin(async { Err(ConfigError::Unavailable) })
    }

    fn save_settings<'a>(
        &'a self,
        _settings: &'a DesktopSettings,
    ) -> ConfigFuture<'a, Result<(), ConfigError>> {
        Box::pin(async { Err(ConfigError::Unavailable) })
    }

    fn load_api_config<'a>(&'a self) -> ConfigFuture<'a, Result<ApiConfig, ConfigError>> {
        Box::pin(async { Err(ConfigError::Unavailable) })
    }

    fn save_api_config<'a>(
        &'a self,
        _config: &'a ApiConfig,
    ) -> ConfigFuture<'a, Result<(), ConfigError>> {
        Box::pin(async { Err(ConfigError::Unavailable) })
    }

    fn sync_icons<'a>(&'a self) -> ConfigFuture<'a, Result<(), ConfigError>> {
        Box::pin(async { Err(ConfigError::Unavailable) })
    }

    fn load_icon_manifest<'a>(&'a self) -> ConfigFuture<'a, Result<IconManifest, ConfigError>> {
        Box::pin(async { Err(ConfigError::Unavailable) })
    }
}

#[derive(Debug, Default)]
struct MemoryConfigState {
    shortcuts: ShortcutsConfig,
    settings: DesktopSettings,
    api_config: ApiConfig,
    icons: IconManifest,
    icon_syncs: u32,
    reject_saves_with: Option<u16>,
    sectioned_missing: bool,
}

#[derive(Debug, Clone, Default)]
/// In-memory configuration service used by tests and offline builds.
pub struct MemoryConfigService {
    inner: Rc<RefCell<MemoryConfigState>>,
}

impl MemoryConfigService {
    /// Creates a service pre-populated with shortcut declarations.
    pub fn with_shortcuts(shortcuts: ShortcutsConfig) -> Self {
        let service = Self::default();
        service.inner.borrow_mut().shortcuts = shortcuts;
        service
    }

    /// Creates a service that only serves the combined editor document; the sectioned
    /// shortcut endpoint answers 404 until shortcuts are saved to it.
    pub fn with_api_config(api_config: ApiConfig) -> Self {
        let service = Self::default();
        {
            let mut inner = service.inner.borrow_mut();
            inner.api_config = api_config;
            inner.sectioned_missing = true;
        }
        service
    }

    /// Replaces the icon catalog.
    pub fn set_icon_manifest(&self, icons: IconManifest) {
        self.inner.borrow_mut().icons = icons;
    }

    /// Makes every subsequent save fail with `status` (or succeed again with `None`).
    pub fn reject_saves_with(&self, status: Option<u16>) {
        self.inner.borrow_mut().reject_saves_with = status;
    }

    /// Current stored shortcut declarations.
    pub fn shortcuts(&self) -> ShortcutsConfig {
        self.inner.borrow().shortcuts.clone()
    }

    /// Current stored combined editor document.
    pub fn api_config(&self) -> ApiConfig {
        self.inner.borrow().api_config.clone()
    }

    /// Current stored settings.
    pub fn settings(&self) -> DesktopSettings {
        self.inner.borrow().settings.clone()
    }

    /// Number of icon-sync requests received.
    pub fn icon_syncs(&self) -> u32 {
        self.inner.borrow().icon_syncs
    }

    fn check_save(&self) -> Result<(), ConfigError> {
        match self.inner.borrow().reject_saves_with {
            Some(status) => Err(ConfigError::Status {
                status,
                body: "rejected".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl ConfigService for MemoryConfigService {
    fn load_shortcuts<'a>(&'a self) -> ConfigFuture<'a, Result<ShortcutsConfig, ConfigError>> {
        Box::pin(async move {
            if self.inner.borrow().sectioned_missing {
                return Err(ConfigError::Status {
                    status: 404,
                    body: "not found".to_string(),
                });
            }
            Ok(self.shortcuts())
        })
    }

    fn save_shortcuts<'a>(
        &'a self,
        shortcuts: &'a ShortcutsConfig,
    ) -> ConfigFuture<'a, Result<(), ConfigError>> {
        Box::pin(async move {
            self.check_save()?;
            let mut inner = self.inner.borrow_mut();
            inner.shortcuts = shortcuts.clone();
            inner.sectioned_missing = false;
            Ok(())
        })
    }

    fn load_settings<'a>(&'a self) -> ConfigFuture<'a, Result<DesktopSettings, ConfigError>> {
        Box::pin(async move { Ok(self.settings()) })
    }

    fn save_settings<'a>(
        &'a self,
        settings: &'a DesktopSettings,
    ) -> ConfigFuture<'a, Result<(), ConfigError>> {
        Box::pin(async move {
            self.check_save()?;
            self.inner.borrow_mut().settings = settings.clone();
            Ok(())
        })
    }

    fn load_api_config<'a>(&'a self) -> ConfigFuture<'a, Result<ApiConfig, ConfigError>> {
        Box::pin(async move { Ok(self.inner.borrow().api_config.clone()) })
    }

    fn save_api_config<'a>(
        &'a self,
        config: &'a ApiConfig,
    ) -> ConfigFuture<'a, Result<(), ConfigError>> {
        Box::pin(async move {
            self.check_save()?;
            self.inner.borrow_mut().api_config = config.clone();
            Ok(())
        })
    }

    fn sync_icons<'a>(&'a self) -> ConfigFuture<'a, Result<(), ConfigError>> {
        Box::pin(async move {
            self.inner.borrow_mut().icon_syncs += 1;
            Ok(())
        })
    }

    fn load_icon_manifest<'a>(&'a self) -> ConfigFuture<'a, Result<IconManifest, ConfigError>> {
        Box::pin(async move { Ok(self.inner.borrow().icons.clone()) })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::config::models::ShortcutEntry;

    #[test]
    fn memory_service_applies_saves_only_on_success() {
        let service = MemoryConfigService::default();
        let service_obj: &dyn ConfigService = &service;
        let mut shortcuts = ShortcutsConfig::default();
        shortcuts
            .taskbar
            .push(ShortcutEntry::new("Notes", "notes.html", ""));

        service.reject_saves_with(Some(500));
        let err = block_on(service_obj.save_shortcuts(&shortcuts)).expect_err("rejected");
        assert!(matches!(err, ConfigError::Status { status: 500, .. }));
        assert!(block_on(service_obj.load_shortcuts())
            .expect("load")
            .taskbar
            .is_empty());

        service.reject_saves_with(None);
        block_on(service_obj.save_shortcuts(&shortcuts)).expect("saved");
        assert_eq!(service.shortcuts(), shortcuts);
    }

    #[test]
    fn noop_service_reports_unavailable() {
        let service = NoopConfigService;
        assert_eq!(
            block_on(service.load_settings()).expect_err("noop"),
            ConfigError::Unavailable
        );
    }
}
