//! `fetch`-backed configuration bridge.

use platform_host::{
    ApiConfig, ConfigEndpoints, ConfigError, ConfigFuture, ConfigService, DesktopSettings,
    IconManifest, ShortcutsConfig,
};

use crate::http::{self, Method};

#[derive(Debug, Clone, Default)]
/// Configuration service talking to the JSON endpoints described by [`ConfigEndpoints`].
pub struct WebConfigService {
    endpoints: ConfigEndpoints,
}

impl WebConfigService {
    /// Creates a service for the given endpoint layout.
    pub fn new(endpoints: ConfigEndpoints) -> Self {
        Self { endpoints }
    }

    /// Endpoint layout in use.
    pub fn endpoints(&self) -> &ConfigEndpoints {
        &self.endpoints
    }
}

impl ConfigService for WebConfigService {
    fn load_shortcuts<'a>(&'a self) -> ConfigFuture<'a, Result<ShortcutsConfig, ConfigError>> {
        Box::pin(async move { http::get_json(&self.endpoints.url(&self.endpoints.shortcuts)).await })
    }

    fn save_shortcuts<'a>(
        &'a self,
        shortcuts: &'a ShortcutsConfig,
    ) -> ConfigFuture<'a, Result<(), ConfigError>> {
        Box::pin(async move {
            http::post_json(&self.endpoints.url(&self.endpoints.shortcuts_save), shortcuts).await
        })
    }

    fn load_settings<'a>(&'a self) -> ConfigFuture<'a, Result<DesktopSettings, ConfigError>> {
        Box::pin(async move { http::get_json(&self.endpoints.url(&self.endpoints.settings)).await })
    }

    fn save_settings<'a>(
        &'a self,
        settings: &'a DesktopSettings,
    ) -> ConfigFuture<'a, Result<(), ConfigError>> {
        Box::pin(async move {
            http::post_json(&self.endpoints.url(&self.endpoints.settings), settings).await
        })
    }

    fn load_api_config<'a>(&'a self) -> ConfigFuture<'a, Result<ApiConfig, ConfigError>> {
        Box::pin(
            async move { http::get_json(&self.endpoints.url(&self.endpoints.api_config)).await },
        )
    }

    fn save_api_config<'a>(
        &'a self,
        config: &'a ApiConfig,
    ) -> ConfigFuture<'a, Result<(), ConfigError>> {
        Box::pin(async move {
            http::post_json(&self.endpoints.url(&self.endpoints.api_save), config).await
        })
    }

    fn sync_icons<'a>(&'a self) -> ConfigFuture<'a, Result<(), ConfigError>> {
        Box::pin(async move {
            http::request_text(
                Method::Post,
                &self.endpoints.url(&self.endpoints.icons_sync),
                None,
            )
            .await
            .map(|_| ())
        })
    }

    fn load_icon_manifest<'a>(&'a self) -> ConfigFuture<'a, Result<IconManifest, ConfigError>> {
        Box::pin(async move {
            http::get_json(&self.endpoints.url(&self.endpoints.icon_manifest)).await
        })
    }
}
