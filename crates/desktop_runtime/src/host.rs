//! Host-side runtime helpers for executing reducer effects and querying browser environment state.
//!
//! The reducer never touches storage, the network or timers; it emits [`RuntimeEffect`] values and
//! this module carries them out against injected host services.

mod boot;
mod host_ui;
mod persistence_effects;

use std::{cell::RefCell, rc::Rc};

use leptos::{logging, spawn_local, Callback};
use platform_host::{ConfigService, ContentService, PrefsStore};
use platform_host_web::{config_service, content_service, host_strategy_name, prefs_store};

use crate::{
    config::ShellConfig,
    content::EmbeddedScript,
    geometry::WindowRect,
    persistence::SaveDebouncer,
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    prefs: Rc<dyn PrefsStore>,
    config: Rc<dyn ConfigService>,
    content: Rc<dyn ContentService>,
    shell_config: Rc<ShellConfig>,
    debouncer: Rc<RefCell<SaveDebouncer>>,
    host_strategy_name: &'static str,
}

impl DesktopHostContext {
    /// Builds the host bundle selected at compile time for `shell_config`.
    pub fn new(shell_config: ShellConfig) -> Self {
        let config = config_service(shell_config.endpoints.clone());
        Self::with_services(
            shell_config,
            Rc::new(prefs_store()),
            Rc::new(config),
            Rc::new(content_service()),
        )
    }

    /// Builds a host bundle from explicit services.
    pub fn with_services(
        shell_config: ShellConfig,
        prefs: Rc<dyn PrefsStore>,
        config: Rc<dyn ConfigService>,
        content: Rc<dyn ContentService>,
    ) -> Self {
        Self {
            prefs,
            config,
            content,
            shell_config: Rc::new(shell_config),
            debouncer: Rc::new(RefCell::new(SaveDebouncer::default())),
            host_strategy_name: host_strategy_name(),
        }
    }

    /// Returns the configured preference store.
    pub fn prefs_store(&self) -> Rc<dyn PrefsStore> {
        self.prefs.clone()
    }

    /// Returns the configured configuration endpoint service.
    pub fn config_service(&self) -> Rc<dyn ConfigService> {
        self.config.clone()
    }

    /// Returns the configured content fetch service.
    pub fn content_service(&self) -> Rc<dyn ContentService> {
        self.content.clone()
    }

    /// Returns the shell configuration.
    pub fn shell_config(&self) -> &ShellConfig {
        &self.shell_config
    }

    /// Returns the stable name of the selected host strategy.
    pub fn host_strategy_name(&self) -> &'static str {
        self.host_strategy_name
    }

    /// Installs boot hydration: shortcut and settings loading, then layout restore.
    pub fn install_boot_hydration(&self, dispatch: Callback<DesktopAction>) {
        boot::install_boot_hydration(self.clone(), dispatch);
    }

    /// Installs the periodic fallback save and the save on page unload.
    pub fn install_persistence_triggers(&self, runtime: DesktopRuntimeContext) {
        persistence_effects::install_triggers(self.clone(), runtime);
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::PersistLayout => {
                persistence_effects::schedule_layout_save(self.clone(), runtime)
            }
            RuntimeEffect::LoadContent { window_id, path } => {
                self.load_content(runtime, window_id, path)
            }
            RuntimeEffect::ScheduleRestoreStep => host_ui::schedule_restore_step(runtime),
        }
    }

    fn load_content(
        &self,
        runtime: DesktopRuntimeContext,
        window_id: crate::model::WindowId,
        path: String,
    ) {
        let content = self.content_service();
        spawn_local(async move {
            let result = content.fetch_text(&path).await.map_err(|err| {
                logging::warn!("content fetch for `{path}` failed: {err}");
                err.to_string()
            });
            runtime.dispatch_action(DesktopAction::ContentLoaded { window_id, result });
        });
    }

    /// Runs the scripts extracted from an injected fragment inside `container`, in order.
    pub fn run_embedded_scripts(&self, container: web_sys::Element, scripts: Vec<EmbeddedScript>) {
        host_ui::run_embedded_scripts(self.content_service(), container, scripts);
    }

    /// Returns the browser viewport rectangle (the taskbar is not subtracted).
    pub fn viewport_rect(&self) -> WindowRect {
        host_ui::viewport_rect()
    }
}
