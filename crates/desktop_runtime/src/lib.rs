//! Browser desktop shell runtime: window registry, taskbar binder, z-order controller, layout
//! persistence and the Leptos components rendering them.

pub mod components;
pub mod config;
pub mod content;
mod effect_executor;
pub mod geometry;
pub mod host;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod restore;
mod runtime_context;
pub mod settings;
pub mod taskbar_binder;
pub mod window_manager;
pub mod z_order;

pub use components::{
    use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, DesktopShell, SettingsPage,
};
pub use config::ShellConfig;
pub use model::*;
pub use persistence::{capture_snapshot, validate_snapshot, DesktopSnapshot, SnapshotRejection};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
