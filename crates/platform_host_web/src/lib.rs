//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer for the desktop shell: the
//! `localStorage` preference store holding the window-layout snapshot, and `fetch`-backed
//! configuration and content services. Non-wasm builds compile to inert fallbacks so the runtime
//! and its tests build natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod config;
pub mod content;
mod http;
pub mod storage;

pub use adapters::{
    config_service, content_service, host_strategy_name, prefs_store, selected_host_strategy,
    ConfigServiceAdapter, ContentServiceAdapter, HostStrategy, PrefsStoreAdapter,
};
pub use config::WebConfigService;
pub use content::WebContentService;
pub use storage::local_prefs::WebPrefsStore;
