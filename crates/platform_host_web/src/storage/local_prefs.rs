//! `localStorage`-backed preference store implementation.
//!
//! The browser API is synchronous; the adapter also implements [`platform_host::PrefsStore`]
//! (async trait) so the runtime can swap it for in-memory stores in tests.

use platform_host::{PrefsStore, PrefsStoreFuture, StorageError};

#[derive(Debug, Clone, Copy, Default)]
/// Browser preference store backed by `window.localStorage`.
pub struct WebPrefsStore;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

#[cfg(target_arch = "wasm32")]
fn storage_error(err: wasm_bindgen::JsValue, op: &str) -> StorageError {
    use wasm_bindgen::JsCast;

    match err.dyn_ref::<web_sys::DomException>() {
        Some(dom) if dom.name() == "QuotaExceededError" => StorageError::QuotaExceeded,
        _ => StorageError::Backend(format!("localStorage {op} failed: {err:?}")),
    }
}

impl WebPrefsStore {
    /// Loads a raw JSON string for a key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when localStorage cannot be reached.
    pub fn load_json(self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .get_item(key)
                .map_err(|e| storage_error(e, "get_item"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    /// Saves a raw JSON string for a key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::QuotaExceeded`] when the browser refuses the write for size, or
    /// another [`StorageError`] when localStorage is unavailable or the write fails.
    pub fn save_json(self, key: &str, raw_json: &str) -> Result<(), StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .set_item(key, raw_json)
                .map_err(|e| storage_error(e, "set_item"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw_json);
            Err(StorageError::Unavailable)
        }
    }

    /// Deletes a key from localStorage.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the delete fails.
    pub fn delete_json(self, key: &str) -> Result<(), StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| storage_error(e, "remove_item"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }
}

impl PrefsStore for WebPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, StorageError>> {
        let store = *self;
        Box::pin(async move { store.load_json(key) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        let store = *self;
        Box::pin(async move { store.save_json(key, raw_json) })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        let store = *self;
        Box::pin(async move { store.delete_json(key) })
    }
}
