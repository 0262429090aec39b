//! Key/value preference storage contracts and adapters.
//!
//! The desktop shell keeps its whole window-layout snapshot in a single preference record, so
//! stores only need whole-value reads, overwrites and deletes.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures reported by a [`PrefsStore`].
pub enum StorageError {
    /// The backing store does not exist on this host (private mode, non-browser target).
    #[error("storage unavailable")]
    Unavailable,
    /// The write exceeded the host storage quota.
    #[error("storage quota exceeded")]
    QuotaExceeded,
    /// The backing store rejected the operation.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// The value could not be converted to or from JSON.
    #[error("storage serialization error: {0}")]
    Serialization(String),
}

/// Host service for preference values (JSON stored as text per key).
pub trait PrefsStore {
    /// Loads a raw JSON string for a preference key.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, StorageError>>;

    /// Saves a raw JSON string for a preference key, replacing any previous value.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), StorageError>>;

    /// Deletes a preference key.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), StorageError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op preference store for unsupported targets and baseline tests.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store keyed by string.
///
/// An optional byte quota makes writes whose value exceeds the limit fail with
/// [`StorageError::QuotaExceeded`], which lets callers exercise their quota handling.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
    quota_bytes: Option<usize>,
}

impl MemoryPrefsStore {
    /// Creates a store that rejects values longer than `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            inner: Rc::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Returns the raw value stored for `key` without going through the async contract.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Stores a raw value directly, bypassing the quota.
    pub fn insert_raw(&self, key: &str, raw_json: &str) {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async move { Ok(self.raw(key)) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            if self.quota_bytes.is_some_and(|limit| raw_json.len() > limit) {
                return Err(StorageError::QuotaExceeded);
            }
            self.insert_raw(key, raw_json);
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store fails or the stored text is not valid JSON for `T`.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    let value =
        serde_json::from_str(&raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(Some(value))
}

/// Serializes and saves a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw =
        serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    store.save_pref(key, &raw).await
}
