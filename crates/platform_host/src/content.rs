//! Content fetch contract for window bodies backed by HTML fragments.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use crate::config::service::ConfigError;

/// Object-safe boxed future used by [`ContentService`].
pub type ContentFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service that fetches text resources (HTML fragments and the scripts they reference).
pub trait ContentService {
    /// Fetches `path` and returns the response body. Non-2xx responses are errors.
    fn fetch_text<'a>(&'a self, path: &'a str) -> ContentFuture<'a, Result<String, ConfigError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Content service for hosts without a network; every fetch fails.
pub struct NoopContentService;

impl ContentService for NoopContentService {
    fn fetch_text<'a>(&'a self, _path: &'a str) -> ContentFuture<'a, Result<String, ConfigError>> {
        Box::pin(async { Err(ConfigError::Unavailable) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory content service serving registered documents; unknown paths answer `404`.
pub struct MemoryContentService {
    documents: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryContentService {
    /// Registers `body` under `path`.
    pub fn insert(&self, path: impl Into<String>, body: impl Into<String>) {
        self.documents.borrow_mut().insert(path.into(), body.into());
    }
}

impl ContentService for MemoryContentService {
    fn fetch_text<'a>(&'a self, path: &'a str) -> ContentFuture<'a, Result<String, ConfigError>> {
        Box::pin(async move {
            self.documents
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| ConfigError::Status {
                    status: 404,
                    body: format!("{path} not found"),
                })
        })
    }
}
