//! `fetch`-backed content service for HTML fragment windows.

use platform_host::{ConfigError, ContentFuture, ContentService};

use crate::http::{self, Method};

#[derive(Debug, Clone, Copy, Default)]
/// Fetches window content relative to the page origin.
pub struct WebContentService;

impl ContentService for WebContentService {
    fn fetch_text<'a>(&'a self, path: &'a str) -> ContentFuture<'a, Result<String, ConfigError>> {
        Box::pin(async move { http::request_text(Method::Get, path, None).await })
    }
}
