//! Window content classification and HTML fragment preparation.
//!
//! A window's content string is interpreted once, at open time: absolute web URLs are framed,
//! `.html`/`.htm` paths are fetched and injected as markup, and anything else is shown as literal text.

use serde::{Deserialize, Serialize};

use crate::model::OpenWindowRequest;

/// Body text shown when an HTML fragment cannot be fetched.
pub const CONTENT_LOAD_FAILED: &str = "Failed to load content.";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
/// Interpreted content string of a window.
pub enum ContentLocator {
    /// `http://` or `https://` address rendered in an embedded frame.
    Url(String),
    /// Path ending in `.html` or `.htm` fetched and injected as markup.
    HtmlFragment(String),
    /// Literal text shown as-is.
    Text(String),
}

impl ContentLocator {
    /// Classifies a raw content string.
    pub fn classify(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else if is_html_path(raw) {
            Self::HtmlFragment(raw.to_string())
        } else {
            Self::Text(raw.to_string())
        }
    }

    /// The original content string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(raw) | Self::HtmlFragment(raw) | Self::Text(raw) => raw,
        }
    }

    /// Body state a freshly opened window starts in.
    pub fn initial_body(&self) -> ContentState {
        match self {
            Self::Url(url) => ContentState::Frame(url.clone()),
            Self::HtmlFragment(_) => ContentState::Pending,
            Self::Text(text) => ContentState::Text(text.clone()),
        }
    }
}

fn is_html_path(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    lower.ends_with(".html") || lower.ends_with(".htm")
}

impl From<String> for ContentLocator {
    fn from(raw: String) -> Self {
        Self::classify(&raw)
    }
}

impl From<ContentLocator> for String {
    fn from(locator: ContentLocator) -> Self {
        match locator {
            ContentLocator::Url(raw)
            | ContentLocator::HtmlFragment(raw)
            | ContentLocator::Text(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Script block carried by an HTML fragment as inert `type="text/plain"` markup.
pub enum EmbeddedScript {
    /// Script source written inline.
    Inline(String),
    /// Script fetched from `src` before execution.
    External(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Rendered state of a window body.
pub enum ContentState {
    /// HTML fragment fetch in flight.
    Pending,
    /// Embedded frame pointing at a URL.
    Frame(String),
    /// Injected markup plus the scripts to run after injection, in document order.
    Markup {
        html: String,
        scripts: Vec<EmbeddedScript>,
    },
    /// Literal text.
    Text(String),
    /// Fetch failed; the body shows [`CONTENT_LOAD_FAILED`].
    Failed,
}

impl ContentState {
    /// State for a completed fragment fetch.
    pub fn from_fetch(result: Result<String, String>) -> Self {
        match result {
            Ok(html) => {
                let (html, scripts) = split_embedded_scripts(&html);
                Self::Markup { html, scripts }
            }
            Err(_) => Self::Failed,
        }
    }
}

/// Removes `<script type="text/plain">` blocks from `html` and returns the remaining markup with
/// the extracted scripts in document order. Other script tags are left in place untouched.
pub fn split_embedded_scripts(html: &str) -> (String, Vec<EmbeddedScript>) {
    let lower = html.to_ascii_lowercase();
    let mut markup = String::with_capacity(html.len());
    let mut scripts = Vec::new();
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find("<script") {
        let start = cursor + found;
        let Some(tag_end) = lower[start..].find('>').map(|i| start + i) else {
            break;
        };
        let close = lower[tag_end..].find("</script>").map(|i| tag_end + i);
        let attrs = &html[start + "<script".len()..tag_end];
        let inert = attribute_value(attrs, "type")
            .map(|t| t.trim().eq_ignore_ascii_case("text/plain"))
            .unwrap_or(false);

        let block_end = close.map(|c| c + "</script>".len()).unwrap_or(html.len());
        markup.push_str(&html[cursor..start]);
        if inert {
            match attribute_value(attrs, "src").filter(|src| !src.is_empty()) {
                Some(src) => scripts.push(EmbeddedScript::External(src)),
                None => {
                    let body = close.map(|c| &html[tag_end + 1..c]).unwrap_or("");
                    if !body.trim().is_empty() {
                        scripts.push(EmbeddedScript::Inline(body.to_string()));
                    }
                }
            }
        } else {
            markup.push_str(&html[start..block_end]);
        }
        cursor = block_end;
    }
    markup.push_str(&html[cursor..]);
    (markup, scripts)
}

fn attribute_value(attrs: &str, name: &str) -> Option<String> {
    let lower = attrs.to_ascii_lowercase();
    let mut search = 0;
    while let Some(found) = lower[search..].find(name) {
        let at = search + found;
        search = at + name.len();
        let preceded_by_space = at == 0
            || lower[..at]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_whitespace());
        let rest = attrs[at + name.len()..].trim_start();
        if !preceded_by_space || !rest.starts_with('=') {
            continue;
        }
        let value = rest[1..].trim_start();
        let quote = value.chars().next()?;
        return Some(if quote == '"' || quote == '\'' {
            value[1..].split(quote).next().unwrap_or("").to_string()
        } else {
            value
                .split(|c: char| c.is_ascii_whitespace() || c == '/')
                .next()
                .unwrap_or("")
                .to_string()
        });
    }
    None
}

/// Builds an open request from the `data-*` attributes of a clicked element inside a window
/// body: `data-title`, then `data-content` or `data-url`, then `data-icon`.
///
/// Returns `None` unless both a title and a content string are present.
pub fn open_request_from_attributes(
    title: Option<&str>,
    content: Option<&str>,
    url: Option<&str>,
    icon: Option<&str>,
) -> Option<OpenWindowRequest> {
    fn present(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    let title = present(title)?;
    let content = present(content).or_else(|| present(url))?;
    let request = OpenWindowRequest::new(title, content);
    Some(match present(icon) {
        Some(icon) => request.with_icon(icon),
        None => request,
    })
}
