//! Minimal `fetch` wrapper shared by the config and content services.

use platform_host::ConfigError;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
}

impl Method {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Turns a status/body pair into `Ok(body)` for 2xx and [`ConfigError::Status`] otherwise,
/// surfacing the server's `{"error": ...}` message when present.
pub(crate) fn check_status(status: u16, body: String) -> Result<String, ConfigError> {
    if (200..300).contains(&status) {
        return Ok(body);
    }
    let body = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    Err(ConfigError::Status { status, body })
}

/// Issues a request and returns the response body of a 2xx answer.
pub(crate) async fn request_text(
    method: Method,
    url: &str,
    json_body: Option<String>,
) -> Result<String, ConfigError> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::{JsCast, JsValue};
        use wasm_bindgen_futures::JsFuture;

        let network = |e: JsValue| ConfigError::Network(format!("{e:?}"));

        let init = web_sys::RequestInit::new();
        init.set_method(method.as_str());
        if let Some(body) = json_body.as_deref() {
            init.set_body(&JsValue::from_str(body));
        }
        let request = web_sys::Request::new_with_str_and_init(url, &init).map_err(network)?;
        if json_body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(network)?;
        }

        let window = web_sys::window().ok_or(ConfigError::Unavailable)?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(network)?
            .dyn_into()
            .map_err(network)?;
        let text = JsFuture::from(response.text().map_err(network)?)
            .await
            .map_err(network)?
            .as_string()
            .unwrap_or_default();
        check_status(response.status(), text)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (method, url, json_body);
        Err(ConfigError::Unavailable)
    }
}

/// Issues a `GET` and decodes the JSON response.
pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, ConfigError> {
    let body = request_text(Method::Get, url, None).await?;
    serde_json::from_str(&body).map_err(|e| ConfigError::Decode(e.to_string()))
}

/// Issues a `POST` with a JSON body, discarding the response body.
pub(crate) async fn post_json<T: serde::Serialize + ?Sized>(
    url: &str,
    value: &T,
) -> Result<(), ConfigError> {
    let body = serde_json::to_string(value).map_err(|e| ConfigError::Decode(e.to_string()))?;
    request_text(Method::Post, url, Some(body)).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_status_surfaces_server_error_message() {
        assert_eq!(check_status(200, "ok".to_string()), Ok("ok".to_string()));
        assert_eq!(
            check_status(400, r#"{"error": "Invalid background image URL"}"#.to_string()),
            Err(ConfigError::Status {
                status: 400,
                body: "Invalid background image URL".to_string(),
            })
        );
        assert_eq!(
            check_status(502, "Bad Gateway".to_string()),
            Err(ConfigError::Status {
                status: 502,
                body: "Bad Gateway".to_string(),
            })
        );
    }
}
