use std::rc::Rc;

use leptos::{logging, request_animation_frame, spawn_local};
use platform_host::ContentService;

use crate::{
    content::EmbeddedScript, geometry::WindowRect, reducer::DesktopAction,
    runtime_context::DesktopRuntimeContext,
};

const FALLBACK_VIEWPORT: WindowRect = WindowRect {
    x: 0,
    y: 0,
    w: 1024,
    h: 768,
};

/// Yields to the browser for one frame before restoring the next window, so the previous one is
/// laid out before it is looked up again.
pub(super) fn schedule_restore_step(runtime: DesktopRuntimeContext) {
    request_animation_frame(move || {
        runtime.dispatch_action(DesktopAction::RestoreNextWindow);
    });
}

pub(super) fn run_embedded_scripts(
    content: Rc<dyn ContentService>,
    container: web_sys::Element,
    scripts: Vec<EmbeddedScript>,
) {
    if scripts.is_empty() {
        return;
    }
    spawn_local(async move {
        for script in scripts {
            let source = match script {
                EmbeddedScript::Inline(source) => source,
                EmbeddedScript::External(src) => match content.fetch_text(&src).await {
                    Ok(source) => source,
                    Err(err) => {
                        logging::warn!("embedded script `{src}` failed to load: {err}");
                        continue;
                    }
                },
            };
            if let Err(err) = append_script(&container, &source) {
                logging::warn!("embedded script failed to run: {err}");
            }
        }
    });
}

fn append_script(container: &web_sys::Element, source: &str) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        let document = container
            .owner_document()
            .ok_or_else(|| "container is detached".to_string())?;
        let script = document
            .create_element("script")
            .map_err(|e| format!("{e:?}"))?;
        script.set_text_content(Some(source));
        container
            .append_child(&script)
            .map(|_| ())
            .map_err(|e| format!("{e:?}"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (container, source);
        Ok(())
    }
}

pub(super) fn viewport_rect() -> WindowRect {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
                value.ok().and_then(|v| v.as_f64()).map(|v| v as i32)
            };
            return WindowRect {
                x: 0,
                y: 0,
                w: dimension(window.inner_width()).unwrap_or(FALLBACK_VIEWPORT.w),
                h: dimension(window.inner_height()).unwrap_or(FALLBACK_VIEWPORT.h),
            };
        }
    }

    FALLBACK_VIEWPORT
}
