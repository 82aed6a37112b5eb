//! WASM bindings for reading-lens.
//!
//! Content scripts call `start_magnifier` / `start_spotlight` once per page;
//! the extension background calls `toggle_spotlight`; the editor extension
//! host drives a `LineSpotlight`.

use reading_lens_browser::{
    MagnifierHandle, SpotlightHandle, attach_magnifier, attach_spotlight, storage,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod editor;

pub use editor::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    init_tracing();
}

fn init_tracing() {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;

    let (console_level, directives) = if cfg!(debug_assertions) {
        (Level::DEBUG, "debug")
    } else {
        (Level::INFO, "info")
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let reg = Registry::default()
        .with(EnvFilter::new(directives))
        .with(wasm_layer);

    // A second init (e.g. the script injected twice) keeps the first subscriber.
    let _ = set_global_default(reg);
}

fn current_document() -> Result<web_sys::Document, JsError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsError::new("no document in this context"))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

/// A running magnifier. Call `stop()` to detach it.
#[wasm_bindgen]
pub struct JsMagnifier {
    handle: Option<MagnifierHandle>,
}

#[wasm_bindgen]
impl JsMagnifier {
    /// Text currently enlarged, if any.
    #[wasm_bindgen(getter, js_name = highlightedText)]
    pub fn highlighted_text(&self) -> Option<String> {
        self.handle.as_ref()?.highlighted_text()
    }

    /// Current configuration under its stored key names.
    pub fn config(&self) -> Result<JsValue, JsError> {
        match self.handle.as_ref().and_then(MagnifierHandle::config) {
            Some(config) => to_js(&config),
            None => Ok(JsValue::NULL),
        }
    }

    /// Detach listeners and restore any highlighted text. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}

/// A running spotlight. Call `stop()` to detach it.
#[wasm_bindgen]
pub struct JsSpotlight {
    handle: Option<SpotlightHandle>,
}

#[wasm_bindgen]
impl JsSpotlight {
    /// Whether the overlay is currently in the page.
    #[wasm_bindgen(getter, js_name = isPresent)]
    pub fn is_present(&self) -> bool {
        self.handle.as_ref().is_some_and(SpotlightHandle::is_present)
    }

    /// Current configuration under its stored key names.
    pub fn config(&self) -> Result<JsValue, JsError> {
        match self.handle.as_ref().and_then(SpotlightHandle::config) {
            Some(config) => to_js(&config),
            None => Ok(JsValue::NULL),
        }
    }

    /// Remove the overlay, restore the cursor and detach. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}

/// Attach the text magnifier to the current document.
///
/// Loads the stored configuration first; defaults are used outside an
/// extension context.
#[wasm_bindgen]
pub async fn start_magnifier() -> Result<JsMagnifier, JsError> {
    let document = current_document()?;
    Ok(JsMagnifier {
        handle: Some(attach_magnifier(document).await),
    })
}

/// Attach the reading spotlight to the current document.
#[wasm_bindgen]
pub async fn start_spotlight() -> Result<JsSpotlight, JsError> {
    let document = current_document()?;
    Ok(JsSpotlight {
        handle: Some(attach_spotlight(document).await),
    })
}

/// Flip the stored spotlight `enabled` flag and return the new value.
///
/// Running content scripts pick the change up through their store
/// subscription.
#[wasm_bindgen]
pub async fn toggle_spotlight() -> Result<bool, JsError> {
    Ok(storage::toggle_enabled().await?)
}
