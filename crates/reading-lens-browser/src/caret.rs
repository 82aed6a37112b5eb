//! Caret hit testing.
//!
//! `caretPositionFromPoint` is the standard API; Chromium and WebKit only ship
//! the older `caretRangeFromPoint`. Neither is fully exposed by web-sys, so
//! both are bound here and probed at call time.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

// Custom bindings: the methods are optional on `Document`, so they are
// declared on a subtype and every call goes through `catch`.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = web_sys::Document)]
    type CaretDocument;

    #[wasm_bindgen(method, catch, js_name = caretPositionFromPoint)]
    fn caret_position_from_point(
        this: &CaretDocument,
        x: f64,
        y: f64,
    ) -> Result<Option<CaretPosition>, JsValue>;

    #[wasm_bindgen(method, catch, js_name = caretRangeFromPoint)]
    fn caret_range_from_point(
        this: &CaretDocument,
        x: f64,
        y: f64,
    ) -> Result<Option<web_sys::Range>, JsValue>;

    /// The CaretPosition interface: a node and an offset within it.
    pub type CaretPosition;

    #[wasm_bindgen(method, getter, structural, js_name = offsetNode)]
    pub fn offset_node(this: &CaretPosition) -> Option<web_sys::Node>;

    #[wasm_bindgen(method, getter, structural)]
    pub fn offset(this: &CaretPosition) -> u32;
}

fn has_method(document: &web_sys::Document, name: &str) -> bool {
    js_sys::Reflect::get(document, &JsValue::from_str(name))
        .map(|value| value.is_function())
        .unwrap_or(false)
}

/// Resolve viewport coordinates to a DOM node and offset.
///
/// Tries the standard API first. If it is missing or throws, the proprietary
/// one is tried. Returns `None` if neither yields a position.
pub fn caret_at(document: &web_sys::Document, x: f64, y: f64) -> Option<(web_sys::Node, u32)> {
    let doc: &CaretDocument = document.unchecked_ref();

    if has_method(document, "caretPositionFromPoint") {
        match doc.caret_position_from_point(x, y) {
            Ok(Some(position)) => {
                if let Some(node) = position.offset_node() {
                    return Some((node, position.offset()));
                }
            }
            Ok(None) => return None,
            Err(e) => {
                tracing::trace!(target: "reading_lens::magnifier", "caretPositionFromPoint threw: {:?}", e);
            }
        }
    }

    if has_method(document, "caretRangeFromPoint") {
        match doc.caret_range_from_point(x, y) {
            Ok(Some(range)) => {
                let node = range.start_container().ok()?;
                let offset = range.start_offset().ok()?;
                return Some((node, offset));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::trace!(target: "reading_lens::magnifier", "caretRangeFromPoint threw: {:?}", e);
            }
        }
    }

    None
}
