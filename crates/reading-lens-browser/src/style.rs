//! Injected stylesheets for the magnifier wrapper and the spotlight overlay.

use reading_lens_core::magnifier::{MAGNIFIED_CLASS, WORD_CLASS};
use wasm_bindgen::JsCast;

pub const MAGNIFIER_STYLE_ID: &str = "text-magnifier-css";
pub const SPOTLIGHT_STYLE_ID: &str = "reading-spotlight-css";

pub const SPOTLIGHT_ID: &str = "reading-spotlight";
pub const RAINBOW_CLASS: &str = "reading-spotlight-rainbow";
pub const SOFT_EDGE_CLASS: &str = "reading-spotlight-soft";
pub const CURSOR_HIDDEN_CLASS: &str = "reading-spotlight-cursor-hidden";

/// Custom property on `<html>` holding the magnification factor.
pub const SCALE_PROPERTY: &str = "--text-magnifier-scale";

/// Rules for the magnifier wrapper. The scale comes from [`SCALE_PROPERTY`].
pub fn magnifier_css() -> String {
    format!(
        ".{WORD_CLASS}{{display:inline-block;transform-origin:center bottom;\
         transition:transform .12s ease-out}}\
         .{WORD_CLASS}.{MAGNIFIED_CLASS}{{transform:scale(var({SCALE_PROPERTY},1.35));\
         position:relative;z-index:2147483646}}"
    )
}

/// Rules for the spotlight overlay and the cursor-hiding body class.
pub fn spotlight_css() -> String {
    format!(
        "#{SPOTLIGHT_ID}{{position:fixed;pointer-events:none;z-index:2147483647;\
         border-radius:4px;box-shadow:0 0 0 200vmax rgba(0,0,0,var(--dim,.25));\
         background:var(--color,rgba(255,255,0,.22));\
         transition:top .04s ease-out,left .04s ease-out;will-change:top,left}}\
         #{SPOTLIGHT_ID}.{SOFT_EDGE_CLASS}{{box-shadow:0 0 12px 6px rgba(0,0,0,var(--dim,.25)),\
         0 0 0 200vmax rgba(0,0,0,var(--dim,.25))}}\
         #{SPOTLIGHT_ID}.{RAINBOW_CLASS}{{background:hsla(var(--hue,180),100%,70%,.22)}}\
         .{CURSOR_HIDDEN_CLASS},.{CURSOR_HIDDEN_CLASS} *{{cursor:none!important}}"
    )
}

/// Insert `<style id=...>` into the head, or refresh it if already present.
pub fn inject_stylesheet(
    document: &web_sys::Document,
    id: &str,
    css: &str,
) -> Result<web_sys::HtmlStyleElement, wasm_bindgen::JsValue> {
    if let Some(existing) = document.get_element_by_id(id) {
        if let Ok(style) = existing.dyn_into::<web_sys::HtmlStyleElement>() {
            style.set_text_content(Some(css));
            return Ok(style);
        }
    }

    let style: web_sys::HtmlStyleElement = document.create_element("style")?.unchecked_into();
    style.set_id(id);
    style.set_text_content(Some(css));
    let parent: web_sys::Node = match document.head() {
        Some(head) => head.into(),
        None => document
            .document_element()
            .ok_or_else(|| wasm_bindgen::JsValue::from_str("document has no root element"))?
            .into(),
    };
    parent.append_child(&style)?;
    Ok(style)
}

pub fn remove_stylesheet(document: &web_sys::Document, id: &str) {
    if let Some(existing) = document.get_element_by_id(id) {
        existing.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnifier_css() {
        insta::assert_snapshot!(magnifier_css(), @".text-magnifier-word{display:inline-block;transform-origin:center bottom;transition:transform .12s ease-out}.text-magnifier-word.magnified{transform:scale(var(--text-magnifier-scale,1.35));position:relative;z-index:2147483646}");
    }

    #[test]
    fn test_spotlight_css_mentions_every_class() {
        let css = spotlight_css();
        for needle in [SPOTLIGHT_ID, RAINBOW_CLASS, SOFT_EDGE_CLASS, CURSOR_HIDDEN_CLASS] {
            assert!(css.contains(needle), "{needle}");
        }
        assert!(css.contains("var(--hue,180)"));
    }
}
