//! Browser implementation of the spotlight surface: a fixed `<div>` whose
//! enormous box-shadow dims everything around it.

use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use reading_lens_core::{Fill, PlatformError, SpotPosition, SpotStyle, SpotlightSurface, Viewport};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::dom::js_err;
use crate::style::{CURSOR_HIDDEN_CLASS, RAINBOW_CLASS, SOFT_EDGE_CLASS, SPOTLIGHT_ID};

/// DOM-backed spotlight surface for one document.
pub struct DomSpotlight {
    document: Document,
    element: Option<HtmlElement>,
    cursor_timer: Option<Timeout>,
    on_idle: Rc<dyn Fn()>,
}

impl DomSpotlight {
    /// `on_idle` runs when the cursor timer expires.
    pub fn new(document: Document, on_idle: Rc<dyn Fn()>) -> Self {
        Self {
            document,
            element: None,
            cursor_timer: None,
            on_idle,
        }
    }

    pub fn element(&self) -> Option<&HtmlElement> {
        self.element.as_ref()
    }

    fn apply_style(element: &HtmlElement, style: &SpotStyle) -> Result<(), PlatformError> {
        let css = element.style();
        css.set_property("width", &format!("{}px", style.width))
            .map_err(js_err)?;
        css.set_property("height", &format!("{}px", style.height))
            .map_err(js_err)?;
        css.set_property("--dim", &style.dim_opacity.to_string())
            .map_err(js_err)?;

        let classes = element.class_list();
        classes
            .toggle_with_force(SOFT_EDGE_CLASS, style.soft_edge)
            .map_err(js_err)?;
        match &style.fill {
            Fill::Solid(color) => {
                classes.remove_1(RAINBOW_CLASS).map_err(js_err)?;
                css.set_property("--color", color).map_err(js_err)?;
            }
            Fill::Rainbow { hue } => {
                classes.add_1(RAINBOW_CLASS).map_err(js_err)?;
                css.set_property("--hue", &hue.to_string())
                    .map_err(js_err)?;
            }
        }
        Ok(())
    }
}

impl SpotlightSurface for DomSpotlight {
    fn viewport(&self) -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::new(0.0, 0.0);
        };
        let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        Viewport::new(
            dimension(window.inner_width()),
            dimension(window.inner_height()),
        )
    }

    fn mount(&mut self, style: &SpotStyle) -> Result<(), PlatformError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| PlatformError::from("document has no body"))?;
        let element: HtmlElement = self
            .document
            .create_element("div")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| PlatformError::from("created div is not an HTMLElement"))?;
        element.set_id(SPOTLIGHT_ID);
        element
            .set_attribute("aria-hidden", "true")
            .map_err(js_err)?;
        Self::apply_style(&element, style)?;
        body.append_child(&element).map_err(js_err)?;
        self.element = Some(element);
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(element) = self.element.take() {
            element.remove();
        }
    }

    fn restyle(&mut self, style: &SpotStyle) {
        if let Some(element) = &self.element {
            if let Err(e) = Self::apply_style(element, style) {
                tracing::warn!(target: "reading_lens::spotlight", "restyle failed: {}", e);
            }
        }
    }

    fn place(&mut self, position: SpotPosition, hue: Option<u16>) {
        let Some(element) = &self.element else {
            return;
        };
        let css = element.style();
        let mut result = css
            .set_property("left", &format!("{}px", position.left))
            .and_then(|_| css.set_property("top", &format!("{}px", position.top)));
        if let Some(hue) = hue {
            result = result.and_then(|_| css.set_property("--hue", &hue.to_string()));
        }
        if let Err(e) = result {
            tracing::warn!(target: "reading_lens::spotlight", "place failed: {:?}", e);
        }
    }

    fn set_cursor_hidden(&mut self, hidden: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        if let Err(e) = body
            .class_list()
            .toggle_with_force(CURSOR_HIDDEN_CLASS, hidden)
        {
            tracing::warn!(target: "reading_lens::spotlight", "cursor class toggle failed: {:?}", e);
        }
    }

    fn arm_cursor_timer(&mut self, delay: Duration) {
        let on_idle = self.on_idle.clone();
        let millis = delay.as_millis().min(u32::MAX as u128) as u32;
        // Replacing the previous timeout cancels it.
        self.cursor_timer = Some(Timeout::new(millis, move || on_idle()));
    }

    fn cancel_cursor_timer(&mut self) {
        // Dropping a pending Timeout clears it.
        self.cursor_timer = None;
    }
}
