//! Browser implementation of the magnifier's text surface.
//!
//! Wraps the matched run of a text node in a `<span>` and merges the pieces
//! back into one text node on unwrap. Only nodes created by the split are
//! touched; neighbouring page text nodes keep their identity.

use reading_lens_core::magnifier::{MAGNIFIED_CLASS, WORD_CLASS};
use reading_lens_core::{Caret, ElementInfo, PlatformError, Point, TextRange, TextSurface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, Node, Text};

use crate::caret::caret_at;
use crate::style::SCALE_PROPERTY;

/// Containers whose descendants are not page prose.
const EMBEDDED_SELECTOR: &str = "svg, math, iframe, object, embed";

pub(crate) fn js_err(e: JsValue) -> PlatformError {
    PlatformError(format!("{:?}", e))
}

/// Text nodes created around the active wrapper.
struct Split {
    marker: HtmlElement,
    before: Option<Text>,
    after: Option<Text>,
}

/// DOM-backed text surface for one document.
pub struct BrowserTextSurface {
    document: Document,
    split: Option<Split>,
}

impl BrowserTextSurface {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            split: None,
        }
    }

    /// Surface for the current window's document.
    pub fn current() -> Option<Self> {
        Some(Self::new(web_sys::window()?.document()?))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl TextSurface for BrowserTextSurface {
    type Node = Text;
    type Marker = HtmlElement;

    fn caret_from_point(&self, point: Point) -> Option<Caret<Text>> {
        let (node, offset) = caret_at(&self.document, point.x, point.y)?;
        let text = node.dyn_into::<Text>().ok()?;
        Some(Caret::new(text, offset as usize))
    }

    fn owner_info(&self, node: &Text) -> Option<ElementInfo> {
        let parent = node.parent_element()?;
        let content_editable = parent
            .dyn_ref::<HtmlElement>()
            .is_some_and(|el| el.is_content_editable());
        let inside_highlight = parent
            .closest(&format!(".{WORD_CLASS}"))
            .ok()
            .flatten()
            .is_some();
        let inside_embedded = parent
            .closest(EMBEDDED_SELECTOR)
            .ok()
            .flatten()
            .is_some();

        Some(
            ElementInfo::new(&parent.tag_name())
                .content_editable(content_editable)
                .inside_highlight(inside_highlight)
                .inside_embedded(inside_embedded),
        )
    }

    fn text_of(&self, node: &Text) -> Option<String> {
        Some(node.data())
    }

    fn wrap(&mut self, node: &Text, range: TextRange) -> Result<HtmlElement, PlatformError> {
        let len = node.length() as usize;
        if range.end > len || range.is_empty() {
            return Err(PlatformError(format!(
                "range {}..{} does not fit a text node of length {}",
                range.start, range.end, len
            )));
        }
        let slice = |start: usize, end: usize| {
            node.substring_data(start as u32, (end - start) as u32)
                .map_err(js_err)
        };

        let fragment = self.document.create_document_fragment();
        let before = if range.start > 0 {
            let before = self.document.create_text_node(&slice(0, range.start)?);
            fragment.append_child(&before).map_err(js_err)?;
            Some(before)
        } else {
            None
        };

        let wrapper: HtmlElement = self
            .document
            .create_element("span")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| PlatformError::from("created span is not an HTMLElement"))?;
        wrapper.set_class_name(WORD_CLASS);
        wrapper.set_text_content(Some(&slice(range.start, range.end)?));
        fragment.append_child(&wrapper).map_err(js_err)?;

        let after = if range.end < len {
            let after = self.document.create_text_node(&slice(range.end, len)?);
            fragment.append_child(&after).map_err(js_err)?;
            Some(after)
        } else {
            None
        };

        node.replace_with_with_node_1(&fragment).map_err(js_err)?;
        self.split = Some(Split {
            marker: wrapper.clone(),
            before,
            after,
        });

        // Read layout so the transition starts from the unscaled box.
        let _ = wrapper.offset_height();
        wrapper
            .class_list()
            .add_1(MAGNIFIED_CLASS)
            .map_err(js_err)?;

        Ok(wrapper)
    }

    fn unwrap(&mut self, marker: HtmlElement) -> Result<(), PlatformError> {
        let marker_node: &Node = marker.as_ref();
        let split = self
            .split
            .take()
            .filter(|split| split.marker.is_same_node(Some(marker_node)));
        // Page scripts may have removed the wrapper already.
        let Some(parent) = marker.parent_node() else {
            return Ok(());
        };
        let text = marker.text_content().unwrap_or_default();

        // Merge only with our own pieces, and only while they still sit
        // directly next to the wrapper.
        let (before, after) = match split {
            Some(Split { before, after, .. }) => (
                before.filter(|b| b.is_same_node(marker.previous_sibling().as_ref())),
                after.filter(|a| a.is_same_node(marker.next_sibling().as_ref())),
            ),
            None => (None, None),
        };

        match (before, after) {
            (Some(before), after) => {
                before.append_data(&text).map_err(js_err)?;
                marker.remove();
                if let Some(after) = after {
                    before.append_data(&after.data()).map_err(js_err)?;
                    after.remove();
                }
            }
            (None, Some(after)) => {
                after.insert_data(0, &text).map_err(js_err)?;
                marker.remove();
            }
            (None, None) => {
                let replacement = self.document.create_text_node(&text);
                parent
                    .replace_child(&replacement, &marker)
                    .map_err(js_err)?;
            }
        }
        Ok(())
    }

    fn set_scale(&mut self, scale: f64) {
        let Some(root) = self
            .document
            .document_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        if let Err(e) = root
            .style()
            .set_property(SCALE_PROPERTY, &scale.to_string())
        {
            tracing::warn!(target: "reading_lens::magnifier", "failed to set scale: {:?}", e);
        }
    }
}
