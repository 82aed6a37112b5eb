//! Magnifier attachment: wires document events to the core engine.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use reading_lens_core::{
    ConfigSchema, FrameGate, Magnifier, MagnifierConfig, Point, RawConfig, TextSurface,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, MouseEvent};

use crate::dom::BrowserTextSurface;
use crate::frame::AnimationFrame;
use crate::storage::{self, ChangeSubscription};
use crate::style::{MAGNIFIER_STYLE_ID, inject_stylesheet, magnifier_css, remove_stylesheet};

struct MagnifierInner {
    engine: Magnifier<HtmlElement>,
    surface: BrowserTextSurface,
    gate: FrameGate<AnimationFrame>,
    pointer: Option<Point>,
}

impl MagnifierInner {
    fn pointer_moved(this: &Rc<RefCell<Self>>, point: Point) {
        let weak = Rc::downgrade(this);
        let Ok(mut inner) = this.try_borrow_mut() else {
            return;
        };
        inner.pointer = Some(point);
        inner
            .gate
            .request(|| AnimationFrame::request(move || Self::frame(&weak)));
    }

    fn frame(weak: &Weak<RefCell<Self>>) {
        let Some(this) = weak.upgrade() else {
            return;
        };
        let Ok(mut inner) = this.try_borrow_mut() else {
            return;
        };
        let inner = &mut *inner;
        inner.gate.fire();
        if let Some(point) = inner.pointer {
            let outcome = inner.engine.hover(&mut inner.surface, point);
            tracing::trace!(target: "reading_lens::magnifier", ?outcome, "frame");
        }
    }

    fn go_idle(&mut self) {
        self.gate.cancel();
        self.engine.clear(&mut self.surface);
    }

    fn config_changed(&mut self, changes: &RawConfig) {
        let next = self.engine.config().merge(changes);
        if &next != self.engine.config() {
            self.engine.reconfigure(&mut self.surface, next);
        }
    }
}

/// A live magnifier attachment. Dropping it detaches everything and
/// restores any highlighted text.
pub struct MagnifierHandle {
    inner: Rc<RefCell<MagnifierInner>>,
    document: Document,
    // Released before `inner` is torn down.
    listeners: Vec<EventListener>,
    subscription: Option<ChangeSubscription>,
}

impl MagnifierHandle {
    /// Currently highlighted text, if any.
    pub fn highlighted_text(&self) -> Option<String> {
        self.inner
            .try_borrow()
            .ok()?
            .engine
            .highlighted_text()
            .map(str::to_owned)
    }

    pub fn config(&self) -> Option<MagnifierConfig> {
        Some(self.inner.try_borrow().ok()?.engine.config().clone())
    }

    /// Detach now. Same as dropping the handle.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for MagnifierHandle {
    fn drop(&mut self) {
        self.listeners.clear();
        drop(self.subscription.take());
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.go_idle();
        }
        remove_stylesheet(&self.document, MAGNIFIER_STYLE_ID);
        tracing::debug!(target: "reading_lens::magnifier", "detached");
    }
}

/// Attach the magnifier to `document` with an explicit configuration and no
/// store subscription.
pub fn attach_magnifier_with(document: Document, config: MagnifierConfig) -> MagnifierHandle {
    if let Err(e) = inject_stylesheet(&document, MAGNIFIER_STYLE_ID, &magnifier_css()) {
        tracing::warn!(target: "reading_lens::magnifier", "stylesheet injection failed: {:?}", e);
    }

    let mut surface = BrowserTextSurface::new(document.clone());
    surface.set_scale(config.scale);

    let inner = Rc::new(RefCell::new(MagnifierInner {
        engine: Magnifier::new(config),
        surface,
        gate: FrameGate::new(),
        pointer: None,
    }));

    let mut listeners = Vec::with_capacity(3);

    let weak = Rc::downgrade(&inner);
    // gloo's default options register passive listeners.
    listeners.push(EventListener::new(&document, "mousemove", move |event| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            let point = Point::new(mouse.client_x() as f64, mouse.client_y() as f64);
            MagnifierInner::pointer_moved(&inner, point);
        }
    }));

    let weak = Rc::downgrade(&inner);
    listeners.push(EventListener::new(&document, "mouseleave", move |_| {
        if let Some(inner) = weak.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.go_idle();
            }
        }
    }));

    let weak = Rc::downgrade(&inner);
    let doc = document.clone();
    listeners.push(EventListener::new(&document, "visibilitychange", move |_| {
        if !doc.hidden() {
            return;
        }
        if let Some(inner) = weak.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.go_idle();
            }
        }
    }));

    tracing::debug!(target: "reading_lens::magnifier", "attached");
    MagnifierHandle {
        inner,
        document,
        listeners,
        subscription: None,
    }
}

/// Load the stored configuration, attach to `document` and follow store
/// changes.
pub async fn attach_magnifier(document: Document) -> MagnifierHandle {
    let config = storage::load_config_or_default::<MagnifierConfig>().await;
    let mut handle = attach_magnifier_with(document, config);

    let weak = Rc::downgrade(&handle.inner);
    match storage::subscribe(move |changes| {
        if let Some(inner) = weak.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.config_changed(&changes);
            }
        }
    }) {
        Ok(subscription) => handle.subscription = Some(subscription),
        Err(e) => tracing::debug!(target: "reading_lens::magnifier", "not following config: {}", e),
    }

    handle
}
