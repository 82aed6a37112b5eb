//! Spotlight attachment: wires document and window events to the core engine.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use reading_lens_core::{ConfigSchema, FrameGate, Point, RawConfig, Spotlight, SpotlightConfig};
use wasm_bindgen::JsCast;
use web_sys::{Document, MouseEvent};

use crate::frame::AnimationFrame;
use crate::overlay::DomSpotlight;
use crate::storage::{self, ChangeSubscription};
use crate::style::{SPOTLIGHT_STYLE_ID, inject_stylesheet, remove_stylesheet, spotlight_css};

struct SpotlightInner {
    engine: Spotlight,
    surface: DomSpotlight,
    gate: FrameGate<AnimationFrame>,
}

impl SpotlightInner {
    fn pointer_moved(this: &Rc<RefCell<Self>>, point: Point) {
        let weak = Rc::downgrade(this);
        let Ok(mut inner) = this.try_borrow_mut() else {
            return;
        };
        let inner = &mut *inner;
        inner.engine.pointer_moved(&mut inner.surface, point);
        inner
            .gate
            .request(|| AnimationFrame::request(move || Self::frame(&weak)));
    }

    fn frame(weak: &Weak<RefCell<Self>>) {
        Self::with(weak, |inner| {
            inner.gate.fire();
            inner.engine.frame(&mut inner.surface);
        });
    }

    fn cursor_idle(weak: &Weak<RefCell<Self>>) {
        Self::with(weak, |inner| inner.engine.cursor_idle(&mut inner.surface));
    }

    fn with(weak: &Weak<RefCell<Self>>, f: impl FnOnce(&mut Self)) {
        let Some(this) = weak.upgrade() else {
            return;
        };
        if let Ok(mut inner) = this.try_borrow_mut() {
            f(&mut *inner);
        }
    }

    fn pointer_left(&mut self) {
        self.gate.cancel();
        self.engine.pointer_left(&mut self.surface);
    }

    fn visibility_changed(&mut self, hidden: bool) {
        if hidden {
            self.gate.cancel();
        }
        self.engine.visibility_changed(&mut self.surface, hidden);
    }

    fn config_changed(&mut self, changes: &RawConfig) {
        let next = self.engine.config().merge(changes);
        if &next != self.engine.config() {
            self.engine.reconfigure(&mut self.surface, next);
        }
    }

    fn teardown(&mut self) {
        self.gate.cancel();
        self.engine.teardown(&mut self.surface);
    }
}

/// A live spotlight attachment. Dropping it removes the overlay, restores
/// the cursor and releases every listener.
pub struct SpotlightHandle {
    inner: Rc<RefCell<SpotlightInner>>,
    document: Document,
    listeners: Vec<EventListener>,
    subscription: Option<ChangeSubscription>,
}

impl SpotlightHandle {
    pub fn is_present(&self) -> bool {
        self.inner
            .try_borrow()
            .is_ok_and(|inner| inner.engine.is_present())
    }

    pub fn config(&self) -> Option<SpotlightConfig> {
        Some(self.inner.try_borrow().ok()?.engine.config().clone())
    }

    /// Apply a partial configuration as if it came from the store.
    pub fn apply_changes(&self, changes: &RawConfig) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.config_changed(changes);
        }
    }

    /// Detach now. Same as dropping the handle.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for SpotlightHandle {
    fn drop(&mut self) {
        self.listeners.clear();
        drop(self.subscription.take());
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.teardown();
        }
        remove_stylesheet(&self.document, SPOTLIGHT_STYLE_ID);
        tracing::debug!(target: "reading_lens::spotlight", "detached");
    }
}

/// Attach the spotlight to `document` with an explicit configuration and no
/// store subscription.
pub fn attach_spotlight_with(document: Document, config: SpotlightConfig) -> SpotlightHandle {
    if let Err(e) = inject_stylesheet(&document, SPOTLIGHT_STYLE_ID, &spotlight_css()) {
        tracing::warn!(target: "reading_lens::spotlight", "stylesheet injection failed: {:?}", e);
    }

    let inner = Rc::new_cyclic(|weak: &Weak<RefCell<SpotlightInner>>| {
        let weak = weak.clone();
        let on_idle = Rc::new(move || SpotlightInner::cursor_idle(&weak));
        RefCell::new(SpotlightInner {
            engine: Spotlight::new(config),
            surface: DomSpotlight::new(document.clone(), on_idle),
            gate: FrameGate::new(),
        })
    });

    let mut listeners = Vec::with_capacity(4);

    let weak = Rc::downgrade(&inner);
    listeners.push(EventListener::new(&document, "mousemove", move |event| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            let point = Point::new(mouse.client_x() as f64, mouse.client_y() as f64);
            SpotlightInner::pointer_moved(&inner, point);
        }
    }));

    let weak = Rc::downgrade(&inner);
    listeners.push(EventListener::new(&document, "mouseleave", move |_| {
        SpotlightInner::with(&weak, SpotlightInner::pointer_left);
    }));

    let weak = Rc::downgrade(&inner);
    let doc = document.clone();
    listeners.push(EventListener::new(&document, "visibilitychange", move |_| {
        let hidden = doc.hidden();
        SpotlightInner::with(&weak, |inner| inner.visibility_changed(hidden));
    }));

    if let Some(window) = web_sys::window() {
        let weak = Rc::downgrade(&inner);
        listeners.push(EventListener::new(&window, "resize", move |_| {
            SpotlightInner::with(&weak, |inner| inner.engine.resized(&mut inner.surface));
        }));
    }

    tracing::debug!(target: "reading_lens::spotlight", "attached");
    SpotlightHandle {
        inner,
        document,
        listeners,
        subscription: None,
    }
}

/// Load the stored configuration, attach to `document` and follow store
/// changes.
pub async fn attach_spotlight(document: Document) -> SpotlightHandle {
    let config = storage::load_config_or_default::<SpotlightConfig>().await;
    let mut handle = attach_spotlight_with(document, config);

    let weak = Rc::downgrade(&handle.inner);
    match storage::subscribe(move |changes| {
        SpotlightInner::with(&weak, |inner| inner.config_changed(&changes));
    }) {
        Ok(subscription) => handle.subscription = Some(subscription),
        Err(e) => tracing::debug!(target: "reading_lens::spotlight", "not following config: {}", e),
    }

    handle
}
