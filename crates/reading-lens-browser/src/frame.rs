//! requestAnimationFrame handle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

type Callback = Box<dyn FnOnce()>;

/// A scheduled animation frame. Dropping it before it runs cancels it.
///
/// JS owns the function handed to `requestAnimationFrame`, and a cancelled
/// one is never called, so its Rust side is never freed. The real callback
/// therefore lives in a shared slot that dropping the handle empties; a
/// cancelled frame only leaves that empty slot behind.
pub struct AnimationFrame {
    id: i32,
    callback: Rc<RefCell<Option<Callback>>>,
}

impl AnimationFrame {
    /// Schedule `callback` for the next frame. `None` if there is no window or
    /// the browser refused.
    pub fn request(callback: impl FnOnce() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let slot: Rc<RefCell<Option<Callback>>> = Rc::new(RefCell::new(Some(Box::new(callback))));
        let pending = Rc::clone(&slot);
        let closure = Closure::once_into_js(move || {
            // Released before running: the callback may drop this handle.
            let callback = pending.try_borrow_mut().ok().and_then(|mut slot| slot.take());
            if let Some(callback) = callback {
                callback();
            }
        });
        match window.request_animation_frame(closure.unchecked_ref()) {
            Ok(id) => Some(Self { id, callback: slot }),
            Err(e) => {
                tracing::warn!(target: "reading_lens::frame", "requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    /// Whether the callback has neither run nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.callback.try_borrow().is_ok_and(|slot| slot.is_some())
    }
}

impl fmt::Debug for AnimationFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationFrame")
            .field("id", &self.id)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl Drop for AnimationFrame {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.callback.try_borrow_mut() {
            slot.take();
        }
        if let Some(window) = web_sys::window() {
            // Cancelling a frame that already ran is a no-op.
            let _ = window.cancel_animation_frame(self.id);
        }
    }
}
