//! Browser DOM layer for the reading-lens effects.
//!
//! This crate provides the DOM side of the core engines and assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `caret`: hit testing with the standard and proprietary caret APIs
//! - `dom`: text node wrapping for the magnifier
//! - `overlay`: the spotlight `<div>` and cursor hiding
//! - `frame`: requestAnimationFrame handles
//! - `storage`: `chrome.storage.sync` bindings
//! - `magnifier`, `spotlight`: attachments that own listeners and state
//!
//! # Re-exports
//!
//! This crate re-exports `reading-lens-core` for convenience, so consumers
//! only need to depend on `reading-lens-browser`.

// Re-export core crate
pub use reading_lens_core;
pub use reading_lens_core::*;

pub mod caret;
pub mod dom;
pub mod frame;
pub mod magnifier;
pub mod overlay;
pub mod spotlight;
pub mod storage;
pub mod style;

pub use dom::BrowserTextSurface;
pub use frame::AnimationFrame;
pub use magnifier::{MagnifierHandle, attach_magnifier, attach_magnifier_with};
pub use overlay::DomSpotlight;
pub use spotlight::{SpotlightHandle, attach_spotlight, attach_spotlight_with};
pub use storage::{ChangeSubscription, StorageError};
