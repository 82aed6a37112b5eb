//! reading-lens-core: Platform-agnostic logic for the reading effects.
//!
//! This crate provides:
//! - `Magnifier` - enlarges the word or cluster under the pointer
//! - `Spotlight` - dims the page around a lit band that follows the pointer
//! - `LineSpotlight` - the same idea over editor lines
//! - Typed configuration parsed field by field from stored JSON
//!
//! All host interaction goes through the `TextSurface`, `SpotlightSurface`
//! and `DecorationHost` traits.

pub mod color;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod frame;
pub mod lines;
pub mod magnifier;
pub mod platform;
pub mod spotlight;
pub mod text;
pub mod types;

pub use color::{ColorKey, Fill, HexColor, dim_css, rainbow_hue};
pub use config::{ConfigSchema, Limits, RawConfig};
pub use error::FieldError;
pub use exclusion::{classify_exclusion, is_excluded};
pub use frame::FrameGate;
pub use lines::{LineSpotlight, LineSpotlightConfig, dim_spans, line_band, status_message};
pub use magnifier::{HoverOutcome, IdleReason, Magnifier, MagnifierConfig};
pub use platform::{
    DecorationHost, LineSpan, PlatformError, SpotPosition, SpotStyle, SpotlightSurface,
    TextSurface,
};
pub use smol_str::SmolStr;
pub use spotlight::{CursorVisibility, Spotlight, SpotlightConfig, SpotlightMode};
pub use text::{RangeMode, RangeModeKind, find_range, is_word_char, slice_utf16, utf16_len};
pub use types::{Caret, ElementInfo, Point, TextRange, Viewport};
