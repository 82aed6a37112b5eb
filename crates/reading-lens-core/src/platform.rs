//! Platform abstraction traits for the effect engines.
//!
//! These traits define the interface between the effect logic and the host
//! that actually hit-tests, mutates and paints (browser DOM, an editor's
//! decoration API, or a test double). The engines in this crate never touch a
//! host directly.

use std::time::Duration;

use crate::color::Fill;
use crate::types::{Caret, ElementInfo, Point, TextRange, Viewport};

/// Error type for platform operations.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformError(pub String);

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlatformError {}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Host operations the magnifier needs.
///
/// `Node` identifies a text node, `Marker` the wrapper element created by
/// [`TextSurface::wrap`].
pub trait TextSurface {
    type Node;
    type Marker;

    /// Resolve viewport coordinates to a text node and offset.
    ///
    /// Returns `None` when the point is not over text.
    fn caret_from_point(&self, point: Point) -> Option<Caret<Self::Node>>;

    /// Describe the element owning `node`, or `None` if it has no parent element.
    fn owner_info(&self, node: &Self::Node) -> Option<ElementInfo>;

    /// Current text content of `node`.
    fn text_of(&self, node: &Self::Node) -> Option<String>;

    /// Split `node` around `range` and wrap the matched part in a marker.
    ///
    /// Must replace the node in a single mutation and start the enlarge
    /// transition after the wrapper is laid out.
    fn wrap(&mut self, node: &Self::Node, range: TextRange) -> Result<Self::Marker, PlatformError>;

    /// Replace the marker with a plain text node holding its current text.
    fn unwrap(&mut self, marker: Self::Marker) -> Result<(), PlatformError>;

    /// Update the magnification factor used by the enlarge transition.
    fn set_scale(&mut self, scale: f64);
}

/// Style of the spotlight overlay, independent of its position.
#[derive(Clone, Debug, PartialEq)]
pub struct SpotStyle {
    pub width: f64,
    pub height: f64,
    pub dim_opacity: f64,
    pub fill: Fill,
    pub soft_edge: bool,
}

/// Top-left corner of the overlay in viewport pixels.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct SpotPosition {
    pub left: f64,
    pub top: f64,
}

/// Host operations the spotlight needs.
pub trait SpotlightSurface {
    fn viewport(&self) -> Viewport;

    /// Create the overlay with `style`. Only called while absent.
    fn mount(&mut self, style: &SpotStyle) -> Result<(), PlatformError>;

    /// Remove the overlay. Only called while present.
    fn unmount(&mut self);

    /// Apply a new style to the existing overlay in place.
    fn restyle(&mut self, style: &SpotStyle);

    /// Move the existing overlay. `hue` is set for rainbow fills.
    fn place(&mut self, position: SpotPosition, hue: Option<u16>);

    fn set_cursor_hidden(&mut self, hidden: bool);

    /// Arm (or rearm) the idle timer; the host reports expiry back to the
    /// engine through `Spotlight::cursor_idle`.
    fn arm_cursor_timer(&mut self, delay: Duration);

    fn cancel_cursor_timer(&mut self);
}

/// Contiguous run of editor lines, inclusive on both ends.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub first: usize,
    pub last: usize,
}

impl LineSpan {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.first && line <= self.last
    }
}

/// Editor host operations the line spotlight needs.
pub trait DecorationHost {
    /// (Re)create the lit and dim decoration styles.
    fn create_styles(&mut self, lit_css: &str, dim_css: &str);

    /// Dispose of the decoration styles.
    fn dispose_styles(&mut self);

    /// Decorate the active editor.
    fn set_lines(&mut self, lit: LineSpan, dim: &[LineSpan]);

    /// Remove all decorations from the active editor.
    fn clear(&mut self);

    /// Show a short status message to the user.
    fn notify(&mut self, message: &str);
}
