//! Core geometry and text types shared by the effect engines.
//!
//! These types are host-agnostic: coordinates are CSS pixels in viewport
//! space, text offsets are UTF-16 code units (the unit DOM offsets use).

/// A point in viewport coordinates.
#[derive(Clone, Debug, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the visible viewport.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Horizontal position as a fraction of the viewport width, clamped to `[0, 1]`.
    ///
    /// A zero-width viewport reports 0.
    pub fn x_fraction(&self, x: f64) -> f64 {
        if self.width <= 0.0 {
            return 0.0;
        }
        (x / self.width).clamp(0.0, 1.0)
    }
}

/// Half-open range of UTF-16 code units inside a single text node.
///
/// Invariant: `start <= end`. Ranges produced by the scanners in
/// [`crate::text`] are never empty.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Create a range, swapping the bounds if given in reverse.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// Result of a hit test: a text node and the caret offset inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct Caret<N> {
    pub node: N,
    pub offset: usize,
}

impl<N> Caret<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Facts about the element that owns a hit text node.
///
/// Hosts fill this in from whatever they can observe; the exclusion rules in
/// [`crate::exclusion`] only look at these fields.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ElementInfo {
    /// Lowercase tag name of the owning element.
    pub tag: smol_str::SmolStr,
    /// Element (or an ancestor) is content-editable.
    pub content_editable: bool,
    /// Element sits inside an embedding container (svg, iframe, object, ...).
    pub inside_embedded: bool,
    /// Element is, or descends from, a highlight wrapper.
    pub inside_highlight: bool,
}

impl ElementInfo {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: smol_str::SmolStr::new(tag.to_ascii_lowercase()),
            ..Default::default()
        }
    }

    pub fn content_editable(mut self, value: bool) -> Self {
        self.content_editable = value;
        self
    }

    pub fn inside_embedded(mut self, value: bool) -> Self {
        self.inside_embedded = value;
        self
    }

    pub fn inside_highlight(mut self, value: bool) -> Self {
        self.inside_highlight = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_range_orders_bounds() {
        let range = TextRange::new(7, 3);
        assert_eq!(range, TextRange { start: 3, end: 7 });
        assert_eq!(range.len(), 4);
        assert!(range.contains(3));
        assert!(!range.contains(7));
    }

    #[test]
    fn test_x_fraction_clamps() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.x_fraction(-20.0), 0.0);
        assert_eq!(viewport.x_fraction(400.0), 0.5);
        assert_eq!(viewport.x_fraction(900.0), 1.0);
        assert_eq!(Viewport::new(0.0, 600.0).x_fraction(10.0), 0.0);
    }

    #[test]
    fn test_element_info_lowercases_tag() {
        assert_eq!(ElementInfo::new("TEXTAREA").tag, "textarea");
    }
}
