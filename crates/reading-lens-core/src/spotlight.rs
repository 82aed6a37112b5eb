//! Reading spotlight: a lit rectangle over a dimmed page.
//!
//! The overlay is either `Absent` or `Present`. In follow mode it is centred on
//! the pointer; in reading mode its vertical centre is pinned to a fraction of
//! the viewport height and only the horizontal centre tracks the pointer.
//! Reading mode also owns an orthogonal cursor sub-state: after an idle delay
//! the system cursor is hidden, and any move shows it again.

use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::color::{ColorKey, Fill, HexColor};
use crate::config::{
    ConfigSchema, Limits, RawConfig, apply, read_bool, read_hex_color, read_number, read_variant,
};
use crate::platform::{SpotPosition, SpotStyle, SpotlightSurface};
use crate::types::{Point, Viewport};

pub const WIDTH_LIMITS: Limits = Limits::new(200.0, 1200.0);
pub const HEIGHT_LIMITS: Limits = Limits::new(20.0, 80.0);
pub const DIM_OPACITY_LIMITS: Limits = Limits::new(0.1, 0.5);
pub const FIXED_Y_PERCENT_LIMITS: Limits = Limits::new(10.0, 90.0);
pub const CURSOR_HIDE_DELAY_LIMITS: Limits = Limits::new(200.0, 5000.0);

/// How the lit region is positioned.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotlightMode {
    /// Centred on the pointer.
    #[default]
    Follow,
    /// Vertically pinned at `fixed_y_percent` of the viewport.
    Reading,
}

impl SpotlightMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Reading => "reading",
        }
    }
}

impl FromStr for SpotlightMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow" => Ok(Self::Follow),
            "reading" => Ok(Self::Reading),
            _ => Err(()),
        }
    }
}

/// User settings for the spotlight, serialized under their stored key names.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotlightConfig {
    pub width: f64,
    pub height: f64,
    pub dim_opacity: f64,
    pub color: ColorKey,
    pub custom_color: Option<HexColor>,
    pub enabled: bool,
    pub mode: SpotlightMode,
    pub fixed_y_percent: f64,
    pub soft_edge: bool,
    pub hide_cursor: bool,
    #[serde(rename = "cursorHideDelay")]
    pub cursor_hide_delay_ms: f64,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 32.0,
            dim_opacity: 0.25,
            color: ColorKey::Yellow,
            custom_color: None,
            enabled: true,
            mode: SpotlightMode::Follow,
            fixed_y_percent: 40.0,
            soft_edge: true,
            hide_cursor: true,
            cursor_hide_delay_ms: 1000.0,
        }
    }
}

impl ConfigSchema for SpotlightConfig {
    const KEYS: &'static [&'static str] = &[
        "width",
        "height",
        "dimOpacity",
        "color",
        "customColor",
        "enabled",
        "mode",
        "fixedYPercent",
        "softEdge",
        "hideCursor",
        "cursorHideDelay",
    ];

    fn merge(&self, raw: &RawConfig) -> Self {
        let mut next = self.clone();
        apply(&mut next.width, read_number(raw, "width", WIDTH_LIMITS));
        apply(&mut next.height, read_number(raw, "height", HEIGHT_LIMITS));
        apply(
            &mut next.dim_opacity,
            read_number(raw, "dimOpacity", DIM_OPACITY_LIMITS),
        );
        apply(&mut next.color, read_variant(raw, "color"));
        apply(&mut next.custom_color, read_hex_color(raw, "customColor"));
        apply(&mut next.enabled, read_bool(raw, "enabled"));
        apply(&mut next.mode, read_variant(raw, "mode"));
        apply(
            &mut next.fixed_y_percent,
            read_number(raw, "fixedYPercent", FIXED_Y_PERCENT_LIMITS),
        );
        apply(&mut next.soft_edge, read_bool(raw, "softEdge"));
        apply(&mut next.hide_cursor, read_bool(raw, "hideCursor"));
        apply(
            &mut next.cursor_hide_delay_ms,
            read_number(raw, "cursorHideDelay", CURSOR_HIDE_DELAY_LIMITS),
        );
        next
    }
}

impl SpotlightConfig {
    fn is_reading(&self) -> bool {
        self.mode == SpotlightMode::Reading
    }

    fn auto_hides_cursor(&self) -> bool {
        self.enabled && self.is_reading() && self.hide_cursor
    }

    pub fn cursor_hide_delay(&self) -> Duration {
        Duration::from_millis(self.cursor_hide_delay_ms.round() as u64)
    }

    /// Colour of the lit region for a pointer at `x` in `viewport`.
    pub fn resolve_fill(&self, x: f64, viewport: Viewport) -> Fill {
        Fill::resolve(self.color, self.custom_color, viewport.x_fraction(x))
    }

    pub fn style(&self, fill: Fill) -> SpotStyle {
        SpotStyle {
            width: self.width,
            height: self.height,
            dim_opacity: self.dim_opacity,
            fill,
            soft_edge: self.soft_edge,
        }
    }

    /// Vertical offset of the lit region in reading mode.
    pub fn reading_top(&self, viewport: Viewport) -> f64 {
        viewport.height * self.fixed_y_percent / 100.0 - self.height / 2.0
    }

    /// Top-left corner of the lit region for a pointer at `pointer`.
    pub fn compute_position(&self, pointer: Point, viewport: Viewport) -> SpotPosition {
        let left = pointer.x - self.width / 2.0;
        let top = match self.mode {
            SpotlightMode::Follow => pointer.y - self.height / 2.0,
            SpotlightMode::Reading => self.reading_top(viewport),
        };
        SpotPosition { left, top }
    }
}

/// Visibility of the system cursor.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum CursorVisibility {
    #[default]
    Shown,
    Hidden,
}

/// Spotlight state for one document attachment.
#[derive(Debug, Default)]
pub struct Spotlight {
    config: SpotlightConfig,
    present: bool,
    cursor: CursorVisibility,
    pointer: Option<Point>,
}

impl Spotlight {
    pub fn new(config: SpotlightConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &SpotlightConfig {
        &self.config
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn cursor(&self) -> CursorVisibility {
        self.cursor
    }

    /// Last recorded pointer position.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Record a pointer move. Positioning waits for the next frame.
    pub fn pointer_moved<S: SpotlightSurface>(&mut self, surface: &mut S, point: Point) {
        self.pointer = Some(point);
        if self.config.auto_hides_cursor() {
            self.show_cursor(surface);
            surface.arm_cursor_timer(self.config.cursor_hide_delay());
        }
    }

    /// Frame callback: position the overlay at the latest pointer.
    pub fn frame<S: SpotlightSurface>(&mut self, surface: &mut S) {
        if let Some(pointer) = self.pointer {
            self.update_position(surface, pointer);
        }
    }

    /// The pointer left the document.
    pub fn pointer_left<S: SpotlightSurface>(&mut self, surface: &mut S) {
        self.show_cursor(surface);
        // The reading band does not depend on the pointer, so it stays.
        if !self.config.is_reading() {
            self.remove(surface);
        }
    }

    /// The tab's visibility changed.
    pub fn visibility_changed<S: SpotlightSurface>(&mut self, surface: &mut S, hidden: bool) {
        if hidden {
            self.remove(surface);
            self.show_cursor(surface);
        }
    }

    /// The viewport was resized; re-anchor the reading band.
    pub fn resized<S: SpotlightSurface>(&mut self, surface: &mut S) {
        if self.config.enabled && self.config.is_reading() && self.present {
            let pointer = self.pointer.unwrap_or_default();
            self.update_position(surface, pointer);
        }
    }

    /// The idle timer fired.
    pub fn cursor_idle<S: SpotlightSurface>(&mut self, surface: &mut S) {
        if self.config.auto_hides_cursor() && self.cursor == CursorVisibility::Shown {
            self.cursor = CursorVisibility::Hidden;
            surface.set_cursor_hidden(true);
        }
    }

    /// Detach: remove everything and restore the cursor.
    pub fn teardown<S: SpotlightSurface>(&mut self, surface: &mut S) {
        self.remove(surface);
        self.show_cursor(surface);
    }

    /// Swap in a new configuration snapshot, reconciling the overlay with it.
    pub fn reconfigure<S: SpotlightSurface>(&mut self, surface: &mut S, next: SpotlightConfig) {
        let previous = std::mem::replace(&mut self.config, next);

        if previous.enabled && !self.config.enabled {
            tracing::debug!(target: "reading_lens::spotlight", "disabled");
            self.teardown(surface);
            return;
        }

        if !previous.enabled && self.config.enabled {
            tracing::debug!(target: "reading_lens::spotlight", "enabled");
            if let Some(pointer) = self.pointer {
                self.update_position(surface, pointer);
                if self.config.auto_hides_cursor() {
                    surface.arm_cursor_timer(self.config.cursor_hide_delay());
                }
            }
            return;
        }

        if !self.config.enabled {
            return;
        }

        let mode_changed = previous.mode != self.config.mode;
        if mode_changed {
            tracing::debug!(
                target: "reading_lens::spotlight",
                mode = self.config.mode.as_str(),
                "mode changed"
            );
        }

        if !self.config.auto_hides_cursor() {
            self.show_cursor(surface);
        } else if (mode_changed || !previous.hide_cursor) && self.pointer.is_some() {
            surface.arm_cursor_timer(self.config.cursor_hide_delay());
        }

        if self.present {
            let viewport = surface.viewport();
            let x = self.pointer.map_or(0.0, |p| p.x);
            let style = self.config.style(self.config.resolve_fill(x, viewport));
            if style != previous.style(previous.resolve_fill(x, viewport)) {
                surface.restyle(&style);
            }
        }

        let geometry_changed = mode_changed
            || previous.width != self.config.width
            || previous.height != self.config.height
            || previous.fixed_y_percent != self.config.fixed_y_percent;
        // Only entering reading mode may bring back an absent overlay.
        let entered_reading = mode_changed && self.config.is_reading();
        if geometry_changed && (self.present || entered_reading) {
            if let Some(pointer) = self.pointer {
                self.update_position(surface, pointer);
            }
        }
    }

    fn update_position<S: SpotlightSurface>(&mut self, surface: &mut S, pointer: Point) {
        if !self.config.enabled {
            return;
        }

        let viewport = surface.viewport();
        let fill = self.config.resolve_fill(pointer.x, viewport);
        let hue = match fill {
            Fill::Rainbow { hue } => Some(hue),
            Fill::Solid(_) => None,
        };

        if !self.present {
            let style = self.config.style(fill);
            if let Err(e) = surface.mount(&style) {
                tracing::warn!(target: "reading_lens::spotlight", "mount failed: {}", e);
                return;
            }
            tracing::debug!(target: "reading_lens::spotlight", "overlay mounted");
            self.present = true;
        }

        let position = self.config.compute_position(pointer, viewport);
        tracing::trace!(
            target: "reading_lens::spotlight",
            left = position.left,
            top = position.top,
            "placing overlay"
        );
        surface.place(position, hue);
    }

    fn remove<S: SpotlightSurface>(&mut self, surface: &mut S) {
        if self.present {
            surface.unmount();
            self.present = false;
            tracing::debug!(target: "reading_lens::spotlight", "overlay removed");
        }
    }

    fn show_cursor<S: SpotlightSurface>(&mut self, surface: &mut S) {
        surface.cancel_cursor_timer();
        if self.cursor == CursorVisibility::Hidden {
            self.cursor = CursorVisibility::Shown;
            surface.set_cursor_hidden(false);
        }
    }
}
