//! Line spotlight for text editors.
//!
//! The editor analogue of the reading spotlight: a band of whole lines around
//! the cursor line keeps its normal look and every other line is dimmed.

use serde::Serialize;

use crate::color::{ColorKey, Fill, HexColor, dim_css};
use crate::config::{
    ConfigSchema, Limits, RawConfig, apply, read_bool, read_hex_color, read_integer, read_number,
    read_variant,
};
use crate::platform::{DecorationHost, LineSpan};
use crate::spotlight::DIM_OPACITY_LIMITS;

pub const LINE_COUNT_LIMITS: Limits = Limits::new(1.0, 15.0);

/// Settings from the editor's `readingSpotlight` configuration section.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSpotlightConfig {
    pub enabled: bool,
    pub line_count: u32,
    pub color: ColorKey,
    pub custom_color: Option<HexColor>,
    pub dim_opacity: f64,
}

impl Default for LineSpotlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            line_count: 1,
            color: ColorKey::Yellow,
            custom_color: None,
            dim_opacity: 0.25,
        }
    }
}

impl ConfigSchema for LineSpotlightConfig {
    const KEYS: &'static [&'static str] =
        &["enabled", "lineCount", "color", "customColor", "dimOpacity"];

    fn merge(&self, raw: &RawConfig) -> Self {
        let mut next = self.clone();
        apply(&mut next.enabled, read_bool(raw, "enabled"));
        apply(
            &mut next.line_count,
            read_integer(raw, "lineCount", LINE_COUNT_LIMITS),
        );
        apply(&mut next.color, read_variant(raw, "color"));
        apply(&mut next.custom_color, read_hex_color(raw, "customColor"));
        apply(
            &mut next.dim_opacity,
            read_number(raw, "dimOpacity", DIM_OPACITY_LIMITS),
        );
        next
    }
}

impl LineSpotlightConfig {
    /// CSS colour for the lit band. Rainbow has no pointer to follow here and
    /// falls back to yellow.
    pub fn lit_css(&self) -> String {
        let color = match self.color {
            ColorKey::Rainbow => ColorKey::Yellow,
            other => other,
        };
        Fill::resolve(color, self.custom_color, 0.0).to_css()
    }

    pub fn dim_css(&self) -> String {
        dim_css(self.dim_opacity)
    }
}

/// The lit band around `cursor_line`, `None` for an empty document.
pub fn line_band(cursor_line: usize, total_lines: usize, line_count: u32) -> Option<LineSpan> {
    if total_lines == 0 {
        return None;
    }
    let half = (line_count / 2) as usize;
    let cursor_line = cursor_line.min(total_lines - 1);
    let first = cursor_line.saturating_sub(half);
    let last = (cursor_line + half).min(total_lines - 1);
    Some(LineSpan::new(first, last))
}

/// Lines outside `band`, as at most two contiguous spans.
pub fn dim_spans(band: LineSpan, total_lines: usize) -> Vec<LineSpan> {
    let mut spans = Vec::with_capacity(2);
    if band.first > 0 {
        spans.push(LineSpan::new(0, band.first - 1));
    }
    if band.last + 1 < total_lines {
        spans.push(LineSpan::new(band.last + 1, total_lines - 1));
    }
    spans
}

pub fn status_message(enabled: bool) -> &'static str {
    if enabled {
        "Reading Spotlight: Enabled"
    } else {
        "Reading Spotlight: Disabled"
    }
}

/// Line spotlight state for one editor host.
#[derive(Debug, Default)]
pub struct LineSpotlight {
    config: LineSpotlightConfig,
    /// Runtime switch flipped by the toggle command.
    active: bool,
    styled: bool,
    cursor: Option<(usize, usize)>,
}

impl LineSpotlight {
    pub fn new(config: LineSpotlightConfig) -> Self {
        let active = config.enabled;
        Self {
            config,
            active,
            styled: false,
            cursor: None,
        }
    }

    pub fn config(&self) -> &LineSpotlightConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Create styles and decorate the current cursor position, if known.
    pub fn activate<H: DecorationHost>(&mut self, host: &mut H) {
        self.rebuild_styles(host);
        self.redraw(host);
    }

    /// Selection moved or the visible editor changed.
    pub fn selection_changed<H: DecorationHost>(
        &mut self,
        host: &mut H,
        cursor_line: usize,
        total_lines: usize,
    ) {
        self.cursor = Some((cursor_line, total_lines));
        self.redraw(host);
    }

    /// The configuration section changed; styles are rebuilt from scratch.
    pub fn config_changed<H: DecorationHost>(&mut self, host: &mut H, next: LineSpotlightConfig) {
        self.config = next;
        self.rebuild_styles(host);
        self.redraw(host);
    }

    /// Flip the runtime switch. Returns the new state.
    pub fn toggle<H: DecorationHost>(&mut self, host: &mut H) -> bool {
        self.active = !self.active;
        tracing::debug!(target: "reading_lens::lines", active = self.active, "toggled");
        if self.active {
            self.redraw(host);
        } else {
            host.clear();
        }
        host.notify(status_message(self.active));
        self.active
    }

    pub fn deactivate<H: DecorationHost>(&mut self, host: &mut H) {
        if self.styled {
            host.dispose_styles();
            self.styled = false;
        }
    }

    fn rebuild_styles<H: DecorationHost>(&mut self, host: &mut H) {
        if self.styled {
            host.dispose_styles();
        }
        host.create_styles(&self.config.lit_css(), &self.config.dim_css());
        self.styled = true;
    }

    fn redraw<H: DecorationHost>(&mut self, host: &mut H) {
        if !self.config.enabled || !self.active {
            host.clear();
            return;
        }
        if !self.styled {
            self.rebuild_styles(host);
        }
        let Some((cursor_line, total_lines)) = self.cursor else {
            return;
        };
        let Some(band) = line_band(cursor_line, total_lines, self.config.line_count) else {
            host.clear();
            return;
        };
        let dim = dim_spans(band, total_lines);
        tracing::trace!(
            target: "reading_lens::lines",
            first = band.first,
            last = band.last,
            "decorating band"
        );
        host.set_lines(band, &dim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        styles: Option<(String, String)>,
        disposed: usize,
        lines: Option<(LineSpan, Vec<LineSpan>)>,
        messages: Vec<String>,
    }

    impl DecorationHost for RecordingHost {
        fn create_styles(&mut self, lit_css: &str, dim_css: &str) {
            self.styles = Some((lit_css.to_owned(), dim_css.to_owned()));
        }

        fn dispose_styles(&mut self) {
            self.styles = None;
            self.disposed += 1;
        }

        fn set_lines(&mut self, lit: LineSpan, dim: &[LineSpan]) {
            self.lines = Some((lit, dim.to_vec()));
        }

        fn clear(&mut self) {
            self.lines = None;
        }

        fn notify(&mut self, message: &str) {
            self.messages.push(message.to_owned());
        }
    }

    #[test]
    fn test_line_band_single_line() {
        assert_eq!(line_band(5, 10, 1), Some(LineSpan::new(5, 5)));
    }

    #[test]
    fn test_line_band_clamped() {
        assert_eq!(line_band(0, 10, 5), Some(LineSpan::new(0, 2)));
        assert_eq!(line_band(9, 10, 5), Some(LineSpan::new(7, 9)));
        assert_eq!(line_band(20, 10, 3), Some(LineSpan::new(8, 9)));
        assert_eq!(line_band(0, 0, 3), None);
    }

    #[test]
    fn test_even_line_count_rounds_down_half() {
        // Two lines requested: half is one on each side.
        assert_eq!(line_band(4, 10, 2), Some(LineSpan::new(3, 5)));
    }

    #[test]
    fn test_dim_spans_complement() {
        let band = LineSpan::new(3, 5);
        assert_eq!(
            dim_spans(band, 10),
            vec![LineSpan::new(0, 2), LineSpan::new(6, 9)]
        );
        assert_eq!(dim_spans(LineSpan::new(0, 9), 10), vec![]);
        assert_eq!(dim_spans(LineSpan::new(0, 0), 3), vec![LineSpan::new(1, 2)]);
    }

    #[test]
    fn test_selection_decorates_band() {
        let mut host = RecordingHost::default();
        let mut spot = LineSpotlight::new(LineSpotlightConfig {
            line_count: 3,
            ..Default::default()
        });
        spot.activate(&mut host);
        assert!(host.lines.is_none());

        spot.selection_changed(&mut host, 4, 8);
        let (lit, dim) = host.lines.clone().unwrap();
        assert_eq!(lit, LineSpan::new(3, 5));
        assert_eq!(dim, vec![LineSpan::new(0, 2), LineSpan::new(6, 7)]);
        assert_eq!(
            host.styles,
            Some(("rgba(255,255,0,.22)".into(), "rgba(0,0,0,0.25)".into()))
        );
    }

    #[test]
    fn test_toggle_clears_and_restores() {
        let mut host = RecordingHost::default();
        let mut spot = LineSpotlight::new(LineSpotlightConfig::default());
        spot.activate(&mut host);
        spot.selection_changed(&mut host, 2, 5);
        assert!(host.lines.is_some());

        assert!(!spot.toggle(&mut host));
        assert!(host.lines.is_none());
        spot.selection_changed(&mut host, 3, 5);
        assert!(host.lines.is_none());

        assert!(spot.toggle(&mut host));
        assert_eq!(host.lines.as_ref().map(|l| l.0), Some(LineSpan::new(3, 3)));
        assert_eq!(
            host.messages,
            vec!["Reading Spotlight: Disabled", "Reading Spotlight: Enabled"]
        );
    }

    #[test]
    fn test_config_change_rebuilds_styles() {
        let mut host = RecordingHost::default();
        let mut spot = LineSpotlight::new(LineSpotlightConfig::default());
        spot.activate(&mut host);
        spot.config_changed(
            &mut host,
            LineSpotlightConfig {
                custom_color: HexColor::parse("#102030"),
                dim_opacity: 0.4,
                ..Default::default()
            },
        );
        assert_eq!(host.disposed, 1);
        assert_eq!(
            host.styles,
            Some(("rgba(16,32,48,0.22)".into(), "rgba(0,0,0,0.4)".into()))
        );

        spot.deactivate(&mut host);
        assert_eq!(host.disposed, 2);
        assert!(host.styles.is_none());
    }

    #[test]
    fn test_disabled_config_clears() {
        let mut host = RecordingHost::default();
        let mut spot = LineSpotlight::new(LineSpotlightConfig::default());
        spot.activate(&mut host);
        spot.selection_changed(&mut host, 1, 3);
        spot.config_changed(
            &mut host,
            LineSpotlightConfig {
                enabled: false,
                ..Default::default()
            },
        );
        assert!(host.lines.is_none());
    }

    #[test]
    fn test_rainbow_falls_back_to_yellow() {
        let config = LineSpotlightConfig {
            color: ColorKey::Rainbow,
            ..Default::default()
        };
        assert_eq!(config.lit_css(), "rgba(255,255,0,.22)");
    }
}
