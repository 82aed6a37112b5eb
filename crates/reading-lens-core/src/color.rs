//! Spotlight colour presets and fill resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Alpha applied to custom and rainbow fills.
pub const CUSTOM_COLOR_ALPHA: f64 = 0.22;
const RAINBOW_SATURATION: u8 = 100;
const RAINBOW_LIGHTNESS: u8 = 70;

/// Named colour presets selectable from the settings surface.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorKey {
    #[default]
    Yellow,
    Blue,
    Green,
    Peach,
    Gray,
    Aqua,
    /// Hue follows the pointer's horizontal position.
    Rainbow,
}

impl ColorKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Peach => "peach",
            Self::Gray => "gray",
            Self::Aqua => "aqua",
            Self::Rainbow => "rainbow",
        }
    }

    /// Static CSS colour for the preset, `None` for rainbow.
    pub fn preset_css(&self) -> Option<&'static str> {
        match self {
            Self::Yellow => Some("rgba(255,255,0,.22)"),
            Self::Blue => Some("rgba(135,206,250,.25)"),
            Self::Green => Some("rgba(144,238,144,.22)"),
            Self::Peach => Some("rgba(255,218,185,.25)"),
            Self::Gray => Some("rgba(128,128,128,.2)"),
            Self::Aqua => Some("rgba(127,255,212,.22)"),
            Self::Rainbow => None,
        }
    }
}

impl FromStr for ColorKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yellow" => Ok(Self::Yellow),
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "peach" => Ok(Self::Peach),
            "gray" => Ok(Self::Gray),
            "aqua" => Ok(Self::Aqua),
            "rainbow" => Ok(Self::Rainbow),
            _ => Err(()),
        }
    }
}

/// A validated `#RRGGBB` colour.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    /// Parse `#RRGGBB` (either case). Shorthand and alpha forms are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Translucent CSS form used for the lit region.
    pub fn to_rgba_css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, CUSTOM_COLOR_ALPHA)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Hue in degrees for a pointer at `x_fraction` of the viewport width.
pub fn rainbow_hue(x_fraction: f64) -> u16 {
    (x_fraction.clamp(0.0, 1.0) * 360.0).round() as u16
}

/// Resolved fill for the lit region.
#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    /// Fixed CSS colour.
    Solid(String),
    /// Position-dependent hue.
    Rainbow { hue: u16 },
}

impl Fill {
    /// Resolve the fill: a custom colour wins over the preset, rainbow
    /// derives its hue from the pointer position.
    pub fn resolve(color: ColorKey, custom: Option<HexColor>, x_fraction: f64) -> Self {
        if let Some(custom) = custom {
            return Fill::Solid(custom.to_rgba_css());
        }
        match color.preset_css() {
            Some(css) => Fill::Solid(css.to_owned()),
            None => Fill::Rainbow {
                hue: rainbow_hue(x_fraction),
            },
        }
    }

    pub fn is_rainbow(&self) -> bool {
        matches!(self, Fill::Rainbow { .. })
    }

    pub fn to_css(&self) -> String {
        match self {
            Fill::Solid(css) => css.clone(),
            Fill::Rainbow { hue } => format!(
                "hsla({},{}%,{}%,{})",
                hue, RAINBOW_SATURATION, RAINBOW_LIGHTNESS, CUSTOM_COLOR_ALPHA
            ),
        }
    }
}

/// Translucent black used for dimmed regions.
pub fn dim_css(opacity: f64) -> String {
    format!("rgba(0,0,0,{})", opacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_hex_parse() {
        assert_eq!(
            HexColor::parse("#FF8000"),
            Some(HexColor { r: 255, g: 128, b: 0 })
        );
        assert_eq!(HexColor::parse("#ff8000"), HexColor::parse("#FF8000"));
        assert_eq!(HexColor::parse("ff8000"), None);
        assert_eq!(HexColor::parse("#f80"), None);
        assert_eq!(HexColor::parse("#ff8000aa"), None);
        assert_eq!(HexColor::parse("#gg0000"), None);
    }

    #[test]
    fn test_hex_to_css() {
        let color = HexColor::parse("#336699").unwrap();
        assert_snapshot!(color.to_rgba_css(), @"rgba(51,102,153,0.22)");
        assert_eq!(color.to_string(), "#336699");
    }

    #[test]
    fn test_custom_color_wins() {
        let custom = HexColor::parse("#000000");
        let fill = Fill::resolve(ColorKey::Rainbow, custom, 0.5);
        assert_eq!(fill, Fill::Solid("rgba(0,0,0,0.22)".into()));
    }

    #[test]
    fn test_preset_fill() {
        let fill = Fill::resolve(ColorKey::Blue, None, 0.9);
        assert_eq!(fill.to_css(), "rgba(135,206,250,.25)");
    }

    #[test]
    fn test_rainbow_fill_css() {
        let fill = Fill::resolve(ColorKey::Rainbow, None, 0.5);
        assert_eq!(fill, Fill::Rainbow { hue: 180 });
        assert_snapshot!(fill.to_css(), @"hsla(180,100%,70%,0.22)");
    }

    #[test]
    fn test_rainbow_hue_monotonic() {
        let width = 1280.0;
        let mut previous = rainbow_hue(0.0);
        assert_eq!(previous, 0);
        for step in 1..=64 {
            let x = width * step as f64 / 64.0;
            let hue = rainbow_hue(x / width);
            assert!(hue > previous, "hue {hue} at x={x} not above {previous}");
            previous = hue;
        }
        assert_eq!(previous, 360);
    }

    #[test]
    fn test_color_key_roundtrip_names() {
        for key in [
            ColorKey::Yellow,
            ColorKey::Blue,
            ColorKey::Green,
            ColorKey::Peach,
            ColorKey::Gray,
            ColorKey::Aqua,
            ColorKey::Rainbow,
        ] {
            assert_eq!(key.as_str().parse::<ColorKey>(), Ok(key));
        }
        assert!("purple".parse::<ColorKey>().is_err());
    }
}
