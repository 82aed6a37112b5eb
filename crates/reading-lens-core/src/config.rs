//! Typed, per-field configuration parsing.
//!
//! Stored settings arrive as a loose JSON object (the decoded sync-storage
//! map, or an editor configuration section). Each field is read through a
//! guard that either yields a validated value or a [`FieldError`]; rejected
//! fields keep whatever value the snapshot already had, so a corrupt entry
//! never reaches rendering.

use std::str::FromStr;

use serde_json::Value;

use crate::color::HexColor;
use crate::error::FieldError;

/// Raw key/value map as read from a configuration store.
pub type RawConfig = serde_json::Map<String, Value>;

/// Inclusive numeric bounds for a setting.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Limits {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// A configuration record that can be merged from a raw store map.
pub trait ConfigSchema: Clone + Default {
    /// Storage keys this schema reads.
    const KEYS: &'static [&'static str];

    /// Return a copy of `self` with every valid known key from `raw` applied.
    ///
    /// Unknown keys are ignored and invalid ones are logged and skipped.
    fn merge(&self, raw: &RawConfig) -> Self;

    /// Parse a full snapshot: `raw` merged over the defaults.
    fn from_raw(raw: &RawConfig) -> Self {
        Self::default().merge(raw)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrong_type(key: &'static str, expected: &'static str, value: &Value) -> FieldError {
    FieldError::WrongType {
        key,
        expected,
        found: type_name(value),
    }
}

/// Read a finite number and clamp it to `limits`.
pub fn read_number(raw: &RawConfig, key: &'static str, limits: Limits) -> Result<Option<f64>, FieldError> {
    let Some(value) = raw.get(key) else {
        return Ok(None);
    };
    match value.as_f64() {
        Some(n) if n.is_finite() => Ok(Some(limits.clamp(n))),
        _ => Err(wrong_type(key, "number", value)),
    }
}

/// Read a number, clamp it, then round to the nearest integer.
pub fn read_integer(raw: &RawConfig, key: &'static str, limits: Limits) -> Result<Option<u32>, FieldError> {
    Ok(read_number(raw, key, limits)?.map(|n| n.round() as u32))
}

pub fn read_bool(raw: &RawConfig, key: &'static str) -> Result<Option<bool>, FieldError> {
    let Some(value) = raw.get(key) else {
        return Ok(None);
    };
    value
        .as_bool()
        .map(Some)
        .ok_or_else(|| wrong_type(key, "boolean", value))
}

/// Read a string and parse it into one of a fixed set of variants.
pub fn read_variant<T: FromStr>(raw: &RawConfig, key: &'static str) -> Result<Option<T>, FieldError> {
    let Some(value) = raw.get(key) else {
        return Ok(None);
    };
    let Some(s) = value.as_str() else {
        return Err(wrong_type(key, "string", value));
    };
    s.parse::<T>()
        .map(Some)
        .map_err(|_| FieldError::UnknownVariant {
            key,
            value: s.to_owned(),
        })
}

/// Read a nullable `#RRGGBB` colour.
///
/// `Ok(Some(None))` means the key was explicitly cleared. An empty string is
/// treated as cleared too.
pub fn read_hex_color(
    raw: &RawConfig,
    key: &'static str,
) -> Result<Option<Option<HexColor>>, FieldError> {
    let Some(value) = raw.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(Some(None)),
        Value::String(s) if s.is_empty() => Ok(Some(None)),
        Value::String(s) => HexColor::parse(s)
            .map(|c| Some(Some(c)))
            .ok_or_else(|| FieldError::InvalidColor {
                key,
                value: s.clone(),
            }),
        other => Err(wrong_type(key, "string or null", other)),
    }
}

/// Assign a parsed field onto `slot`, logging rejected values.
pub fn apply<T>(slot: &mut T, parsed: Result<Option<T>, FieldError>) {
    match parsed {
        Ok(Some(value)) => *slot = value,
        Ok(None) => {}
        Err(err) => {
            tracing::debug!(target: "reading_lens::config", %err, "ignoring stored value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawConfig {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_read_number_clamps() {
        let map = raw(json!({ "width": 5000, "height": 4, "dim": 0.3 }));
        let limits = Limits::new(200.0, 1200.0);
        assert_eq!(read_number(&map, "width", limits), Ok(Some(1200.0)));
        assert_eq!(read_number(&map, "height", Limits::new(20.0, 80.0)), Ok(Some(20.0)));
        assert_eq!(read_number(&map, "dim", Limits::new(0.1, 0.5)), Ok(Some(0.3)));
        assert_eq!(read_number(&map, "missing", limits), Ok(None));
    }

    #[test]
    fn test_read_number_rejects_strings() {
        let map = raw(json!({ "width": "600" }));
        let err = read_number(&map, "width", Limits::new(0.0, 1.0)).unwrap_err();
        assert_eq!(
            err,
            FieldError::WrongType {
                key: "width",
                expected: "number",
                found: "string"
            }
        );
    }

    #[test]
    fn test_read_integer_rounds() {
        let map = raw(json!({ "count": 2.6 }));
        assert_eq!(read_integer(&map, "count", Limits::new(1.0, 10.0)), Ok(Some(3)));
    }

    #[test]
    fn test_read_bool() {
        let map = raw(json!({ "on": false, "bad": 1 }));
        assert_eq!(read_bool(&map, "on"), Ok(Some(false)));
        assert!(read_bool(&map, "bad").is_err());
    }

    #[test]
    fn test_read_variant() {
        let map = raw(json!({ "mode": "cluster", "other": "sideways", "num": 3 }));
        assert_eq!(
            read_variant::<crate::text::RangeModeKind>(&map, "mode"),
            Ok(Some(crate::text::RangeModeKind::Cluster))
        );
        assert!(matches!(
            read_variant::<crate::text::RangeModeKind>(&map, "other"),
            Err(FieldError::UnknownVariant { .. })
        ));
        assert!(matches!(
            read_variant::<crate::text::RangeModeKind>(&map, "num"),
            Err(FieldError::WrongType { .. })
        ));
    }

    #[test]
    fn test_read_hex_color() {
        let map = raw(json!({
            "set": "#FF8000",
            "cleared": null,
            "empty": "",
            "bad": "orange",
        }));
        assert_eq!(
            read_hex_color(&map, "set"),
            Ok(Some(HexColor::parse("#ff8000")))
        );
        assert_eq!(read_hex_color(&map, "cleared"), Ok(Some(None)));
        assert_eq!(read_hex_color(&map, "empty"), Ok(Some(None)));
        assert!(matches!(
            read_hex_color(&map, "bad"),
            Err(FieldError::InvalidColor { .. })
        ));
        assert_eq!(read_hex_color(&map, "absent"), Ok(None));
    }

    #[test]
    fn test_apply_keeps_previous_on_error() {
        let mut width = 600.0;
        apply(&mut width, Err(FieldError::UnknownVariant { key: "w", value: "x".into() }));
        assert_eq!(width, 600.0);
        apply(&mut width, Ok(Some(700.0)));
        assert_eq!(width, 700.0);
        apply(&mut width, Ok(None));
        assert_eq!(width, 700.0);
    }
}
