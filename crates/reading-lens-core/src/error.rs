//! Error types for configuration parsing.

use miette::Diagnostic;
use thiserror::Error;

/// A stored configuration value that could not be used.
///
/// Never fatal: the offending field keeps its previous value.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
#[non_exhaustive]
pub enum FieldError {
    /// Value has the wrong JSON type for this field.
    #[error("`{key}` expected {expected}, got {found}")]
    #[diagnostic(code(reading_lens::config::wrong_type))]
    WrongType {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// String value is not one of the recognised variants.
    #[error("`{key}` has unrecognised value {value:?}")]
    #[diagnostic(
        code(reading_lens::config::unknown_variant),
        help("falls back to the current value")
    )]
    UnknownVariant { key: &'static str, value: String },

    /// Custom colour is not a `#RRGGBB` hex string.
    #[error("`{key}` is not a #RRGGBB colour: {value:?}")]
    #[diagnostic(code(reading_lens::config::invalid_color))]
    InvalidColor { key: &'static str, value: String },
}
