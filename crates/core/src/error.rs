use alloc::string::String;
use thiserror::Error;

/// Reasons a font description can fail to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The font description resource could not be opened.
    #[error("font description not found: {0}")]
    NotFound(String),

    /// The description ended before a record was complete.
    #[error("font description truncated: expected {expected} at token {position}")]
    Truncated {
        expected: &'static str,
        position: usize,
    },

    /// A glyph record names a character code outside the ASCII range.
    #[error("character code {code} at token {position} is outside 0-127")]
    OutOfRange { code: i64, position: usize },

    /// A record did not begin with the `999` marker.
    #[error("expected record marker 999 at token {position}, found {found:?}")]
    UnexpectedMarker { found: String, position: usize },

    /// A field could not be read as the number it should hold.
    #[error("invalid {expected} {found:?} at token {position}")]
    InvalidNumber {
        expected: &'static str,
        found: String,
        position: usize,
    },

    /// A pen flag other than 0 (up) or 1 (down).
    #[error("invalid pen flag {found} at token {position}")]
    InvalidPen { found: i64, position: usize },
}
