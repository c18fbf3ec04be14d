//! Error types for palette operations
//!
//! This module provides error types for color parsing and palette validation.

use std::num::ParseIntError;

use thiserror::Error;

/// Error type for parsing hex color strings.
///
/// Returned when parsing a hex color string fails, either due to
/// invalid length or invalid hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Error type for palette construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    /// More entries than an indexed image can address
    #[error("palette has {count} colors (max {max})")]
    TooManyColors {
        /// Number of colors supplied
        count: usize,
        /// Largest supported palette
        max: usize,
    },
    /// Invalid hex color string
    #[error("invalid color: {0}")]
    ParseColor(#[from] ParseColorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_error_display() {
        assert_eq!(
            ParseColorError::InvalidLength.to_string(),
            "invalid hex color length (expected 3 or 6 characters)"
        );
    }

    #[test]
    fn test_palette_error_too_many_colors() {
        let error = PaletteError::TooManyColors { count: 300, max: 256 };
        assert_eq!(error.to_string(), "palette has 300 colors (max 256)");
    }

    #[test]
    fn test_palette_error_from_parse_error() {
        let error: PaletteError = ParseColorError::InvalidLength.into();
        assert!(matches!(error, PaletteError::ParseColor(_)));
    }
}
