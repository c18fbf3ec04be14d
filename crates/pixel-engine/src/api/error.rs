//! Unified error type for the pixel-engine public API.
//!
//! [`EngineError`] covers every way a `process` call can be rejected. All of
//! them are raised during parameter validation, before any pixel is read, so
//! a failed call never leaves partial output behind.

use thiserror::Error;

use crate::palette::{PaletteError, ParseColorError};

/// Unified error type for the pixel-engine public API.
///
/// # Example
///
/// ```
/// use pixel_engine::{EngineError, PaletteAlgorithm};
///
/// let err = "octree".parse::<PaletteAlgorithm>().unwrap_err();
/// assert!(matches!(err, EngineError::Unsupported { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A parameter is out of range or structurally invalid.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the params struct
        name: &'static str,
        /// Human-readable reason
        reason: String,
    },

    /// No pixels were available to work on.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// An algorithm or mode tag was not recognised.
    #[error("unsupported {kind}: {tag}")]
    Unsupported {
        /// Which selector was being parsed ("palette algorithm", "threshold mode", ...)
        kind: &'static str,
        /// The offending tag
        tag: String,
    },

    /// Pixel buffer length does not match the declared dimensions.
    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        /// Actual buffer length in bytes
        len: usize,
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
    },

    /// Hex color string could not be parsed.
    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),

    /// Palette could not be constructed.
    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),
}

impl EngineError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(kind: &'static str, tag: &str) -> Self {
        EngineError::Unsupported {
            kind,
            tag: tag.to_string(),
        }
    }
}
