//! Dithering options and configuration.
//!
//! This module provides the [`DitherOptions`] struct shared by all three
//! dithering strategies.

/// Bayer matrix sizes accepted by ordered dithering.
pub const BAYER_SIZES: [usize; 4] = [2, 4, 8, 16];

/// Configuration options for dithering.
///
/// # Defaults
///
/// - Strength: `1.0` (full error diffusion / full bias amplitude)
/// - Bayer size: `4`
/// - Spread: derived from the palette length
/// - Seed: none (random dithering draws from OS entropy)
///
/// # Example
///
/// ```
/// use pixel_engine::DitherOptions;
///
/// let options = DitherOptions::new()
///     .strength(0.75)
///     .bayer_size(8)
///     .seed(42);
/// assert_eq!(options.bayer_size, 8);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DitherOptions {
    /// Scale factor in `[0, 1]`.
    ///
    /// Floyd–Steinberg multiplies each diffused residual by it; ordered and
    /// random dithering multiply their bias amplitude by it. At `0.0` every
    /// strategy degrades to plain nearest-color mapping.
    ///
    /// Default: `1.0`
    pub strength: f32,

    /// Side length of the Bayer matrix for ordered dithering (2, 4, 8 or 16).
    ///
    /// Default: `4`
    pub bayer_size: usize,

    /// Full bias range, in 8-bit channel units, at strength 1.
    ///
    /// `None` uses the spacing of an evenly spaced ramp with as many levels
    /// as the palette has colors: `255 / (len - 1)`, or `0` for a
    /// single-color palette.
    ///
    /// Default: `None`
    pub spread: Option<f32>,

    /// Seed for random dithering. `None` is non-reproducible.
    ///
    /// Default: `None`
    pub seed: Option<u64>,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            strength: 1.0,
            bayer_size: 4,
            spread: None,
            seed: None,
        }
    }
}

impl DitherOptions {
    /// Create new dither options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strength factor.
    #[inline]
    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    /// Set the Bayer matrix size.
    #[inline]
    pub fn bayer_size(mut self, size: usize) -> Self {
        self.bayer_size = size;
        self
    }

    /// Override the bias spread.
    #[inline]
    pub fn spread(mut self, spread: f32) -> Self {
        self.spread = Some(spread);
        self
    }

    /// Seed random dithering.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Bias amplitude for a palette of `palette_len` colors.
    pub fn amplitude(&self, palette_len: usize) -> f32 {
        let spread = self.spread.unwrap_or_else(|| default_spread(palette_len));
        self.strength * spread
    }
}

fn default_spread(palette_len: usize) -> f32 {
    if palette_len < 2 {
        0.0
    } else {
        255.0 / (palette_len - 1) as f32
    }
}
