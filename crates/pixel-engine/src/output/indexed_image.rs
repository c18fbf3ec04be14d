//! IndexedImage: palette indices plus the palette and alpha they belong to.

use crate::palette::Palette;
use crate::raster::Raster;

/// Palette-indexed output of remapping or dithering.
///
/// Stores one `u8` palette index per pixel in row-major order, the source
/// alpha channel (passed through untouched), the dimensions, and the palette
/// the indices refer to.
///
/// # Example
///
/// ```
/// use pixel_engine::{IndexedImage, Palette};
///
/// let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
/// let image = IndexedImage::new(vec![0, 1, 1, 0], vec![255; 4], 2, 2, palette);
///
/// assert_eq!(image.indices(), &[0, 1, 1, 0]);
/// assert_eq!(image.to_rgb().len(), 2 * 2 * 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedImage {
    indices: Vec<u8>,
    alpha: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl IndexedImage {
    /// Assemble an indexed image.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices` and `alpha` both hold `width * height` entries.
    pub fn new(
        indices: Vec<u8>,
        alpha: Vec<u8>,
        width: usize,
        height: usize,
        palette: Palette,
    ) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        debug_assert_eq!(alpha.len(), indices.len());
        Self {
            indices,
            alpha,
            width,
            height,
            palette,
        }
    }

    /// Palette indices, row-major.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Alpha channel, row-major.
    #[inline]
    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    /// True when any pixel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.alpha.iter().any(|&a| a != 255)
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The palette the indices refer to.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Flat `[R, G, B, ...]` bytes, `width * height * 3` long.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &idx in &self.indices {
            let color = self.palette.get(idx as usize).unwrap_or_default();
            rgb.extend_from_slice(&color.to_bytes());
        }
        rgb
    }

    /// Expand back to an RGBA raster with the carried alpha.
    pub fn to_raster(&self) -> Raster {
        let mut raster = Raster::filled(self.width, self.height, [0, 0, 0, 0]);
        for (i, (&idx, &a)) in self.indices.iter().zip(&self.alpha).enumerate() {
            let [r, g, b] = self.palette.get(idx as usize).unwrap_or_default().to_bytes();
            raster.set_pixel_at(i, [r, g, b, a]);
        }
        raster
    }
}
