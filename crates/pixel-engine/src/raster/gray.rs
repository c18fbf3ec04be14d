//! Grayscale plane and histogram.
//!
//! Grayscale is always `0.299R + 0.587G + 0.114B`. The weights are applied
//! in integer thousandths and divided once, so neutral pixels (R = G = B)
//! map to exactly their channel value.

use super::Raster;

/// Luma of an RGB triple on the 0..=255 scale.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    weighted as f32 / 1000.0
}

/// Histogram bin for a luma value: nearest level, halves rounding down.
///
/// Bin `t` or above holds exactly the values with `gray > t - 0.5`, so a
/// level picked from the histogram can be applied with a plain `>` test.
#[inline]
pub(crate) fn luma_bin(gray: f32) -> usize {
    (gray - 0.5).ceil().clamp(0.0, 255.0) as usize
}

/// Per-pixel grayscale values of a raster, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayPlane {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl GrayPlane {
    /// Convert a raster to grayscale. Alpha is ignored.
    pub fn from_raster(raster: &Raster) -> Self {
        let values = raster
            .pixels()
            .map(|[r, g, b, _]| luma(r, g, b))
            .collect();
        Self {
            width: raster.width(),
            height: raster.height(),
            values,
        }
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

    /// Row-major gray values.
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Gray value at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }

    /// 256-bin histogram of rounded gray levels.
    pub fn histogram(&self) -> [u32; 256] {
        let mut hist = [0u32; 256];
        for &v in &self.values {
            hist[luma_bin(v)] += 1;
        }
        hist
    }
}
