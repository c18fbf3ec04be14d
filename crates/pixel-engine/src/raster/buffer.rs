//! Canonical RGBA pixel buffer.

use crate::api::EngineError;
use crate::color::Rgb;

/// An 8-bit RGBA raster, row-major, four bytes per pixel.
///
/// Every algorithm reads from one `Raster` and writes a freshly allocated
/// one; sources are never mutated in place.
///
/// # Example
///
/// ```
/// use pixel_engine::Raster;
///
/// let raster = Raster::filled(3, 2, [10, 20, 30, 255]);
/// assert_eq!(raster.pixel_count(), 6);
/// assert_eq!(raster.pixel(2, 1), [10, 20, 30, 255]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Raster {
    /// Wrap an RGBA byte buffer.
    ///
    /// # Errors
    ///
    /// [`EngineError::DimensionMismatch`] if `data.len() != width * height * 4`
    /// (or the product overflows).
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, EngineError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4));
        if expected != Some(data.len()) {
            return Err(EngineError::DimensionMismatch {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a raster from per-pixel RGBA quadruples.
    pub fn from_pixels(
        width: usize,
        height: usize,
        pixels: &[[u8; 4]],
    ) -> Result<Self, EngineError> {
        Self::new(width, height, pixels.concat())
    }

    /// A raster with every pixel set to `rgba`.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let data = rgba.repeat(width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Zeroed destination buffer with the same dimensions as `self`.
    pub(crate) fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: vec![0; self.data.len()],
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

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    /// True when the raster has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the raster, returning its RGBA bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// RGBA value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        self.pixel_at(y * self.width + x)
    }

    /// RGBA value at a row-major pixel index.
    #[inline]
    pub fn pixel_at(&self, idx: usize) -> [u8; 4] {
        let o = idx * 4;
        [
            self.data[o],
            self.data[o + 1],
            self.data[o + 2],
            self.data[o + 3],
        ]
    }

    /// Overwrite the pixel at `(x, y)`.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let idx = y * self.width + x;
        self.set_pixel_at(idx, rgba);
    }

    #[inline]
    pub(crate) fn set_pixel_at(&mut self, idx: usize, rgba: [u8; 4]) {
        let o = idx * 4;
        self.data[o..o + 4].copy_from_slice(&rgba);
    }

    /// Iterate over pixels as RGBA quadruples in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// RGB part of the pixel at a row-major index.
    #[inline]
    pub fn rgb_at(&self, idx: usize) -> Rgb {
        let o = idx * 4;
        Rgb::new(self.data[o], self.data[o + 1], self.data[o + 2])
    }

    /// Alpha of the pixel at a row-major index.
    #[inline]
    pub fn alpha_at(&self, idx: usize) -> u8 {
        self.data[idx * 4 + 3]
    }

    /// Apply `f` to every pixel, producing a new raster.
    pub fn map_pixels(&self, mut f: impl FnMut([u8; 4]) -> [u8; 4]) -> Raster {
        let mut data = Vec::with_capacity(self.data.len());
        for px in self.pixels() {
            data.extend_from_slice(&f(px));
        }
        Raster {
            width: self.width,
            height: self.height,
            data,
        }
    }
}
