//! Palette struct with nearest-color matching and remapping.

use std::collections::HashMap;

use super::error::PaletteError;
use super::matcher::nearest_index;
use crate::color::Rgb;
use crate::output::IndexedImage;
use crate::raster::Raster;

/// Largest palette an [`IndexedImage`] can address with one byte per pixel.
pub const MAX_PALETTE_COLORS: usize = 256;

/// An ordered, immutable list of RGB colors.
///
/// A palette is built once (by a quantizer or from explicit colors) and never
/// edited afterwards. It may be empty: quantizing zero pixels yields an empty
/// palette, and callers must check [`Palette::is_empty`] before matching or
/// dithering against it.
///
/// # Example
///
/// ```
/// use pixel_engine::{Palette, Rgb};
///
/// let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.find_nearest(Rgb::new(200, 200, 200)), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette from colors in the given order.
    ///
    /// # Errors
    ///
    /// [`PaletteError::TooManyColors`] for more than [`MAX_PALETTE_COLORS`] entries.
    pub fn new(colors: Vec<Rgb>) -> Result<Self, PaletteError> {
        if colors.len() > MAX_PALETTE_COLORS {
            return Err(PaletteError::TooManyColors {
                count: colors.len(),
                max: MAX_PALETTE_COLORS,
            });
        }
        Ok(Self { colors })
    }

    /// Create a palette from hex color strings.
    ///
    /// ```
    /// use pixel_engine::{Palette, Rgb};
    ///
    /// let palette = Palette::from_hex(&["#F00", "00ff00"]).unwrap();
    /// assert_eq!(palette.get(0), Some(Rgb::new(255, 0, 0)));
    /// ```
    pub fn from_hex(hex: &[&str]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .map(|s| s.parse::<Rgb>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Number of colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when the palette has no colors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colors in build order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Color at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    /// Colors formatted as `#rrggbb`.
    pub fn to_hex(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }

    /// Index of the entry nearest to `color`; first occurrence wins ties.
    #[inline]
    pub fn find_nearest(&self, color: Rgb) -> Option<usize> {
        nearest_index(&self.colors, color.to_f32())
    }

    /// Index of the entry nearest to a float target (used by the ditherers).
    #[inline]
    pub fn find_nearest_f32(&self, target: [f32; 3]) -> Option<usize> {
        nearest_index(&self.colors, target)
    }

    /// Reorder entries by how many of `samples` map to each, most frequent first.
    ///
    /// Ties keep build order. This is a presentation helper; quantizers
    /// always return build order.
    pub fn sorted_by_population(&self, samples: &[Rgb]) -> Palette {
        let mut counts = vec![0usize; self.colors.len()];
        let mut memo: HashMap<Rgb, usize> = HashMap::new();
        for &s in samples {
            let idx = *memo.entry(s).or_insert_with(|| {
                nearest_index(&self.colors, s.to_f32()).unwrap_or(0)
            });
            if let Some(c) = counts.get_mut(idx) {
                *c += 1;
            }
        }
        let mut order: Vec<usize> = (0..self.colors.len()).collect();
        order.sort_by(|&a, &b| counts[b].cmp(&counts[a]));
        Palette {
            colors: order.into_iter().map(|i| self.colors[i]).collect(),
        }
    }

    /// Map every pixel to its nearest palette index without dithering.
    ///
    /// Returns `None` for an empty palette.
    pub fn index_raster(&self, raster: &Raster) -> Option<IndexedImage> {
        if self.is_empty() {
            return None;
        }
        let mut memo: HashMap<Rgb, u8> = HashMap::new();
        let mut indices = Vec::with_capacity(raster.pixel_count());
        for idx in 0..raster.pixel_count() {
            let rgb = raster.rgb_at(idx);
            let palette_idx = *memo.entry(rgb).or_insert_with(|| {
                nearest_index(&self.colors, rgb.to_f32()).unwrap_or(0) as u8
            });
            indices.push(palette_idx);
        }
        let alpha = (0..raster.pixel_count()).map(|i| raster.alpha_at(i)).collect();
        Some(IndexedImage::new(
            indices,
            alpha,
            raster.width(),
            raster.height(),
            self.clone(),
        ))
    }

    /// Replace each opaque pixel's RGB with its nearest palette color.
    ///
    /// Fully transparent pixels (alpha 0) are copied through unchanged.
    /// Returns `None` for an empty palette.
    pub fn remap(&self, raster: &Raster) -> Option<Raster> {
        let indexed = self.index_raster(raster)?;
        let mut out = indexed.to_raster();
        for idx in 0..raster.pixel_count() {
            if raster.alpha_at(idx) == 0 {
                out.set_pixel_at(idx, raster.pixel_at(idx));
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bw() -> Palette {
        Palette::new(vec![Rgb::BLACK, Rgb::WHITE]).unwrap()
    }

    #[test]
    fn test_too_many_colors_rejected() {
        let colors = vec![Rgb::BLACK; 257];
        assert_eq!(
            Palette::new(colors),
            Err(PaletteError::TooManyColors {
                count: 257,
                max: 256
            })
        );
    }

    #[test]
    fn test_empty_palette_allowed_but_cannot_match() {
        let palette = Palette::default();
        assert!(palette.is_empty());
        assert_eq!(palette.find_nearest(Rgb::WHITE), None);
        let raster = Raster::filled(1, 1, [0, 0, 0, 255]);
        assert!(palette.remap(&raster).is_none());
    }

    #[test]
    fn test_from_hex_propagates_parse_error() {
        assert!(matches!(
            Palette::from_hex(&["#000", "nope"]),
            Err(PaletteError::ParseColor(_))
        ));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(bw().to_hex(), vec!["#000000", "#ffffff"]);
    }

    #[test]
    fn test_remap_preserves_alpha_and_transparent_pixels() {
        let raster = Raster::from_pixels(
            3,
            1,
            &[[30, 30, 30, 255], [220, 220, 220, 128], [99, 12, 7, 0]],
        )
        .unwrap();
        let out = bw().remap(&raster).unwrap();
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(out.pixel(1, 0), [255, 255, 255, 128]);
        assert_eq!(out.pixel(2, 0), [99, 12, 7, 0]);
    }

    #[test]
    fn test_sorted_by_population() {
        let palette = Palette::new(vec![Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)]).unwrap();
        let samples = vec![
            Rgb::new(0, 0, 250),
            Rgb::new(0, 0, 240),
            Rgb::new(250, 0, 0),
        ];
        let sorted = palette.sorted_by_population(&samples);
        assert_eq!(
            sorted.colors(),
            &[Rgb::new(0, 0, 255), Rgb::new(255, 0, 0)]
        );
    }

    #[test]
    fn test_index_raster() {
        let raster =
            Raster::from_pixels(2, 1, &[[250, 250, 250, 255], [5, 5, 5, 255]]).unwrap();
        let indexed = bw().index_raster(&raster).unwrap();
        assert_eq!(indexed.indices(), &[1, 0]);
    }
}
