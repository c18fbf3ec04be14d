//! Floyd–Steinberg error diffusion dithering.

use crate::output::IndexedImage;
use crate::palette::Palette;
use crate::raster::Raster;

use super::{alpha_plane, match_clamped, Dither, DitherOptions, ErrorBuffer, FLOYD_STEINBERG};

/// Floyd–Steinberg error diffusion dithering.
///
/// Pixels are visited strictly row-major: left to right, top to bottom.
/// Each pixel's value is its source color plus the error accumulated from
/// earlier pixels. The value is clamped to `[0, 255]` for matching only; the
/// residual diffused onward is the unclamped value minus the chosen palette
/// color, scaled by `strength`:
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// Shares that would land outside the raster are dropped.
///
/// # Example
///
/// ```
/// use pixel_engine::{Dither, DitherOptions, FloydSteinberg, Palette, Raster};
///
/// let palette = Palette::from_hex(&["#000", "#fff"]).unwrap();
/// let raster = Raster::filled(4, 4, [128, 128, 128, 255]);
/// let image = FloydSteinberg.dither(&raster, &palette, &DitherOptions::new());
/// assert!(image.indices().contains(&0) && image.indices().contains(&1));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn dither(&self, raster: &Raster, palette: &Palette, options: &DitherOptions) -> IndexedImage {
        let width = raster.width();
        let height = raster.height();
        let kernel = &FLOYD_STEINBERG;
        let divisor = kernel.divisor as f32;

        let mut indices = vec![0u8; width * height];
        let mut errors = ErrorBuffer::new(width, kernel.max_dy + 1);

        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                let source = raster.rgb_at(idx).to_f32();
                let accumulated = errors.get_accumulated(x);
                let value = [
                    source[0] + accumulated[0],
                    source[1] + accumulated[1],
                    source[2] + accumulated[2],
                ];

                let chosen = match_clamped(palette, value);
                indices[idx] = chosen;

                let color = palette.get(chosen as usize).unwrap_or_default().to_f32();
                let residual = [
                    (value[0] - color[0]) * options.strength,
                    (value[1] - color[1]) * options.strength,
                    (value[2] - color[2]) * options.strength,
                ];

                for &(dx, dy, weight) in kernel.entries {
                    let nx = x as i64 + dx as i64;
                    if nx < 0 || nx >= width as i64 {
                        continue;
                    }
                    let share = weight as f32 / divisor;
                    errors.add_error(
                        nx as usize,
                        dy as usize,
                        [residual[0] * share, residual[1] * share, residual[2] * share],
                    );
                }
            }
            errors.advance_row();
        }

        IndexedImage::new(indices, alpha_plane(raster), width, height, palette.clone())
    }
}
