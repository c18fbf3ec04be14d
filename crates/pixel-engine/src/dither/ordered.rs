//! Ordered (Bayer) dithering.

use crate::output::IndexedImage;
use crate::palette::Palette;
use crate::raster::Raster;

use super::{alpha_plane, match_clamped, Dither, DitherOptions};

/// Recursive Bayer index matrix of side `size`, row-major.
///
/// `size` must be a power of two. Entries are a permutation of
/// `0..size * size`.
///
/// ```
/// use pixel_engine::bayer_matrix;
///
/// assert_eq!(bayer_matrix(2), vec![0, 2, 3, 1]);
/// ```
pub fn bayer_matrix(size: usize) -> Vec<u32> {
    if size <= 1 {
        return vec![0];
    }
    let half = size / 2;
    let inner = bayer_matrix(half);
    let mut matrix = vec![0u32; size * size];
    for y in 0..size {
        for x in 0..size {
            let quadrant = match (y / half, x / half) {
                (0, 0) => 0,
                (0, _) => 2,
                (_, 0) => 3,
                _ => 1,
            };
            matrix[y * size + x] = 4 * inner[(y % half) * half + x % half] + quadrant;
        }
    }
    matrix
}

/// Ordered dithering with a Bayer matrix.
///
/// Pixel `(x, y)` gets the bias `(m[y % N][x % N] / N² − 0.5) × amplitude`
/// added to every channel before matching, where `amplitude` is
/// [`DitherOptions::amplitude`]. No error is carried between pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ordered;

impl Dither for Ordered {
    fn dither(&self, raster: &Raster, palette: &Palette, options: &DitherOptions) -> IndexedImage {
        let width = raster.width();
        let height = raster.height();
        let size = options.bayer_size.max(1);
        let matrix = bayer_matrix(size);
        let cells = (size * size) as f32;
        let amplitude = options.amplitude(palette.len());

        let biases: Vec<f32> = matrix
            .iter()
            .map(|&m| (m as f32 / cells - 0.5) * amplitude)
            .collect();

        let mut indices = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let bias = biases[(y % size) * size + x % size];
                let source = raster.rgb_at(y * width + x).to_f32();
                indices.push(match_clamped(palette, source.map(|v| v + bias)));
            }
        }

        IndexedImage::new(indices, alpha_plane(raster), width, height, palette.clone())
    }
}
