//! Adaptive local-mean threshold backed by a summed-area table.

use crate::raster::GrayPlane;

use super::{Threshold, ThresholdMap};

/// Summed-area table over a gray plane.
///
/// Stored with a zero row and column in front, so entry `(x, y)` is the sum
/// of all values strictly above and to the left of pixel `(x, y)`.
#[derive(Debug, Clone)]
pub struct IntegralImage {
    width: usize,
    height: usize,
    sums: Vec<f64>,
}

impl IntegralImage {
    /// Build the table in one pass.
    pub fn new(plane: &GrayPlane) -> Self {
        let width = plane.width();
        let height = plane.height();
        let stride = width + 1;
        let mut sums = vec![0.0f64; stride * (height + 1)];

        for y in 0..height {
            let mut row_sum = 0.0f64;
            for x in 0..width {
                row_sum += plane.get(x, y) as f64;
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row_sum;
            }
        }

        Self {
            width,
            height,
            sums,
        }
    }

    /// Sum over the half-open rectangle `[x0, x1) × [y0, y1)`.
    ///
    /// Bounds are clipped to the plane.
    pub fn sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return 0.0;
        }
        let stride = self.width + 1;
        self.sums[y1 * stride + x1] - self.sums[y0 * stride + x1] - self.sums[y1 * stride + x0]
            + self.sums[y0 * stride + x0]
    }
}

/// Local-mean threshold: each pixel's cutoff is the mean gray over the
/// `block_size × block_size` window centred on it, minus `constant`.
///
/// Windows near the border are clipped to the plane; nothing is mirrored
/// or wrapped. `block_size` is expected to be odd (see
/// [`ThresholdParams::validate`](super::ThresholdParams::validate)).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adaptive {
    /// Window side, odd and at least 3
    pub block_size: usize,
    /// Subtracted from the local mean
    pub constant: f32,
}

impl Threshold for Adaptive {
    fn threshold_map(&self, plane: &GrayPlane) -> ThresholdMap {
        let width = plane.width();
        let height = plane.height();
        let half = self.block_size / 2;
        let integral = IntegralImage::new(plane);

        let mut cutoffs = Vec::with_capacity(width * height);
        for y in 0..height {
            let y0 = y.saturating_sub(half);
            let y1 = (y + half + 1).min(height);
            for x in 0..width {
                let x0 = x.saturating_sub(half);
                let x1 = (x + half + 1).min(width);
                let count = (x1 - x0) * (y1 - y0);
                let mean = if count == 0 {
                    plane.get(x, y) as f64
                } else {
                    integral.sum(x0, y0, x1, y1) / count as f64
                };
                cutoffs.push(mean as f32 - self.constant);
            }
        }

        ThresholdMap::PerPixel(cutoffs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Raster;

    fn plane(width: usize, height: usize, values: &[u8]) -> GrayPlane {
        let pixels: Vec<[u8; 4]> = values.iter().map(|&v| [v, v, v, 255]).collect();
        GrayPlane::from_raster(&Raster::from_pixels(width, height, &pixels).unwrap())
    }

    #[test]
    fn test_integral_sums_match_brute_force() {
        let values: Vec<u8> = (0..20u8).map(|v| v * 7).collect();
        let p = plane(5, 4, &values);
        let integral = IntegralImage::new(&p);
        for (x0, y0, x1, y1) in [(0, 0, 5, 4), (1, 1, 3, 3), (4, 3, 5, 4), (2, 0, 9, 9)] {
            let mut expected = 0.0;
            for y in y0..y1.min(4) {
                for x in x0..x1.min(5) {
                    expected += p.get(x, y) as f64;
                }
            }
            assert_eq!(integral.sum(x0, y0, x1, y1), expected);
        }
    }

    #[test]
    fn test_empty_rectangle_sums_to_zero() {
        let p = plane(2, 2, &[1, 2, 3, 4]);
        assert_eq!(IntegralImage::new(&p).sum(1, 1, 1, 2), 0.0);
    }

    #[test]
    fn test_corner_window_is_clipped() {
        // 3x3 window at (0, 0) covers only the 2x2 corner.
        let p = plane(3, 3, &[0, 40, 200, 80, 120, 200, 200, 200, 200]);
        let map = Adaptive {
            block_size: 3,
            constant: 0.0,
        }
        .threshold_map(&p);
        assert_eq!(map.at(0), 60.0);
        // Centre sees every pixel.
        let mean = 1240.0 / 9.0;
        assert!((map.at(4) - mean).abs() < 1e-4);
    }

    #[test]
    fn test_constant_lowers_cutoff() {
        let p = plane(2, 1, &[100, 100]);
        let map = Adaptive {
            block_size: 3,
            constant: 7.5,
        }
        .threshold_map(&p);
        assert_eq!(map.at(0), 92.5);
        assert_eq!(map.at(1), 92.5);
    }

    #[test]
    fn test_window_larger_than_plane() {
        let p = plane(2, 2, &[0, 100, 100, 200]);
        let map = Adaptive {
            block_size: 51,
            constant: 0.0,
        }
        .threshold_map(&p);
        for idx in 0..4 {
            assert_eq!(map.at(idx), 100.0);
        }
    }
}
