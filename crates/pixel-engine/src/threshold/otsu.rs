//! Otsu's automatic threshold.

use crate::raster::GrayPlane;

use super::{Threshold, ThresholdMap};

/// Level `t` maximising between-class variance over a 256-bin histogram.
///
/// Candidate `t` splits the histogram into background (levels `< t`) and
/// foreground (levels `>= t`). Its score is `wB · wF · (μB − μF)²`, built from
/// running sums in one pass. Candidates leaving either class empty are
/// skipped; the first maximum wins. A histogram with a single occupied level
/// has no valid split and yields `0`, which makes every pixel foreground.
pub fn otsu_level(histogram: &[u32; 256]) -> u8 {
    let total: f64 = histogram.iter().map(|&n| n as f64).sum();
    let sum_all: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &n)| level as f64 * n as f64)
        .sum();

    let mut weight_bg = 0.0f64;
    let mut sum_bg = 0.0f64;
    let mut best_level = 0u8;
    let mut best_variance = f64::NEG_INFINITY;

    for t in 0..256usize {
        if t > 0 {
            let n = histogram[t - 1] as f64;
            weight_bg += n;
            sum_bg += (t - 1) as f64 * n;
        }
        let weight_fg = total - weight_bg;
        if weight_bg == 0.0 || weight_fg == 0.0 {
            continue;
        }

        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let diff = mean_bg - mean_fg;
        let variance = weight_bg * weight_fg * diff * diff;

        if variance > best_variance {
            best_variance = variance;
            best_level = t as u8;
        }
    }

    best_level
}

/// Otsu mode: a global cutoff discovered from the histogram.
#[derive(Debug, Clone, Copy, Default)]
pub struct Otsu;

impl Otsu {
    /// Discovered level for a gray plane.
    pub fn level(plane: &GrayPlane) -> u8 {
        otsu_level(&plane.histogram())
    }
}

impl Threshold for Otsu {
    fn threshold_map(&self, plane: &GrayPlane) -> ThresholdMap {
        let level = Self::level(plane);
        tracing::debug!(threshold = level, "Otsu level selected");
        // Levels >= t are foreground; with halves binned downward that is
        // exactly gray > t - 0.5.
        ThresholdMap::Uniform(level as f32 - 0.5)
    }
}
