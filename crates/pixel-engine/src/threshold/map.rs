//! Per-pixel threshold cutoffs.

/// Cutoff applied to each pixel's gray value; a pixel is foreground iff
/// `gray > cutoff`.
#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdMap {
    /// One cutoff for every pixel (global and Otsu modes).
    Uniform(f32),
    /// One cutoff per pixel, row-major (adaptive mode).
    PerPixel(Vec<f32>),
}

impl ThresholdMap {
    /// Cutoff for the pixel at row-major index `idx`.
    #[inline]
    pub fn at(&self, idx: usize) -> f32 {
        match self {
            Self::Uniform(t) => *t,
            Self::PerPixel(values) => values[idx],
        }
    }

    /// The single cutoff of a uniform map.
    pub fn uniform(&self) -> Option<f32> {
        match self {
            Self::Uniform(t) => Some(*t),
            Self::PerPixel(_) => None,
        }
    }

    /// True when `gray` falls on the foreground side of pixel `idx`'s cutoff.
    #[inline]
    pub fn is_foreground(&self, idx: usize, gray: f32) -> bool {
        gray > self.at(idx)
    }
}
