//! Fixed global threshold.

use crate::raster::GrayPlane;

use super::{Threshold, ThresholdMap};

/// A single fixed cutoff: foreground iff `gray > value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Global {
    /// Cutoff on the 0..=255 gray scale
    pub value: f32,
}

impl Threshold for Global {
    fn threshold_map(&self, _plane: &GrayPlane) -> ThresholdMap {
        ThresholdMap::Uniform(self.value)
    }
}
