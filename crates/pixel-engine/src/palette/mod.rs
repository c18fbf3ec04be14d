//! Palette construction and nearest-color matching
//!
//! Two quantizers build a [`Palette`] from the opaque pixels of a raster:
//!
//! - [`MedianCut`]: recursive median split of the widest color bucket
//! - [`KMeans`]: Lloyd iterations from seeded distinct-color centroids
//!
//! Both implement [`Quantize`]. [`PaletteParams`] selects one by
//! [`PaletteAlgorithm`], validates the request and, through
//! [`Process`](crate::api::Process), remaps a raster to the built palette.

mod error;
mod kmeans;
mod matcher;
mod median_cut;
mod palette;

use std::fmt;
use std::str::FromStr;

pub use error::{PaletteError, ParseColorError};
pub use kmeans::kmeans;
pub use matcher::nearest_index;
pub use median_cut::median_cut;
pub use palette::{Palette, MAX_PALETTE_COLORS};

use crate::api::{EngineError, Process};
use crate::color::Rgb;
use crate::raster::Raster;

/// Default k-means iteration cap.
pub const DEFAULT_KMEANS_ITERATIONS: usize = 16;

/// Largest accepted k-means iteration cap.
pub const MAX_KMEANS_ITERATIONS: usize = 100;

/// Palette construction algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaletteAlgorithm {
    /// Median cut (deterministic)
    #[default]
    MedianCut,
    /// K-means clustering (deterministic for a fixed seed)
    KMeans,
}

impl FromStr for PaletteAlgorithm {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "median-cut" | "median_cut" | "mediancut" => Ok(Self::MedianCut),
            "kmeans" | "k-means" | "k_means" => Ok(Self::KMeans),
            other => Err(EngineError::unsupported("palette algorithm", other)),
        }
    }
}

impl fmt::Display for PaletteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MedianCut => f.write_str("median-cut"),
            Self::KMeans => f.write_str("kmeans"),
        }
    }
}

/// Shared capability of the palette builders.
pub trait Quantize {
    /// Build at most `count` colors representing `colors`, in build order.
    ///
    /// Empty input yields an empty list.
    fn quantize(&self, colors: &[Rgb], count: usize) -> Vec<Rgb>;
}

/// Median-cut quantizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianCut;

impl Quantize for MedianCut {
    fn quantize(&self, colors: &[Rgb], count: usize) -> Vec<Rgb> {
        median_cut(colors, count)
    }
}

/// K-means quantizer.
#[derive(Debug, Clone, Copy)]
pub struct KMeans {
    /// Maximum number of assign/update rounds
    pub iterations: usize,
    /// Seed for choosing the initial centroids
    pub seed: u64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_KMEANS_ITERATIONS,
            seed: 0,
        }
    }
}

impl Quantize for KMeans {
    fn quantize(&self, colors: &[Rgb], count: usize) -> Vec<Rgb> {
        kmeans(colors, count, self.iterations, self.seed)
    }
}

/// RGB of every pixel that is not fully transparent.
pub fn opaque_colors(raster: &Raster) -> Vec<Rgb> {
    (0..raster.pixel_count())
        .filter(|&i| raster.alpha_at(i) != 0)
        .map(|i| raster.rgb_at(i))
        .collect()
}

/// Deterministic stride subsample down to at most `limit` colors.
fn subsample(colors: Vec<Rgb>, limit: usize) -> Vec<Rgb> {
    if limit == 0 || colors.len() <= limit {
        return colors;
    }
    let stride = colors.len().div_ceil(limit);
    colors.into_iter().step_by(stride).collect()
}

/// Parameters for building a palette and remapping a raster to it.
///
/// # Example
///
/// ```
/// use pixel_engine::{PaletteAlgorithm, PaletteParams, Process, Raster};
///
/// let raster = Raster::filled(4, 4, [200, 30, 30, 255]);
/// let params = PaletteParams::new(PaletteAlgorithm::KMeans, 4).seed(9);
/// let palette = params.build_palette(&raster).unwrap();
/// assert_eq!(palette.len(), 1);
///
/// let out = params.process(&raster).unwrap();
/// assert_eq!(out.pixel(0, 0), [200, 30, 30, 255]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaletteParams {
    /// Which quantizer to run
    pub algorithm: PaletteAlgorithm,
    /// Requested palette size (1..=256)
    pub color_count: usize,
    /// K-means iteration cap (1..=100); ignored by median cut
    pub kmeans_iterations: usize,
    /// K-means initialisation seed; ignored by median cut
    pub seed: u64,
    /// Optional cap on the number of sampled pixels (stride subsampling)
    pub sample_limit: Option<usize>,
}

impl Default for PaletteParams {
    fn default() -> Self {
        Self {
            algorithm: PaletteAlgorithm::MedianCut,
            color_count: 16,
            kmeans_iterations: DEFAULT_KMEANS_ITERATIONS,
            seed: 0,
            sample_limit: None,
        }
    }
}

impl PaletteParams {
    /// Parameters for `algorithm` producing up to `color_count` colors.
    pub fn new(algorithm: PaletteAlgorithm, color_count: usize) -> Self {
        Self {
            algorithm,
            color_count,
            ..Self::default()
        }
    }

    /// Set the k-means iteration cap.
    #[inline]
    pub fn kmeans_iterations(mut self, iterations: usize) -> Self {
        self.kmeans_iterations = iterations;
        self
    }

    /// Set the k-means seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cap the number of sampled pixels.
    #[inline]
    pub fn sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = Some(limit);
        self
    }

    /// Check every parameter.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.color_count < 1 {
            return Err(EngineError::invalid("color_count", "must be at least 1"));
        }
        if self.color_count > MAX_PALETTE_COLORS {
            return Err(EngineError::invalid(
                "color_count",
                format!("must be at most {MAX_PALETTE_COLORS}, got {}", self.color_count),
            ));
        }
        if self.algorithm == PaletteAlgorithm::KMeans
            && !(1..=MAX_KMEANS_ITERATIONS).contains(&self.kmeans_iterations)
        {
            return Err(EngineError::invalid(
                "kmeans_iterations",
                format!(
                    "must be between 1 and {MAX_KMEANS_ITERATIONS}, got {}",
                    self.kmeans_iterations
                ),
            ));
        }
        if self.sample_limit == Some(0) {
            return Err(EngineError::invalid("sample_limit", "must be at least 1"));
        }
        Ok(())
    }

    fn quantizer(&self) -> Box<dyn Quantize> {
        match self.algorithm {
            PaletteAlgorithm::MedianCut => Box::new(MedianCut),
            PaletteAlgorithm::KMeans => Box::new(KMeans {
                iterations: self.kmeans_iterations,
                seed: self.seed,
            }),
        }
    }

    /// Quantize the opaque pixels of `raster` into a palette.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidParameter`] from [`validate`](Self::validate)
    /// - [`EngineError::EmptyInput`] when the raster has no opaque pixels
    pub fn build_palette(&self, raster: &Raster) -> Result<Palette, EngineError> {
        self.validate()?;

        let mut colors = opaque_colors(raster);
        if colors.is_empty() {
            return Err(EngineError::EmptyInput("no opaque pixels to quantize"));
        }
        if let Some(limit) = self.sample_limit {
            colors = subsample(colors, limit);
        }

        let built = self.quantizer().quantize(&colors, self.color_count);
        tracing::debug!(
            algorithm = %self.algorithm,
            samples = colors.len(),
            requested = self.color_count,
            built = built.len(),
            "Built palette"
        );
        Ok(Palette::new(built)?)
    }
}

impl Process for PaletteParams {
    /// Build a palette, then replace each opaque pixel with its nearest entry.
    fn process(&self, raster: &Raster) -> Result<Raster, EngineError> {
        let palette = self.build_palette(raster)?;
        palette
            .remap(raster)
            .ok_or(EngineError::EmptyInput("palette is empty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("median-cut".parse(), Ok(PaletteAlgorithm::MedianCut));
        assert_eq!("MedianCut".parse(), Ok(PaletteAlgorithm::MedianCut));
        assert_eq!("k-means".parse(), Ok(PaletteAlgorithm::KMeans));
        assert!(matches!(
            "octree".parse::<PaletteAlgorithm>(),
            Err(EngineError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_algorithm_display_round_trips() {
        for algo in [PaletteAlgorithm::MedianCut, PaletteAlgorithm::KMeans] {
            assert_eq!(algo.to_string().parse(), Ok(algo));
        }
    }

    #[test]
    fn test_zero_colors_rejected() {
        let raster = Raster::filled(1, 1, [0, 0, 0, 255]);
        let err = PaletteParams::new(PaletteAlgorithm::MedianCut, 0)
            .process(&raster)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidParameter {
                name: "color_count",
                ..
            }
        ));
    }

    #[test]
    fn test_too_many_colors_rejected() {
        let params = PaletteParams::new(PaletteAlgorithm::MedianCut, 257);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_kmeans_iterations_bounds() {
        let params = PaletteParams::new(PaletteAlgorithm::KMeans, 4).kmeans_iterations(0);
        assert!(params.validate().is_err());
        let params = params.kmeans_iterations(101);
        assert!(params.validate().is_err());
        let params = params.kmeans_iterations(20);
        assert!(params.validate().is_ok());
        // Median cut ignores the iteration cap entirely.
        let mc = PaletteParams::new(PaletteAlgorithm::MedianCut, 4).kmeans_iterations(0);
        assert!(mc.validate().is_ok());
    }

    #[test]
    fn test_fully_transparent_raster_is_empty_input() {
        let raster = Raster::filled(3, 3, [255, 0, 0, 0]);
        let result = PaletteParams::default().build_palette(&raster);
        assert!(matches!(result, Err(EngineError::EmptyInput(_))));
    }

    #[test]
    fn test_transparent_pixels_excluded_from_palette() {
        let raster = Raster::from_pixels(
            2,
            1,
            &[[10, 20, 30, 255], [250, 250, 250, 0]],
        )
        .unwrap();
        let palette = PaletteParams::new(PaletteAlgorithm::MedianCut, 4)
            .build_palette(&raster)
            .unwrap();
        assert_eq!(palette.colors(), &[Rgb::new(10, 20, 30)]);
    }

    #[test]
    fn test_subsample_caps_sample_count() {
        let colors: Vec<Rgb> = (0..100u8).map(|v| Rgb::new(v, 0, 0)).collect();
        let sampled = subsample(colors, 10);
        assert_eq!(sampled.len(), 10);
        assert_eq!(sampled[1], Rgb::new(10, 0, 0));
    }

    #[test]
    fn test_process_output_uses_only_palette_colors() {
        let pixels: Vec<[u8; 4]> = (0..64u8).map(|v| [v * 4, 255 - v * 4, v, 255]).collect();
        let raster = Raster::from_pixels(8, 8, &pixels).unwrap();
        let params = PaletteParams::new(PaletteAlgorithm::MedianCut, 5);
        let palette = params.build_palette(&raster).unwrap();
        let out = params.process(&raster).unwrap();
        for [r, g, b, a] in out.pixels() {
            assert!(palette.colors().contains(&Rgb::new(r, g, b)));
            assert_eq!(a, 255);
        }
    }
}
