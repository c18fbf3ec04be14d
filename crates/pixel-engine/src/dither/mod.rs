//! Dithering a raster onto a fixed palette.
//!
//! # Algorithms
//!
//! - **Floyd–Steinberg**: error diffusion, strictly row-major scan
//! - **Ordered**: Bayer-matrix bias, every pixel independent
//! - **Random**: uniform per-pixel noise, reproducible when seeded
//!
//! All three implement the [`Dither`] trait and share [`DitherOptions`].
//! [`DitherParams`] bundles an algorithm, a palette and options, validates
//! them and exposes the uniform [`Process`] boundary.
//!
//! # Example
//!
//! ```
//! use pixel_engine::{DitherAlgorithm, DitherParams, Palette, Process, Raster};
//!
//! let palette = Palette::from_hex(&["#000", "#fff"]).unwrap();
//! let params = DitherParams::new(DitherAlgorithm::Ordered, palette);
//!
//! let raster = Raster::filled(8, 8, [128, 128, 128, 255]);
//! let out = params.process(&raster).unwrap();
//! assert!(out.pixels().all(|[r, _, _, _]| r == 0 || r == 255));
//! ```

mod floyd_steinberg;
mod kernel;
mod options;
mod ordered;
mod random;

use std::fmt;
use std::str::FromStr;

pub use floyd_steinberg::FloydSteinberg;
pub use kernel::*;
pub use options::{DitherOptions, BAYER_SIZES};
pub use ordered::{bayer_matrix, Ordered};
pub use random::RandomDither;

use crate::api::{EngineError, Process};
use crate::output::IndexedImage;
use crate::palette::Palette;
use crate::raster::Raster;

/// Dither algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherAlgorithm {
    /// Floyd–Steinberg error diffusion (100% propagation).
    #[default]
    FloydSteinberg,

    /// Ordered dithering with a recursive Bayer matrix.
    Ordered,

    /// Uniform random noise before matching.
    Random,
}

impl DitherAlgorithm {
    fn ditherer(self) -> &'static dyn Dither {
        match self {
            Self::FloydSteinberg => &FloydSteinberg,
            Self::Ordered => &Ordered,
            Self::Random => &RandomDither,
        }
    }
}

impl FromStr for DitherAlgorithm {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floyd-steinberg" | "floyd_steinberg" | "floydsteinberg" | "fs" => {
                Ok(Self::FloydSteinberg)
            }
            "ordered" | "bayer" => Ok(Self::Ordered),
            "random" | "noise" => Ok(Self::Random),
            other => Err(EngineError::unsupported("dither algorithm", other)),
        }
    }
}

impl fmt::Display for DitherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FloydSteinberg => f.write_str("floyd-steinberg"),
            Self::Ordered => f.write_str("ordered"),
            Self::Random => f.write_str("random"),
        }
    }
}

/// Shared capability of the three dithering strategies.
///
/// Implementations may assume a non-empty palette and already validated
/// options; [`DitherParams`] checks both before calling them.
pub trait Dither {
    /// Dither `raster` to palette indices.
    ///
    /// The returned image carries the raster's alpha channel unchanged and
    /// a clone of `palette`.
    fn dither(&self, raster: &Raster, palette: &Palette, options: &DitherOptions) -> IndexedImage;
}

/// Error buffer for error diffusion.
///
/// Holds only the rows the kernel can reach. Row 0 is the current row.
#[derive(Debug)]
pub struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// Create a zeroed buffer `row_depth` rows deep.
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Accumulated error for pixel `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a pixel `row_offset` rows below the current one.
    ///
    /// Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Drop the current row and append a zeroed one.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Nearest palette index for a float color, clamped to the 8-bit range first.
#[inline]
pub(crate) fn match_clamped(palette: &Palette, value: [f32; 3]) -> u8 {
    let clamped = value.map(|v| v.clamp(0.0, 255.0));
    palette.find_nearest_f32(clamped).unwrap_or(0) as u8
}

/// Alpha channel of a raster, row-major.
pub(crate) fn alpha_plane(raster: &Raster) -> Vec<u8> {
    (0..raster.pixel_count()).map(|i| raster.alpha_at(i)).collect()
}

/// Parameters for dithering a raster onto a palette.
#[derive(Debug, Clone, PartialEq)]
pub struct DitherParams {
    /// Strategy to run
    pub algorithm: DitherAlgorithm,
    /// Target palette; must not be empty
    pub palette: Palette,
    /// Strength, Bayer size, spread and seed
    pub options: DitherOptions,
}

impl DitherParams {
    /// Parameters with default options.
    pub fn new(algorithm: DitherAlgorithm, palette: Palette) -> Self {
        Self {
            algorithm,
            palette,
            options: DitherOptions::default(),
        }
    }

    /// Replace the options wholesale.
    #[inline]
    pub fn options(mut self, options: DitherOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the strength factor.
    #[inline]
    pub fn strength(mut self, strength: f32) -> Self {
        self.options.strength = strength;
        self
    }

    /// Check every parameter.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.palette.is_empty() {
            return Err(EngineError::invalid("palette", "must contain at least one color"));
        }
        let strength = self.options.strength;
        if !strength.is_finite() || !(0.0..=1.0).contains(&strength) {
            return Err(EngineError::invalid(
                "strength",
                format!("must be between 0 and 1, got {strength}"),
            ));
        }
        if !BAYER_SIZES.contains(&self.options.bayer_size) {
            return Err(EngineError::invalid(
                "bayer_size",
                format!("must be one of 2, 4, 8, 16, got {}", self.options.bayer_size),
            ));
        }
        if let Some(spread) = self.options.spread {
            if !spread.is_finite() || spread < 0.0 {
                return Err(EngineError::invalid(
                    "spread",
                    format!("must be a non-negative number, got {spread}"),
                ));
            }
        }
        Ok(())
    }

    /// Dither to an indexed image.
    pub fn dither(&self, raster: &Raster) -> Result<IndexedImage, EngineError> {
        self.validate()?;
        tracing::debug!(
            algorithm = %self.algorithm,
            width = raster.width(),
            height = raster.height(),
            colors = self.palette.len(),
            strength = self.options.strength,
            "Dithering"
        );
        Ok(self
            .algorithm
            .ditherer()
            .dither(raster, &self.palette, &self.options))
    }
}

impl Process for DitherParams {
    fn process(&self, raster: &Raster) -> Result<Raster, EngineError> {
        Ok(self.dither(raster)?.to_raster())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn bw() -> Palette {
        Palette::new(vec![Rgb::BLACK, Rgb::WHITE]).unwrap()
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("Floyd-Steinberg".parse(), Ok(DitherAlgorithm::FloydSteinberg));
        assert_eq!("bayer".parse(), Ok(DitherAlgorithm::Ordered));
        assert_eq!("random".parse(), Ok(DitherAlgorithm::Random));
        assert!(matches!(
            "atkinson".parse::<DitherAlgorithm>(),
            Err(EngineError::Unsupported {
                kind: "dither algorithm",
                ..
            })
        ));
    }

    #[test]
    fn test_error_buffer_advance_row() {
        let mut buf = ErrorBuffer::new(3, 2);
        buf.add_error(1, 1, [1.0, 2.0, 3.0]);
        buf.add_error(5, 0, [9.0; 3]); // out of bounds, ignored
        assert_eq!(buf.get_accumulated(1), [0.0; 3]);
        buf.advance_row();
        assert_eq!(buf.get_accumulated(1), [1.0, 2.0, 3.0]);
        buf.advance_row();
        assert_eq!(buf.get_accumulated(1), [0.0; 3]);
    }

    #[test]
    fn test_empty_palette_rejected() {
        let params = DitherParams::new(DitherAlgorithm::FloydSteinberg, Palette::default());
        let raster = Raster::filled(2, 2, [0, 0, 0, 255]);
        assert!(matches!(
            params.process(&raster),
            Err(EngineError::InvalidParameter { name: "palette", .. })
        ));
    }

    #[test]
    fn test_strength_bounds() {
        let base = DitherParams::new(DitherAlgorithm::Random, bw());
        assert!(base.clone().strength(1.5).validate().is_err());
        assert!(base.clone().strength(-0.1).validate().is_err());
        assert!(base.clone().strength(f32::NAN).validate().is_err());
        assert!(base.clone().strength(0.0).validate().is_ok());
        assert!(base.strength(1.0).validate().is_ok());
    }

    #[test]
    fn test_bayer_size_must_be_power_of_two() {
        let params = DitherParams::new(DitherAlgorithm::Ordered, bw())
            .options(DitherOptions::new().bayer_size(3));
        assert!(matches!(
            params.validate(),
            Err(EngineError::InvalidParameter {
                name: "bayer_size",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_spread_rejected() {
        let params = DitherParams::new(DitherAlgorithm::Ordered, bw())
            .options(DitherOptions::new().spread(-1.0));
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_every_output_pixel_is_a_palette_color() {
        let palette = Palette::new(vec![
            Rgb::new(20, 20, 20),
            Rgb::new(200, 40, 40),
            Rgb::new(240, 240, 200),
        ])
        .unwrap();
        let pixels: Vec<[u8; 4]> = (0..64u32)
            .map(|i| [(i * 4) as u8, (255 - i * 3) as u8, (i * 2) as u8, 200])
            .collect();
        let raster = Raster::from_pixels(8, 8, &pixels).unwrap();

        for algorithm in [
            DitherAlgorithm::FloydSteinberg,
            DitherAlgorithm::Ordered,
            DitherAlgorithm::Random,
        ] {
            let params = DitherParams::new(algorithm, palette.clone())
                .options(DitherOptions::new().seed(3));
            let out = params.process(&raster).unwrap();
            for [r, g, b, a] in out.pixels() {
                assert!(palette.colors().contains(&Rgb::new(r, g, b)), "{algorithm}");
                assert_eq!(a, 200, "alpha must pass through for {algorithm}");
            }
        }
    }

    #[test]
    fn test_zero_strength_is_plain_nearest_mapping() {
        let pixels: Vec<[u8; 4]> = (0..16u8).map(|v| [v * 16, v * 16, v * 16, 255]).collect();
        let raster = Raster::from_pixels(4, 4, &pixels).unwrap();
        let expected = bw().index_raster(&raster).unwrap();

        for algorithm in [
            DitherAlgorithm::FloydSteinberg,
            DitherAlgorithm::Ordered,
            DitherAlgorithm::Random,
        ] {
            let params = DitherParams::new(algorithm, bw())
                .options(DitherOptions::new().strength(0.0).seed(1));
            assert_eq!(
                params.dither(&raster).unwrap().indices(),
                expected.indices(),
                "{algorithm}"
            );
        }
    }
}
