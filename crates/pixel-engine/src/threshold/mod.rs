//! Two-color thresholding.
//!
//! Every mode converts the raster to gray with `0.299R + 0.587G + 0.114B`,
//! derives a [`ThresholdMap`] of per-pixel cutoffs and paints each pixel
//! foreground iff `gray > cutoff`:
//!
//! - [`Global`]: one fixed cutoff
//! - [`Adaptive`]: local window mean minus a constant, via [`IntegralImage`]
//! - [`Otsu`]: cutoff discovered from the histogram ([`otsu_level`])
//!
//! The output uses exactly two colors and is fully opaque. `invert` swaps
//! the two colors after classification; the map itself is never altered.

mod adaptive;
mod global;
mod map;
mod otsu;

use std::fmt;
use std::str::FromStr;

pub use adaptive::{Adaptive, IntegralImage};
pub use global::Global;
pub use map::ThresholdMap;
pub use otsu::{otsu_level, Otsu};

use crate::api::{EngineError, Process};
use crate::color::Rgb;
use crate::raster::{GrayPlane, Raster};

/// Shared capability of the three threshold modes.
pub trait Threshold {
    /// Per-pixel cutoffs for `plane`.
    fn threshold_map(&self, plane: &GrayPlane) -> ThresholdMap;
}

/// Threshold mode selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMode {
    /// Fixed cutoff [`ThresholdParams::value`]
    #[default]
    Global,
    /// Local mean over [`ThresholdParams::block_size`] minus [`ThresholdParams::constant`]
    Adaptive,
    /// Automatic cutoff from the histogram
    Otsu,
}

impl FromStr for ThresholdMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" | "fixed" => Ok(Self::Global),
            "adaptive" | "local" | "mean" => Ok(Self::Adaptive),
            "otsu" | "auto" => Ok(Self::Otsu),
            other => Err(EngineError::unsupported("threshold mode", other)),
        }
    }
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Adaptive => f.write_str("adaptive"),
            Self::Otsu => f.write_str("otsu"),
        }
    }
}

/// Result of a threshold run.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdOutcome {
    /// Two-color, fully opaque output
    pub raster: Raster,
    /// Cutoffs that produced it (before any inversion)
    pub map: ThresholdMap,
    /// Global mode: the fixed value. Otsu mode: the lowest foreground gray
    /// level. Adaptive mode: `None`.
    pub level: Option<f32>,
}

/// Parameters for thresholding a raster.
///
/// # Example
///
/// ```
/// use pixel_engine::{Raster, ThresholdMode, ThresholdParams};
///
/// let mut raster = Raster::filled(4, 1, [10, 10, 10, 255]);
/// raster.set_pixel(3, 0, [240, 240, 240, 255]);
///
/// let outcome = ThresholdParams::new(ThresholdMode::Otsu).run(&raster).unwrap();
/// assert_eq!(outcome.level, Some(11.0));
/// assert_eq!(outcome.raster.pixel(3, 0), [255, 255, 255, 255]);
/// assert_eq!(outcome.raster.pixel(0, 0), [0, 0, 0, 255]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdParams {
    /// Which mode to run
    pub mode: ThresholdMode,
    /// Global cutoff (0..=255)
    pub value: f32,
    /// Adaptive window side; even values are bumped to the next odd one
    pub block_size: usize,
    /// Adaptive offset subtracted from the local mean
    pub constant: f32,
    /// Swap foreground and background colors after classification
    pub invert: bool,
    /// Color painted where `gray > cutoff`
    pub foreground: Rgb,
    /// Color painted elsewhere
    pub background: Rgb,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            mode: ThresholdMode::Global,
            value: 128.0,
            block_size: 15,
            constant: 5.0,
            invert: false,
            foreground: Rgb::WHITE,
            background: Rgb::BLACK,
        }
    }
}

impl ThresholdParams {
    /// Default parameters for `mode`.
    pub fn new(mode: ThresholdMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Set the global cutoff.
    #[inline]
    pub fn value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }

    /// Set the adaptive window side.
    #[inline]
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the adaptive constant.
    #[inline]
    pub fn constant(mut self, constant: f32) -> Self {
        self.constant = constant;
        self
    }

    /// Swap output colors.
    #[inline]
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Set the two output colors.
    #[inline]
    pub fn colors(mut self, foreground: Rgb, background: Rgb) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    /// Block size actually used: odd and at least 3.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidParameter`] for 0 and 1, which cannot be
    /// normalized.
    pub fn normalized_block_size(&self) -> Result<usize, EngineError> {
        let size = if self.block_size % 2 == 0 {
            self.block_size + 1
        } else {
            self.block_size
        };
        if size < 3 {
            return Err(EngineError::invalid(
                "block_size",
                format!("must normalize to an odd size >= 3, got {}", self.block_size),
            ));
        }
        Ok(size)
    }

    /// Check the parameters the selected mode reads.
    pub fn validate(&self) -> Result<(), EngineError> {
        match self.mode {
            ThresholdMode::Global => {
                if !self.value.is_finite() || !(0.0..=255.0).contains(&self.value) {
                    return Err(EngineError::invalid(
                        "value",
                        format!("must be between 0 and 255, got {}", self.value),
                    ));
                }
            }
            ThresholdMode::Adaptive => {
                self.normalized_block_size()?;
                if !self.constant.is_finite() {
                    return Err(EngineError::invalid("constant", "must be a finite number"));
                }
            }
            ThresholdMode::Otsu => {}
        }
        Ok(())
    }

    fn strategy(&self) -> Result<Box<dyn Threshold>, EngineError> {
        self.validate()?;
        Ok(match self.mode {
            ThresholdMode::Global => Box::new(Global { value: self.value }),
            ThresholdMode::Adaptive => {
                let block_size = self.normalized_block_size()?;
                if block_size != self.block_size {
                    tracing::debug!(
                        requested = self.block_size,
                        used = block_size,
                        "Adaptive block size normalized to odd"
                    );
                }
                Box::new(Adaptive {
                    block_size,
                    constant: self.constant,
                })
            }
            ThresholdMode::Otsu => Box::new(Otsu),
        })
    }

    /// Threshold `raster`, returning the output together with its map.
    pub fn run(&self, raster: &Raster) -> Result<ThresholdOutcome, EngineError> {
        let strategy = self.strategy()?;
        let plane = GrayPlane::from_raster(raster);
        let map = strategy.threshold_map(&plane);

        let (fg, bg) = if self.invert {
            (self.background, self.foreground)
        } else {
            (self.foreground, self.background)
        };
        let fg = opaque(fg);
        let bg = opaque(bg);

        let mut out = raster.blank_like();
        for (idx, &gray) in plane.values().iter().enumerate() {
            let px = if map.is_foreground(idx, gray) { fg } else { bg };
            out.set_pixel_at(idx, px);
        }

        let level = match self.mode {
            ThresholdMode::Global => Some(self.value),
            ThresholdMode::Otsu => map.uniform().map(|t| t + 0.5),
            ThresholdMode::Adaptive => None,
        };

        tracing::debug!(
            mode = %self.mode,
            width = raster.width(),
            height = raster.height(),
            threshold = ?level,
            invert = self.invert,
            "Thresholded"
        );

        Ok(ThresholdOutcome {
            raster: out,
            map,
            level,
        })
    }
}

fn opaque(color: Rgb) -> [u8; 4] {
    let [r, g, b] = color.to_bytes();
    [r, g, b, 255]
}

impl Process for ThresholdParams {
    fn process(&self, raster: &Raster) -> Result<Raster, EngineError> {
        Ok(self.run(raster)?.raster)
    }
}
