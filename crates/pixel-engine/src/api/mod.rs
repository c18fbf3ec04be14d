//! Public API for the pixel-engine crate.
//!
//! Every component exposes the same boundary, [`Process`]: a parameter
//! struct maps an input [`Raster`] to a freshly allocated output raster.
//! [`Operation`] is the tagged union over the four components, so callers
//! can hold a heterogeneous list of steps.

mod error;

pub use error::EngineError;

use crate::curve::CurveParams;
use crate::dither::DitherParams;
use crate::palette::PaletteParams;
use crate::raster::Raster;
use crate::threshold::ThresholdParams;

/// The uniform `process(raster, params) -> raster` boundary.
///
/// Implementations validate every parameter before reading a pixel and
/// never mutate `raster`.
pub trait Process {
    /// Run the transform on `raster`.
    fn process(&self, raster: &Raster) -> Result<Raster, EngineError>;
}

/// One engine step.
///
/// # Example
///
/// ```
/// use pixel_engine::{Curve, CurveParams, Operation, Process, Raster};
///
/// let op = Operation::Curves(CurveParams::new(Curve::invert()));
/// let out = op.process(&Raster::filled(1, 1, [0, 100, 255, 255])).unwrap();
/// assert_eq!(out.pixel(0, 0), [255, 155, 0, 255]);
/// assert_eq!(op.name(), "curves");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Build a palette and remap to it
    Quantize(PaletteParams),
    /// Dither onto a fixed palette
    Dither(DitherParams),
    /// Reduce to two colors
    Threshold(ThresholdParams),
    /// Apply tone curves
    Curves(CurveParams),
}

impl Operation {
    /// Short lowercase name of the component.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Quantize(_) => "quantize",
            Self::Dither(_) => "dither",
            Self::Threshold(_) => "threshold",
            Self::Curves(_) => "curves",
        }
    }
}

impl Process for Operation {
    fn process(&self, raster: &Raster) -> Result<Raster, EngineError> {
        match self {
            Self::Quantize(params) => params.process(raster),
            Self::Dither(params) => params.process(raster),
            Self::Threshold(params) => params.process(raster),
            Self::Curves(params) => params.process(raster),
        }
    }
}

impl From<PaletteParams> for Operation {
    fn from(params: PaletteParams) -> Self {
        Self::Quantize(params)
    }
}

impl From<DitherParams> for Operation {
    fn from(params: DitherParams) -> Self {
        Self::Dither(params)
    }
}

impl From<ThresholdParams> for Operation {
    fn from(params: ThresholdParams) -> Self {
        Self::Threshold(params)
    }
}

impl From<CurveParams> for Operation {
    fn from(params: CurveParams) -> Self {
        Self::Curves(params)
    }
}
