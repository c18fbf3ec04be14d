#![allow(clippy::module_inception, clippy::needless_range_loop)]

//! pixel-engine: raster pixel transforms
//!
//! Four independent components share one RGBA [`Raster`] type and the
//! uniform [`Process`] boundary:
//!
//! - **Palette builder**: median-cut or k-means quantization to a
//!   [`Palette`], then nearest-color remapping ([`PaletteParams`])
//! - **Ditherer**: Floyd–Steinberg, ordered Bayer or random dithering onto
//!   a fixed palette ([`DitherParams`])
//! - **Threshold engine**: global, adaptive local-mean or Otsu two-color
//!   reduction ([`ThresholdParams`])
//! - **Tone curve engine**: control-point curves composed into per-channel
//!   lookup tables ([`CurveParams`])
//!
//! # Quick Start
//!
//! ```
//! use pixel_engine::{PaletteAlgorithm, PaletteParams, Process, Raster};
//!
//! let pixels: Vec<[u8; 4]> = (0..16u8).map(|v| [v * 16, 0, 255 - v * 16, 255]).collect();
//! let raster = Raster::from_pixels(4, 4, &pixels).unwrap();
//!
//! let params = PaletteParams::new(PaletteAlgorithm::MedianCut, 4);
//! let palette = params.build_palette(&raster).unwrap();
//! assert_eq!(palette.len(), 4);
//!
//! let out = params.process(&raster).unwrap();
//! assert_eq!(out.width(), 4);
//! ```
//!
//! # Determinism
//!
//! Every component is a pure function of its input raster and parameters.
//! K-means takes an explicit seed; random dithering is reproducible only
//! when [`DitherOptions::seed`] is set. Sources are never mutated: each call
//! allocates its own output, so neighbor-dependent passes (error diffusion,
//! adaptive window sums) always read unmodified input.
//!
//! # Color Math
//!
//! All math runs directly on 8-bit sRGB channel values. Distances are
//! squared Euclidean in RGB; grayscale is `0.299R + 0.587G + 0.114B`.

pub mod api;
pub mod color;
pub mod curve;
pub mod dither;
pub mod output;
pub mod palette;
pub mod raster;
pub mod threshold;


pub use api::{EngineError, Operation, Process};
pub use color::Rgb;
pub use curve::{ChannelLuts, Curve, CurveParams, Lut};
pub use dither::{
    bayer_matrix, Dither, DitherAlgorithm, DitherOptions, DitherParams, FloydSteinberg, Ordered,
    RandomDither,
};
pub use output::IndexedImage;
pub use palette::{
    opaque_colors, KMeans, MedianCut, Palette, PaletteAlgorithm, PaletteError, PaletteParams,
    ParseColorError, Quantize, MAX_PALETTE_COLORS,
};
pub use raster::{luma, GrayPlane, Raster};
pub use threshold::{
    otsu_level, Threshold, ThresholdMap, ThresholdMode, ThresholdOutcome, ThresholdParams,
};
