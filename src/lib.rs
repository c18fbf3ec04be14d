//! Pixelsmith - palette, dither, threshold and tone-curve tool
//!
//! Host layer around the `pixel_engine` crate: PNG I/O, YAML presets,
//! an edit session with cached palettes and curve tables, and a step
//! pipeline. This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod services;

pub use error::AppError;
pub use models::{AppConfig, StepConfig};
pub use services::{EditSession, Pipeline};
