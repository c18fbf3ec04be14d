//! Color types and color-math helpers
//!
//! The engine works on 8-bit sRGB bytes exactly as they sit in the raster;
//! there is no gamma decoding. Distances are squared Euclidean in RGB.
//!
//! # Example
//!
//! ```
//! use pixel_engine::Rgb;
//!
//! let orange: Rgb = "#ff8000".parse().unwrap();
//! assert_eq!(orange.to_bytes(), [255, 128, 0]);
//! ```

mod rgb;

pub use rgb::Rgb;
