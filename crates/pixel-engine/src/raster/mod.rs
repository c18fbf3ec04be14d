//! Raster buffer and grayscale helpers shared by every component.

mod buffer;
mod gray;

pub use buffer::Raster;
pub use gray::{luma, GrayPlane};
