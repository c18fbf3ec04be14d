//! Output types shared by palette remapping and dithering.
//!
//! [`IndexedImage`] stores palette indices with dimension metadata, the
//! source alpha and an owned [`Palette`](crate::palette::Palette). It can be
//! expanded to an RGBA [`Raster`](crate::raster::Raster) or to packed RGB.

mod indexed_image;

pub use indexed_image::IndexedImage;
