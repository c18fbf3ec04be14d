//! Synthetic rasters and scratch files.

use std::path::{Path, PathBuf};

use pixel_engine::Raster;
use pixelsmith::services::png_codec;

/// Named colors used across tests
pub mod colors {
    pub const BLACK: [u8; 4] = [0, 0, 0, 255];
    pub const WHITE: [u8; 4] = [255, 255, 255, 255];
    pub const RED: [u8; 4] = [255, 0, 0, 255];
    pub const GREEN: [u8; 4] = [0, 255, 0, 255];
    pub const BLUE: [u8; 4] = [0, 0, 255, 255];
    pub const CLEAR: [u8; 4] = [0, 0, 0, 0];
}

/// Horizontal gray ramp from 0 to 255, repeated on every row
pub fn gray_ramp(width: usize, height: usize) -> Raster {
    let pixels: Vec<[u8; 4]> = (0..height)
        .flat_map(|_| {
            (0..width).map(move |x| {
                let v = if width > 1 { (x * 255 / (width - 1)) as u8 } else { 0 };
                [v, v, v, 255]
            })
        })
        .collect();
    Raster::from_pixels(width, height, &pixels).unwrap()
}

/// Smooth color gradient: red across, green down, blue constant
pub fn color_gradient(width: usize, height: usize) -> Raster {
    let pixels: Vec<[u8; 4]> = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                [
                    (x * 255 / width.max(2).saturating_sub(1)) as u8,
                    (y * 255 / height.max(2).saturating_sub(1)) as u8,
                    96,
                    255,
                ]
            })
        })
        .collect();
    Raster::from_pixels(width, height, &pixels).unwrap()
}

/// Left half dark, right half light, with some texture in each half
pub fn two_tone(width: usize, height: usize) -> Raster {
    let pixels: Vec<[u8; 4]> = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                let jitter = ((x + y) % 3) as u8 * 4;
                let v = if x < width / 2 { 20 + jitter } else { 220 + jitter };
                [v, v, v, 255]
            })
        })
        .collect();
    Raster::from_pixels(width, height, &pixels).unwrap()
}

/// Row-major stripes of the given colors
pub fn stripes(width: usize, rows: &[[u8; 4]]) -> Raster {
    let pixels: Vec<[u8; 4]> = rows
        .iter()
        .flat_map(|&color| std::iter::repeat(color).take(width))
        .collect();
    Raster::from_pixels(width, rows.len(), &pixels).unwrap()
}

/// Write `raster` as a PNG into `dir` and return its path
pub fn write_png(dir: &Path, name: &str, raster: &Raster) -> PathBuf {
    let path = dir.join(name);
    png_codec::write_rgba(&path, raster).unwrap();
    path
}

/// Write a YAML config file into `dir` and return its path
pub fn write_config(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}
