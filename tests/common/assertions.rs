//! Assertion helpers for tests.

use std::collections::BTreeSet;

use pixel_engine::Raster;
use pretty_assertions::assert_eq;

/// Assert every pixel is one of `allowed`
pub fn assert_only_colors(raster: &Raster, allowed: &[[u8; 4]]) {
    for (i, px) in raster.pixels().enumerate() {
        assert!(
            allowed.contains(&px),
            "pixel {i} is {px:?}, expected one of {allowed:?}"
        );
    }
}

/// Number of distinct RGBA values in `raster`
pub fn distinct_colors(raster: &Raster) -> usize {
    raster.pixels().collect::<BTreeSet<_>>().len()
}

/// Assert two rasters have the same dimensions
pub fn assert_same_size(actual: &Raster, expected: &Raster) {
    assert_eq!(
        (actual.width(), actual.height()),
        (expected.width(), expected.height()),
        "raster dimensions differ"
    );
}

/// Assert alpha is unchanged pixel by pixel
pub fn assert_alpha_preserved(actual: &Raster, source: &Raster) {
    assert_same_size(actual, source);
    let actual_alpha: Vec<u8> = actual.pixels().map(|p| p[3]).collect();
    let source_alpha: Vec<u8> = source.pixels().map(|p| p[3]).collect();
    assert_eq!(actual_alpha, source_alpha, "alpha channel changed");
}

/// Assert `bytes` start with the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}
