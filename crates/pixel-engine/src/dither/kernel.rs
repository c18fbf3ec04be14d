//! Error diffusion kernel definitions.

/// An error diffusion kernel.
///
/// Each entry gives an offset `(dx, dy)` to a not-yet-visited neighbor and
/// the numerator of the share of error it receives; the denominator is
/// `divisor`. Neighbors outside the raster are skipped and their share is
/// dropped, never redistributed.
///
/// `max_dy` is the furthest row the kernel reaches, so the error buffer
/// needs `max_dy + 1` rows.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries for error diffusion.
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,

    /// Maximum dy value in entries.
    pub max_dy: usize,
}

impl Kernel {
    /// Fraction of the residual diffused in total (`sum(weights) / divisor`).
    pub fn propagation(&self) -> f64 {
        let sum: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        sum as f64 / self.divisor as f64
    }
}

/// Floyd–Steinberg dithering kernel.
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// Weights: 7/16 east, 3/16 south-west, 5/16 south, 1/16 south-east.
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // east
        (-1, 1, 3), // south-west
        (0, 1, 5),  // south
        (1, 1, 1),  // south-east
    ],
    divisor: 16,
    max_dy: 1,
};
