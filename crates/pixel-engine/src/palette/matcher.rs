//! Nearest-color matching.

use crate::color::Rgb;

/// Index of the color in `colors` closest to `target`.
///
/// Distance is squared Euclidean RGB. On an exact tie the earliest entry
/// wins. Returns `None` only for an empty slice.
#[inline]
pub fn nearest_index(colors: &[Rgb], target: [f32; 3]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, color) in colors.iter().enumerate() {
        let dist = color.distance_sq(target);
        if best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((i, dist));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_palette_has_no_match() {
        assert_eq!(nearest_index(&[], [0.0, 0.0, 0.0]), None);
    }

    #[test]
    fn test_picks_closest() {
        let colors = [Rgb::BLACK, Rgb::new(128, 128, 128), Rgb::WHITE];
        assert_eq!(nearest_index(&colors, [100.0, 110.0, 120.0]), Some(1));
        assert_eq!(nearest_index(&colors, [250.0, 250.0, 250.0]), Some(2));
    }

    #[test]
    fn test_tie_goes_to_first_occurrence() {
        let colors = [Rgb::new(0, 0, 0), Rgb::new(20, 0, 0)];
        // Exactly halfway between the two entries.
        assert_eq!(nearest_index(&colors, [10.0, 0.0, 0.0]), Some(0));

        let reversed = [Rgb::new(20, 0, 0), Rgb::new(0, 0, 0)];
        assert_eq!(nearest_index(&reversed, [10.0, 0.0, 0.0]), Some(0));
    }

    #[test]
    fn test_duplicate_entries_resolve_to_first() {
        let colors = [Rgb::WHITE, Rgb::BLACK, Rgb::BLACK];
        assert_eq!(nearest_index(&colors, [0.0, 0.0, 0.0]), Some(1));
    }

    #[test]
    fn test_nan_target_still_returns_an_index() {
        let colors = [Rgb::BLACK, Rgb::WHITE];
        assert_eq!(nearest_index(&colors, [f32::NAN, 0.0, 0.0]), Some(0));
    }
}
