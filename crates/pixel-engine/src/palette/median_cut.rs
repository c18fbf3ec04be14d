//! Median-cut quantization.

use crate::color::Rgb;

use super::kmeans::distinct_with_counts;

/// A bucket of distinct colors with their pixel counts.
#[derive(Debug, Clone)]
struct ColorBucket {
    colors: Vec<(Rgb, u64)>,
}

impl ColorBucket {
    fn new(colors: Vec<(Rgb, u64)>) -> Self {
        Self { colors }
    }

    /// Range (max - min) along each channel.
    fn ranges(&self) -> [u8; 3] {
        if self.colors.is_empty() {
            return [0; 3];
        }
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for (color, _) in &self.colors {
            for c in 0..3 {
                let v = color.channel(c);
                min[c] = min[c].min(v);
                max[c] = max[c].max(v);
            }
        }
        [max[0] - min[0], max[1] - min[1], max[2] - min[2]]
    }

    /// Channel with the largest range and that range. Ties prefer R, then G, then B.
    fn dominant_channel(&self) -> (usize, u8) {
        let [r, g, b] = self.ranges();
        if r >= g && r >= b {
            (0, r)
        } else if g >= b {
            (1, g)
        } else {
            (2, b)
        }
    }

    /// Count-weighted mean color of the bucket, rounded. An empty bucket is black.
    fn mean(&self) -> Rgb {
        let mut sums = [0u64; 3];
        let mut total = 0u64;
        for &(color, count) in &self.colors {
            sums[0] += color.r as u64 * count;
            sums[1] += color.g as u64 * count;
            sums[2] += color.b as u64 * count;
            total += count;
        }
        if total == 0 {
            return Rgb::BLACK;
        }
        let n = total as f64;
        Rgb::from_f32([
            (sums[0] as f64 / n) as f32,
            (sums[1] as f64 / n) as f32,
            (sums[2] as f64 / n) as f32,
        ])
    }

    /// Sort along `channel` and split at the pixel-count median.
    ///
    /// The split index is the first position where the running count reaches
    /// half the total, clamped so both halves keep at least one color.
    fn split(mut self, channel: usize) -> (ColorBucket, ColorBucket) {
        // Stable sort keeps first-seen order among equal keys.
        self.colors.sort_by_key(|(color, _)| color.channel(channel));
        let total: u64 = self.colors.iter().map(|&(_, count)| count).sum();
        let mut running = 0u64;
        let mut at = self.colors.len();
        for (i, &(_, count)) in self.colors.iter().enumerate() {
            running += count;
            if running * 2 >= total {
                at = i + 1;
                break;
            }
        }
        let at = at.clamp(1, self.colors.len().saturating_sub(1).max(1));
        let upper = self.colors.split_off(at);
        (ColorBucket::new(self.colors), ColorBucket::new(upper))
    }
}

/// Quantize `colors` to at most `count` representative colors.
///
/// The input is reduced to its distinct colors, each weighted by how often
/// it occurs. Starting from one bucket holding all of them, each round picks
/// the bucket whose dominant channel range is largest (earliest bucket on
/// ties), sorts it along that channel and splits it at the weighted median.
/// Splitting stops at `count` buckets or once every bucket holds a single
/// distinct color. Each bucket contributes its weighted mean, in bucket order.
///
/// Buckets never share a color, so the result is shorter than `count` only
/// when the input has fewer than `count` distinct colors.
pub fn median_cut(colors: &[Rgb], count: usize) -> Vec<Rgb> {
    if colors.is_empty() || count == 0 {
        return Vec::new();
    }

    let mut buckets = vec![ColorBucket::new(distinct_with_counts(colors))];

    while buckets.len() < count {
        let mut candidate: Option<(usize, usize, u8)> = None;
        for (i, bucket) in buckets.iter().enumerate() {
            if bucket.colors.len() < 2 {
                continue;
            }
            let (channel, range) = bucket.dominant_channel();
            if candidate.map_or(true, |(_, _, best)| range > best) {
                candidate = Some((i, channel, range));
            }
        }

        // Every bucket holds one distinct color.
        let Some((idx, channel, range)) = candidate else {
            break;
        };

        let bucket = buckets.remove(idx);
        let (lower, upper) = bucket.split(channel);
        tracing::trace!(bucket = idx, channel, range, "median-cut split");
        buckets.insert(idx, upper);
        buckets.insert(idx, lower);
    }

    tracing::debug!(buckets = buckets.len(), requested = count, "median-cut finished");
    buckets.iter().map(ColorBucket::mean).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input_empty_palette() {
        assert!(median_cut(&[], 4).is_empty());
    }

    #[test]
    fn test_single_bucket_is_mean() {
        let colors = [Rgb::new(0, 0, 0), Rgb::new(10, 20, 30)];
        assert_eq!(median_cut(&colors, 1), vec![Rgb::new(5, 10, 15)]);
    }

    #[test]
    fn test_fewer_distinct_colors_than_requested() {
        let colors = vec![Rgb::new(1, 2, 3); 50];
        assert_eq!(median_cut(&colors, 8), vec![Rgb::new(1, 2, 3)]);

        let mut two = vec![Rgb::BLACK; 10];
        two.extend(vec![Rgb::WHITE; 3]);
        assert_eq!(median_cut(&two, 8), vec![Rgb::BLACK, Rgb::WHITE]);
    }

    #[test]
    fn test_room_to_spare_keeps_pure_colors() {
        // Plenty of buckets left over: each color ends up alone, no blends
        // and no repeats.
        let mut colors = vec![Rgb::new(255, 0, 0); 30];
        colors.extend(vec![Rgb::new(0, 0, 255); 30]);
        colors.extend(vec![Rgb::new(0, 255, 0); 30]);
        assert_eq!(
            median_cut(&colors, 8),
            vec![Rgb::new(0, 0, 255), Rgb::new(0, 255, 0), Rgb::new(255, 0, 0)]
        );
    }

    #[test]
    fn test_mean_is_weighted_by_count() {
        let bucket = ColorBucket::new(vec![(Rgb::BLACK, 3), (Rgb::new(100, 200, 40), 1)]);
        assert_eq!(bucket.mean(), Rgb::new(25, 50, 10));
    }

    #[test]
    fn test_split_at_weighted_median() {
        // 90 of 100 pixels sit in the first color: it is split off alone.
        let bucket = ColorBucket::new(vec![
            (Rgb::new(0, 0, 0), 90),
            (Rgb::new(50, 0, 0), 5),
            (Rgb::new(100, 0, 0), 5),
        ]);
        let (lower, upper) = bucket.split(0);
        assert_eq!(lower.colors.len(), 1);
        assert_eq!(upper.colors.len(), 2);
    }

    #[test]
    fn test_exact_count_for_gray_ramp() {
        let colors: Vec<Rgb> = (0..=255u8).map(|v| Rgb::new(v, v, v)).collect();
        for k in [1, 2, 3, 5, 16, 64] {
            assert_eq!(median_cut(&colors, k).len(), k, "k = {k}");
        }
    }

    #[test]
    fn test_tie_break_prefers_red_channel() {
        // Equal R and G ranges: the split must happen along R.
        let colors = [
            Rgb::new(0, 100, 0),
            Rgb::new(100, 0, 0),
            Rgb::new(10, 90, 0),
            Rgb::new(90, 10, 0),
        ];
        let bucket = ColorBucket::new(colors.iter().map(|&c| (c, 1)).collect());
        assert_eq!(bucket.dominant_channel(), (0, 100));

        let palette = median_cut(&colors, 2);
        // Sorted by R: (0,100), (10,90) | (90,10), (100,0)
        assert_eq!(palette, vec![Rgb::new(5, 95, 0), Rgb::new(95, 5, 0)]);
    }

    #[test]
    fn test_green_beats_blue_on_tie() {
        let bucket = ColorBucket::new(vec![(Rgb::new(0, 0, 0), 1), (Rgb::new(0, 40, 40), 1)]);
        assert_eq!(bucket.dominant_channel(), (1, 40));
    }

    #[test]
    fn test_empty_bucket_mean_is_black() {
        assert_eq!(ColorBucket::new(Vec::new()).mean(), Rgb::BLACK);
    }
}
