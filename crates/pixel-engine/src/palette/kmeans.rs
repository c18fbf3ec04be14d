//! K-means quantization.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::Rgb;

/// Distinct colors in first-occurrence order with their pixel counts.
pub(super) fn distinct_with_counts(colors: &[Rgb]) -> Vec<(Rgb, u64)> {
    let mut slots: HashMap<Rgb, usize> = HashMap::new();
    let mut distinct: Vec<(Rgb, u64)> = Vec::new();
    for &color in colors {
        match slots.get(&color) {
            Some(&slot) => distinct[slot].1 += 1,
            None => {
                slots.insert(color, distinct.len());
                distinct.push((color, 1));
            }
        }
    }
    distinct
}

#[inline]
fn distance_sq(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Index of the nearest centroid; the earliest centroid wins ties.
fn nearest_centroid(centroids: &[[f64; 3]], color: [f64; 3]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &centroid) in centroids.iter().enumerate() {
        let dist = distance_sq(centroid, color);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

fn to_f64(color: Rgb) -> [f64; 3] {
    [color.r as f64, color.g as f64, color.b as f64]
}

/// Quantize `colors` to at most `count` centroids with Lloyd's k-means.
///
/// Initial centroids are `count` distinct input colors drawn with a
/// `seed`-initialised RNG, so a fixed seed gives a fixed palette. Each round
/// assigns every color to its nearest centroid (squared RGB distance) and
/// moves each centroid to the mean of its members. The loop stops after
/// `max_iterations` rounds or as soon as no assignment changes. A centroid
/// whose cluster comes up empty keeps its previous position.
///
/// Work happens on distinct colors weighted by their pixel counts, which
/// gives the same means as clustering every pixel individually.
///
/// With `count` or fewer distinct colors, those colors are returned as-is.
pub fn kmeans(colors: &[Rgb], count: usize, max_iterations: usize, seed: u64) -> Vec<Rgb> {
    if colors.is_empty() || count == 0 {
        return Vec::new();
    }

    let distinct = distinct_with_counts(colors);
    if distinct.len() <= count {
        tracing::debug!(
            distinct = distinct.len(),
            requested = count,
            "k-means input has no more distinct colors than requested"
        );
        return distinct.into_iter().map(|(c, _)| c).collect();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids: Vec<[f64; 3]> =
        rand::seq::index::sample(&mut rng, distinct.len(), count)
            .into_iter()
            .map(|i| to_f64(distinct[i].0))
            .collect();

    let points: Vec<([f64; 3], f64)> = distinct
        .iter()
        .map(|&(c, n)| (to_f64(c), n as f64))
        .collect();
    let mut assignments = vec![usize::MAX; points.len()];
    let mut rounds = 0;

    for round in 0..max_iterations {
        rounds = round + 1;

        let mut changed = false;
        for (slot, &(point, _)) in assignments.iter_mut().zip(&points) {
            let nearest = nearest_centroid(&centroids, point);
            if *slot != nearest {
                *slot = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![[0.0f64; 3]; count];
        let mut weights = vec![0.0f64; count];
        for (&cluster, &(point, weight)) in assignments.iter().zip(&points) {
            for c in 0..3 {
                sums[cluster][c] += point[c] * weight;
            }
            weights[cluster] += weight;
        }
        for (centroid, (sum, weight)) in centroids.iter_mut().zip(sums.iter().zip(&weights)) {
            // Empty cluster: keep the previous centroid rather than divide by zero.
            if *weight > 0.0 {
                *centroid = [sum[0] / weight, sum[1] / weight, sum[2] / weight];
            }
        }
    }

    tracing::debug!(rounds, max_iterations, clusters = count, "k-means finished");

    centroids
        .into_iter()
        .map(|c| Rgb::from_f32([c[0] as f32, c[1] as f32, c[2] as f32]))
        .collect()
}
