//! Piecewise-linear tone curve with an editing contract.

use crate::api::EngineError;

use super::Lut;

/// A tone curve defined by control points.
///
/// Invariants, checked on construction and kept by every edit:
///
/// - at least two points
/// - x strictly increasing
/// - the first point has x = 0 and the last has x = 255
///
/// Endpoint y values may change; endpoint x values never do.
///
/// # Example
///
/// ```
/// use pixel_engine::Curve;
///
/// let mut curve = Curve::linear();
/// let idx = curve.insert(64, 100).unwrap();
/// assert_eq!(curve.evaluate(32), 50);
///
/// // Dragging an interior point past its neighbor stops one step short.
/// curve.move_point(idx, 300, 100).unwrap();
/// assert_eq!(curve.points()[idx], (254, 100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Curve {
    points: Vec<(u8, u8)>,
}

impl Default for Curve {
    fn default() -> Self {
        Self::linear()
    }
}

impl Curve {
    /// Build a curve from `(x, y)` control points.
    ///
    /// y values are clamped to 0..=255.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidParameter`] if there are fewer than two points,
    /// any x lies outside 0..=255, x is not strictly increasing, or the
    /// endpoints are not at x = 0 and x = 255.
    pub fn new(points: &[(i32, i32)]) -> Result<Self, EngineError> {
        if points.len() < 2 {
            return Err(EngineError::invalid(
                "curve",
                format!("needs at least 2 points, got {}", points.len()),
            ));
        }
        for &(x, _) in points {
            if !(0..=255).contains(&x) {
                return Err(EngineError::invalid(
                    "curve",
                    format!("x = {x} is outside 0..=255"),
                ));
            }
        }
        for pair in points.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(EngineError::invalid(
                    "curve",
                    format!(
                        "x must be strictly increasing, got {} after {}",
                        pair[1].0, pair[0].0
                    ),
                ));
            }
        }
        let first = points[0].0;
        let last = points[points.len() - 1].0;
        if first != 0 || last != 255 {
            return Err(EngineError::invalid(
                "curve",
                format!("endpoints must be at x = 0 and x = 255, got {first} and {last}"),
            ));
        }

        Ok(Self {
            points: points
                .iter()
                .map(|&(x, y)| (x as u8, y.clamp(0, 255) as u8))
                .collect(),
        })
    }

    /// The identity curve `{(0, 0), (255, 255)}`.
    pub fn linear() -> Self {
        Self {
            points: vec![(0, 0), (255, 255)],
        }
    }

    /// Negative: `{(0, 255), (255, 0)}`.
    pub fn invert() -> Self {
        Self {
            points: vec![(0, 255), (255, 0)],
        }
    }

    /// Gentle S-curve that deepens shadows and lifts highlights.
    pub fn contrast() -> Self {
        Self {
            points: vec![(0, 0), (64, 48), (192, 208), (255, 255)],
        }
    }

    /// Lifts the midtones.
    pub fn brighten() -> Self {
        Self {
            points: vec![(0, 0), (128, 160), (255, 255)],
        }
    }

    /// Lowers the midtones.
    pub fn darken() -> Self {
        Self {
            points: vec![(0, 0), (128, 96), (255, 255)],
        }
    }

    /// Preset by name: `linear`, `invert`, `contrast`, `brighten`, `darken`.
    pub fn preset(name: &str) -> Result<Self, EngineError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" | "identity" => Ok(Self::linear()),
            "invert" | "negative" => Ok(Self::invert()),
            "contrast" => Ok(Self::contrast()),
            "brighten" => Ok(Self::brighten()),
            "darken" => Ok(Self::darken()),
            other => Err(EngineError::unsupported("curve preset", other)),
        }
    }

    /// Control points in x order.
    #[inline]
    pub fn points(&self) -> &[(u8, u8)] {
        &self.points
    }

    /// True when this is exactly the two-point identity curve.
    pub fn is_linear(&self) -> bool {
        self.points == [(0, 0), (255, 255)]
    }

    fn is_endpoint(&self, index: usize) -> bool {
        index == 0 || index + 1 == self.points.len()
    }

    fn check_index(&self, index: usize) -> Result<(), EngineError> {
        if index >= self.points.len() {
            return Err(EngineError::invalid(
                "index",
                format!("no point {index}, curve has {}", self.points.len()),
            ));
        }
        Ok(())
    }

    /// Insert a point in x-sorted position, returning its index.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidParameter`] if a point already sits at `x`.
    pub fn insert(&mut self, x: u8, y: u8) -> Result<usize, EngineError> {
        match self.points.binary_search_by_key(&x, |&(px, _)| px) {
            Ok(_) => Err(EngineError::invalid(
                "x",
                format!("a point already exists at x = {x}"),
            )),
            Err(index) => {
                self.points.insert(index, (x, y));
                Ok(index)
            }
        }
    }

    /// Move point `index` to `(x, y)`, returning where it ended up.
    ///
    /// Interior points are clamped to stay strictly between their
    /// neighbors: x lands in `prev_x + 1 ..= next_x - 1`. Endpoints keep
    /// their x and only take the new y. y is clamped to 0..=255.
    pub fn move_point(&mut self, index: usize, x: i32, y: i32) -> Result<(u8, u8), EngineError> {
        self.check_index(index)?;
        let y = y.clamp(0, 255) as u8;
        let x = if self.is_endpoint(index) {
            self.points[index].0
        } else {
            let lo = self.points[index - 1].0 as i32 + 1;
            let hi = self.points[index + 1].0 as i32 - 1;
            x.clamp(lo, hi) as u8
        };
        self.points[index] = (x, y);
        Ok((x, y))
    }

    /// Remove interior point `index`, returning it.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidParameter`] for an endpoint or a missing index.
    pub fn remove(&mut self, index: usize) -> Result<(u8, u8), EngineError> {
        self.check_index(index)?;
        if self.is_endpoint(index) {
            return Err(EngineError::invalid("index", "endpoints cannot be removed"));
        }
        Ok(self.points.remove(index))
    }

    /// Index of the point closest to `(x, y)` within `radius`, for pointer
    /// hit-testing. The earlier point wins ties.
    pub fn point_near(&self, x: f32, y: f32, radius: f32) -> Option<usize> {
        let limit = radius * radius;
        let mut best: Option<(usize, f32)> = None;
        for (i, &(px, py)) in self.points.iter().enumerate() {
            let dx = px as f32 - x;
            let dy = py as f32 - y;
            let dist = dx * dx + dy * dy;
            if dist <= limit && best.map_or(true, |(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Output for input `x`, by linear interpolation between the
    /// surrounding control points.
    pub fn evaluate(&self, x: u8) -> u8 {
        let segment = self
            .points
            .windows(2)
            .find(|pair| x <= pair[1].0)
            .unwrap_or(&self.points[self.points.len() - 2..]);
        let (x0, y0) = segment[0];
        let (x1, y1) = segment[1];

        let span = (x1 - x0) as f32;
        let t = (x.saturating_sub(x0)) as f32;
        let y = y0 as f32 + (y1 as f32 - y0 as f32) * t / span;
        y.round().clamp(0.0, 255.0) as u8
    }

    /// Tabulate the curve for every input byte.
    pub fn to_lut(&self) -> Lut {
        Lut::from_fn(|v| self.evaluate(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation() {
        assert!(Curve::new(&[(0, 0)]).is_err());
        assert!(Curve::new(&[(0, 0), (128, 10), (128, 20), (255, 255)]).is_err());
        assert!(Curve::new(&[(0, 0), (100, 10), (50, 20), (255, 255)]).is_err());
        assert!(Curve::new(&[(0, 0), (256, 255)]).is_err());
        assert!(Curve::new(&[(-1, 0), (255, 255)]).is_err());
        assert!(Curve::new(&[(10, 0), (255, 255)]).is_err());
        assert!(Curve::new(&[(0, 0), (200, 255)]).is_err());
        let curve = Curve::new(&[(0, -20), (128, 300), (255, 255)]).unwrap();
        assert_eq!(curve.points(), &[(0, 0), (128, 255), (255, 255)]);
    }

    #[test]
    fn test_linear_evaluates_to_identity() {
        let curve = Curve::linear();
        for v in 0..=255u8 {
            assert_eq!(curve.evaluate(v), v);
        }
        assert!(curve.is_linear());
        assert!(curve.to_lut().is_identity());
    }

    #[test]
    fn test_interpolation_rounds() {
        let curve = Curve::new(&[(0, 0), (100, 50), (255, 255)]).unwrap();
        assert_eq!(curve.evaluate(100), 50);
        assert_eq!(curve.evaluate(1), 1); // 0.5 rounds away from zero
        assert_eq!(curve.evaluate(50), 25);
        assert_eq!(curve.evaluate(255), 255);
    }

    #[test]
    fn test_invert_preset() {
        let curve = Curve::invert();
        assert_eq!(curve.evaluate(0), 255);
        assert_eq!(curve.evaluate(255), 0);
        assert_eq!(curve.evaluate(100), 155);
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(Curve::preset("Contrast").unwrap(), Curve::contrast());
        assert!(matches!(
            Curve::preset("solarize"),
            Err(EngineError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut curve = Curve::linear();
        assert_eq!(curve.insert(200, 180).unwrap(), 1);
        assert_eq!(curve.insert(50, 70).unwrap(), 1);
        assert_eq!(
            curve.points(),
            &[(0, 0), (50, 70), (200, 180), (255, 255)]
        );
        assert!(curve.insert(50, 10).is_err());
        assert!(curve.insert(0, 10).is_err());
    }

    #[test]
    fn test_move_interior_clamps_to_neighbors() {
        let mut curve = Curve::new(&[(0, 0), (50, 50), (100, 100), (255, 255)]).unwrap();
        assert_eq!(curve.move_point(1, 150, 60).unwrap(), (99, 60));
        assert_eq!(curve.move_point(1, -40, 500).unwrap(), (1, 255));
        assert_eq!(curve.move_point(2, 120, 110).unwrap(), (120, 110));
    }

    #[test]
    fn test_move_endpoint_keeps_x() {
        let mut curve = Curve::linear();
        assert_eq!(curve.move_point(0, 40, 30).unwrap(), (0, 30));
        assert_eq!(curve.move_point(1, 10, 200).unwrap(), (255, 200));
        assert!(curve.move_point(2, 10, 10).is_err());
    }

    #[test]
    fn test_remove_protects_endpoints() {
        let mut curve = Curve::new(&[(0, 0), (128, 90), (255, 255)]).unwrap();
        assert!(curve.remove(0).is_err());
        assert!(curve.remove(2).is_err());
        assert_eq!(curve.remove(1).unwrap(), (128, 90));
        assert!(curve.is_linear());
    }

    #[test]
    fn test_point_near() {
        let curve = Curve::new(&[(0, 0), (128, 128), (255, 255)]).unwrap();
        assert_eq!(curve.point_near(130.0, 125.0, 6.0), Some(1));
        assert_eq!(curve.point_near(64.0, 64.0, 6.0), None);
        assert_eq!(curve.point_near(2.0, 1.0, 6.0), Some(0));
    }
}
