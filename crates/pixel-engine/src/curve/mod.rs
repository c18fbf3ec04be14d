//! Tone curves and lookup tables.
//!
//! A [`Curve`] is a list of control points; tabulating it gives a [`Lut`].
//! [`CurveParams`] holds a master curve plus optional red, green and blue
//! overrides, and [`ChannelLuts`] precomputes the three per-channel tables
//! once per parameter set:
//!
//! ```text
//! out_c = lut_c[ lut_master[ src_c ] ]
//! ```
//!
//! The master table is applied first. Swapping the order is not equivalent
//! once both curves are non-trivial.

mod curve;
mod lut;

pub use curve::Curve;
pub use lut::Lut;

use crate::api::{EngineError, Process};
use crate::raster::Raster;

/// Master curve plus optional per-channel curves.
///
/// Curves are validated when they are built, so a `CurveParams` is always
/// valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CurveParams {
    /// Applied to every channel first
    pub master: Curve,
    /// Red override, applied after the master
    pub red: Option<Curve>,
    /// Green override, applied after the master
    pub green: Option<Curve>,
    /// Blue override, applied after the master
    pub blue: Option<Curve>,
}

impl CurveParams {
    /// Parameters with only a master curve.
    pub fn new(master: Curve) -> Self {
        Self {
            master,
            ..Self::default()
        }
    }

    /// Set the red curve.
    #[inline]
    pub fn red(mut self, curve: Curve) -> Self {
        self.red = Some(curve);
        self
    }

    /// Set the green curve.
    #[inline]
    pub fn green(mut self, curve: Curve) -> Self {
        self.green = Some(curve);
        self
    }

    /// Set the blue curve.
    #[inline]
    pub fn blue(mut self, curve: Curve) -> Self {
        self.blue = Some(curve);
        self
    }

    /// Precompute the per-channel tables.
    pub fn luts(&self) -> ChannelLuts {
        ChannelLuts::new(self)
    }
}

/// Final per-channel lookup tables with the master already folded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLuts {
    /// Red table
    pub red: Lut,
    /// Green table
    pub green: Lut,
    /// Blue table
    pub blue: Lut,
}

impl ChannelLuts {
    /// Tabulate and compose the curves in `params`.
    pub fn new(params: &CurveParams) -> Self {
        let master = params.master.to_lut();
        let channel = |curve: &Option<Curve>| match curve {
            Some(curve) => master.compose(&curve.to_lut()),
            None => master.clone(),
        };
        Self {
            red: channel(&params.red),
            green: channel(&params.green),
            blue: channel(&params.blue),
        }
    }

    /// True when applying these tables would change nothing.
    pub fn is_identity(&self) -> bool {
        self.red.is_identity() && self.green.is_identity() && self.blue.is_identity()
    }

    /// Map every pixel's RGB through the tables; alpha is unchanged.
    pub fn apply(&self, raster: &Raster) -> Raster {
        raster.map_pixels(|[r, g, b, a]| {
            [self.red.apply(r), self.green.apply(g), self.blue.apply(b), a]
        })
    }
}

impl Process for CurveParams {
    fn process(&self, raster: &Raster) -> Result<Raster, EngineError> {
        let luts = self.luts();
        tracing::debug!(
            width = raster.width(),
            height = raster.height(),
            identity = luts.is_identity(),
            "Applying tone curves"
        );
        Ok(luts.apply(raster))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_curve_applied_after_master() {
        let params = CurveParams::new(Curve::invert()).red(Curve::brighten());
        let luts = params.luts();
        // red: 0 -> 255 (master) -> 255 (brighten keeps the endpoint)
        assert_eq!(luts.red.apply(0), 255);
        // red: 128 -> 127 -> brighten(127)
        assert_eq!(luts.red.apply(128), Curve::brighten().evaluate(127));
        // green has no override
        assert_eq!(luts.green.apply(128), 127);
    }

    #[test]
    fn test_order_is_not_commutative() {
        let master_first = CurveParams::new(Curve::invert()).red(Curve::darken()).luts();
        let reversed = CurveParams::new(Curve::darken()).red(Curve::invert()).luts();
        assert_ne!(master_first.red, reversed.red);
    }

    #[test]
    fn test_alpha_untouched() {
        let raster = Raster::from_pixels(1, 1, &[[10, 20, 30, 77]]).unwrap();
        let out = CurveParams::new(Curve::invert()).process(&raster).unwrap();
        assert_eq!(out.pixel(0, 0), [245, 235, 225, 77]);
    }

    #[test]
    fn test_default_params_are_identity() {
        assert!(CurveParams::default().luts().is_identity());
    }
}
