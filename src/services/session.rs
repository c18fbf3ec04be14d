use pixel_engine::{
    ChannelLuts, CurveParams, DitherAlgorithm, DitherOptions, DitherParams, EngineError,
    IndexedImage, Palette, PaletteParams, Raster, ThresholdOutcome, ThresholdParams,
};

use crate::error::AppError;

/// Editing state for one source image.
///
/// Holds the source raster plus the last built palette and curve tables,
/// each keyed by the parameters that produced it. A lookup with different
/// parameters rebuilds the object from scratch; nothing is patched in place.
pub struct EditSession {
    source: Raster,
    palette: Option<(PaletteParams, Palette)>,
    luts: Option<(CurveParams, ChannelLuts)>,
}

impl EditSession {
    pub fn new(source: Raster) -> Self {
        Self {
            source,
            palette: None,
            luts: None,
        }
    }

    /// The image being edited
    pub fn source(&self) -> &Raster {
        &self.source
    }

    /// Swap in a new source image. The palette depends on the pixels and is
    /// dropped; curve tables do not and are kept.
    pub fn replace_source(&mut self, source: Raster) {
        self.source = source;
        self.palette = None;
    }

    /// Parameters of the cached palette, if any
    pub fn cached_palette_params(&self) -> Option<&PaletteParams> {
        self.palette.as_ref().map(|(params, _)| params)
    }

    /// Parameters of the cached curve tables, if any
    pub fn cached_curve_params(&self) -> Option<&CurveParams> {
        self.luts.as_ref().map(|(params, _)| params)
    }

    /// Palette for `params`, built on first use
    pub fn palette(&mut self, params: &PaletteParams) -> Result<&Palette, AppError> {
        let entry = match self.palette.take() {
            Some(entry) if entry.0 == *params => entry,
            _ => {
                tracing::debug!(
                    algorithm = %params.algorithm,
                    colors = params.color_count,
                    "Building palette"
                );
                let palette = params.build_palette(&self.source)?;
                (params.clone(), palette)
            }
        };
        Ok(&self.palette.insert(entry).1)
    }

    /// Curve tables for `params`, tabulated on first use
    pub fn luts(&mut self, params: &CurveParams) -> &ChannelLuts {
        let entry = match self.luts.take() {
            Some(entry) if entry.0 == *params => entry,
            _ => {
                tracing::debug!("Tabulating tone curves");
                (params.clone(), params.luts())
            }
        };
        &self.luts.insert(entry).1
    }

    /// Remap the source onto the palette built from it
    pub fn quantize(&mut self, params: &PaletteParams) -> Result<Raster, AppError> {
        let source = self.source.clone();
        let palette = self.palette(params)?;
        palette
            .remap(&source)
            .ok_or(AppError::Engine(EngineError::EmptyInput("palette")))
    }

    /// Dither the source onto the palette built from it
    pub fn dither_with_built_palette(
        &mut self,
        palette_params: &PaletteParams,
        algorithm: DitherAlgorithm,
        options: DitherOptions,
    ) -> Result<IndexedImage, AppError> {
        let palette = self.palette(palette_params)?.clone();
        let params = DitherParams::new(algorithm, palette).options(options);
        Ok(params.dither(&self.source)?)
    }

    /// Dither the source onto a fixed palette
    pub fn dither(&self, params: &DitherParams) -> Result<IndexedImage, AppError> {
        Ok(params.dither(&self.source)?)
    }

    /// Threshold the source
    pub fn threshold(&self, params: &ThresholdParams) -> Result<ThresholdOutcome, AppError> {
        Ok(params.run(&self.source)?)
    }

    /// Apply tone curves to the source
    pub fn apply_curves(&mut self, params: &CurveParams) -> Raster {
        let source = self.source.clone();
        self.luts(params).apply(&source)
    }
}
