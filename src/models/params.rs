use pixel_engine::{
    Curve, CurveParams, DitherAlgorithm, DitherOptions, DitherParams, EngineError, Operation,
    Palette, PaletteAlgorithm, PaletteParams, Rgb, ThresholdMode, ThresholdParams,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One pipeline step as written in config.yaml
///
/// ```yaml
/// - op: threshold
///   mode: otsu
/// - op: dither
///   algorithm: ordered
///   palette: ["#000", "#fff"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum StepConfig {
    Quantize(QuantizeStep),
    Dither(DitherStep),
    Threshold(ThresholdStep),
    Curves(CurvesStep),
}

impl StepConfig {
    /// Tag used in config files
    pub fn op(&self) -> &'static str {
        match self {
            StepConfig::Quantize(_) => "quantize",
            StepConfig::Dither(_) => "dither",
            StepConfig::Threshold(_) => "threshold",
            StepConfig::Curves(_) => "curves",
        }
    }

    /// Parse tags, colors and curve points into an engine operation
    pub fn to_operation(&self) -> Result<Operation, EngineError> {
        Ok(match self {
            StepConfig::Quantize(step) => step.to_params()?.into(),
            StepConfig::Dither(step) => step.to_params()?.into(),
            StepConfig::Threshold(step) => step.to_params()?.into(),
            StepConfig::Curves(step) => step.to_params()?.into(),
        })
    }
}

/// Palette builder step
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QuantizeStep {
    #[serde(default = "default_palette_algorithm")]
    pub algorithm: String,

    #[serde(default = "default_color_count")]
    pub colors: usize,

    #[serde(default = "default_kmeans_iterations")]
    pub iterations: usize,

    #[serde(default)]
    pub seed: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_limit: Option<usize>,
}

fn default_palette_algorithm() -> String {
    "median-cut".to_string()
}

fn default_color_count() -> usize {
    16
}

fn default_kmeans_iterations() -> usize {
    pixel_engine::palette::DEFAULT_KMEANS_ITERATIONS
}

impl Default for QuantizeStep {
    fn default() -> Self {
        Self {
            algorithm: default_palette_algorithm(),
            colors: default_color_count(),
            iterations: default_kmeans_iterations(),
            seed: 0,
            sample_limit: None,
        }
    }
}

impl QuantizeStep {
    pub fn to_params(&self) -> Result<PaletteParams, EngineError> {
        let algorithm: PaletteAlgorithm = self.algorithm.parse()?;
        let mut params = PaletteParams::new(algorithm, self.colors)
            .kmeans_iterations(self.iterations)
            .seed(self.seed);
        if let Some(limit) = self.sample_limit {
            params = params.sample_limit(limit);
        }
        Ok(params)
    }
}

/// Ditherer step onto a fixed palette
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DitherStep {
    #[serde(default = "default_dither_algorithm")]
    pub algorithm: String,

    /// Hex colors; black and white when omitted
    #[serde(default = "default_dither_palette")]
    pub palette: Vec<String>,

    #[serde(default = "default_strength")]
    pub strength: f32,

    #[serde(default = "default_bayer_size")]
    pub bayer_size: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_dither_algorithm() -> String {
    "floyd-steinberg".to_string()
}

fn default_dither_palette() -> Vec<String> {
    vec!["#000000".to_string(), "#ffffff".to_string()]
}

fn default_strength() -> f32 {
    1.0
}

fn default_bayer_size() -> usize {
    4
}

impl Default for DitherStep {
    fn default() -> Self {
        Self {
            algorithm: default_dither_algorithm(),
            palette: default_dither_palette(),
            strength: default_strength(),
            bayer_size: default_bayer_size(),
            spread: None,
            seed: None,
        }
    }
}

impl DitherStep {
    pub fn to_params(&self) -> Result<DitherParams, EngineError> {
        let algorithm: DitherAlgorithm = self.algorithm.parse()?;
        let hex: Vec<&str> = self.palette.iter().map(String::as_str).collect();
        let palette = Palette::from_hex(&hex)?;

        let mut options = DitherOptions::new()
            .strength(self.strength)
            .bayer_size(self.bayer_size);
        if let Some(spread) = self.spread {
            options = options.spread(spread);
        }
        if let Some(seed) = self.seed {
            options = options.seed(seed);
        }
        Ok(DitherParams::new(algorithm, palette).options(options))
    }
}

/// Threshold engine step
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ThresholdStep {
    #[serde(default = "default_threshold_mode")]
    pub mode: String,

    #[serde(default = "default_threshold_value")]
    pub value: f32,

    #[serde(default = "default_block_size")]
    pub block_size: usize,

    #[serde(default = "default_constant")]
    pub constant: f32,

    #[serde(default)]
    pub invert: bool,

    #[serde(default = "default_foreground")]
    pub foreground: String,

    #[serde(default = "default_background")]
    pub background: String,
}

fn default_threshold_mode() -> String {
    "global".to_string()
}

fn default_threshold_value() -> f32 {
    128.0
}

fn default_block_size() -> usize {
    15
}

fn default_constant() -> f32 {
    5.0
}

fn default_foreground() -> String {
    "#ffffff".to_string()
}

fn default_background() -> String {
    "#000000".to_string()
}

impl Default for ThresholdStep {
    fn default() -> Self {
        Self {
            mode: default_threshold_mode(),
            value: default_threshold_value(),
            block_size: default_block_size(),
            constant: default_constant(),
            invert: false,
            foreground: default_foreground(),
            background: default_background(),
        }
    }
}

impl ThresholdStep {
    pub fn to_params(&self) -> Result<ThresholdParams, EngineError> {
        let mode: ThresholdMode = self.mode.parse()?;
        let foreground: Rgb = self.foreground.parse()?;
        let background: Rgb = self.background.parse()?;
        Ok(ThresholdParams::new(mode)
            .value(self.value)
            .block_size(self.block_size)
            .constant(self.constant)
            .invert(self.invert)
            .colors(foreground, background))
    }
}

/// A curve given either by preset name or by `[x, y]` control points
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CurveSpec {
    Preset(String),
    Points(Vec<[i32; 2]>),
}

impl CurveSpec {
    pub fn to_curve(&self) -> Result<Curve, EngineError> {
        match self {
            CurveSpec::Preset(name) => Curve::preset(name),
            CurveSpec::Points(points) => {
                let points: Vec<(i32, i32)> = points.iter().map(|&[x, y]| (x, y)).collect();
                Curve::new(&points)
            }
        }
    }
}

impl FromStr for CurveSpec {
    type Err = EngineError;

    /// `contrast` names a preset; `0:0,128:96,255:255` lists control points
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.contains(':') {
            return Ok(CurveSpec::Preset(s.to_string()));
        }
        let points = s
            .split(',')
            .map(|pair| {
                let (x, y) = pair.split_once(':').unwrap_or((pair, ""));
                match (x.trim().parse::<i32>(), y.trim().parse::<i32>()) {
                    (Ok(x), Ok(y)) => Ok([x, y]),
                    _ => Err(EngineError::InvalidParameter {
                        name: "curve",
                        reason: format!("expected `x:y`, got `{}`", pair.trim()),
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CurveSpec::Points(points))
    }
}

/// Tone curve step; the master curve defaults to linear
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct CurvesStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<CurveSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red: Option<CurveSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green: Option<CurveSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blue: Option<CurveSpec>,
}

impl CurvesStep {
    pub fn to_params(&self) -> Result<CurveParams, EngineError> {
        let master = match &self.master {
            Some(spec) => spec.to_curve()?,
            None => Curve::linear(),
        };
        let mut params = CurveParams::new(master);
        if let Some(spec) = &self.red {
            params = params.red(spec.to_curve()?);
        }
        if let Some(spec) = &self.green {
            params = params.green(spec.to_curve()?);
        }
        if let Some(spec) = &self.blue {
            params = params.blue(spec.to_curve()?);
        }
        Ok(params)
    }
}
