pub mod config;
pub mod params;

pub use config::{AppConfig, CONFIG_ENV};
pub use params::{CurveSpec, CurvesStep, DitherStep, QuantizeStep, StepConfig, ThresholdStep};
