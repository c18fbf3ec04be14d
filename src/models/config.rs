use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::params::{
    CurveSpec, CurvesStep, DitherStep, QuantizeStep, StepConfig, ThresholdStep,
};
use crate::error::AppError;

/// Environment variable naming the config file when `--config` is absent
pub const CONFIG_ENV: &str = "PIXELSMITH_CONFIG";

/// Application configuration loaded from config.yaml
///
/// ```yaml
/// presets:
///   mono:
///     - op: threshold
///       mode: otsu
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Named step lists, run in order
    #[serde(default)]
    pub presets: BTreeMap<String, Vec<StepConfig>>,
}

impl AppConfig {
    /// Parse a YAML document
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, AppError> {
        serde_yaml::from_str(content).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration from `path`, or the built-in presets when no path
    /// is given or the file cannot be used
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content, path) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        presets = config.presets.len(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Steps of a named preset
    pub fn preset(&self, name: &str) -> Result<&[StepConfig], AppError> {
        self.presets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| AppError::UnknownPreset(name.to_string()))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut presets = BTreeMap::new();

        presets.insert(
            "mono-otsu".to_string(),
            vec![StepConfig::Threshold(ThresholdStep {
                mode: "otsu".to_string(),
                ..Default::default()
            })],
        );

        presets.insert(
            "four-gray".to_string(),
            vec![StepConfig::Dither(DitherStep {
                palette: ["#000000", "#555555", "#aaaaaa", "#ffffff"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                ..Default::default()
            })],
        );

        presets.insert(
            "poster-8".to_string(),
            vec![StepConfig::Quantize(QuantizeStep {
                colors: 8,
                ..Default::default()
            })],
        );

        presets.insert(
            "contrast".to_string(),
            vec![StepConfig::Curves(CurvesStep {
                master: Some(CurveSpec::Preset("contrast".to_string())),
                ..Default::default()
            })],
        );

        presets.insert(
            "newsprint".to_string(),
            vec![
                StepConfig::Curves(CurvesStep {
                    master: Some(CurveSpec::Preset("contrast".to_string())),
                    ..Default::default()
                }),
                StepConfig::Dither(DitherStep {
                    algorithm: "ordered".to_string(),
                    bayer_size: 8,
                    ..Default::default()
                }),
            ],
        );

        Self { presets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        let names: Vec<&str> = config.presets.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["contrast", "four-gray", "mono-otsu", "newsprint", "poster-8"]
        );
    }

    #[test]
    fn test_default_presets_are_valid() {
        let config = AppConfig::default();
        for (name, steps) in &config.presets {
            for step in steps {
                assert!(step.to_operation().is_ok(), "preset {name} step {}", step.op());
            }
        }
    }

    #[test]
    fn test_preset_lookup() {
        let config = AppConfig::default();

        let steps = config.preset("newsprint").unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].op(), "curves");
        assert_eq!(steps[1].op(), "dither");
    }

    #[test]
    fn test_preset_lookup_unknown() {
        let config = AppConfig::default();

        let result = config.preset("sepia");
        assert!(matches!(result, Err(AppError::UnknownPreset(name)) if name == "sepia"));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r##"
presets:
  bw:
    - op: threshold
      value: 100
  warm:
    - op: curves
      red: brighten
      blue: darken
"##;
        let config = AppConfig::from_yaml(yaml, Path::new("test.yaml")).unwrap();

        assert_eq!(config.presets.len(), 2);
        let bw = config.preset("bw").unwrap();
        assert_eq!(
            bw[0],
            StepConfig::Threshold(ThresholdStep {
                value: 100.0,
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_from_yaml_invalid() {
        let result = AppConfig::from_yaml("presets: [1, 2", Path::new("broken.yaml"));
        assert!(matches!(result, Err(AppError::Config { .. })));
    }

    #[test]
    fn test_empty_document_has_no_presets() {
        let config = AppConfig::from_yaml("{}", Path::new("empty.yaml")).unwrap();
        assert!(config.presets.is_empty());
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        assert_eq!(AppConfig::load(None), AppConfig::default());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("missing.yaml")));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_unparsable_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "presets:\n  bad:\n    - op: blur").unwrap();

        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "presets:\n  gray:\n    - op: quantize\n      colors: 2").unwrap();

        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config.presets.len(), 1);
        assert_eq!(
            config.preset("gray").unwrap()[0],
            StepConfig::Quantize(QuantizeStep {
                colors: 2,
                ..Default::default()
            })
        );
    }
}
