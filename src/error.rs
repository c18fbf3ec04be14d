use std::path::PathBuf;

use pixel_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Step {index} ({op}) failed: {message}")]
    StepFailed {
        index: usize,
        op: &'static str,
        message: String,
    },
}

impl From<png::DecodingError> for AppError {
    fn from(e: png::DecodingError) -> Self {
        AppError::PngDecode(e.to_string())
    }
}

impl From<png::EncodingError> for AppError {
    fn from(e: png::EncodingError) -> Self {
        AppError::PngEncode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_engine() {
        let error = AppError::from(EngineError::EmptyInput("no opaque pixels"));
        assert_eq!(error.to_string(), "Engine error: empty input: no opaque pixels");
    }

    #[test]
    fn test_app_error_png_decode() {
        let error = AppError::PngDecode("bad signature".to_string());
        assert_eq!(error.to_string(), "PNG decode error: bad signature");
    }

    #[test]
    fn test_app_error_png_encode() {
        let error = AppError::PngEncode("zero width".to_string());
        assert_eq!(error.to_string(), "PNG encode error: zero width");
    }

    #[test]
    fn test_app_error_unsupported_image() {
        let error = AppError::UnsupportedImage("image too large".to_string());
        assert_eq!(error.to_string(), "Unsupported image: image too large");
    }

    #[test]
    fn test_app_error_config() {
        let error = AppError::Config {
            path: PathBuf::from("presets.yaml"),
            message: "missing field `op`".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Config error in presets.yaml: missing field `op`"
        );
    }

    #[test]
    fn test_app_error_unknown_preset() {
        let error = AppError::UnknownPreset("sepia".to_string());
        assert_eq!(error.to_string(), "Unknown preset: sepia");
    }

    #[test]
    fn test_app_error_step_failed() {
        let error = AppError::StepFailed {
            index: 2,
            op: "dither",
            message: "palette is empty".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Step 2 (dither) failed: palette is empty"
        );
    }

    #[test]
    fn test_app_error_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = AppError::from(io_error);
        assert!(error.to_string().contains("IO error"));
    }
}
