//! Error types for the image tooling crate.
//!
//! Covers raster loading, image-driven parameter validation and the
//! generation errors bubbled up from the core.

use perfpanel_core::GenerationError;
use thiserror::Error;

/// Errors that can occur while analysing images or generating from them.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// Invalid parameters were provided to a tool.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Image file could not be loaded or decoded.
    #[error("Failed to load image: {0}")]
    LoadError(String),

    /// Generation rejected its input.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),
}

/// Errors related to parameter validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Result type alias for image tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cam_tool_error_display() {
        let err = CamToolError::InvalidParameters("scale must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameters: scale must be positive");

        let err = CamToolError::LoadError("bad header".to_string());
        assert_eq!(err.to_string(), "Failed to load image: bad header");
    }

    #[test]
    fn test_parameter_error_display() {
        let err = ParameterError::OutOfRange {
            name: "density".to_string(),
            value: 120.0,
            min: 0.0,
            max: 100.0,
        };
        assert_eq!(
            err.to_string(),
            "Parameter 'density' out of range: 120 (valid: 0..100)"
        );
    }

    #[test]
    fn test_error_conversion() {
        let cam_err: CamToolError = ParameterError::InvalidValue {
            name: "scale".to_string(),
            reason: "must be positive".to_string(),
        }
        .into();
        assert!(matches!(cam_err, CamToolError::Parameter(_)));

        let cam_err: CamToolError = GenerationError::InvalidBrightnessGrid {
            reason: "short".to_string(),
        }
        .into();
        assert_eq!(cam_err.to_string(), "Invalid brightness grid: short");
    }
}
