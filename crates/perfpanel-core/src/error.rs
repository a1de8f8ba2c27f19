//! Error handling for PerfPanel
//!
//! Provides the error taxonomy shared by every layer:
//! - Generation errors (pattern dispatch, panel validation, brightness input)
//! - Export errors (geometry serialization)
//!
//! Degenerate but well-formed input (zero-area panels, oversized spacing,
//! empty perforation lists) is not an error anywhere in the core: it resolves
//! to empty output or zeroed statistics.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Generation error type
///
/// Raised by the pattern generator and the image-driven generator before any
/// primitive is produced, so callers never see partial output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Pattern value without a placement algorithm
    #[error("Invalid pattern: {pattern}")]
    InvalidPattern {
        /// The rejected pattern name.
        pattern: String,
    },

    /// Shape value that cannot be parsed
    #[error("Invalid shape: {shape}")]
    InvalidShape {
        /// The rejected shape name.
        shape: String,
    },

    /// Panel extent is negative or not finite
    #[error("Invalid panel dimensions: {width} x {height}")]
    InvalidDimensions {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// Brightness grid data does not match its declared size
    #[error("Invalid brightness grid: {reason}")]
    InvalidBrightnessGrid {
        /// What is wrong with the grid.
        reason: String,
    },

    /// Random-pattern density outside 0..=1
    #[error("Invalid density: {density} (valid: 0..1)")]
    InvalidDensity {
        /// Requested density.
        density: f64,
    },

    /// User-entered length could not be parsed
    #[error("Invalid length '{input}': {reason}")]
    InvalidLength {
        /// The raw input.
        input: String,
        /// The reason parsing failed.
        reason: String,
    },
}

/// Export error type
///
/// Represents failures while serializing a perforation set into SVG, DXF or PDF.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A primitive carries geometry the target format cannot encode
    #[error("Failed to serialize perforation {id}: {reason}")]
    SerializationFailure {
        /// Id of the offending perforation.
        id: String,
        /// The reason serialization failed.
        reason: String,
    },

    /// Export format name not recognized
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Panel extent cannot be drawn
    #[error("Invalid panel dimensions: {width} x {height}")]
    InvalidDimensions {
        /// Panel width.
        width: f64,
        /// Panel height.
        height: f64,
    },

    /// Text formatting error while building a payload
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Main error type for PerfPanel
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Generation error
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is a generation error
    pub fn is_generation_error(&self) -> bool {
        matches!(self, Error::Generation(_))
    }

    /// Check if this is an export error
    pub fn is_export_error(&self) -> bool {
        matches!(self, Error::Export(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_display() {
        let err = GenerationError::InvalidPattern {
            pattern: "custom".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid pattern: custom");

        let err = GenerationError::InvalidDimensions {
            width: -1.0,
            height: 2.0,
        };
        assert_eq!(err.to_string(), "Invalid panel dimensions: -1 x 2");
    }

    #[test]
    fn test_serialization_failure_carries_id() {
        let err = ExportError::SerializationFailure {
            id: "grid-0-3".to_string(),
            reason: "non-finite position".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to serialize perforation grid-0-3: non-finite position"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = GenerationError::InvalidShape {
            shape: "star".to_string(),
        }
        .into();
        assert!(err.is_generation_error());
        assert!(!err.is_export_error());

        let err: Error = ExportError::UnsupportedFormat("stl".to_string()).into();
        assert!(err.is_export_error());
        assert_eq!(err.to_string(), "Unsupported export format: stl");
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::config("Reference DPI must be > 0");
        assert_eq!(err.to_string(), "Configuration error: Reference DPI must be > 0");
        assert!(!err.is_generation_error());
    }
}
