//! Error types for toolpath generation.
//!
//! Parameter validation failures block before any geometry work;
//! degenerate geometry inside a strategy goes to the diagnostics sink
//! instead and never lands here.

use std::io;
use thiserror::Error;

/// Errors that can occur while validating parameters or generating
/// toolpaths.
#[derive(Error, Debug)]
pub enum CamError {
    /// A numeric parameter is outside its valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter is invalid for a reason a plain range cannot express.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// The requested strategy is not implemented by this engine.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// An operation carries no usable input geometry.
    #[error("Empty geometry: {0}")]
    EmptyGeometry(String),

    /// A geometry operation failed during toolpath creation.
    #[error("Geometry error: {0}")]
    Geometry(#[from] millkit_geom::GeomError),

    /// Project file serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error while reading or writing project files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CamError {
    /// Shorthand for the range variant with string-literal names.
    pub fn out_of_range(name: &str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            name: name.to_string(),
            value,
            min,
            max,
        }
    }

    /// Shorthand for the invalid-value variant.
    pub fn invalid_value(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for toolpath operations.
pub type CamResult<T> = Result<T, CamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = CamError::out_of_range("overlap", 1.5, 0.0, 1.0);
        assert_eq!(
            err.to_string(),
            "Parameter 'overlap' out of range: 1.5 (valid: 0..1)"
        );
    }

    #[test]
    fn test_invalid_value_display() {
        let err = CamError::invalid_value("width", "must be at least the cutter diameter");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'width': must be at least the cutter diameter"
        );
    }

    #[test]
    fn test_unsupported_display() {
        let err = CamError::Unsupported("v_carve".to_string());
        assert_eq!(err.to_string(), "Unsupported operation: v_carve");
    }

    #[test]
    fn test_geometry_conversion() {
        let geom = millkit_geom::GeomError::InvalidPathData("bad token".to_string());
        let err: CamError = geom.into();
        assert!(matches!(err, CamError::Geometry(_)));
        assert_eq!(err.to_string(), "Geometry error: Invalid path data: bad token");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "project not found");
        let err: CamError = io_err.into();
        assert!(matches!(err, CamError::Io(_)));
    }
}
