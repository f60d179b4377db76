//! Error types for the geometry kernel.

use thiserror::Error;

/// Errors that can occur in path algebra and geometry support.
#[derive(Error, Debug)]
pub enum GeomError {
    /// SVG path data could not be parsed.
    #[error("Invalid path data: {0}")]
    InvalidPathData(String),

    /// A path command the engine cannot linearize.
    #[error("Unsupported path command '{command}' at position {position}")]
    UnsupportedPathCommand { command: char, position: usize },

    /// A polygon handed to decomposition was unusable.
    #[error("Degenerate polygon: {0}")]
    DegeneratePolygon(String),

    /// Arc parameters describe no drawable arc.
    #[error("Invalid arc parameters: {0}")]
    InvalidArc(String),
}

/// Result type alias for geometry operations.
pub type GeomResult<T> = Result<T, GeomError>;
