//! Unit conversion and the integer coordinate scale.
//!
//! All geometry runs on integer coordinates at a fixed scale so that
//! offset and clean tolerances behave consistently regardless of the
//! drawing's real-world units. Conversion between the integer space and
//! Metric (mm) or Imperial (inch) values happens only at the job
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integer units per millimeter. Every coordinate entering the geometry
/// kernel is pre-multiplied by this scale.
pub const UNITS_PER_MM: i64 = 100_000;

/// Integer units per inch.
pub const UNITS_PER_INCH: i64 = 2_540_000;

/// Vertex dedupe / collinearity threshold for cleaning, in integer units.
pub const CLEAN_TOLERANCE: i64 = 1;

/// Sagitta bound when flattening arcs from rounded offset joins, in
/// integer units.
pub const ARC_TOLERANCE: f64 = 2.5;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl Default for MeasurementSystem {
    fn default() -> Self {
        Self::Metric
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

impl MeasurementSystem {
    /// Integer units per one unit of this system.
    pub fn units_per_unit(self) -> i64 {
        match self {
            Self::Metric => UNITS_PER_MM,
            Self::Imperial => UNITS_PER_INCH,
        }
    }

    /// Unit label for display and G-code comments ("mm" or "in").
    pub fn label(self) -> &'static str {
        match self {
            Self::Metric => "mm",
            Self::Imperial => "in",
        }
    }
}

/// Convert a real-world length to integer units.
pub fn to_units(value: f64, system: MeasurementSystem) -> i64 {
    (value * system.units_per_unit() as f64).round() as i64
}

/// Convert integer units back to a real-world length.
pub fn from_units(units: i64, system: MeasurementSystem) -> f64 {
    units as f64 / system.units_per_unit() as f64
}

/// Convert millimeters to integer units.
pub fn mm_to_units(mm: f64) -> i64 {
    (mm * UNITS_PER_MM as f64).round() as i64
}

/// Convert integer units to millimeters.
pub fn units_to_mm(units: i64) -> f64 {
    units as f64 / UNITS_PER_MM as f64
}
