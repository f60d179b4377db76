//! # Millkit Core
//!
//! Shared foundation for the millkit workspace: the integer coordinate
//! scale, unit conversion, and the diagnostics sink strategies use to
//! surface non-fatal warnings.

pub mod diagnostics;
pub mod units;

pub use diagnostics::{Diagnostics, Warning};
pub use units::{
    from_units, mm_to_units, to_units, units_to_mm, MeasurementSystem, ARC_TOLERANCE,
    CLEAN_TOLERANCE, UNITS_PER_INCH, UNITS_PER_MM,
};
