//! # Millkit Sim
//!
//! Reading G-code back into commanded positions for simulation and
//! preview.
//!
//! - **Parsing**: line-oriented word scanner with modal motion, feed
//!   and axis state, comment and block-delete stripping, percent
//!   demarcation and program-end handling
//! - **Points**: one position per motion line, with feed and
//!   rapid/cutting classification

pub mod error;
pub mod parser;

pub use error::{ParseError, SimResult};
pub use parser::{parse_gcode, GcodeParser, SimPoint};
