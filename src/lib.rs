//! # Millkit
//!
//! A CAM toolpath synthesis engine: 2D vector geometry in, CNC
//! toolpaths and G-code out.
//!
//! ## Architecture
//!
//! Millkit is organized as a workspace with multiple crates:
//!
//! 1. **millkit-core** - Coordinate scale, unit conversion, diagnostics
//! 2. **millkit-geom** - Path algebra, offsetting, booleans, stitching,
//!    arc linearization, convex decomposition
//! 3. **millkit-cam** - Toolpath strategies, operations, projects,
//!    G-code generation
//! 4. **millkit-sim** - G-code parsing back into point sequences
//! 5. **millkit** - Batch compiler binary over all of the above
//!
//! ## Pipeline
//!
//! A project file names its operations; each operation resolves its
//! drawn geometry into the integer coordinate space, a strategy turns
//! the geometry into toolpaths, and the generator serializes toolpaths
//! plus depth parameters into one G-code program.

pub use millkit_cam as cam;
pub use millkit_core as core;
pub use millkit_geom as geom;
pub use millkit_sim as sim;

pub use millkit_cam::{Operation, Project, Strategy, Toolpath};
pub use millkit_core::{Diagnostics, MeasurementSystem};
pub use millkit_geom::{Path, PathSet, Point};
pub use millkit_sim::{parse_gcode, SimPoint};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
