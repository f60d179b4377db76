//! # Millkit CAM
//!
//! Toolpath synthesis: turning resolved 2D geometry into ordered
//! cutting moves and G-code programs.
//!
//! ## Strategies
//!
//! - **Pocketing**: concentric rings or boustrophedon raster fill, both
//!   clearing the region inside a shape
//! - **Outline**: contour channels along the inside or outside of the
//!   shape edge
//! - **Perforate**: drill cycles spaced along the grown outline
//! - **Engrave**: tracing the drawn geometry without compensation
//!
//! ## Program assembly
//!
//! - **Operations**: serialized machining steps with per-step cutting
//!   parameters, combined geometry and strategy dispatch
//! - **Projects**: a job description plus its operations, compiled into
//!   a complete G-code program
//! - **Generation**: multi-pass depth stepping, plunge ramping, holding
//!   tabs and drill cycles over an absolute-positioning emitter

pub mod engrave;
pub mod error;
pub mod gcode_gen;
pub mod operation;
pub mod outline;
pub mod perforate;
pub mod pocket;
pub mod project;
pub mod tabs;
pub mod toolpath;

pub use engrave::{engrave, EngraveParams};
pub use error::{CamError, CamResult};
pub use gcode_gen::{DepthParams, GcodeGenerator, MachineParams, TabPlan};
pub use operation::{CutParams, Operation, RawPath, Strategy};
pub use outline::{outline, OutlineParams, OutlineSide};
pub use perforate::{perforate, PerforateParams};
pub use pocket::{concentric_pocket, raster_pocket, PocketParams};
pub use project::{Job, Project, TabConfig, Tool};
pub use tabs::separate_tabs;
pub use toolpath::Toolpath;
