//! # Millkit Geom
//!
//! 2D path algebra and geometry support for toolpath synthesis.
//!
//! ## Path Algebra
//!
//! - **Paths**: integer-space points, open polylines and closed polygons,
//!   path sets
//! - **Offset**: polygon grow/shrink with round or bevel joins
//! - **Booleans**: union, difference, intersection, xor and
//!   self-intersection cleanup behind a narrow clipping wrapper
//! - **Queries**: boundary crossing, nearest vertex, containment
//! - **Merge**: greedy stitching of path fragments into continuous
//!   travel paths under a non-crossing constraint
//!
//! ## Geometry Support
//!
//! - **Arcs**: endpoint-parameterized elliptical arcs to cubic Beziers
//! - **Decomposition**: ear clipping plus Hertel-Mehlhorn convex cover,
//!   with hole bridging
//! - **SVG input**: `d` path-data strings linearized to integer paths

pub mod arc;
pub mod clip;
pub mod decompose;
pub mod error;
pub mod merge;
pub mod offset;
pub mod path;
pub mod query;
pub mod svgpath;

pub use arc::{arc_to_cubics, ArcParams};
pub use clip::{
    boolean, difference, intersection, simplify_and_clean, union, xor, BoolOp, FillRule,
};
pub use decompose::decompose_convex;
pub use error::{GeomError, GeomResult};
pub use merge::{merge_path, merge_paths};
pub use offset::{offset, offset_with, JoinStyle};
pub use path::{Bounds, Path, PathSet, Point};
pub use query::{closest_vertex, crosses, point_in_pathset, point_in_polygon};
pub use svgpath::parse_path_data;
