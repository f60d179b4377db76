//! Perforated cut-out: drill cycles spaced evenly along the grown
//! outline so the part stays tethered by uncut webs.

use crate::error::{CamError, CamResult};
use crate::toolpath::{closed_only, Toolpath};
use millkit_core::Diagnostics;
use millkit_geom::{offset, Path, PathSet, Point};

/// Parameters for perforated cutting.
#[derive(Debug, Clone)]
pub struct PerforateParams {
    /// Cutter diameter in integer units.
    pub cutter_diameter: i64,
    /// Uncut material left between adjacent holes, integer units.
    pub spacing: i64,
    /// Z the cutter retracts to between holes, integer units.
    pub retract_z: i64,
    /// Drill depth, integer units.
    pub bottom_z: i64,
}

impl PerforateParams {
    pub fn validate(&self) -> CamResult<()> {
        if self.cutter_diameter <= 0 {
            return Err(CamError::invalid_value(
                "cutter_diameter",
                "must be positive",
            ));
        }
        if self.spacing < 0 {
            return Err(CamError::invalid_value("spacing", "must not be negative"));
        }
        if self.bottom_z >= self.retract_z {
            return Err(CamError::invalid_value(
                "bottom_z",
                "must lie below the retract height",
            ));
        }
        Ok(())
    }
}

/// Drill a ring of holes along the outline grown by half a cutter.
///
/// Hole count is `floor(perimeter / (diameter + spacing))` and the
/// holes are respaced evenly so the ring closes without a partial web.
/// Each hole is a retract, plunge, retract triple carrying its own Z.
/// A path too short for even one hole falls back to cutting its own
/// outline.
pub fn perforate(
    shape: &PathSet,
    params: &PerforateParams,
    diag: &mut Diagnostics,
) -> CamResult<Vec<Toolpath>> {
    params.validate()?;
    let shape = closed_only(shape, "perforate", diag);
    let grown = offset(&shape, params.cutter_diameter / 2);
    let hole_step = (params.cutter_diameter + params.spacing) as f64;

    let mut out = Vec::new();
    for path in grown {
        let perimeter = path.perimeter();
        let count = (perimeter / hole_step).floor() as usize;
        if count == 0 {
            diag.warn("perimeter shorter than one hole step, cutting the outline instead");
            out.push(Toolpath::new(path));
            continue;
        }
        let stride = perimeter / count as f64;
        let mut drill = Vec::with_capacity(count * 3);
        for stop in drill_stops(&path, stride, count) {
            drill.push(stop.at_depth(params.retract_z));
            drill.push(stop.at_depth(params.bottom_z));
            drill.push(stop.at_depth(params.retract_z));
        }
        out.push(Toolpath::drilled(Path::polyline(drill)));
    }
    Ok(out)
}

/// Points at multiples of `stride` along the path, starting at the
/// first vertex.
fn drill_stops(path: &Path, stride: f64, count: usize) -> Vec<Point> {
    let mut stops = Vec::with_capacity(count);
    let mut next_at = 0.0;
    let mut walked = 0.0;
    for (a, b) in path.edges() {
        let len = a.dist(b);
        if len <= 0.0 {
            continue;
        }
        while stops.len() < count && next_at <= walked + len {
            let t = (next_at - walked) / len;
            let x = a.x + ((b.x - a.x) as f64 * t).round() as i64;
            let y = a.y + ((b.y - a.y) as f64 * t).round() as i64;
            stops.push(Point::new(x, y));
            next_at += stride;
        }
        walked += len;
    }
    stops
}
