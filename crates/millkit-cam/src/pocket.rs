//! Pocket clearing strategies.
//!
//! Both variants start from the geometry shrunk by half the cutter
//! diameter plus any wall margin. The concentric variant walks nested
//! offsets inward and stitches them into minimal-retract runs; the
//! raster variant decomposes the shrunk region into convex pieces and
//! sweeps each with boustrophedon scan lines.

use crate::error::{CamError, CamResult};
use crate::toolpath::{closed_only, Toolpath};
use millkit_core::Diagnostics;
use millkit_geom::{decompose_convex, merge_paths, offset, Path, PathSet, Point};

/// Parameters shared by both pocket variants.
#[derive(Debug, Clone)]
pub struct PocketParams {
    /// Cutter diameter in integer units.
    pub cutter_diameter: i64,
    /// Fraction of the cutter diameter shared between adjacent passes.
    pub overlap: f64,
    /// Reverse cutting direction for climb milling.
    pub climb: bool,
    /// Extra material left on the pocket walls, integer units.
    pub margin: i64,
}

impl PocketParams {
    pub fn validate(&self) -> CamResult<()> {
        if self.cutter_diameter <= 0 {
            return Err(CamError::invalid_value(
                "cutter_diameter",
                "must be positive",
            ));
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(CamError::out_of_range("overlap", self.overlap, 0.0, 1.0));
        }
        if self.margin < 0 {
            return Err(CamError::invalid_value("margin", "must not be negative"));
        }
        Ok(())
    }

    /// First shrink distance: half the cutter plus the wall margin.
    fn wall_inset(&self) -> i64 {
        self.cutter_diameter / 2 + self.margin
    }

    /// Distance between adjacent passes, at least one unit.
    fn step(&self) -> i64 {
        let step = (self.cutter_diameter as f64 * (1.0 - self.overlap)).round() as i64;
        step.max(1)
    }
}

/// Clear a pocket with concentric rings stepping inward until the
/// offset collapses. Rings are stitched onto one another with the first
/// shrunk pass as the boundary connecting moves must not cross.
pub fn concentric_pocket(
    shape: &PathSet,
    params: &PocketParams,
    diag: &mut Diagnostics,
) -> CamResult<Vec<Toolpath>> {
    params.validate()?;
    let shape = closed_only(shape, "pocket", diag);
    let rings = concentric_rings(&shape, params);
    if rings.is_empty() {
        diag.warn("pocket collapsed under the cutter offset, nothing to clear");
        return Ok(Vec::new());
    }
    tracing::debug!(rings = rings.len(), "concentric pocket passes");

    let boundary = rings[0].clone();
    let mut acc = PathSet::new();
    for mut ring in rings {
        if params.climb {
            for path in &mut ring.paths {
                path.reverse();
            }
        }
        merge_paths(&mut acc, ring, Some(&boundary));
    }
    Ok(Toolpath::from_set(acc, Some(&boundary)))
}

/// Nested offset passes, outermost first. Each pass shrinks the
/// previous one by the overlap step; the sequence ends when the offset
/// yields nothing.
fn concentric_rings(shape: &PathSet, params: &PocketParams) -> Vec<PathSet> {
    let step = params.step();
    let mut rings = Vec::new();
    let mut pass = offset(shape, -params.wall_inset());
    while !pass.is_empty() {
        let next = offset(&pass, -step);
        rings.push(pass);
        pass = next;
    }
    rings
}

/// Clear a pocket with horizontal scan lines. The shrunk outline is cut
/// first, rotated so its start sits nearest the first scan vertex, then
/// each convex piece of the region is swept bottom to top with
/// alternating sweep direction.
pub fn raster_pocket(
    shape: &PathSet,
    params: &PocketParams,
    diag: &mut Diagnostics,
) -> CamResult<Vec<Toolpath>> {
    params.validate()?;
    let shape = closed_only(shape, "pocket", diag);
    let shrunk = offset(&shape, -params.wall_inset());
    if shrunk.is_empty() {
        diag.warn("pocket collapsed under the cutter offset, nothing to clear");
        return Ok(Vec::new());
    }

    let boundary = shrunk.clone();
    let step = params.step();
    let fills: Vec<Path> = decompose_convex(&shrunk)
        .iter()
        .filter_map(|piece| sweep_convex(piece, step))
        .collect();
    let first_fill_start = fills.first().and_then(|f| f.first());
    tracing::debug!(pieces = fills.len(), "raster pocket fill paths");

    let mut acc = PathSet::new();
    for mut outline in shrunk {
        if params.climb {
            outline.reverse();
        }
        if let Some(target) = first_fill_start {
            rotate_nearest(&mut outline, target);
        }
        acc.push(outline);
    }
    for fill in fills {
        acc.push(fill);
    }
    Ok(Toolpath::from_set(acc, Some(&boundary)))
}

/// Boustrophedon scan of one convex polygon. Rays run at fixed vertical
/// steps starting one step above the bottom of the piece; intersections
/// are sorted left to right on even rays and right to left on odd ones.
fn sweep_convex(piece: &Path, step: i64) -> Option<Path> {
    let bounds = piece.bounds()?;
    let mut verts: Vec<Point> = Vec::new();
    let mut ray = 0usize;
    let mut y = bounds.min_y + step;
    while y < bounds.max_y {
        let mut xs: Vec<i64> = Vec::new();
        for (a, b) in piece.edges() {
            if a.y == b.y {
                continue;
            }
            let (lo, hi) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
            // half-open so a ray through a vertex counts it once
            if y < lo || y >= hi {
                continue;
            }
            let t = (y - a.y) as f64 / (b.y - a.y) as f64;
            xs.push(a.x + ((b.x - a.x) as f64 * t).round() as i64);
        }
        if xs.len() >= 2 {
            xs.sort_unstable();
            if ray % 2 == 1 {
                xs.reverse();
            }
            verts.extend(xs.into_iter().map(|x| Point::new(x, y)));
            ray += 1;
        }
        y += step;
    }
    if verts.len() < 2 {
        return None;
    }
    Some(Path::polyline(verts))
}

/// Rotate a closed path so its start vertex is the one nearest `target`.
fn rotate_nearest(path: &mut Path, target: Point) {
    let mut best = 0usize;
    let mut best_d = i128::MAX;
    for (i, v) in path.points.iter().enumerate() {
        let d = v.dist_sq(target);
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    path.rotate_to_start(best);
}
