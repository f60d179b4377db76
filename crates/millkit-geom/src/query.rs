//! Point and segment queries against path sets.
//!
//! All predicates use exact integer arithmetic (i128 intermediates), so
//! results are stable regardless of coordinate magnitude.

use crate::path::{Path, PathSet, Point};

/// Twice the signed area of triangle a-b-c. Positive when c lies left
/// of a->b.
pub(crate) fn orient(a: Point, b: Point, c: Point) -> i128 {
    let abx = (b.x - a.x) as i128;
    let aby = (b.y - a.y) as i128;
    let acx = (c.x - a.x) as i128;
    let acy = (c.y - a.y) as i128;
    abx * acy - aby * acx
}

/// Assuming p collinear with a-b, is p within the segment's bounding
/// span (endpoints included)?
pub(crate) fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// True iff the segment p1->p2 crosses a boundary edge of the closed
/// paths in `set`.
///
/// A degenerate segment (p1 == p2) never crosses. Lying exactly along an
/// edge is not a crossing, and neither is touching an edge with one of
/// the segment's own endpoints: joining segments start and end on path
/// vertices, which frequently sit on the boundary itself. Passing
/// through a boundary vertex mid-segment counts as a crossing.
pub fn crosses(set: &PathSet, p1: Point, p2: Point) -> bool {
    if p1.same_xy(p2) {
        return false;
    }
    for path in set.closed_paths() {
        for (a, b) in path.edges() {
            if segment_crosses_edge(p1, p2, a, b) {
                return true;
            }
        }
    }
    false
}

fn segment_crosses_edge(p1: Point, p2: Point, a: Point, b: Point) -> bool {
    let d1 = orient(a, b, p1).signum();
    let d2 = orient(a, b, p2).signum();
    let d3 = orient(p1, p2, a).signum();
    let d4 = orient(p1, p2, b).signum();

    // proper crossing: strictly opposite sides both ways
    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }
    // both joining endpoints on the edge's line: collinear overlap, exempt
    if d1 == 0 && d2 == 0 {
        return false;
    }
    // touch with one of our own endpoints on the edge: exempt
    if (d1 == 0 && on_segment(a, b, p1)) || (d2 == 0 && on_segment(a, b, p2)) {
        return false;
    }
    // an edge vertex strictly interior to the joining segment
    (d3 == 0 && on_segment(p1, p2, a)) || (d4 == 0 && on_segment(p1, p2, b))
}

/// Nearest vertex to `point` among paths whose closed flag equals
/// `closed_match`: (path index, vertex index, squared distance). Ties go
/// to the first vertex in scan order.
pub fn closest_vertex(
    set: &PathSet,
    point: Point,
    closed_match: bool,
) -> Option<(usize, usize, i128)> {
    let mut best: Option<(usize, usize, i128)> = None;
    for (pi, path) in set.paths.iter().enumerate() {
        if path.closed != closed_match {
            continue;
        }
        for (vi, v) in path.points.iter().enumerate() {
            let d = v.dist_sq(point);
            if best.map_or(true, |(_, _, bd)| d < bd) {
                best = Some((pi, vi, d));
            }
        }
    }
    best
}

/// Even-odd containment test against one vertex ring, implicitly
/// closed. Points on the boundary count as inside.
pub(crate) fn ring_contains(points: &[Point], p: Point) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        if orient(a, b, p) == 0 && on_segment(a, b, p) {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) {
            // exact comparison of p.x against the edge's x at height p.y
            let den = (b.y - a.y) as i128;
            let num = (b.x - a.x) as i128 * (p.y - a.y) as i128;
            let lhs = (p.x - a.x) as i128 * den;
            if (den > 0 && lhs < num) || (den < 0 && lhs > num) {
                inside = !inside;
            }
        }
    }
    inside
}

/// Even-odd containment test against one closed path. Points on the
/// boundary count as inside.
pub fn point_in_polygon(path: &Path, p: Point) -> bool {
    path.closed && ring_contains(&path.points, p)
}

/// Even-odd containment across every closed path of a set.
pub fn point_in_pathset(set: &PathSet, p: Point) -> bool {
    let mut inside = false;
    for path in set.closed_paths() {
        for (a, b) in path.edges() {
            if orient(a, b, p) == 0 && on_segment(a, b, p) {
                return true;
            }
            if (a.y > p.y) != (b.y > p.y) {
                let den = (b.y - a.y) as i128;
                let num = (b.x - a.x) as i128 * (p.y - a.y) as i128;
                let lhs = (p.x - a.x) as i128 * den;
                if (den > 0 && lhs < num) || (den < 0 && lhs > num) {
                    inside = !inside;
                }
            }
        }
    }
    inside
}
