//! Boolean combination and cleaning of closed paths.
//!
//! Narrow wrapper around the external polygon clipping primitive. The
//! rest of the engine calls only these functions and relies only on the
//! documented tolerances, so the backing crate is replaceable.
//!
//! Closed results come back winding-normalized: outer contours
//! counter-clockwise, holes clockwise.

use crate::path::{Path, PathSet, Point};
use i_overlay::core::fill_rule::FillRule as OverlayFill;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use millkit_core::units::CLEAN_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Winding rule applied when resolving raw input geometry. Matches the
/// SVG fill-rule vocabulary of the source drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    #[default]
    EvenOdd,
    NonZero,
}

impl FillRule {
    fn to_overlay(self) -> OverlayFill {
        match self {
            FillRule::EvenOdd => OverlayFill::EvenOdd,
            FillRule::NonZero => OverlayFill::NonZero,
        }
    }
}

/// Boolean combination selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOp {
    Union,
    Difference,
    Intersection,
    Xor,
}

impl BoolOp {
    fn to_overlay(self) -> OverlayRule {
        match self {
            BoolOp::Union => OverlayRule::Union,
            BoolOp::Difference => OverlayRule::Difference,
            BoolOp::Intersection => OverlayRule::Intersect,
            BoolOp::Xor => OverlayRule::Xor,
        }
    }
}

/// Boolean combination of the closed paths of two sets. Open paths take
/// no part in region algebra. Inputs are assumed cleaned; even-odd fill
/// resolves intermediate windings.
pub fn boolean(a: &PathSet, b: &PathSet, op: BoolOp) -> PathSet {
    let subject = closed_contours(a);
    let clip = closed_contours(b);
    let shapes = subject.overlay(&clip, op.to_overlay(), OverlayFill::EvenOdd);
    shapes_to_pathset(shapes)
}

pub fn union(a: &PathSet, b: &PathSet) -> PathSet {
    boolean(a, b, BoolOp::Union)
}

pub fn difference(a: &PathSet, b: &PathSet) -> PathSet {
    boolean(a, b, BoolOp::Difference)
}

pub fn intersection(a: &PathSet, b: &PathSet) -> PathSet {
    boolean(a, b, BoolOp::Intersection)
}

pub fn xor(a: &PathSet, b: &PathSet) -> PathSet {
    boolean(a, b, BoolOp::Xor)
}

/// Clean a path set. Closed paths get vertex dedupe, self-intersection
/// resolution under `fill_rule`, collinear-vertex removal and winding
/// normalization; open paths only deduplicate adjacent vertices.
pub fn simplify_and_clean(set: &PathSet, fill_rule: FillRule) -> PathSet {
    let subject: Vec<Vec<[f64; 2]>> = set
        .closed_paths()
        .map(|p| dedupe_vertices(p.points.clone(), true))
        .filter(|pts| pts.len() >= 3)
        .map(|pts| pts.iter().map(|p| p.as_f64()).collect())
        .collect();

    let mut out = if subject.is_empty() {
        PathSet::new()
    } else {
        let clip: Vec<Vec<[f64; 2]>> = Vec::new();
        let shapes = subject.overlay(&clip, OverlayRule::Subject, fill_rule.to_overlay());
        shapes_to_pathset(shapes)
    };

    for path in set.open_paths() {
        let pts = dedupe_vertices(path.points.clone(), false);
        if pts.len() >= 2 {
            out.push(Path::polyline(pts));
        }
    }
    out
}

/// Closed paths of a set as float contours for the clipping primitive.
pub(crate) fn closed_contours(set: &PathSet) -> Vec<Vec<[f64; 2]>> {
    set.closed_paths()
        .filter(|p| p.len() >= 3)
        .map(|p| p.points.iter().map(|pt| pt.as_f64()).collect())
        .collect()
}

/// Clipping output back into integer paths: round, re-dedupe, drop
/// degenerates, normalize winding (shape contour 0 is the outer).
pub(crate) fn shapes_to_pathset(shapes: Vec<Vec<Vec<[f64; 2]>>>) -> PathSet {
    let mut out = PathSet::new();
    for shape in shapes {
        for (i, contour) in shape.into_iter().enumerate() {
            let points: Vec<Point> = contour
                .into_iter()
                .map(|[x, y]| Point::new(x.round() as i64, y.round() as i64))
                .collect();
            let points = remove_collinear_closed(dedupe_vertices(points, true));
            if points.len() < 3 {
                continue;
            }
            let mut path = Path::polygon(points);
            if path.signed_area2() == 0 {
                continue;
            }
            let outer = i == 0;
            if outer != path.is_ccw() {
                path.reverse();
            }
            out.push(path);
        }
    }
    out
}

/// Drop vertices within CLEAN_TOLERANCE of their predecessor; for closed
/// contours the last vertex may not sit on the first either.
fn dedupe_vertices(points: Vec<Point>, closed: bool) -> Vec<Point> {
    let tol_sq = (CLEAN_TOLERANCE as i128) * (CLEAN_TOLERANCE as i128);
    let mut pts: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        match pts.last() {
            Some(q) if q.dist_sq(p) <= tol_sq => {}
            _ => pts.push(p),
        }
    }
    if closed {
        while pts.len() >= 2 && pts[0].dist_sq(pts[pts.len() - 1]) <= tol_sq {
            pts.pop();
        }
    }
    pts
}

/// True when `b` lies within CLEAN_TOLERANCE of the line through `a`
/// and `c` (covers both collinear runs and zero-width spikes).
fn within_line_tolerance(a: Point, b: Point, c: Point) -> bool {
    let acx = (c.x - a.x) as i128;
    let acy = (c.y - a.y) as i128;
    let abx = (b.x - a.x) as i128;
    let aby = (b.y - a.y) as i128;
    let cross = acx * aby - acy * abx;
    let len_sq = acx * acx + acy * acy;
    if len_sq == 0 {
        return true;
    }
    let tol_sq = (CLEAN_TOLERANCE as i128) * (CLEAN_TOLERANCE as i128);
    cross * cross <= tol_sq * len_sq
}

fn remove_collinear_closed(points: Vec<Point>) -> Vec<Point> {
    if points.len() < 3 {
        return points;
    }
    let mut keep: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        keep.push(p);
        while keep.len() >= 3 {
            let n = keep.len();
            if within_line_tolerance(keep[n - 3], keep[n - 2], keep[n - 1]) {
                keep.remove(n - 2);
            } else {
                break;
            }
        }
    }
    // the seam wraps: first and last vertices can also be redundant
    loop {
        let n = keep.len();
        if n < 3 {
            break;
        }
        if within_line_tolerance(keep[n - 2], keep[n - 1], keep[0]) {
            keep.pop();
        } else if within_line_tolerance(keep[n - 1], keep[0], keep[1]) {
            keep.remove(0);
        } else {
            break;
        }
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: i64, y: i64, side: i64) -> Path {
        Path::polygon(vec![
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ])
    }

    #[test]
    fn test_union_of_disjoint_squares_keeps_both() {
        let a = PathSet::from_paths(vec![square(0, 0, 100)]);
        let b = PathSet::from_paths(vec![square(500, 0, 100)]);
        let result = union(&a, &b);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_union_of_overlapping_squares_merges() {
        let a = PathSet::from_paths(vec![square(0, 0, 100)]);
        let b = PathSet::from_paths(vec![square(50, 0, 100)]);
        let result = union(&a, &b);
        assert_eq!(result.len(), 1);
        // merged footprint is the 150x100 rectangle
        assert_eq!(result.paths[0].signed_area2().abs(), 2 * 150 * 100);
    }

    #[test]
    fn test_difference_punches_hole() {
        let outer = PathSet::from_paths(vec![square(0, 0, 100)]);
        let inner = PathSet::from_paths(vec![square(25, 25, 50)]);
        let result = difference(&outer, &inner);
        assert_eq!(result.len(), 2);
        let ccw: Vec<bool> = result.iter().map(Path::is_ccw).collect();
        assert!(ccw.contains(&true) && ccw.contains(&false));
    }

    #[test]
    fn test_intersection_of_disjoint_is_empty() {
        let a = PathSet::from_paths(vec![square(0, 0, 10)]);
        let b = PathSet::from_paths(vec![square(100, 100, 10)]);
        assert!(intersection(&a, &b).is_empty());
    }

    #[test]
    fn test_clean_removes_duplicate_and_collinear_vertices() {
        let noisy = Path::polygon(vec![
            Point::new(0, 0),
            Point::new(0, 0),
            Point::new(50, 0),
            Point::new(100, 0),
            Point::new(100, 100),
            Point::new(0, 100),
        ]);
        let cleaned = simplify_and_clean(&PathSet::from_paths(vec![noisy]), FillRule::EvenOdd);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.paths[0].len(), 4);
    }

    #[test]
    fn test_clean_open_path_dedupes_only() {
        let open = Path::polyline(vec![
            Point::new(0, 0),
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(20, 0),
        ]);
        let cleaned = simplify_and_clean(&PathSet::from_paths(vec![open]), FillRule::EvenOdd);
        assert_eq!(cleaned.len(), 1);
        let p = &cleaned.paths[0];
        assert!(!p.closed);
        // collinear interior vertex survives on open paths
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_clean_resolves_self_intersection() {
        // bowtie: two triangles sharing a crossing point
        let bowtie = Path::polygon(vec![
            Point::new(0, 0),
            Point::new(100, 100),
            Point::new(100, 0),
            Point::new(0, 100),
        ]);
        let cleaned = simplify_and_clean(&PathSet::from_paths(vec![bowtie]), FillRule::EvenOdd);
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn test_clean_drops_degenerate_polygon() {
        let sliver = Path::polygon(vec![Point::new(0, 0), Point::new(100, 0)]);
        let cleaned = simplify_and_clean(&PathSet::from_paths(vec![sliver]), FillRule::EvenOdd);
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_fill_rule_serde_names() {
        assert_eq!(
            serde_json::to_string(&FillRule::EvenOdd).unwrap(),
            "\"evenodd\""
        );
        assert_eq!(
            serde_json::to_string(&FillRule::NonZero).unwrap(),
            "\"nonzero\""
        );
    }
}
