//! Convex decomposition of closed polygons.
//!
//! Three stages: holes are bridged into their enclosing contour through
//! a mutually visible vertex pair, the resulting simple polygon is
//! triangulated by ear clipping (always removing the sharpest valid
//! ear), and adjacent triangles are merged back across shared diagonals
//! wherever the union stays convex (Hertel-Mehlhorn). The output is a
//! small convex cover, minimal but not globally minimum.
//!
//! Expects cleaned winding: outer contours counter-clockwise, holes
//! clockwise.

use crate::path::{Path, PathSet, Point};
use crate::query::{on_segment, orient, ring_contains};

/// Decompose the closed paths of `set` into convex polygons.
///
/// Open paths are ignored. Holes are matched to the innermost outer
/// contour containing them; a hole outside every outer is dropped.
pub fn decompose_convex(set: &PathSet) -> Vec<Path> {
    let mut outers: Vec<&Path> = Vec::new();
    let mut holes: Vec<&Path> = Vec::new();
    for path in set.closed_paths() {
        if path.len() < 3 {
            continue;
        }
        if path.is_ccw() {
            outers.push(path);
        } else {
            holes.push(path);
        }
    }

    let mut assigned: Vec<Vec<usize>> = vec![Vec::new(); outers.len()];
    for (hi, hole) in holes.iter().enumerate() {
        let probe = hole.points[0];
        let mut best: Option<(usize, i128)> = None;
        for (oi, outer) in outers.iter().enumerate() {
            if ring_contains(&outer.points, probe) {
                let area = outer.signed_area2().abs();
                if best.map_or(true, |(_, ba)| area < ba) {
                    best = Some((oi, area));
                }
            }
        }
        match best {
            Some((oi, _)) => assigned[oi].push(hi),
            None => tracing::warn!("hole lies outside every outer contour, dropping it"),
        }
    }

    let mut out = Vec::new();
    for (oi, outer) in outers.iter().enumerate() {
        let gate: Vec<&Path> = assigned[oi].iter().map(|&hi| holes[hi]).collect();
        let ring = bridge_holes(outer, &gate);
        let tris = triangulate(&ring);
        for piece in merge_convex(&ring, tris) {
            let path = Path::polygon(piece.into_iter().map(|i| ring[i]).collect());
            if path.signed_area2() > 0 {
                out.push(path);
            }
        }
    }
    out
}

/// Splice every hole into the outer ring through a visible vertex pair,
/// yielding one simple polygon (with duplicated bridge vertices).
fn bridge_holes(outer: &Path, holes: &[&Path]) -> Vec<Point> {
    let mut ring: Vec<Point> = outer.points.clone();
    let mut remaining: Vec<Vec<Point>> = holes.iter().map(|h| h.points.clone()).collect();

    while !remaining.is_empty() {
        // start from the hole with the rightmost vertex so bridges
        // cannot end up nested inside an unprocessed hole
        let (mut hi, mut hvi) = (0, 0);
        for (i, hole) in remaining.iter().enumerate() {
            for (vi, v) in hole.iter().enumerate() {
                let cur = remaining[hi][hvi];
                if v.x > cur.x || (v.x == cur.x && v.y > cur.y) {
                    hi = i;
                    hvi = vi;
                }
            }
        }
        let hp = remaining[hi][hvi];

        let mut order: Vec<usize> = (0..ring.len()).collect();
        order.sort_by_key(|&i| hp.dist_sq(ring[i]));
        let ci = order
            .iter()
            .copied()
            .find(|&ci| bridge_is_clear(hp, ring[ci], &ring, &remaining))
            .unwrap_or_else(|| {
                tracing::warn!("no unobstructed bridge to a hole, using the nearest vertex");
                order[0]
            });

        let hole = remaining.remove(hi);
        let mut merged = Vec::with_capacity(ring.len() + hole.len() + 2);
        merged.extend_from_slice(&ring[..=ci]);
        merged.extend_from_slice(&hole[hvi..]);
        merged.extend_from_slice(&hole[..=hvi]);
        merged.extend_from_slice(&ring[ci..]);
        ring = merged;
    }
    ring
}

/// Can the segment a-b serve as a bridge without touching any boundary
/// it does not share an endpoint with?
fn bridge_is_clear(a: Point, b: Point, ring: &[Point], holes: &[Vec<Point>]) -> bool {
    if a.same_xy(b) {
        return false;
    }
    let blocked = |pts: &[Point]| {
        let n = pts.len();
        for i in 0..n {
            let u = pts[i];
            let v = pts[(i + 1) % n];
            if u.same_xy(a) || u.same_xy(b) || v.same_xy(a) || v.same_xy(b) {
                continue;
            }
            if segments_touch(a, b, u, v) {
                return true;
            }
        }
        false
    };
    if blocked(ring) || holes.iter().any(|h| blocked(h)) {
        return false;
    }
    // the midpoint must sit in solid material
    let mid = Point::new((a.x + b.x) / 2, (a.y + b.y) / 2);
    if !ring_contains(ring, mid) {
        return false;
    }
    !holes.iter().any(|h| ring_contains(h, mid))
}

/// Any contact between segments a-b and u-v, endpoint touches included.
fn segments_touch(a: Point, b: Point, u: Point, v: Point) -> bool {
    let d1 = orient(u, v, a).signum();
    let d2 = orient(u, v, b).signum();
    let d3 = orient(a, b, u).signum();
    let d4 = orient(a, b, v).signum();
    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }
    (d1 == 0 && on_segment(u, v, a))
        || (d2 == 0 && on_segment(u, v, b))
        || (d3 == 0 && on_segment(a, b, u))
        || (d4 == 0 && on_segment(a, b, v))
}

/// Ear-clipping triangulation of a counter-clockwise ring. Returns
/// vertex-index triples; collinear runs produce degenerate triangles
/// the caller filters by area.
fn triangulate(pts: &[Point]) -> Vec<[usize; 3]> {
    let n = pts.len();
    if n < 3 {
        return Vec::new();
    }
    let mut next: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
    let mut prev: Vec<usize> = (0..n).map(|i| (i + n - 1) % n).collect();
    let mut alive = vec![true; n];
    let mut active = n;
    let mut tris = Vec::with_capacity(n - 2);

    while active > 3 {
        let mut best: Option<(usize, f64)> = None;
        let mut best_convex: Option<(usize, f64)> = None;
        for i in (0..n).filter(|&i| alive[i]) {
            let (p, q) = (prev[i], next[i]);
            if orient(pts[p], pts[i], pts[q]) < 0 {
                continue;
            }
            let c = corner_cosine(pts[p], pts[i], pts[q]);
            if best_convex.map_or(true, |(_, bc)| c > bc) {
                best_convex = Some((i, c));
            }
            if !ear_is_clear(pts, &alive, p, i, q) {
                continue;
            }
            if best.map_or(true, |(_, bc)| c > bc) {
                best = Some((i, c));
            }
        }
        let ear = match (best, best_convex) {
            (Some((i, _)), _) => i,
            (None, Some((i, _))) => {
                tracing::warn!("no clear ear found, clipping the sharpest convex vertex");
                i
            }
            (None, None) => {
                tracing::warn!(active, "ring has no convex vertex, abandoning triangulation");
                break;
            }
        };
        tris.push([prev[ear], ear, next[ear]]);
        alive[ear] = false;
        next[prev[ear]] = next[ear];
        prev[next[ear]] = prev[ear];
        active -= 1;
    }

    if active == 3 {
        if let Some(i) = (0..n).find(|&i| alive[i]) {
            tris.push([i, next[i], next[next[i]]]);
        }
    }
    tris
}

/// Does any live vertex other than the corners land in the candidate
/// ear? On-boundary vertices count: a reflex vertex sitting exactly on
/// the new diagonal would be cut through otherwise.
fn ear_is_clear(pts: &[Point], alive: &[bool], a: usize, b: usize, c: usize) -> bool {
    let (pa, pb, pc) = (pts[a], pts[b], pts[c]);
    for (j, p) in pts.iter().enumerate() {
        if !alive[j] || j == a || j == b || j == c {
            continue;
        }
        if p.same_xy(pa) || p.same_xy(pb) || p.same_xy(pc) {
            continue;
        }
        if orient(pa, *p, pb) <= 0 && orient(pb, *p, pc) <= 0 && orient(pc, *p, pa) <= 0 {
            return false;
        }
    }
    true
}

/// Cosine of the interior angle at `v`; larger means sharper.
fn corner_cosine(p: Point, v: Point, q: Point) -> f64 {
    let ax = (p.x - v.x) as f64;
    let ay = (p.y - v.y) as f64;
    let bx = (q.x - v.x) as f64;
    let by = (q.y - v.y) as f64;
    let den = (ax * ax + ay * ay).sqrt() * (bx * bx + by * by).sqrt();
    if den == 0.0 {
        -1.0
    } else {
        (ax * bx + ay * by) / den
    }
}

/// Hertel-Mehlhorn: repeatedly merge two pieces across a shared
/// diagonal when both junction angles stay convex.
fn merge_convex(pts: &[Point], tris: Vec<[usize; 3]>) -> Vec<Vec<usize>> {
    let mut polys: Vec<Vec<usize>> = tris.into_iter().map(|t| t.to_vec()).collect();
    let mut i = 0;
    'scan: while i < polys.len() {
        for k in 0..polys[i].len() {
            let n1 = polys[i].len();
            let d1 = polys[i][k];
            let d2 = polys[i][(k + 1) % n1];
            for j in 0..polys.len() {
                if j == i {
                    continue;
                }
                let n2 = polys[j].len();
                for m in 0..n2 {
                    if polys[j][m] != d2 || polys[j][(m + 1) % n2] != d1 {
                        continue;
                    }
                    if let Some(merged) = try_merge(pts, &polys[i], k, &polys[j], m) {
                        polys[i] = merged;
                        polys.remove(j);
                        if j < i {
                            i -= 1;
                        }
                        continue 'scan;
                    }
                }
            }
        }
        i += 1;
    }
    polys
}

/// Merge poly1 (diagonal at k) with poly2 (reversed diagonal at m) if
/// the two new junction angles are convex. Only the junctions change,
/// so checking them is enough.
fn try_merge(
    pts: &[Point],
    poly1: &[usize],
    k: usize,
    poly2: &[usize],
    m: usize,
) -> Option<Vec<usize>> {
    let n1 = poly1.len();
    let n2 = poly2.len();
    let d1 = poly1[k];
    let d2 = poly1[(k + 1) % n1];
    let before_d1 = poly1[(k + n1 - 1) % n1];
    let after_d2 = poly1[(k + 2) % n1];
    let before_d2 = poly2[(m + n2 - 1) % n2];
    let after_d1 = poly2[(m + 2) % n2];

    if orient(pts[before_d1], pts[d1], pts[after_d1]) < 0 {
        return None;
    }
    if orient(pts[before_d2], pts[d2], pts[after_d2]) < 0 {
        return None;
    }

    let mut merged = Vec::with_capacity(n1 + n2 - 2);
    let mut idx = (k + 1) % n1;
    loop {
        merged.push(poly1[idx]);
        if idx == k {
            break;
        }
        idx = (idx + 1) % n1;
    }
    let mut idx = (m + 2) % n2;
    while idx != m {
        merged.push(poly2[idx]);
        idx = (idx + 1) % n2;
    }
    Some(merged)
}
